//! Summary and generation aggregates over the energy fact tables.
//!
//! Month/year intervals read the monthly tables (kWh); day/hour
//! intervals read the hourly tables, whose Wh values are divided down
//! to kWh in SQL.

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::compose;
use crate::filter::{DateRange, Interval};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SummaryTotals {
    pub net: Option<f64>,
    pub solar: Option<f64>,
    pub used: Option<f64>,
    pub hdd: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SummaryBucket {
    pub date: PrimitiveDateTime,
    pub net: Option<f64>,
    pub solar: Option<f64>,
    pub used: Option<f64>,
    pub hdd: Option<f64>,
}

fn summary_tables(interval: Interval) -> (&'static str, &'static str, &'static str) {
    if interval.uses_monthly_tables() {
        ("energy_monthly", "hdd_monthly", "1.0")
    } else {
        ("energy_hourly", "hdd_hourly", "1000.0")
    }
}

fn summary_select(interval: Interval, with_date: bool) -> QueryBuilder<'static, Postgres> {
    let (energy, hdd, div) = summary_tables(interval);
    let date_col = if with_date { "MIN(e.date) AS date, " } else { "" };
    QueryBuilder::new(format!(
        "SELECT {date_col}\
         SUM(e.adjusted_load) / {div} AS net, \
         SUM(e.solar) / {div} AS solar, \
         SUM(e.used) / {div} AS used, \
         SUM(h.hdd) AS hdd \
         FROM {energy} e \
         LEFT JOIN {hdd} h ON h.date = e.date AND h.house_id = e.house_id \
         WHERE e.house_id = "
    ))
}

pub async fn summary_totals(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<SummaryTotals> {
    let mut qb = summary_select(interval, false);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<SummaryTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn summary_items(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<SummaryBucket>> {
    let mut qb = summary_select(interval, true);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<SummaryBucket>().fetch_all(pool).await?;
    Ok(rows)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PeakSolar {
    pub date: PrimitiveDateTime,
    pub solar: Option<f64>,
}

/// The single hour or day with the highest generation. Generation is
/// stored negative, so the minimum `solar` value wins.
async fn peak_generation(
    pool: &PgPool,
    table: &str,
    house_id: i32,
    range: &DateRange,
) -> Result<Option<PeakSolar>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT date, solar FROM {table} WHERE solar IS NOT NULL AND house_id = "
    ));
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);
    qb.push(" ORDER BY solar LIMIT 1");

    let row = qb
        .build_query_as::<PeakSolar>()
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn peak_generation_hour(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<Option<PeakSolar>> {
    peak_generation(pool, "energy_hourly", house_id, range).await
}

pub async fn peak_generation_day(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<Option<PeakSolar>> {
    peak_generation(pool, "energy_daily", house_id, range).await
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenerationTotals {
    pub actual: Option<f64>,
    pub estimated: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenerationBucket {
    pub date: PrimitiveDateTime,
    pub actual: Option<f64>,
    pub estimated: Option<f64>,
}

fn generation_monthly_select(with_date: bool) -> QueryBuilder<'static, Postgres> {
    let date_col = if with_date { "MIN(e.date) AS date, " } else { "" };
    QueryBuilder::new(format!(
        "SELECT {date_col}\
         SUM(e.solar) AS actual, \
         SUM(est.solar) AS estimated \
         FROM energy_monthly e \
         LEFT JOIN estimated_monthly est \
           ON est.date = e.date AND est.house_id = e.house_id \
         WHERE e.house_id = "
    ))
}

/// Month/year totals: actual generation against the monthly estimate.
pub async fn generation_totals_monthly(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<GenerationTotals> {
    let mut qb = generation_monthly_select(false);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb
        .build_query_as::<GenerationTotals>()
        .fetch_one(pool)
        .await?;
    Ok(totals)
}

pub async fn generation_items_monthly(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<GenerationBucket>> {
    let mut qb = generation_monthly_select(true);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb
        .build_query_as::<GenerationBucket>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourlyGenerationTotals {
    pub actual: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourlyGenerationBucket {
    pub date: PrimitiveDateTime,
    pub actual: Option<f64>,
}

/// Day/hour totals have no estimate column; hourly Wh become kWh.
pub async fn generation_totals_hourly(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<HourlyGenerationTotals> {
    let mut qb = QueryBuilder::new(
        "SELECT SUM(solar) / 1000.0 AS actual FROM energy_hourly WHERE house_id = ",
    );
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);

    let totals = qb
        .build_query_as::<HourlyGenerationTotals>()
        .fetch_one(pool)
        .await?;
    Ok(totals)
}

pub async fn generation_items_hourly(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<HourlyGenerationBucket>> {
    let mut qb = QueryBuilder::new(
        "SELECT MIN(date) AS date, SUM(solar) / 1000.0 AS actual \
         FROM energy_hourly WHERE house_id = ",
    );
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);
    compose::push_interval_group(&mut qb, "date", interval);

    let rows = qb
        .build_query_as::<HourlyGenerationBucket>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reads_monthly_tables_at_coarse_grain() {
        let sql = summary_select(Interval::Year, true).into_sql();
        assert!(sql.contains("FROM energy_monthly e"));
        assert!(sql.contains("LEFT JOIN hdd_monthly h"));
        assert!(sql.contains("SUM(e.used) / 1.0 AS used"));
        assert!(sql.starts_with("SELECT MIN(e.date) AS date"));
    }

    #[test]
    fn summary_divides_hourly_watt_hours_down() {
        let sql = summary_select(Interval::Hour, false).into_sql();
        assert!(sql.contains("FROM energy_hourly e"));
        assert!(sql.contains("LEFT JOIN hdd_hourly h"));
        assert!(sql.contains("SUM(e.solar) / 1000.0 AS solar"));
        assert!(!sql.contains("MIN(e.date)"));
    }
}
