//! Heating-degree-day aggregates and the extremes reported by the HDD
//! view (coldest hour, coldest day, heating-season totals).

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::compose;
use crate::domain::device::well_known;
use crate::filter::{DateRange, Interval};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HeatingSeasonTotals {
    pub ashp: Option<f64>,
    pub hdd: Option<f64>,
}

/// ASHP energy and degree-days summed over the range with the summer
/// months (May-September) excluded.
pub async fn heating_season_totals(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<HeatingSeasonTotals> {
    let mut qb = QueryBuilder::new(
        "SELECT SUM(e.ashp) AS ashp, SUM(h.hdd) AS hdd \
         FROM energy_daily e \
         JOIN hdd_daily h ON h.date = e.date AND h.house_id = e.house_id \
         WHERE e.ashp IS NOT NULL AND e.house_id = ",
    );
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_heating_season(&mut qb, "e.date");

    let totals = qb
        .build_query_as::<HeatingSeasonTotals>()
        .fetch_one(pool)
        .await?;
    Ok(totals)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ColdestHour {
    pub date: PrimitiveDateTime,
    pub temperature: Option<f64>,
}

pub async fn coldest_hour(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<Option<ColdestHour>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT date, temperature FROM temperature_hourly \
         WHERE device_id = {} AND temperature IS NOT NULL AND house_id = ",
        well_known::OUTDOOR_SENSOR
    ));
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);
    qb.push(" ORDER BY temperature LIMIT 1");

    let row = qb
        .build_query_as::<ColdestHour>()
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ColdestDay {
    pub date: PrimitiveDateTime,
    pub hdd: Option<f64>,
}

/// The day with the most degree-days in the range.
pub async fn coldest_day(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<Option<ColdestDay>> {
    let mut qb = QueryBuilder::new(
        "SELECT date, hdd FROM hdd_daily WHERE hdd IS NOT NULL AND house_id = ",
    );
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);
    qb.push(" ORDER BY hdd DESC LIMIT 1");

    let row = qb
        .build_query_as::<ColdestDay>()
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HddTotals {
    pub actual: Option<f64>,
    pub estimated: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HddBucket {
    pub date: PrimitiveDateTime,
    pub actual: Option<f64>,
    pub estimated: Option<f64>,
}

fn hdd_monthly_select(with_date: bool) -> QueryBuilder<'static, Postgres> {
    let date_col = if with_date { "MIN(h.date) AS date, " } else { "" };
    QueryBuilder::new(format!(
        "SELECT {date_col}\
         SUM(h.hdd) AS actual, \
         SUM(est.hdd) AS estimated \
         FROM hdd_monthly h \
         LEFT JOIN estimated_monthly est \
           ON est.date = h.date AND est.house_id = h.house_id \
         WHERE h.house_id = "
    ))
}

pub async fn totals(pool: &PgPool, house_id: i32, range: &DateRange) -> Result<HddTotals> {
    let mut qb = hdd_monthly_select(false);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "h.date", range);

    let totals = qb.build_query_as::<HddTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn items(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<HddBucket>> {
    let mut qb = hdd_monthly_select(true);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "h.date", range);
    compose::push_interval_group(&mut qb, "h.date", interval);

    let rows = qb.build_query_as::<HddBucket>().fetch_all(pool).await?;
    Ok(rows)
}
