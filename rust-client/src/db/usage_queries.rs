//! Per-circuit usage aggregates. All hourly readings are Wh and are
//! divided to kWh in SQL; rows are restricted to the two energy
//! monitors that carry circuit-level readings.

use anyhow::Result;
use once_cell::sync::Lazy;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use time::PrimitiveDateTime;

use crate::db::compose;
use crate::domain::device::well_known;
use crate::domain::Circuit;
use crate::filter::{DateRange, Interval};

static ENERGY_MONITOR_FILTER: Lazy<String> = Lazy::new(|| {
    let [first, second] = well_known::ENERGY_MONITORS;
    format!(" AND e.device_id IN ({first}, {second})")
});

/// Range totals for the `used` aggregate and every monitored circuit,
/// in breakdown order.
#[derive(Debug, Clone)]
pub struct UsageBreakdown {
    pub used: Option<f64>,
    pub circuits: Vec<(Circuit, Option<f64>)>,
}

pub async fn breakdown_totals(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<UsageBreakdown> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT SUM(e.used) / 1000.0 AS used");
    for circuit in Circuit::MONITORED {
        let col = circuit.column();
        qb.push(format!(", SUM(e.{col}) / 1000.0 AS {col}"));
    }
    qb.push(" FROM energy_hourly e WHERE e.house_id = ");
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);

    let row = qb.build().fetch_one(pool).await?;
    let used = row.try_get::<Option<f64>, _>("used")?;
    let mut circuits = Vec::with_capacity(Circuit::MONITORED.len());
    for circuit in Circuit::MONITORED {
        circuits.push((circuit, row.try_get::<Option<f64>, _>(circuit.column())?));
    }

    Ok(UsageBreakdown { used, circuits })
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsageTotals {
    pub actual: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsageBucket {
    pub date: PrimitiveDateTime,
    pub actual: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BudgetedTotals {
    pub actual: Option<f64>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BudgetedBucket {
    pub date: PrimitiveDateTime,
    pub actual: Option<f64>,
    pub budget: Option<f64>,
}

fn all_monthly_select(with_date: bool) -> QueryBuilder<'static, Postgres> {
    let date_col = if with_date { "MIN(e.date) AS date, " } else { "" };
    QueryBuilder::new(format!(
        "SELECT {date_col}\
         SUM(e.used) AS actual, \
         SUM(est.used) AS budget \
         FROM energy_monthly e \
         LEFT JOIN estimated_monthly est \
           ON est.date = e.date AND est.house_id = e.house_id \
         WHERE e.house_id = "
    ))
}

/// Month/year totals for all monitored circuits combined, with the
/// monthly budget alongside.
pub async fn all_totals_monthly(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<BudgetedTotals> {
    let mut qb = all_monthly_select(false);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<BudgetedTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn all_items_monthly(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<BudgetedBucket>> {
    let mut qb = all_monthly_select(true);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<BudgetedBucket>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn all_totals_hourly(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<UsageTotals> {
    let mut qb = QueryBuilder::new(
        "SELECT SUM(e.used) / 1000.0 AS actual FROM energy_hourly e WHERE e.house_id = ",
    );
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<UsageTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn all_items_hourly(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<UsageBucket>> {
    let mut qb = QueryBuilder::new(
        "SELECT MIN(e.date) AS date, SUM(e.used) / 1000.0 AS actual \
         FROM energy_hourly e WHERE e.house_id = ",
    );
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<UsageBucket>().fetch_all(pool).await?;
    Ok(rows)
}

/// `used` minus every monitored circuit, NULL-safe per column.
fn all_other_expression() -> String {
    let mut expr = String::from("SUM(e.used) / 1000.0");
    for circuit in Circuit::MONITORED {
        let col = circuit.column();
        expr.push_str(&format!(" - SUM(COALESCE(e.{col}, 0)) / 1000.0"));
    }
    expr
}

pub async fn all_other_totals(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<UsageTotals> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} AS actual FROM energy_hourly e WHERE e.house_id = ",
        all_other_expression()
    ));
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<UsageTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn all_other_items(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<UsageBucket>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT MIN(e.date) AS date, {} AS actual \
         FROM energy_hourly e WHERE e.house_id = ",
        all_other_expression()
    ));
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<UsageBucket>().fetch_all(pool).await?;
    Ok(rows)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AshpTotals {
    pub actual: Option<f64>,
    pub hdd: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AshpBucket {
    pub date: PrimitiveDateTime,
    pub actual: Option<f64>,
    pub hdd: Option<f64>,
}

fn ashp_select<'a>(base: f64, with_date: bool) -> QueryBuilder<'a, Postgres> {
    let date_col = if with_date { "MIN(e.date) AS date, " } else { "" };
    let mut qb = QueryBuilder::new(format!(
        "SELECT {date_col}SUM(e.ashp) / 1000.0 AS actual, SUM(GREATEST(("
    ));
    qb.push_bind(base);
    qb.push(format!(
        " - t.temperature) / 24.0, 0)) AS hdd \
         FROM energy_hourly e \
         JOIN temperature_hourly t ON t.date = e.date AND t.house_id = e.house_id \
         WHERE t.device_id = {} AND e.house_id = ",
        well_known::OUTDOOR_SENSOR
    ));
    qb
}

/// Heat-pump usage with heating-degree-days computed on the fly from
/// the outdoor sensor at the requested base temperature.
pub async fn ashp_totals(
    pool: &PgPool,
    house_id: i32,
    base: f64,
    range: &DateRange,
) -> Result<AshpTotals> {
    let mut qb = ashp_select(base, false);
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<AshpTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn ashp_items(
    pool: &PgPool,
    house_id: i32,
    base: f64,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<AshpBucket>> {
    let mut qb = ashp_select(base, true);
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<AshpBucket>().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn circuit_totals(
    pool: &PgPool,
    house_id: i32,
    circuit: Circuit,
    range: &DateRange,
) -> Result<UsageTotals> {
    let col = circuit.column();
    let mut qb = QueryBuilder::new(format!(
        "SELECT SUM(e.{col}) / 1000.0 AS actual FROM energy_hourly e WHERE e.house_id = "
    ));
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<UsageTotals>().fetch_one(pool).await?;
    Ok(totals)
}

pub async fn circuit_items(
    pool: &PgPool,
    house_id: i32,
    circuit: Circuit,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<UsageBucket>> {
    let col = circuit.column();
    let mut qb = QueryBuilder::new(format!(
        "SELECT MIN(e.date) AS date, SUM(e.{col}) / 1000.0 AS actual \
         FROM energy_hourly e WHERE e.house_id = "
    ));
    qb.push_bind(house_id);
    qb.push(ENERGY_MONITOR_FILTER.as_str());
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<UsageBucket>().fetch_all(pool).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_other_subtracts_every_monitored_circuit() {
        let expr = all_other_expression();
        assert!(expr.starts_with("SUM(e.used) / 1000.0"));
        for circuit in Circuit::MONITORED {
            assert!(expr.contains(&format!("SUM(COALESCE(e.{}, 0))", circuit.column())));
        }
        assert_eq!(expr.matches(" - ").count(), Circuit::MONITORED.len());
    }

    #[test]
    fn ashp_select_binds_base_before_house() {
        let qb = ashp_select(65.0, true);
        let sql = qb.sql();
        assert!(sql.contains("GREATEST(($1 - t.temperature) / 24.0, 0)"));
        assert!(sql.contains("MIN(e.date) AS date"));
        assert!(sql.ends_with(&format!(
            "WHERE t.device_id = {} AND e.house_id = ",
            well_known::OUTDOOR_SENSOR
        )));
    }

    #[test]
    fn monitor_filter_lists_the_energy_monitor_devices() {
        let [first, second] = well_known::ENERGY_MONITORS;
        assert_eq!(
            ENERGY_MONITOR_FILTER.as_str(),
            format!(" AND e.device_id IN ({first}, {second})")
        );
    }
}
