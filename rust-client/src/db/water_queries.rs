//! Water-use aggregates. Monthly gallon readings from the main and hot
//! meters join against the energy table's water-related circuits; cold
//! water is derived as main minus hot.

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::compose;
use crate::domain::device::well_known;
use crate::filter::{DateRange, Interval};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaterTotals {
    pub cold: Option<f64>,
    pub hot: Option<f64>,
    pub main: Option<f64>,
    pub water_heater: Option<f64>,
    pub water_pump: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaterBucket {
    pub date: PrimitiveDateTime,
    pub cold: Option<f64>,
    pub hot: Option<f64>,
    pub main: Option<f64>,
    pub water_heater: Option<f64>,
    pub water_pump: Option<f64>,
}

fn water_select(with_date: bool) -> QueryBuilder<'static, Postgres> {
    let date_col = if with_date { "MIN(e.date) AS date, " } else { "" };
    QueryBuilder::new(format!(
        "SELECT {date_col}\
         SUM(main.gallons) - SUM(hot.gallons) AS cold, \
         SUM(hot.gallons) AS hot, \
         SUM(main.gallons) AS main, \
         SUM(e.water_heater) AS water_heater, \
         SUM(e.water_pump) AS water_pump \
         FROM energy_monthly e \
         LEFT JOIN (SELECT house_id, date, gallons FROM water_monthly WHERE device_id = {main_meter}) main \
           ON main.date = e.date AND main.house_id = e.house_id \
         LEFT JOIN (SELECT house_id, date, gallons FROM water_monthly WHERE device_id = {hot_meter}) hot \
           ON hot.date = e.date AND hot.house_id = e.house_id \
         WHERE e.house_id = ",
        main_meter = well_known::MAIN_WATER_METER,
        hot_meter = well_known::HOT_WATER_METER,
    ))
}

pub async fn totals(pool: &PgPool, house_id: i32, range: &DateRange) -> Result<WaterTotals> {
    let mut qb = water_select(false);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);

    let totals = qb.build_query_as::<WaterTotals>().fetch_one(pool).await?;
    Ok(totals)
}

/// Only month/year grain is meaningful; the handler rejects finer
/// intervals before calling in.
pub async fn items(
    pool: &PgPool,
    house_id: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<WaterBucket>> {
    let mut qb = water_select(true);
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "e.date", range);
    compose::push_interval_group(&mut qb, "e.date", interval);

    let rows = qb.build_query_as::<WaterBucket>().fetch_all(pool).await?;
    Ok(rows)
}
