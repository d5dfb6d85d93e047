//! Temperature aggregates for one sensor, with degree-days joined in.

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::compose;
use crate::filter::{DateRange, Interval};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemperatureTotals {
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
    pub sum_hdd: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TemperatureBucket {
    pub date: PrimitiveDateTime,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub avg_temperature: Option<f64>,
    pub min_humidity: Option<f64>,
    pub max_humidity: Option<f64>,
    pub sum_hdd: Option<f64>,
}

fn temperature_select(with_date: bool) -> QueryBuilder<'static, Postgres> {
    let date_col = if with_date { "MIN(t.date) AS date, " } else { "" };
    QueryBuilder::new(format!(
        "SELECT {date_col}\
         MIN(t.temperature) AS min_temperature, \
         MAX(t.temperature) AS max_temperature, \
         AVG(t.temperature) AS avg_temperature, \
         MIN(t.humidity) AS min_humidity, \
         MAX(t.humidity) AS max_humidity, \
         SUM(h.hdd) AS sum_hdd \
         FROM temperature_hourly t \
         LEFT JOIN hdd_hourly h ON h.date = t.date AND h.house_id = t.house_id \
         WHERE t.house_id = "
    ))
}

pub async fn totals(
    pool: &PgPool,
    house_id: i32,
    location: i32,
    range: &DateRange,
) -> Result<TemperatureTotals> {
    let mut qb = temperature_select(false);
    qb.push_bind(house_id);
    qb.push(" AND t.device_id = ");
    qb.push_bind(location);
    compose::push_date_range(&mut qb, "t.date", range);

    let totals = qb
        .build_query_as::<TemperatureTotals>()
        .fetch_one(pool)
        .await?;
    Ok(totals)
}

pub async fn items(
    pool: &PgPool,
    house_id: i32,
    location: i32,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<TemperatureBucket>> {
    let mut qb = temperature_select(true);
    qb.push_bind(house_id);
    qb.push(" AND t.device_id = ");
    qb.push_bind(location);
    compose::push_date_range(&mut qb, "t.date", range);
    compose::push_interval_group(&mut qb, "t.date", interval);

    let rows = qb
        .build_query_as::<TemperatureBucket>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
