//! Base-temperature analysis: heating hours paired with on-the-fly
//! degree-days so the front end can fit ASHP usage against HDD at a
//! chosen balance point.

use anyhow::Result;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::compose;
use crate::domain::device::well_known;
use crate::filter::{DateRange, Interval};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BasetempPoint {
    pub date: PrimitiveDateTime,
    pub hdd: Option<f64>,
    pub ashp: Option<f64>,
    pub temperature: Option<f64>,
    pub solar: Option<f64>,
}

/// Scatter points at the requested base temperature. Hourly grain
/// returns raw heating hours; coarser grain sums HDD/ASHP and averages
/// temperature per bucket.
///
/// Hours qualify when the heat pump was actually running (`ashp > 50`
/// Wh), the generation reading is sane (`solar > -500` guards meter
/// glitches), and the outdoor temperature sits at or below the base.
pub async fn points(
    pool: &PgPool,
    house_id: i32,
    base: f64,
    interval: Interval,
    range: &DateRange,
) -> Result<Vec<BasetempPoint>> {
    let mut qb: QueryBuilder<'_, Postgres> = if interval == Interval::Hour {
        QueryBuilder::new(
            "SELECT e.date AS date, t.hdd AS hdd, e.ashp / 1000.0 AS ashp, \
             t.temperature AS temperature, e.solar / 1000.0 AS solar",
        )
    } else {
        QueryBuilder::new(
            "SELECT MIN(e.date) AS date, SUM(t.hdd) AS hdd, SUM(e.ashp) / 1000.0 AS ashp, \
             AVG(t.temperature) AS temperature, SUM(e.solar) / 1000.0 AS solar",
        )
    };

    qb.push(" FROM (SELECT date, solar, ashp FROM energy_hourly WHERE solar > -500 AND ashp > 50 AND house_id = ");
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);
    qb.push(") e JOIN (SELECT date, temperature, (");
    qb.push_bind(base);
    qb.push(format!(
        " - temperature) / 24.0 AS hdd FROM temperature_hourly \
         WHERE device_id = {} AND temperature <= ",
        well_known::OUTDOOR_SENSOR
    ));
    qb.push_bind(base);
    qb.push(" AND house_id = ");
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "date", range);
    qb.push(") t ON t.date = e.date");

    if interval == Interval::Hour {
        compose::push_order_by(&mut qb, "e.date");
    } else {
        compose::push_interval_group(&mut qb, "t.date", interval);
    }

    let rows = qb.build_query_as::<BasetempPoint>().fetch_all(pool).await?;
    Ok(rows)
}
