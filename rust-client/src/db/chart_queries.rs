//! Wide row queries backing the heatmap (one row per day) and the
//! hourly drill-down chart (one row per hour of a chosen day). Both
//! join several fact tables on matching truncated timestamps and
//! compute the unmonitored remainder inline.

use anyhow::Result;
use sqlx::{PgPool, QueryBuilder};
use time::{Date, PrimitiveDateTime};

use crate::db::compose;
use crate::domain::device::well_known;
use crate::domain::Circuit;
use crate::filter::DateRange;

fn circuit_columns(alias: &str) -> String {
    Circuit::MONITORED
        .iter()
        .map(|c| format!("{alias}.{col} AS {col}", col = c.column()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `used - (sum of monitored circuits)`; NULL circuits poison the value,
/// matching the source data contract that a day with any reading has
/// all readings.
fn all_other_column(alias: &str) -> String {
    let sum = Circuit::MONITORED
        .iter()
        .map(|c| format!("{alias}.{}", c.column()))
        .collect::<Vec<_>>()
        .join(" + ");
    format!("{alias}.used - ({sum}) AS all_other")
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HeatmapDay {
    pub date: PrimitiveDateTime,
    pub net: Option<f64>,
    pub solar: Option<f64>,
    pub used: Option<f64>,
    pub outdoor_deg_min: Option<f64>,
    pub outdoor_deg_max: Option<f64>,
    pub hdd: Option<f64>,
    pub water_heater: Option<f64>,
    pub ashp: Option<f64>,
    pub water_pump: Option<f64>,
    pub dryer: Option<f64>,
    pub washer: Option<f64>,
    pub dishwasher: Option<f64>,
    pub stove: Option<f64>,
    pub refrigerator: Option<f64>,
    pub living_room: Option<f64>,
    pub aux_heat_bedrooms: Option<f64>,
    pub aux_heat_living: Option<f64>,
    pub study: Option<f64>,
    pub barn: Option<f64>,
    pub basement_west: Option<f64>,
    pub basement_east: Option<f64>,
    pub ventilation: Option<f64>,
    pub ventilation_preheat: Option<f64>,
    pub kitchen_recept_rt: Option<f64>,
    pub all_other: Option<f64>,
}

pub async fn heatmap_days(
    pool: &PgPool,
    house_id: i32,
    range: &DateRange,
) -> Result<Vec<HeatmapDay>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT tu.date AS date, e.adjusted_load AS net, e.solar AS solar, e.used AS used, \
         tu.outdoor_deg_min AS outdoor_deg_min, tu.outdoor_deg_max AS outdoor_deg_max, \
         th.hdd AS hdd, {circuits}, {all_other} \
         FROM (SELECT house_id, date, temperature_min AS outdoor_deg_min, \
               temperature_max AS outdoor_deg_max \
               FROM temperature_daily WHERE device_id = {outdoor}) tu \
         LEFT JOIN hdd_daily th ON th.date = tu.date AND th.house_id = tu.house_id \
         LEFT JOIN energy_daily e ON e.date = tu.date AND e.house_id = tu.house_id \
         WHERE tu.house_id = ",
        circuits = circuit_columns("e"),
        all_other = all_other_column("e"),
        outdoor = well_known::OUTDOOR_SENSOR,
    ));
    qb.push_bind(house_id);
    compose::push_date_range(&mut qb, "tu.date", range);
    compose::push_order_by(&mut qb, "tu.date");

    let rows = qb.build_query_as::<HeatmapDay>().fetch_all(pool).await?;
    Ok(rows)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChartHour {
    pub date: PrimitiveDateTime,
    pub net: Option<f64>,
    pub solar: Option<f64>,
    pub used: Option<f64>,
    pub first_floor_temp: Option<f64>,
    pub second_floor_temp: Option<f64>,
    pub basement_temp: Option<f64>,
    pub outdoor_temp: Option<f64>,
    pub hdd: Option<f64>,
    pub water_heater: Option<f64>,
    pub ashp: Option<f64>,
    pub water_pump: Option<f64>,
    pub dryer: Option<f64>,
    pub washer: Option<f64>,
    pub dishwasher: Option<f64>,
    pub stove: Option<f64>,
    pub refrigerator: Option<f64>,
    pub living_room: Option<f64>,
    pub aux_heat_bedrooms: Option<f64>,
    pub aux_heat_living: Option<f64>,
    pub study: Option<f64>,
    pub barn: Option<f64>,
    pub basement_west: Option<f64>,
    pub basement_east: Option<f64>,
    pub ventilation: Option<f64>,
    pub ventilation_preheat: Option<f64>,
    pub kitchen_recept_rt: Option<f64>,
    pub all_other: Option<f64>,
}

/// One row per hour of `day`, anchored on the first-floor sensor and
/// left-joining everything else on the truncated hour.
pub async fn chart_hours(pool: &PgPool, house_id: i32, day: Date) -> Result<Vec<ChartHour>> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT ti1.date AS date, e.adjusted_load AS net, e.solar AS solar, e.used AS used, \
         ti1.indoor1_deg AS first_floor_temp, ti2.indoor2_deg AS second_floor_temp, \
         ti0.indoor0_deg AS basement_temp, tu.outdoor_deg AS outdoor_temp, th.hdd AS hdd, \
         {circuits}, {all_other} \
         FROM (SELECT house_id, date, temperature AS indoor1_deg \
               FROM temperature_hourly WHERE device_id = {first_floor}) ti1 \
         LEFT JOIN (SELECT house_id, date, temperature AS indoor2_deg \
               FROM temperature_hourly WHERE device_id = {second_floor}) ti2 \
           ON date_trunc('hour', ti2.date) = date_trunc('hour', ti1.date) \
          AND ti2.house_id = ti1.house_id \
         LEFT JOIN (SELECT house_id, date, temperature AS indoor0_deg \
               FROM temperature_hourly WHERE device_id = {basement}) ti0 \
           ON date_trunc('hour', ti0.date) = date_trunc('hour', ti1.date) \
          AND ti0.house_id = ti1.house_id \
         LEFT JOIN (SELECT house_id, date, temperature AS outdoor_deg \
               FROM temperature_hourly WHERE device_id = {outdoor}) tu \
           ON date_trunc('hour', tu.date) = date_trunc('hour', ti1.date) \
          AND tu.house_id = ti1.house_id \
         LEFT JOIN hdd_hourly th \
           ON date_trunc('hour', th.date) = date_trunc('hour', ti1.date) \
          AND th.house_id = ti1.house_id \
         LEFT JOIN energy_hourly e \
           ON date_trunc('hour', e.date) = date_trunc('hour', ti1.date) \
          AND e.house_id = ti1.house_id \
         WHERE ti1.house_id = ",
        circuits = circuit_columns("e"),
        all_other = all_other_column("e"),
        first_floor = well_known::FIRST_FLOOR_SENSOR,
        second_floor = well_known::SECOND_FLOOR_SENSOR,
        basement = well_known::BASEMENT_SENSOR,
        outdoor = well_known::OUTDOOR_SENSOR,
    ));
    qb.push_bind(house_id);
    qb.push(" AND ti1.date::date = ");
    qb.push_bind(day);
    compose::push_order_by(&mut qb, "ti1.date");

    let rows = qb.build_query_as::<ChartHour>().fetch_all(pool).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circuit_columns_cover_every_monitored_circuit() {
        let cols = circuit_columns("e");
        for circuit in Circuit::MONITORED {
            assert!(cols.contains(&format!("e.{col} AS {col}", col = circuit.column())));
        }
    }

    #[test]
    fn all_other_is_used_minus_the_monitored_sum() {
        let expr = all_other_column("e");
        assert!(expr.starts_with("e.used - ("));
        assert!(expr.ends_with(") AS all_other"));
        assert_eq!(expr.matches(" + ").count(), Circuit::MONITORED.len() - 1);
    }
}
