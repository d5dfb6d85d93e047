use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::chart_queries;
use rust_client::filter::{format_stamp, Interval};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Day {
    date: String,
    net: Option<f64>,
    solar: Option<f64>,
    used: Option<f64>,
    outdoor_deg_min: Option<f64>,
    outdoor_deg_max: Option<f64>,
    hdd: Option<f64>,
    water_heater: Option<f64>,
    ashp: Option<f64>,
    water_pump: Option<f64>,
    dryer: Option<f64>,
    washer: Option<f64>,
    dishwasher: Option<f64>,
    stove: Option<f64>,
    refrigerator: Option<f64>,
    living_room: Option<f64>,
    aux_heat_bedrooms: Option<f64>,
    aux_heat_living: Option<f64>,
    study: Option<f64>,
    barn: Option<f64>,
    basement_west: Option<f64>,
    basement_east: Option<f64>,
    ventilation: Option<f64>,
    ventilation_preheat: Option<f64>,
    kitchen_recept_rt: Option<f64>,
    all_other: Option<f64>,
}

#[derive(Serialize)]
struct HeatmapResponse {
    view: &'static str,
    interval: Interval,
    days: Vec<Day>,
}

/// One row per day across the range, wide enough to paint a calendar
/// heatmap for any circuit or temperature band.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("heatmap", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let days = chart_queries::heatmap_days(&state.pool, house_id, &args.range).await?;

    Ok(Json(HeatmapResponse {
        view: "heatmap",
        interval: args.interval,
        days: days
            .into_iter()
            .map(|row| Day {
                date: format_stamp(Interval::Day, row.date),
                net: row.net,
                solar: row.solar,
                used: row.used,
                outdoor_deg_min: row.outdoor_deg_min,
                outdoor_deg_max: row.outdoor_deg_max,
                hdd: row.hdd,
                water_heater: row.water_heater,
                ashp: row.ashp,
                water_pump: row.water_pump,
                dryer: row.dryer,
                washer: row.washer,
                dishwasher: row.dishwasher,
                stove: row.stove,
                refrigerator: row.refrigerator,
                living_room: row.living_room,
                aux_heat_bedrooms: row.aux_heat_bedrooms,
                aux_heat_living: row.aux_heat_living,
                study: row.study,
                barn: row.barn,
                basement_west: row.basement_west,
                basement_east: row.basement_east,
                ventilation: row.ventilation,
                ventilation_preheat: row.ventilation_preheat,
                kitchen_recept_rt: row.kitchen_recept_rt,
                all_other: row.all_other,
            })
            .collect(),
    })
    .into_response())
}
