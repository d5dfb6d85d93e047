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
struct Hour {
    date: String,
    net: Option<f64>,
    solar: Option<f64>,
    used: Option<f64>,
    first_floor_temp: Option<f64>,
    second_floor_temp: Option<f64>,
    basement_temp: Option<f64>,
    outdoor_temp: Option<f64>,
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
struct ChartResponse {
    view: &'static str,
    interval: Interval,
    hours: Vec<Hour>,
}

/// Hourly drill-down for a single day. Without a start bound there is
/// no day to drill into, so the hour list comes back empty.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("chart", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let rows = match args.range.start {
        Some(start) => chart_queries::chart_hours(&state.pool, house_id, start.date()).await?,
        None => Vec::new(),
    };

    Ok(Json(ChartResponse {
        view: "chart",
        interval: args.interval,
        hours: rows
            .into_iter()
            .map(|row| Hour {
                date: format_stamp(Interval::Hour, row.date),
                net: row.net,
                solar: row.solar,
                used: row.used,
                first_floor_temp: row.first_floor_temp,
                second_floor_temp: row.second_floor_temp,
                basement_temp: row.basement_temp,
                outdoor_temp: row.outdoor_temp,
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
