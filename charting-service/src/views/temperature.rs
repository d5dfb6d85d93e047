use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::temperature_queries;
use rust_client::filter::{format_stamp, Interval};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Totals {
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    avg_temperature: Option<f64>,
    min_humidity: Option<f64>,
    max_humidity: Option<f64>,
    sum_hdd: Option<f64>,
}

#[derive(Serialize)]
struct Item {
    date: String,
    min_temperature: Option<f64>,
    max_temperature: Option<f64>,
    avg_temperature: Option<f64>,
    min_humidity: Option<f64>,
    max_humidity: Option<f64>,
    sum_hdd: Option<f64>,
}

#[derive(Serialize)]
struct TemperatureResponse {
    view: &'static str,
    interval: Interval,
    location: i32,
    totals: Totals,
    items: Vec<Item>,
}

/// Temperature and humidity extremes for one sensor, with degree-days.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("temperature", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let totals = temperature_queries::totals(
        &state.pool,
        house_id,
        args.location,
        &args.range,
    )
    .await?;
    let items = temperature_queries::items(
        &state.pool,
        house_id,
        args.location,
        args.interval,
        &args.range,
    )
    .await?;

    Ok(Json(TemperatureResponse {
        view: "temperature",
        interval: args.interval,
        location: args.location,
        totals: Totals {
            min_temperature: totals.min_temperature,
            max_temperature: totals.max_temperature,
            avg_temperature: totals.avg_temperature,
            min_humidity: totals.min_humidity,
            max_humidity: totals.max_humidity,
            sum_hdd: totals.sum_hdd,
        },
        items: items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                min_temperature: bucket.min_temperature,
                max_temperature: bucket.max_temperature,
                avg_temperature: bucket.avg_temperature,
                min_humidity: bucket.min_humidity,
                max_humidity: bucket.max_humidity,
                sum_hdd: bucket.sum_hdd,
            })
            .collect(),
    })
    .into_response())
}
