use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::basetemp_queries;
use rust_client::filter::{format_stamp, Interval};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Point {
    date: String,
    hdd: Option<f64>,
    ashp: Option<f64>,
    temperature: Option<f64>,
    solar: Option<f64>,
}

#[derive(Serialize)]
struct BasetempResponse {
    view: &'static str,
    interval: Interval,
    base: f64,
    points: Vec<Point>,
}

/// Heating hours against degree-days at a chosen balance point.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("basetemp", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let points = basetemp_queries::points(
        &state.pool,
        house_id,
        args.base,
        args.interval,
        &args.range,
    )
    .await?;

    Ok(Json(BasetempResponse {
        view: "basetemp",
        interval: args.interval,
        base: args.base,
        points: points
            .into_iter()
            .map(|point| Point {
                date: format_stamp(args.interval, point.date),
                hdd: point.hdd,
                ashp: point.ashp,
                temperature: point.temperature,
                solar: point.solar,
            })
            .collect(),
    })
    .into_response())
}
