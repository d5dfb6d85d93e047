use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::energy_queries;
use rust_client::filter::{format_stamp, Interval};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Totals {
    net: Option<f64>,
    solar: Option<f64>,
    used: Option<f64>,
    hdd: Option<f64>,
}

#[derive(Serialize)]
struct Item {
    date: String,
    net: Option<f64>,
    solar: Option<f64>,
    used: Option<f64>,
    hdd: Option<f64>,
}

#[derive(Serialize)]
struct SummaryResponse {
    view: &'static str,
    interval: Interval,
    totals: Totals,
    items: Vec<Item>,
}

/// Net/solar/used/HDD per bucket plus range totals.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("summary", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let totals =
        energy_queries::summary_totals(&state.pool, house_id, args.interval, &args.range).await?;
    let items =
        energy_queries::summary_items(&state.pool, house_id, args.interval, &args.range).await?;

    Ok(Json(SummaryResponse {
        view: "summary",
        interval: args.interval,
        totals: Totals {
            net: totals.net,
            solar: totals.solar,
            used: totals.used,
            hdd: totals.hdd,
        },
        items: items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                net: bucket.net,
                solar: bucket.solar,
                used: bucket.used,
                hdd: bucket.hdd,
            })
            .collect(),
    })
    .into_response())
}
