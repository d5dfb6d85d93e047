use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::water_queries;
use rust_client::filter::{format_stamp, Interval};

use crate::response::{soft_error, ApiError};
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Totals {
    cold: Option<f64>,
    hot: Option<f64>,
    main: Option<f64>,
    water_heater: Option<f64>,
    water_pump: Option<f64>,
}

#[derive(Serialize)]
struct Item {
    date: String,
    cold: Option<f64>,
    hot: Option<f64>,
    main: Option<f64>,
    water_heater: Option<f64>,
    water_pump: Option<f64>,
}

#[derive(Serialize)]
struct WaterResponse {
    view: &'static str,
    interval: Interval,
    totals: Totals,
    items: Vec<Item>,
}

/// Gallons by meter alongside the water-related circuits. Readings only
/// exist monthly, so day/hour grain is refused outright.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("water", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };
    if !args.interval.uses_monthly_tables() {
        return Ok(soft_error("Interval not available."));
    }

    let totals = water_queries::totals(&state.pool, house_id, &args.range).await?;
    let items = water_queries::items(&state.pool, house_id, args.interval, &args.range).await?;

    Ok(Json(WaterResponse {
        view: "water",
        interval: args.interval,
        totals: Totals {
            cold: totals.cold,
            hot: totals.hot,
            main: totals.main,
            water_heater: totals.water_heater,
            water_pump: totals.water_pump,
        },
        items: items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                cold: bucket.cold,
                hot: bucket.hot,
                main: bucket.main,
                water_heater: bucket.water_heater,
                water_pump: bucket.water_pump,
            })
            .collect(),
    })
    .into_response())
}
