use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::{hdd_queries, house_queries};
use rust_client::filter::{format_stamp, Interval};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Extreme {
    date: String,
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct Totals {
    actual: Option<f64>,
    estimated: Option<f64>,
    ashp_heating_season: Option<f64>,
    hdd_heating_season: Option<f64>,
}

#[derive(Serialize)]
struct Item {
    date: String,
    actual: Option<f64>,
    estimated: Option<f64>,
}

#[derive(Serialize)]
struct HddResponse {
    view: &'static str,
    interval: Interval,
    #[serde(skip_serializing_if = "Option::is_none")]
    coldest_hour: Option<Extreme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coldest_day: Option<Extreme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iga: Option<f64>,
    totals: Totals,
    items: Vec<Item>,
}

/// Degree-days against the pre-construction estimate, plus the range's
/// cold extremes and heating-season totals.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("hdd", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let house = house_queries::house(&state.pool, house_id).await?;
    let totals = hdd_queries::totals(&state.pool, house_id, &args.range).await?;
    let season = hdd_queries::heating_season_totals(&state.pool, house_id, &args.range).await?;
    let coldest_hour = hdd_queries::coldest_hour(&state.pool, house_id, &args.range).await?;
    let coldest_day = hdd_queries::coldest_day(&state.pool, house_id, &args.range).await?;
    let items = hdd_queries::items(&state.pool, house_id, args.interval, &args.range).await?;

    Ok(Json(HddResponse {
        view: "hdd",
        interval: args.interval,
        coldest_hour: coldest_hour.map(|row| Extreme {
            date: format_stamp(Interval::Hour, row.date),
            temperature: row.temperature,
        }),
        coldest_day: coldest_day.map(|row| Extreme {
            date: format_stamp(Interval::Day, row.date),
            temperature: row.hdd,
        }),
        iga: house.and_then(|h| h.iga),
        totals: Totals {
            actual: totals.actual,
            estimated: totals.estimated,
            ashp_heating_season: season.ashp,
            hdd_heating_season: season.hdd,
        },
        items: items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                actual: bucket.actual,
                estimated: bucket.estimated,
            })
            .collect(),
    })
    .into_response())
}
