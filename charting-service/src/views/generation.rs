use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::energy_queries::{self, PeakSolar};
use rust_client::filter::{format_stamp, Interval};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct Peak {
    date: String,
    solar: Option<f64>,
}

#[derive(Serialize)]
struct Totals {
    actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated: Option<f64>,
}

#[derive(Serialize)]
struct Item {
    date: String,
    actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated: Option<f64>,
}

#[derive(Serialize)]
struct GenerationResponse {
    view: &'static str,
    interval: Interval,
    max_solar_hour: Option<Peak>,
    max_solar_day: Option<Peak>,
    totals: Totals,
    items: Vec<Item>,
}

fn peak(interval: Interval, row: Option<PeakSolar>) -> Option<Peak> {
    row.map(|p| Peak {
        date: format_stamp(interval, p.date),
        solar: p.solar,
    })
}

/// Solar generation: the best hour and day in range, totals (with the
/// monthly estimate at month/year grain), and per-bucket actuals.
pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("generation", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let max_solar_hour = peak(
        Interval::Hour,
        energy_queries::peak_generation_hour(&state.pool, house_id, &args.range).await?,
    );
    let max_solar_day = peak(
        Interval::Day,
        energy_queries::peak_generation_day(&state.pool, house_id, &args.range).await?,
    );

    let (totals, items) = if args.interval.uses_monthly_tables() {
        let totals =
            energy_queries::generation_totals_monthly(&state.pool, house_id, &args.range).await?;
        let items = energy_queries::generation_items_monthly(
            &state.pool,
            house_id,
            args.interval,
            &args.range,
        )
        .await?;
        (
            Totals {
                actual: totals.actual,
                estimated: totals.estimated,
            },
            items
                .into_iter()
                .map(|bucket| Item {
                    date: format_stamp(args.interval, bucket.date),
                    actual: bucket.actual,
                    estimated: bucket.estimated,
                })
                .collect(),
        )
    } else {
        let totals =
            energy_queries::generation_totals_hourly(&state.pool, house_id, &args.range).await?;
        let items = energy_queries::generation_items_hourly(
            &state.pool,
            house_id,
            args.interval,
            &args.range,
        )
        .await?;
        (
            Totals {
                actual: totals.actual,
                estimated: None,
            },
            items
                .into_iter()
                .map(|bucket| Item {
                    date: format_stamp(args.interval, bucket.date),
                    actual: bucket.actual,
                    estimated: None,
                })
                .collect(),
        )
    };

    Ok(Json(GenerationResponse {
        view: "generation",
        interval: args.interval,
        max_solar_hour,
        max_solar_day,
        totals,
        items,
    })
    .into_response())
}
