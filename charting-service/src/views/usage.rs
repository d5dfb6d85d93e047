use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::{house_queries, usage_queries};
use rust_client::domain::{Circuit, CircuitRow, CircuitSelector};
use rust_client::filter::{format_stamp, Interval, ViewArgs};

use crate::response::ApiError;
use crate::views::normalize;
use crate::AppState;

#[derive(Serialize)]
struct CircuitEcho {
    circuit_id: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    startdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enddate: Option<String>,
}

fn circuit_name(rows: &[CircuitRow], id: &str) -> Option<String> {
    rows.iter()
        .find(|row| row.circuit_id == id)
        .and_then(|row| row.name.clone())
}

fn circuit_echo(rows: &[CircuitRow], id: &'static str) -> CircuitEcho {
    let row = rows.iter().find(|row| row.circuit_id == id);
    CircuitEcho {
        circuit_id: id,
        name: row.and_then(|r| r.name.clone()),
        description: row.and_then(|r| r.description.clone()),
        startdate: None,
        enddate: None,
    }
}

#[derive(Serialize)]
struct BreakdownEntry {
    circuit_id: &'static str,
    actual: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Serialize)]
struct BreakdownResponse {
    view: String,
    circuits: Vec<BreakdownEntry>,
    circuit: CircuitEcho,
}

/// The per-circuit breakdown. `used` opens the running subtotal, every
/// monitored circuit subtracts from it, and the remainder is reported
/// as `all_other`.
async fn breakdown(
    state: &AppState,
    house_id: i32,
    args: &ViewArgs,
    rows: &[CircuitRow],
) -> Result<Response, ApiError> {
    let totals = usage_queries::breakdown_totals(&state.pool, house_id, &args.range).await?;

    let used = totals.used.unwrap_or(0.0);
    let mut subtotal = used;
    let mut circuits = vec![BreakdownEntry {
        circuit_id: Circuit::Used.id(),
        actual: used,
        name: circuit_name(rows, Circuit::Used.id()),
    }];
    for (circuit, actual) in &totals.circuits {
        let actual = actual.unwrap_or(0.0);
        subtotal -= actual;
        circuits.push(BreakdownEntry {
            circuit_id: circuit.id(),
            actual,
            name: circuit_name(rows, circuit.id()),
        });
    }
    circuits.push(BreakdownEntry {
        circuit_id: "all_other",
        actual: subtotal,
        name: circuit_name(rows, "all_other"),
    });

    let mut circuit = CircuitEcho {
        circuit_id: "summary",
        name: Some("Total".to_string()),
        description: None,
        startdate: None,
        enddate: None,
    };
    if args.interval != Interval::Year {
        circuit.startdate = args.range.start.map(|s| format_stamp(Interval::Day, s));
        circuit.enddate = args.range.end.map(|e| format_stamp(Interval::Day, e));
    }

    Ok(Json(BreakdownResponse {
        view: "usage.summary".to_string(),
        circuits,
        circuit,
    })
    .into_response())
}

#[derive(Serialize)]
struct Totals {
    actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hdd: Option<f64>,
}

#[derive(Serialize)]
struct Item {
    date: String,
    actual: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hdd: Option<f64>,
}

#[derive(Serialize)]
struct UsageResponse {
    view: String,
    interval: Interval,
    circuit: CircuitEcho,
    totals: Totals,
    items: Vec<Item>,
}

fn usage_response(
    selector: CircuitSelector,
    interval: Interval,
    circuit: CircuitEcho,
    totals: Totals,
    items: Vec<Item>,
) -> Response {
    Json(UsageResponse {
        view: format!("usage.{}", selector.id()),
        interval,
        circuit,
        totals,
        items,
    })
    .into_response()
}

/// All monitored circuits combined; month/year grain carries the
/// monthly budget alongside the actuals.
async fn all_circuits(
    state: &AppState,
    house_id: i32,
    args: &ViewArgs,
    rows: &[CircuitRow],
) -> Result<Response, ApiError> {
    let echo = circuit_echo(rows, "all");
    if args.interval.uses_monthly_tables() {
        let totals = usage_queries::all_totals_monthly(&state.pool, house_id, &args.range).await?;
        let items =
            usage_queries::all_items_monthly(&state.pool, house_id, args.interval, &args.range)
                .await?;
        Ok(usage_response(
            CircuitSelector::All,
            args.interval,
            echo,
            Totals {
                actual: totals.actual,
                budget: totals.budget,
                hdd: None,
            },
            items
                .into_iter()
                .map(|bucket| Item {
                    date: format_stamp(args.interval, bucket.date),
                    actual: bucket.actual,
                    budget: bucket.budget,
                    hdd: None,
                })
                .collect(),
        ))
    } else {
        let totals = usage_queries::all_totals_hourly(&state.pool, house_id, &args.range).await?;
        let items =
            usage_queries::all_items_hourly(&state.pool, house_id, args.interval, &args.range)
                .await?;
        Ok(usage_response(
            CircuitSelector::All,
            args.interval,
            echo,
            Totals {
                actual: totals.actual,
                budget: None,
                hdd: None,
            },
            items
                .into_iter()
                .map(|bucket| Item {
                    date: format_stamp(args.interval, bucket.date),
                    actual: bucket.actual,
                    budget: None,
                    hdd: None,
                })
                .collect(),
        ))
    }
}

async fn all_other(
    state: &AppState,
    house_id: i32,
    args: &ViewArgs,
    rows: &[CircuitRow],
) -> Result<Response, ApiError> {
    let totals = usage_queries::all_other_totals(&state.pool, house_id, &args.range).await?;
    let items =
        usage_queries::all_other_items(&state.pool, house_id, args.interval, &args.range).await?;

    Ok(usage_response(
        CircuitSelector::AllOther,
        args.interval,
        circuit_echo(rows, "all_other"),
        Totals {
            actual: totals.actual,
            budget: None,
            hdd: None,
        },
        items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                actual: bucket.actual,
                budget: None,
                hdd: None,
            })
            .collect(),
    ))
}

/// Heat-pump usage with HDD computed at the requested base temperature.
async fn ashp(
    state: &AppState,
    house_id: i32,
    args: &ViewArgs,
    rows: &[CircuitRow],
) -> Result<Response, ApiError> {
    let totals = usage_queries::ashp_totals(&state.pool, house_id, args.base, &args.range).await?;
    let items = usage_queries::ashp_items(
        &state.pool,
        house_id,
        args.base,
        args.interval,
        &args.range,
    )
    .await?;

    Ok(usage_response(
        CircuitSelector::Ashp,
        args.interval,
        circuit_echo(rows, "ashp"),
        Totals {
            actual: totals.actual,
            budget: None,
            hdd: totals.hdd,
        },
        items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                actual: bucket.actual,
                budget: None,
                hdd: bucket.hdd,
            })
            .collect(),
    ))
}

async fn single_circuit(
    state: &AppState,
    house_id: i32,
    args: &ViewArgs,
    rows: &[CircuitRow],
    circuit: Circuit,
) -> Result<Response, ApiError> {
    let totals =
        usage_queries::circuit_totals(&state.pool, house_id, circuit, &args.range).await?;
    let items = usage_queries::circuit_items(
        &state.pool,
        house_id,
        circuit,
        args.interval,
        &args.range,
    )
    .await?;

    Ok(usage_response(
        CircuitSelector::Column(circuit),
        args.interval,
        circuit_echo(rows, circuit.id()),
        Totals {
            actual: totals.actual,
            budget: None,
            hdd: None,
        },
        items
            .into_iter()
            .map(|bucket| Item {
                date: format_stamp(args.interval, bucket.date),
                actual: bucket.actual,
                budget: None,
                hdd: None,
            })
            .collect(),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let args = match normalize("usage", &params) {
        Ok(args) => args,
        Err(resp) => return Ok(resp),
    };

    let rows = house_queries::circuits(&state.pool, house_id).await?;

    match args.circuit {
        CircuitSelector::Summary => breakdown(&state, house_id, &args, &rows).await,
        CircuitSelector::All => all_circuits(&state, house_id, &args, &rows).await,
        CircuitSelector::AllOther => all_other(&state, house_id, &args, &rows).await,
        CircuitSelector::Ashp => ashp(&state, house_id, &args, &rows).await,
        CircuitSelector::Column(circuit) => {
            single_circuit(&state, house_id, &args, &rows, circuit).await
        }
    }
}
