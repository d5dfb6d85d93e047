//! One module per chart view. Each handler normalizes its query
//! parameters, runs the composed queries, and shapes the JSON payload
//! the front end charts from.

pub mod basetemp;
pub mod chart;
pub mod generation;
pub mod hdd;
pub mod heatmap;
pub mod houses;
pub mod summary;
pub mod temperature;
pub mod usage;
pub mod water;

use std::collections::HashMap;

use axum::response::Response;
use rust_client::ViewArgs;

use crate::response::soft_error;

/// Count the request, normalize its parameters, and render filter
/// errors as the soft JSON error object.
pub(crate) fn normalize(
    view: &'static str,
    params: &HashMap<String, String>,
) -> Result<ViewArgs, Response> {
    metrics::counter!("view_requests_total", "view" => view).increment(1);
    ViewArgs::from_pairs(params).map_err(|err| {
        metrics::counter!("view_errors_total", "view" => view).increment(1);
        soft_error(err.to_string())
    })
}
