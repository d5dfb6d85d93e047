//! House metadata endpoints and the `default` view that seeds the
//! front end (year picker, as-of date, chart axis limits).

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use rust_client::db::house_queries;
use rust_client::filter::{format_stamp, format_stamp_space, Interval};

use crate::response::{not_found, soft_error, ApiError};
use crate::AppState;

#[derive(Serialize)]
struct HouseSummary {
    house_id: i32,
    name: Option<String>,
    sname: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct HouseList {
    houses: Vec<HouseSummary>,
}

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = house_queries::houses(&state.pool).await?;

    Ok(Json(HouseList {
        houses: rows
            .into_iter()
            .map(|house| HouseSummary {
                url: format!("/api/houses/{}/", house.house_id),
                house_id: house.house_id,
                name: house.name,
                sname: house.sname,
            })
            .collect(),
    })
    .into_response())
}

#[derive(Serialize)]
struct HouseDetail {
    id: i32,
    name: Option<String>,
    sname: Option<String>,
    devices: String,
    circuits: String,
}

#[derive(Serialize)]
struct HouseDetailBody {
    house: HouseDetail,
}

fn house_detail(house: rust_client::domain::House) -> HouseDetail {
    HouseDetail {
        id: house.house_id,
        name: house.name,
        sname: house.sname,
        devices: format!("/api/houses/{}/devices/", house.house_id),
        circuits: format!("/api/houses/{}/circuits/", house.house_id),
    }
}

pub async fn detail(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
) -> Result<Response, ApiError> {
    let Some(house) = house_queries::house(&state.pool, house_id).await? else {
        return Ok(not_found());
    };

    Ok(Json(HouseDetailBody {
        house: house_detail(house),
    })
    .into_response())
}

#[derive(Serialize)]
struct DeviceEntry {
    id: i32,
    name: Option<String>,
}

#[derive(Serialize)]
struct DeviceList {
    devices: Vec<DeviceEntry>,
}

pub async fn devices(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
) -> Result<Response, ApiError> {
    let rows = house_queries::devices(&state.pool, house_id).await?;

    Ok(Json(DeviceList {
        devices: rows
            .into_iter()
            .map(|device| DeviceEntry {
                id: device.device_id,
                name: device.name,
            })
            .collect(),
    })
    .into_response())
}

#[derive(Serialize)]
struct CircuitList {
    circuits: Vec<rust_client::domain::CircuitRow>,
}

pub async fn circuits(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
) -> Result<Response, ApiError> {
    let rows = house_queries::circuits(&state.pool, house_id).await?;

    Ok(Json(CircuitList { circuits: rows }).into_response())
}

#[derive(Serialize)]
struct MonthDefaults {
    years: Vec<String>,
    asof: Option<String>,
    house: HouseDetail,
}

/// `asof` is the last day with ingested data, not today: a stale
/// dataset should chart up to its final loaded day.
fn month_defaults(
    house: rust_client::domain::House,
    years: Vec<i32>,
    limits: Option<rust_client::domain::HourlyLimits>,
) -> MonthDefaults {
    MonthDefaults {
        years: years.into_iter().map(|y| y.to_string()).collect(),
        asof: limits
            .and_then(|row| row.end_date)
            .map(|end| format_stamp(Interval::Day, end)),
        house: house_detail(house),
    }
}

#[derive(Serialize)]
struct Limits {
    used_max: Option<f64>,
    solar_min: Option<f64>,
    outdoor_deg_min: Option<f64>,
    outdoor_deg_max: Option<f64>,
    hdd_max: Option<f64>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Serialize)]
struct DayDefaults {
    limits: Limits,
}

/// Bootstrap values for the UI. Month grain answers with the years that
/// have data, the as-of date, and the house details; day grain answers
/// with the stored axis limits.
pub async fn default_view(
    State(state): State<AppState>,
    Path(house_id): Path<i32>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let raw_interval = params
        .get("interval")
        .map(String::as_str)
        .unwrap_or("months");

    if raw_interval.contains("month") {
        let Some(house) = house_queries::house(&state.pool, house_id).await? else {
            return Ok(not_found());
        };
        let years = house_queries::years_with_data(&state.pool, house_id).await?;
        let limits = house_queries::hourly_limits(&state.pool, house_id).await?;
        return Ok(Json(month_defaults(house, years, limits)).into_response());
    }

    if raw_interval.contains("day") {
        let limits = house_queries::hourly_limits(&state.pool, house_id).await?;
        let limits = limits.map_or_else(
            || Limits {
                used_max: None,
                solar_min: None,
                outdoor_deg_min: None,
                outdoor_deg_max: None,
                hdd_max: None,
                start_date: None,
                end_date: None,
            },
            |row| Limits {
                used_max: row.used_max,
                solar_min: row.solar_min,
                outdoor_deg_min: row.outdoor_deg_min,
                outdoor_deg_max: row.outdoor_deg_max,
                hdd_max: row.hdd_max,
                start_date: row.start_date.map(format_stamp_space),
                end_date: row.end_date.map(format_stamp_space),
            },
        );
        return Ok(Json(DayDefaults { limits }).into_response());
    }

    Ok(soft_error(format!(
        "Interval '{raw_interval}' does not exist"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_client::domain::{House, HourlyLimits};
    use time::macros::datetime;

    fn test_house() -> House {
        House {
            house_id: 0,
            name: Some("name".to_string()),
            sname: Some("sname".to_string()),
            iga: Some(1000.0),
            ciga: None,
            ega: None,
        }
    }

    fn test_limits() -> HourlyLimits {
        HourlyLimits {
            used_max: Some(9000.0),
            solar_min: Some(-7000.0),
            outdoor_deg_min: Some(-10.0),
            outdoor_deg_max: Some(95.0),
            hdd_max: Some(2.5),
            start_date: Some(datetime!(2012-01-01 00:00)),
            end_date: Some(datetime!(2015-03-14 22:00)),
        }
    }

    #[test]
    fn asof_is_the_last_ingested_day_not_today() {
        let defaults = month_defaults(test_house(), vec![2013, 2014], Some(test_limits()));
        assert_eq!(defaults.asof.as_deref(), Some("2015-03-14"));
    }

    #[test]
    fn asof_is_absent_without_a_limits_row() {
        let defaults = month_defaults(test_house(), vec![], None);
        assert_eq!(defaults.asof, None);
    }

    #[test]
    fn month_defaults_carry_the_full_house_details() {
        let body = serde_json::to_value(month_defaults(
            test_house(),
            vec![2013, 2014],
            Some(test_limits()),
        ))
        .unwrap();
        assert_eq!(body["years"], serde_json::json!(["2013", "2014"]));
        assert_eq!(body["house"]["id"], 0);
        assert_eq!(body["house"]["name"], "name");
        assert_eq!(body["house"]["devices"], "/api/houses/0/devices/");
        assert_eq!(body["house"]["circuits"], "/api/houses/0/circuits/");
    }
}
