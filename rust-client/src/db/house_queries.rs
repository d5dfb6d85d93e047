use anyhow::Result;
use sqlx::PgPool;

use crate::domain::{CircuitRow, House, HourlyLimits, MonitorDevice};

pub async fn houses(pool: &PgPool) -> Result<Vec<House>> {
    let rows = sqlx::query_as::<_, House>(
        r#"
        SELECT house_id, name, sname, iga, ciga, ega
        FROM houses
        ORDER BY house_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn house(pool: &PgPool, house_id: i32) -> Result<Option<House>> {
    let row = sqlx::query_as::<_, House>(
        r#"
        SELECT house_id, name, sname, iga, ciga, ega
        FROM houses
        WHERE house_id = $1
        "#,
    )
    .bind(house_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn devices(pool: &PgPool, house_id: i32) -> Result<Vec<MonitorDevice>> {
    let rows = sqlx::query_as::<_, MonitorDevice>(
        r#"
        SELECT device_id, house_id, name
        FROM monitor_devices
        WHERE house_id = $1
        ORDER BY device_id
        "#,
    )
    .bind(house_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn circuits(pool: &PgPool, house_id: i32) -> Result<Vec<CircuitRow>> {
    let rows = sqlx::query_as::<_, CircuitRow>(
        r#"
        SELECT circuit_id, name, description
        FROM circuits
        WHERE house_id = $1
        "#,
    )
    .bind(house_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Calendar years with any energy data, ascending. Drives year pickers.
pub async fn years_with_data(pool: &PgPool, house_id: i32) -> Result<Vec<i32>> {
    let years = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT EXTRACT(YEAR FROM date)::int AS year
        FROM energy_monthly
        WHERE house_id = $1
        GROUP BY year
        ORDER BY year
        "#,
    )
    .bind(house_id)
    .fetch_all(pool)
    .await?;

    Ok(years)
}

pub async fn hourly_limits(pool: &PgPool, house_id: i32) -> Result<Option<HourlyLimits>> {
    let row = sqlx::query_as::<_, HourlyLimits>(
        r#"
        SELECT used_max, solar_min, outdoor_deg_min, outdoor_deg_max,
               hdd_max, start_date, end_date
        FROM limits_hourly
        WHERE house_id = $1
        "#,
    )
    .bind(house_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
