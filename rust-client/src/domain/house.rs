use time::PrimitiveDateTime;

/// One monitored house, with its interior/exterior gross-area constants.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct House {
    pub house_id: i32,
    pub name: Option<String>,
    pub sname: Option<String>,
    pub iga: Option<f64>,
    pub ciga: Option<f64>,
    pub ega: Option<f64>,
}

/// Per-house data bounds used to seed chart axes in the front end.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HourlyLimits {
    pub used_max: Option<f64>,
    pub solar_min: Option<f64>,
    pub outdoor_deg_min: Option<f64>,
    pub outdoor_deg_max: Option<f64>,
    pub hdd_max: Option<f64>,
    pub start_date: Option<PrimitiveDateTime>,
    pub end_date: Option<PrimitiveDateTime>,
}
