/// A monitoring sensor or meter attached to a house.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonitorDevice {
    pub device_id: i32,
    pub house_id: i32,
    pub name: Option<String>,
}

/// Well-known device ids, fixed by the ingestion side of the system.
pub mod well_known {
    /// Outdoor temperature sensor.
    pub const OUTDOOR_SENSOR: i32 = 0;
    /// Indoor sensors: first floor, second floor, basement.
    pub const FIRST_FLOOR_SENSOR: i32 = 1;
    pub const SECOND_FLOOR_SENSOR: i32 = 2;
    pub const BASEMENT_SENSOR: i32 = 3;
    /// The two energy monitors whose rows carry circuit readings.
    pub const ENERGY_MONITORS: [i32; 2] = [5, 10];
    /// Main and hot water meters.
    pub const MAIN_WATER_METER: i32 = 6;
    pub const HOT_WATER_METER: i32 = 7;
}
