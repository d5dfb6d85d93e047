pub mod basetemp_queries;
pub mod chart_queries;
pub mod compose;
pub mod energy_queries;
pub mod hdd_queries;
pub mod house_queries;
pub mod temperature_queries;
pub mod usage_queries;
pub mod water_queries;
