pub mod circuit;
pub mod device;
pub mod house;

pub use circuit::{Circuit, CircuitRow, CircuitSelector};
pub use device::MonitorDevice;
pub use house::{House, HourlyLimits};
