pub mod db;
pub mod domain;
pub mod filter;

pub use filter::{FilterError, Interval, ViewArgs};
