pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod response;
pub mod routes;
pub mod state;
pub mod views;

pub use state::AppState;
