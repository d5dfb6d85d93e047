use sqlx::PgPool;

/// Shared handler state: one connection pool for the whole app. Each
/// request checks a connection out for its duration and nothing else is
/// shared mutably.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
