//! Route table for the charting API. All endpoints are GET and keep the
//! trailing slash the front end requests with.

use axum::routing::get;
use axum::Router;

use crate::response::not_found;
use crate::views;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/houses/", get(views::houses::list))
        .route("/api/houses/:house_id/", get(views::houses::detail))
        .route("/api/houses/:house_id/devices/", get(views::houses::devices))
        .route("/api/houses/:house_id/circuits/", get(views::houses::circuits))
        .route(
            "/api/houses/:house_id/views/default/",
            get(views::houses::default_view),
        )
        .route(
            "/api/houses/:house_id/views/summary/",
            get(views::summary::get),
        )
        .route(
            "/api/houses/:house_id/views/generation/",
            get(views::generation::get),
        )
        .route("/api/houses/:house_id/views/usage/", get(views::usage::get))
        .route("/api/houses/:house_id/views/hdd/", get(views::hdd::get))
        .route(
            "/api/houses/:house_id/views/temperature/",
            get(views::temperature::get),
        )
        .route("/api/houses/:house_id/views/water/", get(views::water::get))
        .route(
            "/api/houses/:house_id/views/basetemp/",
            get(views::basetemp::get),
        )
        .route(
            "/api/houses/:house_id/views/heatmap/",
            get(views::heatmap::get),
        )
        .route("/api/houses/:house_id/views/chart/", get(views::chart::get))
        .fallback(|| async { not_found() })
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_router() -> Router {
        // Lazy pool: never connects unless a handler actually queries.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/charting_test")
            .unwrap();
        router(AppState::new(pool))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[tokio::test]
    async fn unknown_path_is_a_json_404() {
        let (status, body) = get_json(test_router(), "/api/nowhere/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn view_without_arguments_is_a_soft_error() {
        let (status, body) = get_json(test_router(), "/api/houses/0/views/summary/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "No arguments found.");
    }

    #[tokio::test]
    async fn bad_interval_echoes_the_raw_value() {
        let (status, body) =
            get_json(test_router(), "/api/houses/0/views/usage/?interval=weeks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Interval 'weeks' does not exist");
    }

    #[tokio::test]
    async fn unknown_circuit_echoes_the_raw_value() {
        let (status, body) = get_json(
            test_router(),
            "/api/houses/0/views/usage/?interval=months&circuit=garage",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Circuit 'garage' does not exist");
    }

    #[tokio::test]
    async fn water_rejects_sub_monthly_intervals() {
        let (status, body) =
            get_json(test_router(), "/api/houses/0/views/water/?interval=days").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Interval not available.");
    }

    #[tokio::test]
    async fn default_view_rejects_unknown_intervals_before_querying() {
        let (status, body) = get_json(
            test_router(),
            "/api/houses/0/views/default/?interval=weeks",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Interval 'weeks' does not exist");
    }
}
