//! H-Tracker REST API
//!
//! HTTP API layer, built with Axum.
//!
//! # Endpoints
//!
//! ## Entries
//! - `GET /api/v1/entries` - List entries, newest first
//! - `POST /api/v1/entries` - Record a day (201 created, 200 overwritten)
//! - `GET /api/v1/entries/:id` - Get an entry
//! - `PUT /api/v1/entries/:id` - Partially update an entry
//! - `DELETE /api/v1/entries/:id` - Delete an entry
//!
//! ## Aggregates
//! - `GET /api/v1/history?range=week|month|year` - Chart points and averages
//! - `GET /api/v1/insights` - Three-month report with insight text
//! - `GET /api/v1/catalog` - Metric option lists
//!
//! ## Export
//! - `GET /api/v1/export?format=csv|json` - Download entries
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use htracker::api::{serve, ApiConfig, AppState};
//! use htracker::storage::SqliteEntryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteEntryStore::open(std::path::Path::new("./data"))?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(store, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::HeaderValue,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Entry routes
        .route(
            "/entries",
            get(routes::entries::list_entries).post(routes::entries::create_entry),
        )
        .route(
            "/entries/:id",
            get(routes::entries::get_entry)
                .put(routes::entries::update_entry)
                .delete(routes::entries::delete_entry),
        )
        // Aggregate routes
        .route("/history", get(routes::history::get_history))
        .route("/insights", get(routes::insights::get_insights))
        .route("/catalog", get(routes::catalog::get_catalog))
        // Export routes
        .route("/export", get(routes::export::export_entries));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("H-Tracker API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("H-Tracker API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryEntryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let store = Arc::new(MemoryEntryStore::new());
        let state = AppState::new(store, ApiConfig::default());
        build_router(state)
    }

    fn today() -> String {
        chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
    }

    fn entry_body(date: &str, mood: u8) -> String {
        format!(
            r#"{{"date":"{}","mood":{},"activity":3,"sweet_food":{{"value":1,"label":"a tiny bit"}},"overeating":0,"sleep_recovery":5}}"#,
            date, mood
        )
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<String>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(b) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(b)
            }
            None => Body::empty(),
        };

        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app();
        let response = send(&app, "GET", "/health/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let app = create_test_app();
        let response = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app();
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["backend"], "memory");
        assert_eq!(json["entries"], 0);
    }

    #[tokio::test]
    async fn test_list_entries_empty() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/v1/entries", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_then_overwrite_same_date() {
        let app = create_test_app();

        let response = send(&app, "POST", "/api/v1/entries", Some(entry_body("2026-10-12", 4))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = json_body(response).await;
        assert_eq!(created["mood"]["value"], 4);
        assert_eq!(created["mood"]["label"], "okay");

        let response = send(&app, "POST", "/api/v1/entries", Some(entry_body("2026-10-12", 7))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["mood"]["label"], "great");

        let response = send(&app, "GET", "/api/v1/entries", None).await;
        let list = json_body(response).await;
        assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let app = create_test_app();
        for date in ["2026-10-10", "2026-10-14", "2026-10-12"] {
            send(&app, "POST", "/api/v1/entries", Some(entry_body(date, 5))).await;
        }

        let response = send(&app, "GET", "/api/v1/entries", None).await;
        let list = json_body(response).await;
        let dates: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["date"].as_str().unwrap())
            .collect();
        assert_eq!(dates, vec!["2026-10-14", "2026-10-12", "2026-10-10"]);

        let response = send(&app, "GET", "/api/v1/entries?from=2026-10-11&to=2026-10-13", None).await;
        let list = json_body(response).await;
        assert_eq!(list.as_array().map(|a| a.len()), Some(1));
    }

    #[tokio::test]
    async fn test_create_missing_field_is_bad_request() {
        let app = create_test_app();
        let response = send(
            &app,
            "POST",
            "/api/v1/entries",
            Some(r#"{"date":"2026-10-12","mood":4}"#.to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert!(json["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_create_invalid_json() {
        let app = create_test_app();
        let response = send(&app, "POST", "/api/v1/entries", Some("not json".to_string())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_missing_and_malformed_ids() {
        let app = create_test_app();

        let uri = format!("/api/v1/entries/{}", uuid::Uuid::new_v4());
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, "GET", "/api/v1/entries/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_and_date_conflict() {
        let app = create_test_app();

        let first = json_body(send(&app, "POST", "/api/v1/entries", Some(entry_body("2026-10-12", 4))).await).await;
        send(&app, "POST", "/api/v1/entries", Some(entry_body("2026-10-13", 4))).await;

        let uri = format!("/api/v1/entries/{}", first["id"].as_str().unwrap());

        let response = send(&app, "PUT", &uri, Some(r#"{"overeating":3}"#.to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["overeating"]["label"], "noticeably");
        assert_eq!(json["mood"]["value"], 4);

        let response = send(&app, "PUT", &uri, Some(r#"{"date":"2026-10-13"}"#.to_string())).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(&app, "PUT", &uri, Some(r#"{"activity":6}"#.to_string())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let app = create_test_app();
        let created = json_body(send(&app, "POST", "/api/v1/entries", Some(entry_body("2026-10-12", 4))).await).await;
        let uri = format!("/api/v1/entries/{}", created["id"].as_str().unwrap());

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["message"], "Entry deleted successfully");

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_week() {
        let app = create_test_app();
        send(&app, "POST", "/api/v1/entries", Some(entry_body(&today(), 6))).await;
        send(&app, "POST", "/api/v1/entries", Some(entry_body("2001-01-01", 0))).await;

        let response = send(&app, "GET", "/api/v1/history?range=week", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;

        assert_eq!(json["range"], "week");
        assert_eq!(json["entries"].as_array().map(|a| a.len()), Some(1));
        assert!(json["entries"][0]["formatted_date"].is_string());
        assert_eq!(json["summary"]["entry_count"], 1);

        let response = send(&app, "GET", "/api/v1/history?range=decade", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_insights_low_data() {
        let app = create_test_app();
        send(&app, "POST", "/api/v1/entries", Some(entry_body(&today(), 6))).await;

        let response = send(&app, "GET", "/api/v1/insights", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;

        assert_eq!(json["entry_count"], 1);
        assert_eq!(json["has_enough_data"], false);
        assert_eq!(json["insight"], crate::analytics::LOW_DATA_MESSAGE);
        assert_eq!(json["day_of_week"].as_array().map(|a| a.len()), Some(7));
    }

    #[tokio::test]
    async fn test_catalog() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/v1/catalog", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json.as_array().map(|a| a.len()), Some(5));
        assert_eq!(json[0]["key"], "mood");
        assert_eq!(json[0]["options"][8]["label"], "superb");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let app = create_test_app();
        send(&app, "POST", "/api/v1/entries", Some(entry_body("2026-10-12", 4))).await;

        let response = send(&app, "GET", "/api/v1/export?format=csv", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("text/csv")
        );

        let response = send(&app, "GET", "/api/v1/export?format=xml", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
