//! Catalog Routes
//!
//! - GET /api/v1/catalog - Option lists for every metric

use axum::Json;

use crate::catalog::{catalog, MetricCatalogEntry};

/// GET /api/v1/catalog
pub async fn get_catalog() -> Json<Vec<MetricCatalogEntry>> {
    Json(catalog())
}
