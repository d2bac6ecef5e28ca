//! raflift-an library - Analyze microservice
//!
//! Maps clinical notes to HCC risk-adjustment coefficients and records a
//! PHI-free audit trail for every result.

use axum::Router;
use raflift_common::db::CoefficientTable;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod analysis;
pub mod api;
pub mod audit;
pub mod error;
pub mod logging;
pub mod matcher;

pub use crate::error::{ApiError, ApiResult};
use crate::matcher::{CodeMatcher, KeywordMatcher};

/// Application state shared across HTTP handlers
///
/// Everything here is read-only after startup apart from the pool.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (audit log)
    pub db: SqlitePool,
    /// HCC coefficients loaded at startup
    pub coefficients: Arc<CoefficientTable>,
    /// HCC code recognizer
    pub matcher: Arc<dyn CodeMatcher>,
}

impl AppState {
    /// Create application state with the default keyword matcher
    pub fn new(db: SqlitePool, coefficients: CoefficientTable) -> Self {
        Self::with_matcher(db, coefficients, Arc::new(KeywordMatcher::new()))
    }

    pub fn with_matcher(
        db: SqlitePool,
        coefficients: CoefficientTable,
        matcher: Arc<dyn CodeMatcher>,
    ) -> Self {
        Self {
            db,
            coefficients: Arc::new(coefficients),
            matcher,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::audit_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
