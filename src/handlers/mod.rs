pub mod common;
pub mod invoices;
pub mod quotations;

use crate::db::{self, DbPool};
use crate::errors::ServiceError;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub quotations: Arc<crate::services::quotations::QuotationService>,
    pub invoices: Arc<crate::services::invoices::InvoiceService>,
}

impl AppServices {
    /// Build the services container around one shared connection pool.
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        let quotations = Arc::new(crate::services::quotations::QuotationService::new(
            db_pool.clone(),
        ));
        let invoices = Arc::new(crate::services::invoices::InvoiceService::new(db_pool));

        Self {
            quotations,
            invoices,
        }
    }
}

/// Liveness + database readiness probe.
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    db::check_connection(&state.db).await?;
    Ok(Json(json!({ "status": "up" })))
}
