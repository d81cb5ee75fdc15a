use super::common::{created_response, pdf_response, success_response};
use crate::errors::ServiceError;
use crate::services::pdf::{self, DocumentKind};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

/// `:id` here is the *quotation* being converted, not an invoice id.
async fn create_invoice_from_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let invoice = state.services.invoices.create_from_quotation(id).await?;
    Ok(created_response(invoice))
}

async fn list_invoices(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let invoices = state.services.invoices.list_invoices().await?;
    Ok(success_response(invoices))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let invoice = state.services.invoices.get_invoice(id).await?;
    Ok(success_response(invoice))
}

async fn get_invoice_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let (invoice, quotation) = state.services.invoices.get_invoice_with_quotation(id).await?;

    // Drawing is CPU-bound; keep it off the async workers.
    let bytes = tokio::task::spawn_blocking(move || {
        pdf::render_document(DocumentKind::Invoice, &quotation, Some(&invoice))
    })
    .await
    .map_err(|e| ServiceError::InternalError(format!("render task failed: {}", e)))??;

    Ok(pdf_response(bytes))
}

pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/:id", post(create_invoice_from_quotation))
        .route("/:id", get(get_invoice))
        .route("/:id/pdf", get(get_invoice_pdf))
}
