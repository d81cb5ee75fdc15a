use super::common::{created_response, decode_body, pdf_response, success_response};
use crate::dto::{CreateQuotationRequest, UpdateQuotationRequest};
use crate::errors::ServiceError;
use crate::services::pdf::{self, DocumentKind};
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

async fn create_quotation(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, ServiceError> {
    let payload: CreateQuotationRequest = decode_body(body)?;
    let input = payload.validated()?;
    let quotation = state.services.quotations.create_quotation(input).await?;
    Ok(created_response(quotation))
}

async fn list_quotations(State(state): State<AppState>) -> Result<Response, ServiceError> {
    let quotations = state.services.quotations.list_quotations().await?;
    Ok(success_response(quotations))
}

async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let quotation = state.services.quotations.get_quotation(id).await?;
    Ok(success_response(quotation))
}

async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Response, ServiceError> {
    let patch: UpdateQuotationRequest = decode_body(body)?;
    patch.validate()?;
    let updated = state.services.quotations.update_quotation(id, patch).await?;
    Ok(success_response(json!({
        "message": "Quotation updated successfully",
        "updatedQuotation": updated,
    })))
}

async fn delete_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    state.services.quotations.delete_quotation(id).await?;
    Ok(success_response(json!({
        "message": "Quotation deleted successfully",
    })))
}

async fn get_quotation_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let quotation = state.services.quotations.get_quotation(id).await?;

    // Drawing is CPU-bound; keep it off the async workers.
    let bytes = tokio::task::spawn_blocking(move || {
        pdf::render_document(DocumentKind::Quotation, &quotation, None)
    })
    .await
    .map_err(|e| ServiceError::InternalError(format!("render task failed: {}", e)))??;

    Ok(pdf_response(bytes))
}

pub fn quotation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quotation))
        .route("/", get(list_quotations))
        .route("/:id", get(get_quotation))
        .route("/:id", patch(update_quotation))
        .route("/:id", delete(delete_quotation))
        .route("/:id/pdf", get(get_quotation_pdf))
}
