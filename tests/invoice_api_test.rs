mod common;

use axum::http::{Method, StatusCode};
use quotation_api::entities::invoice::Entity as InvoiceEntity;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::Value;
use uuid::Uuid;

use common::{read_bytes, read_json, sample_quotation, TestApp};

async fn create_quotation(app: &TestApp, token: &str) -> Value {
    let response = app
        .request(Method::POST, "/api/quotations", Some(sample_quotation(token)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

#[tokio::test]
async fn converting_a_missing_quotation_creates_no_invoice() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/invoices/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let rows = InvoiceEntity::find()
        .count(&*app.state.db)
        .await
        .expect("count invoices");
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn converting_a_quotation_approves_it_and_links_the_invoice() {
    let app = TestApp::new().await;
    let quotation = create_quotation(&app, "q-conv-1").await;
    let quotation_id = quotation["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::POST, &format!("/api/invoices/{quotation_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let invoice = read_json(response).await;
    assert!(invoice["id"].as_str().is_some());
    assert_eq!(invoice["quotationId"].as_str(), Some(quotation_id.as_str()));
    assert!(invoice["invoiceNumber"]
        .as_str()
        .unwrap_or_default()
        .starts_with("INV-"));

    let fetched = read_json(
        app.request(Method::GET, &format!("/api/quotations/{quotation_id}"), None)
            .await,
    )
    .await;
    assert_eq!(fetched["status"], "approved");
}

#[tokio::test]
async fn repeat_conversions_get_distinct_invoice_numbers() {
    let app = TestApp::new().await;
    let quotation = create_quotation(&app, "q-conv-twice").await;
    let quotation_id = quotation["id"].as_str().unwrap().to_string();

    let first = read_json(
        app.request(Method::POST, &format!("/api/invoices/{quotation_id}"), None)
            .await,
    )
    .await;
    let second = read_json(
        app.request(Method::POST, &format!("/api/invoices/{quotation_id}"), None)
            .await,
    )
    .await;

    assert_ne!(first["invoiceNumber"], second["invoiceNumber"]);
    assert_eq!(first["quotationId"], second["quotationId"]);
}

#[tokio::test]
async fn list_and_get_invoices() {
    let app = TestApp::new().await;
    let quotation = create_quotation(&app, "q-inv-list").await;
    let quotation_id = quotation["id"].as_str().unwrap().to_string();

    let invoice = read_json(
        app.request(Method::POST, &format!("/api/invoices/{quotation_id}"), None)
            .await,
    )
    .await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();

    let listed = app.request(Method::GET, "/api/invoices", None).await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body = read_json(listed).await;
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    let fetched = app
        .request(Method::GET, &format!("/api/invoices/{invoice_id}"), None)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = read_json(fetched).await;
    assert_eq!(fetched["id"].as_str(), Some(invoice_id.as_str()));

    let missing = app
        .request(Method::GET, &format!("/api/invoices/{}", Uuid::new_v4()), None)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_pdf_endpoint_streams_a_document() {
    let app = TestApp::new().await;
    let quotation = create_quotation(&app, "q-inv-pdf").await;
    let quotation_id = quotation["id"].as_str().unwrap().to_string();

    let invoice = read_json(
        app.request(Method::POST, &format!("/api/invoices/{quotation_id}"), None)
            .await,
    )
    .await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::GET, &format!("/api/invoices/{invoice_id}/pdf"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/pdf")
    );

    let bytes = read_bytes(response).await;
    assert!(!bytes.is_empty());
    assert!(bytes.starts_with(b"%PDF"));

    let missing = app
        .request(
            Method::GET,
            &format!("/api/invoices/{}/pdf", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn quotations_with_issued_invoices_cannot_be_deleted() {
    let app = TestApp::new().await;
    let quotation = create_quotation(&app, "q-del-guard").await;
    let quotation_id = quotation["id"].as_str().unwrap().to_string();

    let converted = app
        .request(Method::POST, &format!("/api/invoices/{quotation_id}"), None)
        .await;
    assert_eq!(converted.status(), StatusCode::CREATED);

    let response = app
        .request(Method::DELETE, &format!("/api/quotations/{quotation_id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The quotation is still there.
    let fetched = app
        .request(Method::GET, &format!("/api/quotations/{quotation_id}"), None)
        .await;
    assert_eq!(fetched.status(), StatusCode::OK);
}
