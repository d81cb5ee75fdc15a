use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use quotation_api::{config::AppConfig, db, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a
/// file-backed SQLite database unique to this instance.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    db_file: String,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_file = format!("quotation_test_{}.db", Uuid::new_v4().simple());
        let _ = std::fs::remove_file(&db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{db_file}?mode=rwc"),
            "127.0.0.1".to_string(),
            13_000,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = Router::new()
            .merge(quotation_api::api_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            db_file,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
    }
}

/// Reads a response body as JSON.
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}

/// Reads a response body as raw bytes.
#[allow(dead_code)]
pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body")
        .to_vec()
}

/// The hospitality-style line items used throughout the integration tests.
#[allow(dead_code)]
pub fn sample_items() -> Value {
    json!([
        {
            "name": "FULL DAY CONFERENCE 24TH - 26TH JUNE 2025",
            "qty": 45,
            "days": 3,
            "unitPrice": 3500,
            "amount": 472500.0,
            "subItems": [
                "AM/PM TEAS, COFFEE, HOT MILK, HOT WATER AND SNACKS",
                "BUFFET LUNCH WITH A SOFT DRINK (soda or water)",
                "Stationeries (Writing pads, pens, 1 flip chart and stand)",
                "P.A & projector",
                "Conference hall"
            ]
        },
        {
            "name": "ACCOMMODATION BB 23RD - 27TH JUNE 2025",
            "qty": 5,
            "days": 4,
            "unitPrice": 12000,
            "amount": 240000.0
        },
        {
            "name": "HB ACCOMMODATION 23RD - 27TH JUNE 2025",
            "qty": 40,
            "days": 4,
            "unitPrice": 15000,
            "amount": 2400000.0
        },
        {
            "name": "AIRPORT PICK UP & DROP OFF 23RD & 27TH JUNE 2025",
            "qty": 2,
            "days": 2,
            "unitPrice": 3500,
            "amount": 14000.0
        }
    ])
}

/// A complete, valid creation payload with the given idempotency token.
#[allow(dead_code)]
pub fn sample_quotation(unique_quotation_id: &str) -> Value {
    json!({
        "clientName": "John Doe",
        "email": "john@example.com",
        "uniqueQuotationId": unique_quotation_id,
        "phone": "1234567890",
        "quotationDate": "2025-06-20T09:00:00Z",
        "items": sample_items(),
        "status": "pending"
    })
}
