//! Quotation API Library
//!
//! Stores price quotations for a hospitality business, converts approved
//! quotations into invoices, and renders both as PDF documents.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires the shared state for a given pool and configuration.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

/// Composes the public API surface under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/quotations", handlers::quotations::quotation_routes())
        .nest("/api/invoices", handlers::invoices::invoice_routes())
}
