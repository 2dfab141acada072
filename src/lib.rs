pub mod cache;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::cache::HistoryCache;
use crate::services::{auth::AuthService, credit::CreditService, ledger::LedgerService};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: AuthService,
    pub ledger: LedgerService,
    pub credit: CreditService,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, cache: Arc<dyn HistoryCache>) -> Self {
        let ledger = LedgerService::new(db.clone(), cache);
        Self {
            auth: AuthService::new(db.clone()),
            credit: CreditService::new(ledger.clone()),
            ledger,
            db,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::users::login))
        .route("/credit_score", get(handlers::users::credit_score))
        .route("/get_transactions", get(handlers::transactions::get_transactions))
        .route("/add_transaction", post(handlers::transactions::add_transaction))
        .route("/mark_paid", patch(handlers::transactions::mark_paid))
        .layer(axum::middleware::from_fn(middleware::request_logger))
        .with_state(state)
}
