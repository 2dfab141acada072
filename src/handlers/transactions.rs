use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::AppError;
use crate::services::ledger::NewTransaction;

#[derive(Debug, Deserialize)]
pub struct AddTransactionPayload {
    pub transaction_from: Option<String>,
    pub transaction_with: Option<String>,
    pub transaction_amount: Option<f64>,
    pub transaction_type: Option<String>,
    pub transaction_status: Option<String>,
    pub transaction_date: Option<String>,
    pub reason: Option<String>,
}

impl From<AddTransactionPayload> for NewTransaction {
    fn from(payload: AddTransactionPayload) -> Self {
        NewTransaction {
            from: payload.transaction_from,
            with: payload.transaction_with,
            amount: payload.transaction_amount,
            kind: payload.transaction_type,
            status: payload.transaction_status,
            date: payload.transaction_date,
            reason: payload.reason,
        }
    }
}

pub async fn add_transaction(
    State(state): State<AppState>,
    Json(payload): Json<AddTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.ledger.add_transaction(payload.into()).await?;

    Ok(Json(json!({ "message": format!("transaction added - {id}") })))
}

#[derive(Debug, Deserialize)]
pub struct UserHistoryPayload {
    #[serde(default)]
    pub user_id: String,
}

pub async fn get_transactions(
    State(state): State<AppState>,
    Json(payload): Json<UserHistoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = state.ledger.list_transactions(&payload.user_id).await?;

    Ok(Json(json!({
        "user_id": payload.user_id,
        "transactions": transactions,
    })))
}

#[derive(Debug, Deserialize)]
pub struct MarkPaidPayload {
    #[serde(default)]
    pub transaction_id: String,
}

pub async fn mark_paid(
    State(state): State<AppState>,
    Json(payload): Json<MarkPaidPayload>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.ledger.mark_paid(&payload.transaction_id).await?;

    Ok(Json(json!({ "message": format!("transaction updated - {id}") })))
}
