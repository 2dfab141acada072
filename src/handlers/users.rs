use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth.login(&payload.username, &payload.password).await?;

    Ok(Json(json!({
        "name": user.name,
        "balance": user.balance,
        "user_id": user.id,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreditScorePayload {
    #[serde(default)]
    pub user_id: String,
}

pub async fn credit_score(
    State(state): State<AppState>,
    Json(payload): Json<CreditScorePayload>,
) -> Result<impl IntoResponse, AppError> {
    let score = state.credit.score(&payload.user_id).await?;

    Ok(Json(json!({ "credit_score": score })))
}
