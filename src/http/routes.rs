//! Wallet endpoints.
//!
//! - `POST /api/v1/wallet` applies a deposit or withdrawal
//! - `GET /api/v1/wallets/{id}` reads a balance

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::application::{parse_operation_type, parse_wallet_id, validate_amount};
use crate::domain::{Cents, WalletBalance};

use super::error::ApiError;
use super::server::AppState;

/// Deposit/withdraw request. Missing fields fall through to validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationRequest {
    #[serde(alias = "valletId")]
    pub wallet_id: String,
    pub operation_type: String,
    pub amount: Cents,
}

/// POST /api/v1/wallet
async fn apply_operation(
    State(state): State<AppState>,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

    let operation_type = parse_operation_type(&req.operation_type)?;
    let amount = validate_amount(req.amount)?;
    let wallet_id = parse_wallet_id(&req.wallet_id)?;

    info!(%wallet_id, %operation_type, amount, "processing operation");
    state.wallets.apply(wallet_id, operation_type, amount).await?;

    Ok(StatusCode::OK)
}

/// GET /api/v1/wallets/{id}
async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WalletBalance>, ApiError> {
    let wallet_id = parse_wallet_id(&id)?;

    info!(%wallet_id, "get wallet");
    let balance = state.wallets.balance(wallet_id).await?;

    Ok(Json(WalletBalance { wallet_id, balance }))
}

/// Wallet routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/wallet", post(apply_operation))
        .route("/api/v1/wallets/{id}", get(get_balance))
}
