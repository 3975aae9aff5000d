//! Wallets API endpoints.

use api_types::wallet::{Overview, WalletCreated, WalletNew, WalletUpdate, WalletView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(wallet: &engine::Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name.clone(),
        initial_balance: wallet.initial_balance,
        balance: wallet.balance,
        total_income: wallet.total_income,
        total_expense: wallet.total_expense,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletCreated>), ServerError> {
    let id = state
        .engine
        .new_wallet(&payload.name, payload.initial_balance, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(WalletCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.engine.list_wallets().await?;
    Ok(Json(wallets.iter().map(view).collect()))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(id).await?;
    Ok(Json(view(&wallet)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WalletUpdate>,
) -> Result<StatusCode, ServerError> {
    state.engine.rename_wallet(id, &payload.name).await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_wallet(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn overview(State(state): State<ServerState>) -> Result<Json<Overview>, ServerError> {
    let totals = state.engine.overview().await?;
    Ok(Json(Overview {
        balance: totals.balance,
        total_income: totals.total_income,
        total_expense: totals.total_expense,
    }))
}
