//! Transactions API endpoints.

use api_types::{
    Kind,
    transaction::{
        TransactionCreated, TransactionDeleted, TransactionList, TransactionNew,
        TransactionUpdate, TransactionView,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EngineError, TransactionKind, TransactionListFilter, TransactionNewCmd};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn tx_kind(kind: Kind) -> TransactionKind {
    match kind {
        Kind::Income => TransactionKind::Income,
        Kind::Expense => TransactionKind::Expense,
    }
}

fn api_kind(kind: TransactionKind) -> Kind {
    match kind {
        TransactionKind::Income => Kind::Income,
        TransactionKind::Expense => Kind::Expense,
    }
}

fn view(tx: &engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        tag_id: tx.tag_id,
        kind: api_kind(tx.kind),
        amount: tx.amount,
        description: tx.description.clone(),
        occurred_at: tx.occurred_at,
        peer_wallet_id: tx.peer_wallet_id,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .add_transaction(
            TransactionNewCmd::new(
                payload.wallet_id,
                payload.tag_id,
                tx_kind(payload.kind),
                payload.amount,
                payload.occurred_at,
            )
            .description(payload.description),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(TransactionListFilter {
            wallet_id: query.wallet_id,
            tag_id: query.tag_id,
            kind: query.kind.map(tx_kind),
            limit: query.limit,
        })
        .await?;
    Ok(Json(transactions.iter().map(view).collect()))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(id).await?;
    Ok(Json(view(&tx)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    // Kind and owning wallet are immutable in place; reassignment is a
    // delete followed by a create.
    let current = state.engine.transaction(id).await?;
    if let Some(kind) = payload.kind
        && tx_kind(kind) != current.kind
    {
        return Err(EngineError::ImmutableField(
            "transaction kind cannot change after creation".to_string(),
        )
        .into());
    }
    if let Some(wallet_id) = payload.wallet_id
        && wallet_id != current.wallet_id
    {
        return Err(EngineError::ImmutableField(
            "transaction wallet cannot change via update; delete and recreate".to_string(),
        )
        .into());
    }

    let mut cmd = engine::TransactionUpdateCmd::new();
    if let Some(amount) = payload.amount {
        cmd = cmd.amount(amount);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(tag_id) = payload.tag_id {
        cmd = cmd.tag_id(tag_id);
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at);
    }

    state.engine.update_transaction(id, cmd).await?;
    Ok(StatusCode::OK)
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionDeleted>, ServerError> {
    let removed = state.engine.delete_transaction(id).await?;
    Ok(Json(TransactionDeleted { removed }))
}
