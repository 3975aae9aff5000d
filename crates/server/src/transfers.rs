//! Transfer API endpoints.

use api_types::transfer::{TransferCreated, TransferDeleted, TransferNew};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::TransferCmd;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransferCreated>), ServerError> {
    let (expense_id, income_id) = state
        .engine
        .create_transfer(
            TransferCmd::new(
                payload.amount,
                payload.source_wallet_id,
                payload.destination_wallet_id,
                payload.expense_tag_id,
                payload.income_tag_id,
                payload.occurred_at,
            )
            .description(payload.description),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TransferCreated {
            expense_id,
            income_id,
        }),
    ))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferDeleted>, ServerError> {
    let deletion = state.engine.delete_transfer(id).await?;
    Ok(Json(TransferDeleted {
        deleted: deletion.deleted,
        orphaned: deletion.orphaned,
    }))
}
