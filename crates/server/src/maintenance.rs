//! Import/export and reconciliation endpoints.
//!
//! Import and clear are exclusive operations: the caller is expected to
//! keep regular traffic away while they run, which the surrounding app does
//! by driving them from a blocking settings screen.

use api_types::maintenance::{ImportReport, SkippedRecord};
use axum::{Json, extract::State, http::StatusCode};
use engine::Snapshot;

use crate::{ServerError, server::ServerState};

pub async fn import(
    State(state): State<ServerState>,
    Json(snapshot): Json<Snapshot>,
) -> Result<Json<ImportReport>, ServerError> {
    let report = state.engine.import_snapshot(snapshot).await?;
    Ok(Json(ImportReport {
        wallets: report.wallets,
        tags: report.tags,
        transactions: report.transactions,
        skipped: report
            .skipped
            .into_iter()
            .map(|record| SkippedRecord {
                label: record.label,
                reason: record.reason,
            })
            .collect(),
    }))
}

pub async fn export(State(state): State<ServerState>) -> Result<Json<Snapshot>, ServerError> {
    let snapshot = state.engine.export_snapshot().await?;
    Ok(Json(snapshot))
}

pub async fn recompute(State(state): State<ServerState>) -> Result<StatusCode, ServerError> {
    state.engine.recompute_balances().await?;
    Ok(StatusCode::OK)
}

pub async fn clear(State(state): State<ServerState>) -> Result<StatusCode, ServerError> {
    state.engine.clear_all().await?;
    Ok(StatusCode::OK)
}
