//! Trigger-delivery variant of the mutation entry points.
//!
//! Some stores deliver writes as change events carrying before/after
//! snapshots of the transaction record (or are polled into the same shape).
//! In that mode the record itself is already persisted by the external
//! writer; the engine's job is only to keep wallet totals consistent.
//!
//! The arithmetic is the same [`wallet_deltas`](crate::projector) used by
//! the request path; the algorithm exists once, callers only choose the
//! delivery mode.

use sea_orm::TransactionTrait;

use crate::{EngineError, ResultEngine, Transaction, projector::TransactionWrite};

use super::{Engine, with_tx};

/// A write event: before/after snapshots of one transaction record.
///
/// - create: `before = None`, `after = Some`
/// - update: both present (same id)
/// - delete: `before = Some`, `after = None`
#[derive(Clone, Debug)]
pub struct TransactionEvent {
    pub before: Option<Transaction>,
    pub after: Option<Transaction>,
}

impl TransactionEvent {
    pub fn created(after: Transaction) -> Self {
        Self {
            before: None,
            after: Some(after),
        }
    }

    pub fn updated(before: Transaction, after: Transaction) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn deleted(before: Transaction) -> Self {
        Self {
            before: Some(before),
            after: None,
        }
    }
}

impl Engine {
    /// Applies a transaction write event to the affected wallet totals.
    ///
    /// A wallet-reassigning update is decomposed into a delete projection
    /// against the old wallet followed by a create projection against the
    /// new one: two single-wallet atomic steps, never one cross-wallet
    /// write. A missing wallet row surfaces as
    /// [`EngineError::MissingReference`]; the event is not silently
    /// dropped.
    pub async fn apply_transaction_event(&self, event: TransactionEvent) -> ResultEngine<()> {
        let write = match (&event.before, &event.after) {
            (None, Some(after)) => TransactionWrite::Create { new: after },
            (Some(before), None) => TransactionWrite::Delete { prior: before },
            (Some(before), Some(after)) => {
                if before.id != after.id {
                    return Err(EngineError::ImmutableField(
                        "write event before/after reference different transactions".to_string(),
                    ));
                }
                TransactionWrite::Update {
                    prior: Some(before),
                    new: after,
                }
            }
            (None, None) => {
                return Err(EngineError::MissingPriorState(
                    "write event carries neither before nor after snapshot".to_string(),
                ));
            }
        };

        let deltas = crate::projector::wallet_deltas(&write)?;
        for (wallet_id, delta) in deltas {
            // One database transaction per wallet: the legs of a
            // reassignment may interleave with other traffic, but each
            // wallet's read-modify-write stays serialized.
            let applied: ResultEngine<()> = with_tx!(self, |db_tx| {
                self.apply_wallet_delta(&db_tx, wallet_id, delta).await?;
                Ok(())
            });
            applied?;
        }

        if let Some(tx) = event.after.as_ref().or(event.before.as_ref()) {
            tracing::debug!(transaction = %tx.id, "write event applied");
        }
        Ok(())
    }
}
