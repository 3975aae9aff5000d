//! Create/update/delete entry points for single transactions.
//!
//! This is the optimistic (request-path) variant of the mutation trigger
//! layer: each entry point reads the current stored state as "prior" inside
//! its own database transaction, so the transaction row and the wallet
//! totals always commit together. The trigger-delivery variant lives in
//! `ops::events`; both share the projector arithmetic.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction,
    commands::{TransactionNewCmd, TransactionUpdateCmd},
    projector::TransactionWrite,
    transactions,
};

use super::super::{Engine, with_tx};

impl Engine {
    /// Creates a transaction and applies its delta to the owning wallet.
    pub async fn add_transaction(&self, cmd: TransactionNewCmd) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            // Referenced rows must exist before anything is written.
            self.require_wallet(&db_tx, cmd.wallet_id).await?;
            self.require_tag(&db_tx, cmd.tag_id).await?;

            let tx = Transaction::new(
                cmd.wallet_id,
                cmd.tag_id,
                cmd.kind,
                cmd.amount,
                cmd.description,
                cmd.occurred_at,
            )?;

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            self.project_transaction_write(&db_tx, &TransactionWrite::Create { new: &tx })
                .await?;

            tracing::debug!(transaction = %tx.id, wallet = %tx.wallet_id, "transaction created");
            Ok(tx.id)
        })
    }

    /// Updates a transaction in place (amount, description, tag, date).
    ///
    /// `kind` and `wallet_id` are immutable here; wallet reassignment is a
    /// delete+create handled by the trigger layer. Amounts of transfer legs
    /// cannot change individually; the pair must stay symmetric.
    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        cmd: TransactionUpdateCmd,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let prior_model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
            let prior = Transaction::try_from(prior_model)?;

            if let Some(amount) = cmd.amount
                && prior.is_transfer_leg()
                && amount != prior.amount
            {
                return Err(EngineError::ImmutableField(
                    "transfer legs change amount only as a pair".to_string(),
                ));
            }

            let mut updated = prior.clone();
            if let Some(amount) = cmd.amount {
                if amount <= 0 {
                    return Err(EngineError::InvalidAmount(
                        "amount must be > 0".to_string(),
                    ));
                }
                updated.amount = amount;
            }
            if let Some(description) = cmd.description {
                updated.description = description;
            }
            if let Some(tag_id) = cmd.tag_id {
                self.require_tag(&db_tx, tag_id).await?;
                updated.tag_id = tag_id;
            }
            if let Some(occurred_at) = cmd.occurred_at {
                updated.occurred_at = occurred_at;
            }

            self.project_transaction_write(
                &db_tx,
                &TransactionWrite::Update {
                    prior: Some(&prior),
                    new: &updated,
                },
            )
            .await?;

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                amount: ActiveValue::Set(updated.amount),
                description: ActiveValue::Set(updated.description.clone()),
                tag_id: ActiveValue::Set(updated.tag_id.to_string()),
                occurred_at: ActiveValue::Set(updated.occurred_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a transaction and reverts its delta.
    ///
    /// Idempotent: deleting an id that no longer exists is a no-op success
    /// (`Ok(false)`), which makes retries safe. Transfer legs are routed
    /// through [`Engine::delete_transfer`] so the pair goes together.
    pub async fn delete_transaction(&self, transaction_id: Uuid) -> ResultEngine<bool> {
        let existing = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?;
        let Some(model) = existing else {
            tracing::debug!(transaction = %transaction_id, "delete of absent transaction, no-op");
            return Ok(false);
        };

        let prior = Transaction::try_from(model)?;
        if prior.is_transfer_leg() {
            self.delete_transfer(transaction_id).await?;
            return Ok(true);
        }

        with_tx!(self, |db_tx| {
            // Re-read inside the transaction: a concurrent delete may have won.
            let still_there = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?;
            if still_there.is_none() {
                return Ok(false);
            }

            self.project_transaction_write(&db_tx, &TransactionWrite::Delete { prior: &prior })
                .await?;
            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(true)
        })
    }

    /// Deletes a set of transaction rows without touching wallet totals.
    ///
    /// Store-level primitive: all-or-nothing within one database
    /// transaction. Callers own the totals; the one in-tree use is the
    /// wallet cascade delete, where the wallet row itself is going away.
    pub async fn bulk_delete_transactions(&self, ids: &[Uuid]) -> ResultEngine<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let id_strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        with_tx!(self, |db_tx| {
            let result = transactions::Entity::delete_many()
                .filter(transactions::Column::Id.is_in(id_strings))
                .exec(&db_tx)
                .await?;
            Ok(result.rows_affected)
        })
    }
}
