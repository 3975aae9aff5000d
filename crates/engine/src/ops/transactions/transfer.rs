//! Wallet-to-wallet transfers.
//!
//! A transfer is two linked transactions: an expense in the source wallet
//! and an income in the destination wallet, each holding the other wallet's
//! id as `peer_wallet_id`. The two legs are created and deleted together,
//! but each wallet update is its own atomic step: the pair is deliberately
//! not wrapped in one cross-wallet transaction (see module docs on
//! `ops`). A failure between the steps leaves a partial transfer that bulk
//! reconciliation repairs; the error still reaches the caller.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind, commands::TransferCmd,
    projector::TransactionWrite, transactions,
};

use super::super::{Engine, with_tx};

/// Outcome of [`Engine::delete_transfer`].
///
/// `orphaned` is the warning channel for a transfer leg whose pair could
/// not be located (prior partial failure or data corruption): the found leg
/// is still deleted and its wallet reverted, and the caller decides how to
/// surface the condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferDeletion {
    pub deleted: Vec<Uuid>,
    pub orphaned: bool,
}

impl Engine {
    /// Creates a transfer pair, returning `(expense_id, income_id)`.
    pub async fn create_transfer(&self, cmd: TransferCmd) -> ResultEngine<(Uuid, Uuid)> {
        if cmd.source_wallet_id == cmd.destination_wallet_id {
            return Err(EngineError::InvalidTransfer(
                "source and destination wallet must differ".to_string(),
            ));
        }

        let mut expense = Transaction::new(
            cmd.source_wallet_id,
            cmd.expense_tag_id,
            TransactionKind::Expense,
            cmd.amount,
            cmd.description.clone(),
            cmd.occurred_at,
        )?;
        expense.peer_wallet_id = Some(cmd.destination_wallet_id);

        let mut income = Transaction::new(
            cmd.destination_wallet_id,
            cmd.income_tag_id,
            TransactionKind::Income,
            cmd.amount,
            cmd.description.clone(),
            cmd.occurred_at,
        )?;
        income.peer_wallet_id = Some(cmd.source_wallet_id);

        // Step 1: expense leg + source wallet. Both wallets and tags are
        // checked here so an unknown destination cannot strand a half
        // transfer for free.
        self.insert_source_leg(&cmd, &expense).await?;

        // Step 2: income leg + destination wallet. If this fails the source
        // leg stays committed; the error is reported, never swallowed.
        if let Err(err) = self.insert_transfer_leg(&income).await {
            tracing::error!(
                expense_leg = %expense.id,
                "transfer failed after source leg committed: {err}"
            );
            return Err(err);
        }

        tracing::debug!(
            amount = cmd.amount,
            source = %cmd.source_wallet_id,
            destination = %cmd.destination_wallet_id,
            "transfer created"
        );
        Ok((expense.id, income.id))
    }

    async fn insert_source_leg(
        &self,
        cmd: &TransferCmd,
        expense: &Transaction,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, cmd.source_wallet_id).await?;
            self.require_wallet(&db_tx, cmd.destination_wallet_id)
                .await?;
            self.require_tag(&db_tx, cmd.expense_tag_id).await?;
            self.require_tag(&db_tx, cmd.income_tag_id).await?;

            transactions::ActiveModel::from(expense)
                .insert(&db_tx)
                .await?;
            self.project_transaction_write(&db_tx, &TransactionWrite::Create { new: expense })
                .await?;
            Ok(())
        })
    }

    async fn insert_transfer_leg(&self, leg: &Transaction) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            transactions::ActiveModel::from(leg).insert(&db_tx).await?;
            self.project_transaction_write(&db_tx, &TransactionWrite::Create { new: leg })
                .await?;
            Ok(())
        })
    }

    /// Deletes a transfer starting from either leg, reverting both wallets.
    ///
    /// The pair is located by mutual `peer_wallet_id` linkage, equal amount
    /// and opposite kind. The match is a heuristic: with several identical
    /// concurrent transfers it may pick a different-but-equivalent leg,
    /// which leaves totals correct either way.
    pub async fn delete_transfer(&self, transaction_id: Uuid) -> ResultEngine<TransferDeletion> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        let leg = Transaction::try_from(model)?;
        let Some(peer_wallet_id) = leg.peer_wallet_id else {
            return Err(EngineError::InvalidTransfer(
                "transaction is not a transfer leg".to_string(),
            ));
        };

        let pair_model = transactions::Entity::find()
            .filter(transactions::Column::WalletId.eq(peer_wallet_id.to_string()))
            .filter(transactions::Column::PeerWalletId.eq(leg.wallet_id.to_string()))
            .filter(transactions::Column::Amount.eq(leg.amount))
            .filter(transactions::Column::Kind.eq(leg.kind.opposite().as_str()))
            .filter(transactions::Column::Id.ne(transaction_id.to_string()))
            .one(&self.database)
            .await?;
        let pair = pair_model.map(Transaction::try_from).transpose()?;

        let mut deleted = Vec::with_capacity(2);
        for tx in std::iter::once(&leg).chain(pair.iter()) {
            let removed: ResultEngine<bool> = with_tx!(self, |db_tx| {
                let still_there = transactions::Entity::find_by_id(tx.id.to_string())
                    .one(&db_tx)
                    .await?;
                if still_there.is_some() {
                    self.project_transaction_write(&db_tx, &TransactionWrite::Delete { prior: tx })
                        .await?;
                    transactions::Entity::delete_by_id(tx.id.to_string())
                        .exec(&db_tx)
                        .await?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            });
            if removed? {
                deleted.push(tx.id);
            }
        }

        let orphaned = pair.is_none();
        if orphaned {
            tracing::warn!(
                leg = %transaction_id,
                wallet = %leg.wallet_id,
                peer_wallet = %peer_wallet_id,
                "orphaned transfer leg: pair not found, deleted single leg"
            );
        }

        Ok(TransferDeletion { deleted, orphaned })
    }
}
