//! Bulk reconciliation: import, export, reset and full recomputation.
//!
//! These paths bypass the per-transaction trigger machinery and fold wallet
//! totals from scratch over the whole transaction set. They assume no
//! concurrent incremental mutations are in flight; the caller serializes
//! bulk operations against live traffic (an import/reset is exclusive by
//! construction in the calling layer).

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Delta, EngineError, ResultEngine, Tag, TagKind, Transaction, TransactionKind, Wallet,
    projector::WalletTotals,
    snapshot::{RawTransaction, Snapshot, normalize_amount, normalize_baseline},
    tags, transactions, wallets,
};

use super::{Engine, with_tx};

/// Result of a bulk import: counts plus the records that were skipped.
///
/// Import is partial success: a single bad record is reported
/// and the rest of the batch proceeds.
#[derive(Clone, Debug, Default)]
pub struct ImportReport {
    pub wallets: usize,
    pub tags: usize,
    pub transactions: usize,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Clone, Debug)]
pub struct SkippedRecord {
    pub label: String,
    pub reason: String,
}

impl Engine {
    /// Recomputes every wallet's derived totals from the transaction set.
    ///
    /// This is the recovery path for the known consistency gaps (partial
    /// transfers, crashed trigger deliveries): totals are rebuilt as
    /// `initial_balance` plus the fold of all referencing transactions,
    /// in no particular order, and the denormalized rows are overwritten.
    pub async fn recompute_balances(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let wallet_models = wallets::Entity::find().all(&db_tx).await?;
            let mut totals: HashMap<Uuid, WalletTotals> = HashMap::new();
            for model in &wallet_models {
                let id = Uuid::parse_str(&model.id)
                    .map_err(|_| EngineError::KeyNotFound("wallet not exists".to_string()))?;
                totals.insert(id, WalletTotals::opening(model.initial_balance));
            }

            let tx_models = transactions::Entity::find().all(&db_tx).await?;
            for model in tx_models {
                let tx = Transaction::try_from(model)?;
                let entry = totals.get_mut(&tx.wallet_id).ok_or_else(|| {
                    EngineError::MissingReference(format!(
                        "transaction {} references wallet {} not exists",
                        tx.id, tx.wallet_id
                    ))
                })?;
                *entry = entry.apply(Delta::of(tx.kind, tx.amount)?);
            }

            for (wallet_id, wallet_totals) in totals {
                let active = wallets::ActiveModel {
                    id: ActiveValue::Set(wallet_id.to_string()),
                    balance: ActiveValue::Set(Some(wallet_totals.balance)),
                    total_income: ActiveValue::Set(Some(wallet_totals.total_income)),
                    total_expense: ActiveValue::Set(Some(wallet_totals.total_expense)),
                    ..Default::default()
                };
                active.update(&db_tx).await?;
            }

            tracing::info!(wallets = wallet_models.len(), "balances recomputed");
            Ok(())
        })
    }

    /// Deletes all transactions, tags and wallets.
    pub async fn clear_all(&self) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            transactions::Entity::delete_many().exec(&db_tx).await?;
            tags::Entity::delete_many().exec(&db_tx).await?;
            wallets::Entity::delete_many().exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Replaces the whole store with an imported snapshot.
    ///
    /// Wallets and tags get fresh ids; transaction foreign keys are
    /// rewritten through the old-to-new id maps. Imported totals fields are
    /// never trusted: every wallet's totals are folded from the imported
    /// transactions. Records with unparseable dates or invalid amounts are
    /// skipped and reported while the rest of the batch proceeds.
    pub async fn import_snapshot(&self, snapshot: Snapshot) -> ResultEngine<ImportReport> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            transactions::Entity::delete_many().exec(&db_tx).await?;
            tags::Entity::delete_many().exec(&db_tx).await?;
            wallets::Entity::delete_many().exec(&db_tx).await?;

            let mut report = ImportReport::default();
            let mut wallet_ids: HashMap<String, Uuid> = HashMap::new();
            let mut tag_ids: HashMap<String, Uuid> = HashMap::new();
            let mut totals: HashMap<Uuid, WalletTotals> = HashMap::new();

            for raw in &snapshot.wallets {
                let initial_balance = match normalize_baseline(raw.initial_balance) {
                    Ok(value) => value,
                    Err(err) => {
                        report.skip(&raw.name, &err);
                        continue;
                    }
                };
                let wallet = Wallet::new(raw.name.clone(), initial_balance, now);
                wallet_ids.insert(raw.id.clone(), wallet.id);
                totals.insert(wallet.id, WalletTotals::opening(initial_balance));
                wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
                report.wallets += 1;
            }

            for raw in &snapshot.tags {
                let kind = match TagKind::try_from(raw.kind.as_str()) {
                    Ok(kind) => kind,
                    Err(err) => {
                        report.skip(&raw.name, &err);
                        continue;
                    }
                };
                let spend_limit = match raw.limit {
                    None => None,
                    Some(value) => match normalize_amount(Some(value)) {
                        Ok(limit) => Some(limit),
                        Err(err) => {
                            report.skip(&raw.name, &err);
                            continue;
                        }
                    },
                };
                let tag = Tag::new(
                    raw.name.clone(),
                    kind,
                    raw.icon.clone(),
                    raw.text_color.clone(),
                    raw.bg_color.clone(),
                    spend_limit,
                    now,
                );
                tag_ids.insert(raw.id.clone(), tag.id);
                tags::ActiveModel::from(&tag).insert(&db_tx).await?;
                report.tags += 1;
            }

            for raw in &snapshot.transactions {
                match build_imported_transaction(raw, &wallet_ids, &tag_ids) {
                    Ok(tx) => {
                        let entry = totals.get_mut(&tx.wallet_id).ok_or_else(|| {
                            EngineError::MissingReference(format!(
                                "imported transaction references wallet {} not exists",
                                tx.wallet_id
                            ))
                        })?;
                        *entry = entry.apply(Delta::of(tx.kind, tx.amount)?);
                        transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
                        report.transactions += 1;
                    }
                    Err(err) => report.skip(&raw.description, &err),
                }
            }

            // Overwrite derived columns with the folded totals.
            for (wallet_id, wallet_totals) in totals {
                let active = wallets::ActiveModel {
                    id: ActiveValue::Set(wallet_id.to_string()),
                    balance: ActiveValue::Set(Some(wallet_totals.balance)),
                    total_income: ActiveValue::Set(Some(wallet_totals.total_income)),
                    total_expense: ActiveValue::Set(Some(wallet_totals.total_expense)),
                    ..Default::default()
                };
                active.update(&db_tx).await?;
            }

            if !report.skipped.is_empty() {
                tracing::warn!(
                    skipped = report.skipped.len(),
                    "import finished with skipped records"
                );
            }
            Ok(report)
        })
    }

    /// Exports the whole store as a snapshot.
    pub async fn export_snapshot(&self) -> ResultEngine<Snapshot> {
        let wallets = self.list_wallets().await?;
        let tags = self.list_tags().await?;
        let transactions = self
            .list_transactions(super::TransactionListFilter::default())
            .await?;

        Ok(Snapshot {
            wallets: wallets.iter().map(Into::into).collect(),
            tags: tags.iter().map(Into::into).collect(),
            transactions: transactions.iter().map(Into::into).collect(),
        })
    }
}

impl ImportReport {
    fn skip(&mut self, label: &str, err: &EngineError) {
        tracing::warn!(label, "skipping imported record: {err}");
        self.skipped.push(SkippedRecord {
            label: label.to_string(),
            reason: err.to_string(),
        });
    }
}

fn build_imported_transaction(
    raw: &RawTransaction,
    wallet_ids: &HashMap<String, Uuid>,
    tag_ids: &HashMap<String, Uuid>,
) -> ResultEngine<Transaction> {
    let wallet_id = wallet_ids.get(&raw.wallet_id).copied().ok_or_else(|| {
        EngineError::MissingReference(format!("unknown wallet id {}", raw.wallet_id))
    })?;
    let tag_id = tag_ids
        .get(&raw.tag_id)
        .copied()
        .ok_or_else(|| EngineError::MissingReference(format!("unknown tag id {}", raw.tag_id)))?;
    let kind = TransactionKind::try_from(raw.kind.as_str())?;
    let amount = normalize_amount(raw.amount)?;
    let occurred_at = raw
        .created_at
        .as_ref()
        .ok_or_else(|| EngineError::InvalidDate("missing date".to_string()))?
        .normalize()?;

    let mut tx = Transaction::new(
        wallet_id,
        tag_id,
        kind,
        amount,
        raw.description.clone(),
        occurred_at,
    )?;

    // Transfer linkage is remapped when the peer wallet survived the
    // import; otherwise the leg is kept as a plain transaction.
    if let Some(source) = raw.source_wallet_id.as_ref() {
        match wallet_ids.get(source) {
            Some(peer) => tx.peer_wallet_id = Some(*peer),
            None => {
                tracing::warn!(
                    transaction = %tx.id,
                    "dropping transfer linkage: peer wallet not in snapshot"
                );
            }
        }
    }
    Ok(tx)
}
