//! Wallet store operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Delta, EngineError, ResultEngine, Wallet,
    projector::{TransactionWrite, WalletTotals, wallet_deltas},
    transactions, wallets,
};

use super::{Engine, normalize_required_name, with_tx};

/// Summed totals across all wallets, for the dashboard overview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overview {
    pub balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
}

impl Engine {
    /// Applies a signed delta to one wallet's derived totals.
    ///
    /// This is the only mutation path for `balance`/`total_income`/
    /// `total_expense` outside bulk reconciliation. The read, the
    /// normalization of legacy rows and the write happen against the same
    /// `db_tx`, which is what serializes concurrent mutations of one wallet.
    pub(crate) async fn apply_wallet_delta(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
        delta: Delta,
    ) -> ResultEngine<WalletTotals> {
        let model = self.require_wallet(db_tx, wallet_id).await?;
        let totals = WalletTotals::from_model(&model).apply(delta);

        let active = wallets::ActiveModel {
            id: ActiveValue::Set(model.id),
            balance: ActiveValue::Set(Some(totals.balance)),
            total_income: ActiveValue::Set(Some(totals.total_income)),
            total_expense: ActiveValue::Set(Some(totals.total_expense)),
            ..Default::default()
        };
        active.update(db_tx).await?;
        Ok(totals)
    }

    /// Projects a transaction write onto the affected wallet(s).
    ///
    /// Cross-wallet updates arrive here already decomposed by
    /// [`wallet_deltas`] into two single-wallet steps.
    pub(crate) async fn project_transaction_write(
        &self,
        db_tx: &DatabaseTransaction,
        write: &TransactionWrite<'_>,
    ) -> ResultEngine<()> {
        for (wallet_id, delta) in wallet_deltas(write)? {
            self.apply_wallet_delta(db_tx, wallet_id, delta).await?;
        }
        Ok(())
    }

    /// Add a new wallet.
    ///
    /// `balance`, `total_income` and `total_expense` are derived fields:
    /// whatever the caller supplies, the wallet starts at
    /// `balance = initial_balance` with zeroed totals.
    pub async fn new_wallet(
        &self,
        name: &str,
        initial_balance: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "wallet")?;
        with_tx!(self, |db_tx| {
            if self.wallet_name_taken(&db_tx, &name, None).await? {
                return Err(EngineError::ExistingKey(name));
            }

            let wallet = Wallet::new(name, initial_balance, created_at);
            let wallet_id = wallet.id;
            wallets::ActiveModel::from(&wallet).insert(&db_tx).await?;
            Ok(wallet_id)
        })
    }

    /// Return a wallet snapshot.
    pub async fn wallet(&self, wallet_id: Uuid) -> ResultEngine<Wallet> {
        let model = wallets::Entity::find_by_id(wallet_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        Wallet::try_from(model)
    }

    /// Lists wallets in insertion order.
    pub async fn list_wallets(&self) -> ResultEngine<Vec<Wallet>> {
        let models = wallets::Entity::find()
            .order_by_asc(wallets::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Wallet::try_from).collect()
    }

    /// Renames an existing wallet. `initial_balance` stays immutable.
    pub async fn rename_wallet(&self, wallet_id: Uuid, new_name: &str) -> ResultEngine<()> {
        let new_name = normalize_required_name(new_name, "wallet")?;
        with_tx!(self, |db_tx| {
            wallets::Entity::find_by_id(wallet_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
            if self
                .wallet_name_taken(&db_tx, &new_name, Some(wallet_id))
                .await?
            {
                return Err(EngineError::ExistingKey(new_name));
            }

            let active = wallets::ActiveModel {
                id: ActiveValue::Set(wallet_id.to_string()),
                name: ActiveValue::Set(new_name),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a wallet and, first, every transaction referencing it.
    ///
    /// Refused with [`EngineError::LastWallet`] when it is the only wallet
    /// left. Transfer legs living in *other* wallets that pointed at the
    /// deleted one are left in place; their pair link dangles and is
    /// handled by the orphan path of `delete_transfer`.
    pub async fn delete_wallet(&self, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let remaining = wallets::Entity::find().count(&db_tx).await?;
            if remaining <= 1 {
                return Err(EngineError::LastWallet(wallet_id.to_string()));
            }

            let model = wallets::Entity::find_by_id(wallet_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;

            let removed = transactions::Entity::delete_many()
                .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
                .exec(&db_tx)
                .await?;
            tracing::info!(
                wallet = %model.name,
                transactions = removed.rows_affected,
                "cascade deleting wallet"
            );

            wallets::Entity::delete_by_id(wallet_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Summed balance/income/expense across all wallets.
    ///
    /// Folded over normalized rows rather than a SQL SUM so legacy rows with
    /// missing derived columns count the same as everywhere else.
    pub async fn overview(&self) -> ResultEngine<Overview> {
        let models = wallets::Entity::find().all(&self.database).await?;
        let mut overview = Overview::default();
        for model in &models {
            let totals = WalletTotals::from_model(model);
            overview.balance += totals.balance;
            overview.total_income += totals.total_income;
            overview.total_expense += totals.total_expense;
        }
        Ok(overview)
    }
}
