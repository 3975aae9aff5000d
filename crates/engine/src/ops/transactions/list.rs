//! Transaction lookups and listings.

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, transactions};

use super::super::Engine;

/// Filter for [`Engine::list_transactions`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionListFilter {
    pub wallet_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<u64>,
}

impl Engine {
    /// Point lookup by id.
    pub async fn transaction(&self, transaction_id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }

    /// Lists transactions, most recent `occurred_at` first.
    ///
    /// The ordering is for display; totals are never derived from it.
    pub async fn list_transactions(
        &self,
        filter: TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt);

        if let Some(wallet_id) = filter.wallet_id {
            query = query.filter(transactions::Column::WalletId.eq(wallet_id.to_string()));
        }
        if let Some(tag_id) = filter.tag_id {
            query = query.filter(transactions::Column::TagId.eq(tag_id.to_string()));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}
