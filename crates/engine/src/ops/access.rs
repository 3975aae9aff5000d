//! Shared row lookups used by the write paths.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, tags, wallets};

use super::Engine;

impl Engine {
    /// Fetch a wallet row a transaction wants to reference.
    ///
    /// Absence is a [`EngineError::MissingReference`], surfaced to the
    /// caller rather than skipped.
    pub(crate) async fn require_wallet(
        &self,
        db_tx: &DatabaseTransaction,
        wallet_id: Uuid,
    ) -> ResultEngine<wallets::Model> {
        wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::MissingReference(format!("wallet {wallet_id} not exists"))
            })
    }

    pub(crate) async fn require_tag(
        &self,
        db_tx: &DatabaseTransaction,
        tag_id: Uuid,
    ) -> ResultEngine<tags::Model> {
        tags::Entity::find_by_id(tag_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::MissingReference(format!("tag {tag_id} not exists")))
    }

    pub(crate) async fn wallet_name_taken(
        &self,
        db_tx: &DatabaseTransaction,
        name: &str,
        exclude: Option<Uuid>,
    ) -> ResultEngine<bool> {
        let mut query = wallets::Entity::find().filter(wallets::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(wallets::Column::Id.ne(id.to_string()));
        }
        Ok(query.one(db_tx).await?.is_some())
    }
}
