//! Tag store operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Tag, TagKind, tags, transactions};

use super::{Engine, normalize_required_name, with_tx};

/// Fields a tag update may touch. `kind` is immutable after creation.
#[derive(Clone, Debug, Default)]
pub struct TagUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub text_color: Option<String>,
    pub bg_color: Option<String>,
    /// `Some(None)` clears the limit, `Some(Some(v))` sets it.
    pub spend_limit: Option<Option<i64>>,
}

impl Engine {
    /// Add a new tag.
    pub async fn new_tag(
        &self,
        name: &str,
        kind: TagKind,
        icon: &str,
        text_color: &str,
        bg_color: &str,
        spend_limit: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "tag")?;
        if let Some(limit) = spend_limit
            && limit <= 0
        {
            return Err(EngineError::InvalidAmount(
                "spend limit must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let exists = tags::Entity::find()
                .filter(tags::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let tag = Tag::new(
                name,
                kind,
                icon.to_string(),
                text_color.to_string(),
                bg_color.to_string(),
                spend_limit,
                created_at,
            );
            let tag_id = tag.id;
            tags::ActiveModel::from(&tag).insert(&db_tx).await?;
            Ok(tag_id)
        })
    }

    /// Return a tag snapshot.
    pub async fn tag(&self, tag_id: Uuid) -> ResultEngine<Tag> {
        let model = tags::Entity::find_by_id(tag_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("tag not exists".to_string()))?;
        Tag::try_from(model)
    }

    /// Lists tags in insertion order.
    pub async fn list_tags(&self) -> ResultEngine<Vec<Tag>> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Tag::try_from).collect()
    }

    /// Updates tag metadata.
    ///
    /// A tag cannot flip between income and expense once created; callers
    /// wanting that must delete and recreate, which the referenced-by check
    /// below keeps honest.
    pub async fn update_tag(
        &self,
        tag_id: Uuid,
        kind: Option<TagKind>,
        update: TagUpdate,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = tags::Entity::find_by_id(tag_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("tag not exists".to_string()))?;

            if let Some(new_kind) = kind
                && new_kind.as_str() != model.kind
            {
                return Err(EngineError::ImmutableField(
                    "tag kind cannot change after creation".to_string(),
                ));
            }

            let mut active = tags::ActiveModel {
                id: ActiveValue::Set(tag_id.to_string()),
                ..Default::default()
            };
            if let Some(name) = update.name {
                active.name = ActiveValue::Set(normalize_required_name(&name, "tag")?);
            }
            if let Some(icon) = update.icon {
                active.icon = ActiveValue::Set(icon);
            }
            if let Some(text_color) = update.text_color {
                active.text_color = ActiveValue::Set(text_color);
            }
            if let Some(bg_color) = update.bg_color {
                active.bg_color = ActiveValue::Set(bg_color);
            }
            if let Some(limit) = update.spend_limit {
                if let Some(value) = limit
                    && value <= 0
                {
                    return Err(EngineError::InvalidAmount(
                        "spend limit must be > 0".to_string(),
                    ));
                }
                active.spend_limit = ActiveValue::Set(limit);
            }
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a tag, refusing while any transaction still references it.
    pub async fn delete_tag(&self, tag_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = tags::Entity::find_by_id(tag_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("tag not exists".to_string()))?;

            let referencing = transactions::Entity::find()
                .filter(transactions::Column::TagId.eq(tag_id.to_string()))
                .count(&db_tx)
                .await?;
            if referencing > 0 {
                return Err(EngineError::TagInUse(model.name));
            }

            tags::Entity::delete_by_id(tag_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Total expense recorded against a tag.
    ///
    /// Drives the spend-limit warning in the calling layer; informational
    /// only, never part of a ledger invariant.
    pub async fn tag_spent(&self, tag_id: Uuid) -> ResultEngine<i64> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::TagId.eq(tag_id.to_string()))
            .filter(transactions::Column::Kind.eq(crate::TransactionKind::Expense.as_str()))
            .all(&self.database)
            .await?;
        Ok(models.iter().map(|m| m.amount).sum())
    }
}
