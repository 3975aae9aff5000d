//! Tag (category) primitives.
//!
//! A tag labels a transaction and is typed income or expense. Expense tags
//! can carry an optional monthly `spend_limit`; the limit is informational
//! and never affects ledger invariants.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Income,
    Expense,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TagKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid tag kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    /// Immutable after creation.
    pub kind: TagKind,
    pub icon: String,
    pub text_color: String,
    pub bg_color: String,
    /// Monthly spending cap, expense tags only. Informational.
    pub spend_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(
        name: String,
        kind: TagKind,
        icon: String,
        text_color: String,
        bg_color: String,
        spend_limit: Option<i64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            kind,
            icon,
            text_color,
            bg_color,
            spend_limit,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub kind: String,
    pub icon: String,
    pub text_color: String,
    pub bg_color: String,
    pub spend_limit: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tag> for ActiveModel {
    fn from(tag: &Tag) -> Self {
        Self {
            id: ActiveValue::Set(tag.id.to_string()),
            name: ActiveValue::Set(tag.name.clone()),
            kind: ActiveValue::Set(tag.kind.as_str().to_string()),
            icon: ActiveValue::Set(tag.icon.clone()),
            text_color: ActiveValue::Set(tag.text_color.clone()),
            bg_color: ActiveValue::Set(tag.bg_color.clone()),
            spend_limit: ActiveValue::Set(tag.spend_limit),
            created_at: ActiveValue::Set(tag.created_at),
        }
    }
}

impl TryFrom<Model> for Tag {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("tag not exists".to_string()))?,
            name: model.name,
            kind: TagKind::try_from(model.kind.as_str())?,
            icon: model.icon,
            text_color: model.text_color,
            bg_color: model.bg_color,
            spend_limit: model.spend_limit,
            created_at: model.created_at,
        })
    }
}
