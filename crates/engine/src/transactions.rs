//! Transaction primitives.
//!
//! A `Transaction` is a single dated monetary event affecting exactly one
//! wallet. Transfers between wallets are a linked pair of transactions, each
//! carrying the other wallet's id as `peer_wallet_id`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// The kind of the other leg of a transfer pair.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub tag_id: Uuid,
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
    /// Set only on transfer legs: the other wallet of the pair.
    pub peer_wallet_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        wallet_id: Uuid,
        tag_id: Uuid,
        kind: TransactionKind,
        amount: i64,
        description: String,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            wallet_id,
            tag_id,
            kind,
            amount,
            description,
            occurred_at,
            peer_wallet_id: None,
        })
    }

    /// Whether this record is one leg of a wallet-to-wallet transfer.
    #[must_use]
    pub fn is_transfer_leg(&self) -> bool {
        self.peer_wallet_id.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wallet_id: String,
    pub tag_id: String,
    pub kind: String,
    pub amount: i64,
    pub description: String,
    pub occurred_at: DateTimeUtc,
    pub peer_wallet_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
    #[sea_orm(
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tags,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            tag_id: ActiveValue::Set(tx.tag_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount),
            description: ActiveValue::Set(tx.description.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            peer_wallet_id: ActiveValue::Set(tx.peer_wallet_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            wallet_id: Uuid::parse_str(&model.wallet_id)
                .map_err(|_| EngineError::MissingReference("invalid wallet id".to_string()))?,
            tag_id: Uuid::parse_str(&model.tag_id)
                .map_err(|_| EngineError::MissingReference("invalid tag id".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            description: model.description,
            occurred_at: model.occurred_at,
            peer_wallet_id: model
                .peer_wallet_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}
