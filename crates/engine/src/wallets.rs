//! The module contains the `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, projector::WalletTotals};

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money is kept. `balance`, `total_income` and `total_expense`
/// are derived from the transactions referencing the wallet and are only
/// ever mutated through the totals projector or bulk reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable identifier, generated once and persisted, so the wallet can be
    /// renamed without breaking references.
    pub id: Uuid,
    pub name: String,
    /// Baseline set at creation, immutable thereafter.
    pub initial_balance: i64,
    pub balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(name: String, initial_balance: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            initial_balance,
            balance: initial_balance,
            total_income: 0,
            total_expense: 0,
            created_at,
        }
    }

    pub fn totals(&self) -> WalletTotals {
        WalletTotals {
            balance: self.balance,
            total_income: self.total_income,
            total_expense: self.total_expense,
        }
    }

    /// `balance == initial_balance + total_income - total_expense`.
    #[must_use]
    pub fn holds_identity(&self) -> bool {
        self.balance == self.initial_balance + self.total_income - self.total_expense
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub initial_balance: i64,
    // Derived columns are nullable: wallet rows written before a field
    // existed are normalized on read (see `WalletTotals::from_model`).
    pub balance: Option<i64>,
    pub total_income: Option<i64>,
    pub total_expense: Option<i64>,
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

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            initial_balance: ActiveValue::Set(value.initial_balance),
            balance: ActiveValue::Set(Some(value.balance)),
            total_income: ActiveValue::Set(Some(value.total_income)),
            total_expense: ActiveValue::Set(Some(value.total_expense)),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let totals = WalletTotals::from_model(&model);
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("wallet not exists".to_string()))?,
            name: model.name,
            initial_balance: model.initial_balance,
            balance: totals.balance,
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            created_at: model.created_at,
        })
    }
}
