//! Command structs for engine write operations.
//!
//! These types group parameters for writes (create/update/transfer), keeping
//! call sites readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::TransactionKind;

/// Create a single income or expense transaction.
#[derive(Clone, Debug)]
pub struct TransactionNewCmd {
    pub wallet_id: Uuid,
    pub tag_id: Uuid,
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl TransactionNewCmd {
    #[must_use]
    pub fn new(
        wallet_id: Uuid,
        tag_id: Uuid,
        kind: TransactionKind,
        amount: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            wallet_id,
            tag_id,
            kind,
            amount,
            description: String::new(),
            occurred_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Update an existing transaction in place.
///
/// `kind` and `wallet_id` are intentionally absent: they are immutable via
/// plain update. Wallet reassignment goes through delete+create (see the
/// trigger layer), never through this command.
#[derive(Clone, Debug, Default)]
pub struct TransactionUpdateCmd {
    pub amount: Option<i64>,
    pub description: Option<String>,
    pub tag_id: Option<Uuid>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl TransactionUpdateCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tag_id(mut self, tag_id: Uuid) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}

/// Create a wallet-to-wallet transfer (a linked expense/income pair).
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub amount: i64,
    pub source_wallet_id: Uuid,
    pub destination_wallet_id: Uuid,
    /// Tag for the expense leg recorded in the source wallet.
    pub expense_tag_id: Uuid,
    /// Tag for the income leg recorded in the destination wallet.
    pub income_tag_id: Uuid,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        amount: i64,
        source_wallet_id: Uuid,
        destination_wallet_id: Uuid,
        expense_tag_id: Uuid,
        income_tag_id: Uuid,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            source_wallet_id,
            destination_wallet_id,
            expense_tag_id,
            income_tag_id,
            description: String::new(),
            occurred_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
