//! Serde types shared between the HTTP server and its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// Canonical string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        #[serde(default)]
        pub initial_balance: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub initial_balance: i64,
        pub balance: i64,
        pub total_income: i64,
        pub total_expense: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Overview {
        pub balance: i64,
        pub total_income: i64,
        pub total_expense: i64,
    }
}

pub mod tag {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagNew {
        pub name: String,
        pub kind: Kind,
        #[serde(default)]
        pub icon: String,
        #[serde(default)]
        pub text_color: String,
        #[serde(default)]
        pub bg_color: String,
        pub spend_limit: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagCreated {
        pub id: Uuid,
    }

    /// Patch body for a tag. `kind` is accepted but must match the stored
    /// value; tags cannot flip between income and expense.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TagUpdate {
        pub kind: Option<Kind>,
        pub name: Option<String>,
        pub icon: Option<String>,
        pub text_color: Option<String>,
        pub bg_color: Option<String>,
        #[serde(default, with = "double_option")]
        pub spend_limit: Option<Option<i64>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagView {
        pub id: Uuid,
        pub name: String,
        pub kind: Kind,
        pub icon: String,
        pub text_color: String,
        pub bg_color: String,
        pub spend_limit: Option<i64>,
        /// Total expense recorded against this tag.
        pub spent: i64,
    }

    /// Distinguishes an absent `spendLimit` key (keep) from an explicit
    /// `null` (clear).
    mod double_option {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            T: Serialize,
        {
            match value {
                None => serializer.serialize_none(),
                Some(inner) => inner.serialize(serializer),
            }
        }

        pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
        where
            D: Deserializer<'de>,
            T: Deserialize<'de>,
        {
            Option::<T>::deserialize(deserializer).map(Some)
        }
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub wallet_id: Uuid,
        pub tag_id: Uuid,
        pub kind: Kind,
        pub amount: i64,
        #[serde(default)]
        pub description: String,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    /// Patch body for a transaction. `kind` and `wallet_id` are rejected
    /// with an immutable-field error when they differ from the stored
    /// record; wallet reassignment is a delete+create.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<Kind>,
        pub wallet_id: Option<Uuid>,
        pub amount: Option<i64>,
        pub description: Option<String>,
        pub tag_id: Option<Uuid>,
        pub occurred_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub tag_id: Uuid,
        pub kind: Kind,
        pub amount: i64,
        pub description: String,
        pub occurred_at: DateTime<Utc>,
        pub peer_wallet_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub wallet_id: Option<Uuid>,
        pub tag_id: Option<Uuid>,
        pub kind: Option<Kind>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionDeleted {
        /// False when the id was already gone (idempotent delete).
        pub removed: bool,
    }
}

pub mod transfer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub amount: i64,
        pub source_wallet_id: Uuid,
        pub destination_wallet_id: Uuid,
        pub expense_tag_id: Uuid,
        pub income_tag_id: Uuid,
        #[serde(default)]
        pub description: String,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferCreated {
        pub expense_id: Uuid,
        pub income_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferDeleted {
        pub deleted: Vec<Uuid>,
        /// The pair leg could not be found; the found leg was still
        /// deleted and its wallet reverted.
        pub orphaned: bool,
    }
}

pub mod maintenance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportReport {
        pub wallets: usize,
        pub tags: usize,
        pub transactions: usize,
        pub skipped: Vec<SkippedRecord>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SkippedRecord {
        pub label: String,
        pub reason: String,
    }
}
