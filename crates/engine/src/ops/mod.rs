//! Engine operations.
//!
//! Every write runs inside a single database transaction obtained from
//! [`with_tx!`]: the read-modify-write of wallet totals and the transaction
//! row commit together, so concurrent mutations against the same wallet
//! serialize at the store instead of racing on a shared pre-image.
//! Mutations against different wallets carry no mutual ordering guarantee.

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod events;
mod reconcile;
mod tags;
mod transactions;
mod wallets;

pub use events::TransactionEvent;
pub use reconcile::{ImportReport, SkippedRecord};
pub use tags::TagUpdate;
pub use transactions::{TransactionListFilter, TransferDeletion};
pub use wallets::Overview;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
