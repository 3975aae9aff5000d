//! Wallet totals projector.
//!
//! One algorithm decides how a transaction write changes wallet totals.
//! Every write path (request handlers, write events, reconciliation) goes
//! through [`wallet_deltas`]; no call site carries its own copy of the
//! arithmetic.

use uuid::Uuid;

use crate::{Delta, EngineError, ResultEngine, Transaction, wallets};

/// A wallet's derived totals, normalized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalletTotals {
    pub balance: i64,
    pub total_income: i64,
    pub total_expense: i64,
}

impl WalletTotals {
    /// Totals of a wallet with no transactions yet.
    #[must_use]
    pub fn opening(initial_balance: i64) -> Self {
        Self {
            balance: initial_balance,
            total_income: 0,
            total_expense: 0,
        }
    }

    /// The single normalization point for rows that predate a derived
    /// column: missing `balance` falls back to `initial_balance`, missing
    /// totals fall back to 0. Every read of wallet totals goes through
    /// here so call sites cannot diverge.
    #[must_use]
    pub fn from_model(model: &wallets::Model) -> Self {
        Self {
            balance: model.balance.unwrap_or(model.initial_balance),
            total_income: model.total_income.unwrap_or(0),
            total_expense: model.total_expense.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn apply(self, delta: Delta) -> Self {
        Self {
            balance: self.balance + delta.balance,
            total_income: self.total_income + delta.income,
            total_expense: self.total_expense + delta.expense,
        }
    }
}

/// A committed-or-pending transaction write, as seen by the projector.
///
/// `Update` carries the pre-update snapshot; the caller that cannot produce
/// one must re-fetch instead of guessing: a missing prior is an error, not
/// a silent no-op.
#[derive(Clone, Copy, Debug)]
pub enum TransactionWrite<'a> {
    Create {
        new: &'a Transaction,
    },
    Update {
        prior: Option<&'a Transaction>,
        new: &'a Transaction,
    },
    Delete {
        prior: &'a Transaction,
    },
}

/// Computes the per-wallet deltas implied by a transaction write.
///
/// - create: `+delta(new)` against `new.wallet_id`
/// - delete: `-delta(prior)` against `prior.wallet_id`
/// - update, same wallet: `delta(new) - delta(prior)` (revert then apply)
/// - update, wallet changed: decomposed into a delete against the old
///   wallet and a create against the new one, never a single cross-wallet
///   projection
pub fn wallet_deltas(write: &TransactionWrite<'_>) -> ResultEngine<Vec<(Uuid, Delta)>> {
    match write {
        TransactionWrite::Create { new } => {
            Ok(vec![(new.wallet_id, Delta::of(new.kind, new.amount)?)])
        }
        TransactionWrite::Delete { prior } => {
            Ok(vec![(prior.wallet_id, -Delta::of(prior.kind, prior.amount)?)])
        }
        TransactionWrite::Update { prior, new } => {
            let prior = prior.ok_or_else(|| {
                EngineError::MissingPriorState(format!(
                    "update of transaction {} without pre-update snapshot",
                    new.id
                ))
            })?;
            let revert = -Delta::of(prior.kind, prior.amount)?;
            let apply = Delta::of(new.kind, new.amount)?;
            if prior.wallet_id == new.wallet_id {
                Ok(vec![(new.wallet_id, revert.combined(apply))])
            } else {
                Ok(vec![(prior.wallet_id, revert), (new.wallet_id, apply)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::TransactionKind;

    use super::*;

    fn tx(wallet_id: Uuid, kind: TransactionKind, amount: i64) -> Transaction {
        Transaction::new(
            wallet_id,
            Uuid::new_v4(),
            kind,
            amount,
            String::from("test"),
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn create_projects_single_delta() {
        let wallet = Uuid::new_v4();
        let new = tx(wallet, TransactionKind::Expense, 50_000);
        let deltas = wallet_deltas(&TransactionWrite::Create { new: &new }).unwrap();
        assert_eq!(deltas, vec![(
            wallet,
            Delta {
                balance: -50_000,
                income: 0,
                expense: 50_000
            }
        )]);
    }

    #[test]
    fn same_wallet_update_reverts_then_applies() {
        let wallet = Uuid::new_v4();
        let prior = tx(wallet, TransactionKind::Expense, 50_000);
        let mut new = prior.clone();
        new.amount = 80_000;

        let deltas = wallet_deltas(&TransactionWrite::Update {
            prior: Some(&prior),
            new: &new,
        })
        .unwrap();
        assert_eq!(deltas, vec![(
            wallet,
            Delta {
                balance: -30_000,
                income: 0,
                expense: 30_000
            }
        )]);
    }

    #[test]
    fn cross_wallet_update_decomposes_into_delete_and_create() {
        let old_wallet = Uuid::new_v4();
        let new_wallet = Uuid::new_v4();
        let prior = tx(old_wallet, TransactionKind::Income, 1_000);
        let mut new = prior.clone();
        new.wallet_id = new_wallet;
        new.amount = 2_500;

        let deltas = wallet_deltas(&TransactionWrite::Update {
            prior: Some(&prior),
            new: &new,
        })
        .unwrap();

        let delete = wallet_deltas(&TransactionWrite::Delete { prior: &prior }).unwrap();
        let create = wallet_deltas(&TransactionWrite::Create { new: &new }).unwrap();
        assert_eq!(deltas, [delete, create].concat());
    }

    #[test]
    fn update_without_prior_is_an_error() {
        let new = tx(Uuid::new_v4(), TransactionKind::Income, 10);
        let err = wallet_deltas(&TransactionWrite::Update {
            prior: None,
            new: &new,
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::MissingPriorState(_)));
    }

    #[test]
    fn totals_identity_survives_apply() {
        let totals = WalletTotals::opening(5_000_000);
        let spend = Delta::of(TransactionKind::Expense, 50_000).unwrap();
        let after = totals.apply(spend);
        assert_eq!(after.balance, 4_950_000);
        assert_eq!(after.total_expense, 50_000);
        assert_eq!(
            after.balance,
            5_000_000 + after.total_income - after.total_expense
        );
    }
}
