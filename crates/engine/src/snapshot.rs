//! Import/export snapshot types.
//!
//! A [`Snapshot`] is the JSON shape exchanged with the outside world
//! (backup files, paste-in restores). Field names are camelCase so backups
//! exported by older clients import unchanged.
//!
//! Imported records are raw on purpose: amounts arrive as JSON numbers and
//! timestamps in several shapes, and both are normalized exactly once here
//! before anything touches the store.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, Tag, Transaction, Wallet};

/// Full `(wallets, tags, transactions)` snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub wallets: Vec<RawWallet>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWallet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub initial_balance: Option<f64>,
    // Derived fields are accepted for round-trip compatibility but never
    // trusted: totals are recomputed from the transaction set on import.
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub total_income: Option<f64>,
    #[serde(default)]
    pub total_expense: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTag {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub bg_color: String,
    #[serde(default)]
    pub limit: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub id: String,
    pub wallet_id: String,
    pub tag_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    #[serde(default)]
    pub source_wallet_id: Option<String>,
}

/// Timestamps arrive as an RFC 3339 string, an epoch
/// `{seconds, nanoseconds}` pair, or epoch milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Text(String),
    Pair { seconds: i64, nanoseconds: u32 },
    Millis(i64),
}

impl RawTimestamp {
    /// Normalizes to the single internal representation.
    pub fn normalize(&self) -> ResultEngine<DateTime<Utc>> {
        match self {
            RawTimestamp::Text(text) => text
                .parse::<DateTime<Utc>>()
                .map_err(|_| EngineError::InvalidDate(format!("unparseable date: {text}"))),
            RawTimestamp::Pair {
                seconds,
                nanoseconds,
            } => Utc
                .timestamp_opt(*seconds, *nanoseconds)
                .single()
                .ok_or_else(|| {
                    EngineError::InvalidDate(format!(
                        "epoch pair out of range: {seconds}s {nanoseconds}ns"
                    ))
                }),
            RawTimestamp::Millis(millis) => Utc
                .timestamp_millis_opt(*millis)
                .single()
                .ok_or_else(|| {
                    EngineError::InvalidDate(format!("epoch millis out of range: {millis}"))
                }),
        }
    }
}

/// Validates a JSON amount and converts it to whole currency units.
///
/// Rejects missing, non-finite and non-positive values with
/// [`EngineError::InvalidAmount`] instead of letting them reach the totals.
pub fn normalize_amount(raw: Option<f64>) -> ResultEngine<i64> {
    let value = raw.ok_or_else(|| EngineError::InvalidAmount("missing amount".to_string()))?;
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount(
            "amount is not a finite number".to_string(),
        ));
    }
    if value.fract() != 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be a whole number of currency units: {value}"
        )));
    }
    if value <= 0.0 || value > i64::MAX as f64 {
        return Err(EngineError::InvalidAmount(format!(
            "amount out of range: {value}"
        )));
    }
    Ok(value as i64)
}

/// Like [`normalize_amount`] but tolerates absence (initial balances may be
/// missing or zero in old exports) and allows negative baselines.
pub fn normalize_baseline(raw: Option<f64>) -> ResultEngine<i64> {
    let Some(value) = raw else { return Ok(0) };
    if !value.is_finite() {
        return Err(EngineError::InvalidAmount(
            "initial balance is not a finite number".to_string(),
        ));
    }
    if value.fract() != 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "initial balance must be a whole number of currency units: {value}"
        )));
    }
    Ok(value as i64)
}

impl From<&Wallet> for RawWallet {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: wallet.id.to_string(),
            name: wallet.name.clone(),
            initial_balance: Some(wallet.initial_balance as f64),
            balance: Some(wallet.balance as f64),
            total_income: Some(wallet.total_income as f64),
            total_expense: Some(wallet.total_expense as f64),
        }
    }
}

impl From<&Tag> for RawTag {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name.clone(),
            kind: tag.kind.as_str().to_string(),
            icon: tag.icon.clone(),
            text_color: tag.text_color.clone(),
            bg_color: tag.bg_color.clone(),
            limit: tag.spend_limit.map(|v| v as f64),
        }
    }
}

impl From<&Transaction> for RawTransaction {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            wallet_id: tx.wallet_id.to_string(),
            tag_id: tx.tag_id.to_string(),
            kind: tx.kind.as_str().to_string(),
            amount: Some(tx.amount as f64),
            description: tx.description.clone(),
            created_at: Some(RawTimestamp::Text(tx.occurred_at.to_rfc3339())),
            source_wallet_id: tx.peer_wallet_id.map(|id| id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_rfc3339_text() {
        let ts = RawTimestamp::Text("2024-03-01T12:00:00Z".to_string());
        let parsed = ts.normalize().unwrap();
        assert_eq!(parsed.timestamp(), 1_709_294_400);
    }

    #[test]
    fn normalizes_epoch_pair() {
        let ts = RawTimestamp::Pair {
            seconds: 1_700_000_000,
            nanoseconds: 500,
        };
        assert_eq!(ts.normalize().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn normalizes_epoch_millis() {
        let ts = RawTimestamp::Millis(1_700_000_000_000);
        assert_eq!(ts.normalize().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn rejects_garbage_dates() {
        let err = RawTimestamp::Text("not-a-date".to_string())
            .normalize()
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
    }

    #[test]
    fn untagged_timestamp_deserializes_all_shapes() {
        let text: RawTimestamp = serde_json::from_str(r#""2024-03-01T12:00:00Z""#).unwrap();
        assert!(matches!(text, RawTimestamp::Text(_)));

        let pair: RawTimestamp =
            serde_json::from_str(r#"{"seconds": 1700000000, "nanoseconds": 0}"#).unwrap();
        assert!(matches!(pair, RawTimestamp::Pair { .. }));

        let millis: RawTimestamp = serde_json::from_str("1700000000000").unwrap();
        assert!(matches!(millis, RawTimestamp::Millis(_)));
    }

    #[test]
    fn amount_validation() {
        assert_eq!(normalize_amount(Some(50_000.0)).unwrap(), 50_000);
        assert!(normalize_amount(None).is_err());
        assert!(normalize_amount(Some(0.0)).is_err());
        assert!(normalize_amount(Some(-10.0)).is_err());
        assert!(normalize_amount(Some(f64::NAN)).is_err());
        assert!(normalize_amount(Some(f64::INFINITY)).is_err());
        assert!(normalize_amount(Some(10.5)).is_err());
    }

    #[test]
    fn baseline_tolerates_missing_and_negative() {
        assert_eq!(normalize_baseline(None).unwrap(), 0);
        assert_eq!(normalize_baseline(Some(-2_000.0)).unwrap(), -2_000);
        assert!(normalize_baseline(Some(f64::NAN)).is_err());
    }
}
