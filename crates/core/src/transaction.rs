use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Credit,
    Debit,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Credit => write!(f, "CREDIT"),
            TxKind::Debit => write!(f, "DEBIT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown transaction type: '{0}'")]
pub struct ParseKindError(pub String);

impl FromStr for TxKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREDIT" => Ok(TxKind::Credit),
            "DEBIT" => Ok(TxKind::Debit),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

impl TxKind {
    /// Forces `amount_cents` onto the side of zero this kind lives on.
    pub fn normalize(self, amount_cents: i64) -> i64 {
        match self {
            TxKind::Credit => amount_cents.saturating_abs(),
            TxKind::Debit => -amount_cents.saturating_abs(),
        }
    }
}

/// Direction of money movement. Zero counts as positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn of(amount_cents: i64) -> Self {
        if amount_cents < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }
}

/// A ledger record from the internal transaction system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemTransaction {
    pub id: String,
    /// Credits are stored non-negative, debits non-positive.
    pub amount_cents: i64,
    pub kind: TxKind,
    /// Already localized to the run's timezone.
    pub timestamp: DateTime<FixedOffset>,
    pub date: NaiveDate,
}

impl SystemTransaction {
    /// Normalizes the amount sign to `kind` and derives the calendar date
    /// from the timestamp's own offset.
    pub fn new(
        id: impl Into<String>,
        amount_cents: i64,
        kind: TxKind,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        SystemTransaction {
            id: id.into(),
            amount_cents: kind.normalize(amount_cents),
            kind,
            date: timestamp.date_naive(),
            timestamp,
        }
    }
}

/// A record from an external bank statement feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: String,
    pub amount_cents: i64,
    pub date: NaiveDate,
    /// Statement file (or feed) the record came from.
    pub source: String,
}

impl BankTransaction {
    pub fn new(
        id: impl Into<String>,
        amount_cents: i64,
        date: NaiveDate,
        source: impl Into<String>,
    ) -> Self {
        BankTransaction {
            id: id.into(),
            amount_cents,
            date,
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub system: SystemTransaction,
    pub bank: BankTransaction,
    /// Absolute amount difference; zero for exact matches.
    pub diff_cents: i64,
}

impl Match {
    pub fn is_exact(&self) -> bool {
        self.diff_cents == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_processed: usize,
    pub total_matched: usize,
    pub total_unmatched: usize,
    pub total_discrepancy_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(offset_hours: i32, y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
    }

    #[test]
    fn kind_display() {
        assert_eq!(TxKind::Credit.to_string(), "CREDIT");
        assert_eq!(TxKind::Debit.to_string(), "DEBIT");
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!("credit".parse::<TxKind>().unwrap(), TxKind::Credit);
        assert_eq!(" Debit ".parse::<TxKind>().unwrap(), TxKind::Debit);
        assert_eq!(
            "REFUND".parse::<TxKind>(),
            Err(ParseKindError("REFUND".to_string()))
        );
    }

    #[test]
    fn sign_of_zero_is_positive() {
        assert_eq!(Sign::of(0), Sign::Positive);
        assert_eq!(Sign::of(1), Sign::Positive);
        assert_eq!(Sign::of(-1), Sign::Negative);
    }

    #[test]
    fn system_transaction_normalizes_sign_to_kind() {
        let debit = SystemTransaction::new("S1", 5000, TxKind::Debit, ts(0, 2025, 1, 2, 10));
        assert_eq!(debit.amount_cents, -5000);
        let credit = SystemTransaction::new("S2", -5000, TxKind::Credit, ts(0, 2025, 1, 2, 10));
        assert_eq!(credit.amount_cents, 5000);
        let zero = SystemTransaction::new("S3", 0, TxKind::Debit, ts(0, 2025, 1, 2, 10));
        assert_eq!(zero.amount_cents, 0);
    }

    #[test]
    fn system_transaction_date_follows_local_offset() {
        // 23:00 on Jan 2 at +07:00 is still Jan 2 locally.
        let tx = SystemTransaction::new("S1", 100, TxKind::Credit, ts(7, 2025, 1, 2, 23));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    }

    #[test]
    fn match_is_exact() {
        let system = SystemTransaction::new("S1", 100, TxKind::Credit, ts(0, 2025, 1, 2, 0));
        let bank = BankTransaction::new("B1", 100, system.date, "bank.csv");
        let m = Match { system, bank, diff_cents: 0 };
        assert!(m.is_exact());
    }

    #[test]
    fn summary_serializes_snake_case_fields() {
        let json = serde_json::to_value(Summary::default()).unwrap();
        assert_eq!(json["total_discrepancy_cents"], 0);
        assert_eq!(json["total_processed"], 0);
    }
}
