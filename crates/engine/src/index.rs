use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use recon_core::{BankTransaction, Sign};

/// Per-source lookup of bank transactions by `(date, sign)`, plus the
/// consumed flags that keep each bank transaction in at most one match.
///
/// Positions are indices into the source's transaction list in the order
/// they were supplied; every other structure refers to transactions by
/// position only.
#[derive(Debug, Clone)]
pub struct BankIndex {
    source: String,
    transactions: Vec<BankTransaction>,
    consumed: Vec<bool>,
    by_date_sign: HashMap<(NaiveDate, Sign), Vec<usize>>,
    /// Earliest and latest date held; `None` when empty.
    span: Option<(NaiveDate, NaiveDate)>,
}

impl BankIndex {
    pub fn new(source: impl Into<String>, transactions: Vec<BankTransaction>) -> Self {
        let mut by_date_sign: HashMap<(NaiveDate, Sign), Vec<usize>> = HashMap::new();
        for (position, tx) in transactions.iter().enumerate() {
            by_date_sign
                .entry((tx.date, Sign::of(tx.amount_cents)))
                .or_default()
                .push(position);
        }
        let span = transactions
            .iter()
            .map(|tx| tx.date)
            .fold(None, |span: Option<(NaiveDate, NaiveDate)>, date| match span {
                Some((first, last)) => Some((first.min(date), last.max(date))),
                None => Some((date, date)),
            });

        Self {
            source: source.into(),
            consumed: vec![false; transactions.len()],
            transactions,
            by_date_sign,
            span,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, position: usize) -> &BankTransaction {
        &self.transactions[position]
    }

    /// Positions dated within `window` days of `date` that carry `sign`.
    ///
    /// Ordered by day offset from `-window` to `+window`, then by insertion
    /// order within a day. Consumed positions are included; callers decide
    /// what to skip. Offsets past the dates the index holds are never
    /// visited.
    pub fn candidates(&self, date: NaiveDate, sign: Sign, window: u32) -> Vec<usize> {
        let Some((first, last)) = self.span else {
            return Vec::new();
        };
        let window = i64::from(window);
        let from = (first - date).num_days().max(-window);
        let to = (last - date).num_days().min(window);

        let mut out = Vec::new();
        for offset in from..=to {
            let Some(day) = date.checked_add_signed(Duration::days(offset)) else {
                continue;
            };
            if let Some(positions) = self.by_date_sign.get(&(day, sign)) {
                out.extend_from_slice(positions);
            }
        }
        out
    }

    pub fn is_consumed(&self, position: usize) -> bool {
        self.consumed[position]
    }

    /// Idempotent.
    pub fn mark_consumed(&mut self, position: usize) {
        self.consumed[position] = true;
    }

    /// Leftover transactions in their original order.
    pub fn unconsumed(&self) -> impl Iterator<Item = &BankTransaction> + '_ {
        self.transactions
            .iter()
            .zip(&self.consumed)
            .filter(|(_, consumed)| !**consumed)
            .map(|(tx, _)| tx)
    }

    pub fn into_unconsumed(self) -> Vec<BankTransaction> {
        self.transactions
            .into_iter()
            .zip(self.consumed)
            .filter_map(|(tx, consumed)| (!consumed).then_some(tx))
            .collect()
    }
}
