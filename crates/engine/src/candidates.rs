use std::collections::BTreeMap;

use chrono::NaiveDate;
use recon_core::{BankTransaction, Sign};

use crate::index::BankIndex;

/// Address of one bank transaction: which source, and where in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateRef {
    pub source: usize,
    pub position: usize,
}

/// One [`BankIndex`] per bank source, ordered by source label.
///
/// Scanning in label order makes the exact-match short-circuit
/// reproducible: when two sources hold an equal-amount candidate for the
/// same system transaction, the lexicographically first source wins.
#[derive(Debug, Clone, Default)]
pub struct SourceIndexes {
    indexes: Vec<BankIndex>,
}

impl SourceIndexes {
    /// Groups transactions by `source`, keeping per-source input order.
    pub fn from_transactions(transactions: impl IntoIterator<Item = BankTransaction>) -> Self {
        let mut groups: BTreeMap<String, Vec<BankTransaction>> = BTreeMap::new();
        for tx in transactions {
            groups.entry(tx.source.clone()).or_default().push(tx);
        }

        Self {
            indexes: groups
                .into_iter()
                .map(|(source, txs)| BankIndex::new(source, txs))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn index(&self, source: usize) -> &BankIndex {
        &self.indexes[source]
    }

    pub fn get(&self, candidate: CandidateRef) -> &BankTransaction {
        self.indexes[candidate.source].get(candidate.position)
    }

    pub fn is_consumed(&self, candidate: CandidateRef) -> bool {
        self.indexes[candidate.source].is_consumed(candidate.position)
    }

    pub fn mark_consumed(&mut self, candidate: CandidateRef) {
        self.indexes[candidate.source].mark_consumed(candidate.position);
    }

    /// Per-source candidate positions for a system transaction dated `date`
    /// with direction `sign`. Lazy, so a caller that stops early never
    /// queries the remaining sources. Consumed positions are not filtered.
    pub fn candidates(
        &self,
        date: NaiveDate,
        sign: Sign,
        window: u32,
    ) -> impl Iterator<Item = (usize, Vec<usize>)> + '_ {
        self.indexes
            .iter()
            .enumerate()
            .map(move |(source, index)| (source, index.candidates(date, sign, window)))
    }

    pub fn into_indexes(self) -> Vec<BankIndex> {
        self.indexes
    }
}
