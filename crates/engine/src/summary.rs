use std::collections::BTreeMap;

use recon_core::{BankTransaction, Match, Summary, SystemTransaction};

use crate::candidates::SourceIndexes;

/// Leftover bank transactions keyed by source label. Sources with nothing
/// left over have no entry.
pub type UnmatchedBank = BTreeMap<String, Vec<BankTransaction>>;

/// Sum of absolute differences across all matches, saturating at
/// `i64::MAX`.
pub fn total_discrepancy(matches: &[Match]) -> i64 {
    matches
        .iter()
        .fold(0i64, |total, m| total.saturating_add(m.diff_cents.saturating_abs()))
}

/// Drains every index, keeping the positions no match consumed.
pub fn collect_unmatched_bank(sources: SourceIndexes) -> UnmatchedBank {
    sources
        .into_indexes()
        .into_iter()
        .filter_map(|index| {
            let source = index.source().to_string();
            let leftover = index.into_unconsumed();
            (!leftover.is_empty()).then_some((source, leftover))
        })
        .collect()
}

/// `processed` is the number of system transactions that survived the
/// date-range filter.
pub fn summarize(
    processed: usize,
    matches: &[Match],
    unmatched_system: &[SystemTransaction],
    unmatched_bank: &UnmatchedBank,
) -> Summary {
    let unmatched_bank_count: usize = unmatched_bank.values().map(Vec::len).sum();
    Summary {
        total_processed: processed,
        total_matched: matches.len(),
        total_unmatched: unmatched_system.len() + unmatched_bank_count,
        total_discrepancy_cents: total_discrepancy(matches),
    }
}
