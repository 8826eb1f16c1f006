use recon_core::{BankTransaction, DateRange, Match, Sign, Summary, SystemTransaction};
use serde::Serialize;

use crate::candidates::{CandidateRef, SourceIndexes};
use crate::summary::{self, UnmatchedBank};

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub summary: Summary,
    pub matches: Vec<Match>,
    /// In input order.
    pub unmatched_system: Vec<SystemTransaction>,
    pub unmatched_bank: UnmatchedBank,
}

/// Pairs system transactions with bank transactions one-to-one.
///
/// For each system transaction, in input order, candidates are bank
/// transactions of the same sign dated within `date_window_days` of it.
/// An exact amount wins immediately; otherwise the smallest absolute
/// difference wins, ties going to the first candidate seen. Each bank
/// transaction is consumed by at most one match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileEngine {
    pub date_window_days: u32,
}

impl ReconcileEngine {
    pub fn new(date_window_days: u32) -> Self {
        Self { date_window_days }
    }

    /// Both sides are restricted to `range` before any matching happens.
    pub fn reconcile(
        &self,
        system: Vec<SystemTransaction>,
        bank: Vec<BankTransaction>,
        range: DateRange,
    ) -> Reconciliation {
        let system: Vec<_> = system
            .into_iter()
            .filter(|tx| range.contains(tx.date))
            .collect();
        let mut sources =
            SourceIndexes::from_transactions(bank.into_iter().filter(|tx| range.contains(tx.date)));

        tracing::debug!(
            system = system.len(),
            sources = sources.len(),
            window = self.date_window_days,
            %range,
            "starting reconciliation"
        );

        let processed = system.len();
        let mut matches = Vec::new();
        let mut unmatched_system = Vec::new();

        for tx in system {
            match self.find_counterpart(&sources, &tx) {
                Some((candidate, diff_cents)) => {
                    sources.mark_consumed(candidate);
                    let bank = sources.get(candidate).clone();
                    tracing::trace!(
                        system_id = %tx.id,
                        bank_id = %bank.id,
                        source = %bank.source,
                        diff_cents,
                        "matched"
                    );
                    matches.push(Match {
                        system: tx,
                        bank,
                        diff_cents,
                    });
                }
                None => unmatched_system.push(tx),
            }
        }

        let unmatched_bank = summary::collect_unmatched_bank(sources);
        let summary = summary::summarize(processed, &matches, &unmatched_system, &unmatched_bank);

        tracing::debug!(
            matched = summary.total_matched,
            unmatched = summary.total_unmatched,
            discrepancy_cents = summary.total_discrepancy_cents,
            "reconciliation finished"
        );

        Reconciliation {
            summary,
            matches,
            unmatched_system,
            unmatched_bank,
        }
    }

    /// Returns the chosen bank transaction and its absolute difference.
    fn find_counterpart(
        &self,
        sources: &SourceIndexes,
        tx: &SystemTransaction,
    ) -> Option<(CandidateRef, i64)> {
        let sign = Sign::of(tx.amount_cents);
        let mut best: Option<(CandidateRef, i64)> = None;

        for (source, positions) in sources.candidates(tx.date, sign, self.date_window_days) {
            let index = sources.index(source);
            for position in positions {
                if index.is_consumed(position) {
                    continue;
                }
                // Same sign on both sides, so the subtraction cannot overflow.
                let diff = (tx.amount_cents - index.get(position).amount_cents).abs();
                let candidate = CandidateRef { source, position };
                if diff == 0 {
                    return Some((candidate, 0));
                }
                if best.map_or(true, |(_, best_diff)| diff < best_diff) {
                    best = Some((candidate, diff));
                }
            }
        }

        best
    }
}

/// One-shot form of [`ReconcileEngine::reconcile`].
pub fn reconcile(
    system: Vec<SystemTransaction>,
    bank: Vec<BankTransaction>,
    range: DateRange,
    date_window_days: u32,
) -> Reconciliation {
    ReconcileEngine::new(date_window_days).reconcile(system, bank, range)
}
