use anyhow::{Context, Result};
use recon_engine::{ReconcileEngine, Reconciliation};
use recon_import::{import_bank_file, import_system_file};

use crate::config::RunSettings;
use crate::report::Report;

/// Loads every input file, reconciles, and builds the report. Any file
/// that fails to load aborts the run before matching starts.
pub fn run_reconcile(settings: &RunSettings) -> Result<Report> {
    let result = reconcile_files(settings)?;

    for m in &result.matches {
        tracing::debug!(
            system_id = %m.system.id,
            bank_id = %m.bank.id,
            source = %m.bank.source,
            diff_cents = m.diff_cents,
            "match"
        );
    }
    tracing::info!(
        processed = result.summary.total_processed,
        matched = result.summary.total_matched,
        unmatched = result.summary.total_unmatched,
        "reconciled {}",
        settings.range
    );

    Ok(Report::from(&result))
}

pub fn reconcile_files(settings: &RunSettings) -> Result<Reconciliation> {
    if settings.range.is_empty() {
        tracing::warn!("start date is after end date; nothing will be processed");
    }

    let system = import_system_file(&settings.system, &settings.timezone)
        .with_context(|| format!("loading system transactions from {}", settings.system.display()))?;

    let mut bank = Vec::new();
    for path in &settings.banks {
        let txs = import_bank_file(path)
            .with_context(|| format!("loading bank statement {}", path.display()))?;
        bank.extend(txs);
    }

    tracing::info!(
        system = system.len(),
        bank = bank.len(),
        statements = settings.banks.len(),
        timezone = %settings.timezone,
        "inputs loaded"
    );

    Ok(ReconcileEngine::new(settings.date_window).reconcile(system, bank, settings.range))
}
