use recon_core::{BankTransaction, Money, SystemTransaction};
use recon_engine::Reconciliation;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemTxOut {
    #[serde(rename = "trxID")]
    pub trx_id: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
}

impl From<&SystemTransaction> for SystemTxOut {
    fn from(tx: &SystemTransaction) -> Self {
        Self {
            trx_id: tx.id.clone(),
            amount: Money::from_cents(tx.amount_cents).to_string(),
            kind: tx.kind.to_string(),
            date: tx.date.format(DATE_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankTxOut {
    pub unique_identifier: String,
    pub amount: String,
    pub date: String,
}

impl From<&BankTransaction> for BankTxOut {
    fn from(tx: &BankTransaction) -> Self {
        Self {
            unique_identifier: tx.id.clone(),
            amount: Money::from_cents(tx.amount_cents).to_string(),
            date: tx.date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// The discrepancy report written at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub total_processed: usize,
    pub total_matched: usize,
    pub total_unmatched: usize,
    pub unmatched_system: Vec<SystemTxOut>,
    pub unmatched_bank: BTreeMap<String, Vec<BankTxOut>>,
    pub total_discrepancy: String,
}

impl From<&Reconciliation> for Report {
    fn from(result: &Reconciliation) -> Self {
        let summary = &result.summary;
        Self {
            total_processed: summary.total_processed,
            total_matched: summary.total_matched,
            total_unmatched: summary.total_unmatched,
            unmatched_system: result.unmatched_system.iter().map(SystemTxOut::from).collect(),
            unmatched_bank: result
                .unmatched_bank
                .iter()
                .map(|(source, txs)| (source.clone(), txs.iter().map(BankTxOut::from).collect()))
                .collect(),
            total_discrepancy: Money::from_cents(summary.total_discrepancy_cents).to_string(),
        }
    }
}

impl Report {
    /// Pretty JSON with single-space indentation and a trailing newline.
    pub fn write_json<W: Write>(&self, mut writer: W) -> serde_json::Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut writer, formatter);
        self.serialize(&mut ser)?;
        writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}
