use chrono::NaiveDate;
use chrono_tz::Tz;
use recon_core::{BankTransaction, ParseKindError, SystemTransaction, TxKind};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::util::{parse_cents, parse_timestamp};

const SYSTEM_COLUMNS: [&str; 4] = ["trxID", "amount", "type", "transactionTime"];
const BANK_COLUMNS: [&str; 3] = ["unique_identifier", "amount", "date"];

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Invalid date format: {0}")]
    InvalidDate(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    InvalidKind(#[from] ParseKindError),
    #[error("{file}: {source}")]
    InFile {
        file: String,
        #[source]
        source: Box<CsvError>,
    },
}

impl CsvError {
    fn in_file(self, file: &str) -> Self {
        CsvError::InFile {
            file: file.to_string(),
            source: Box::new(self),
        }
    }
}

/// Resolves each required column to its position. Header names compare
/// case-insensitively; unknown columns are ignored.
fn column_positions<const N: usize>(
    headers: &csv::StringRecord,
    required: &[&str; N],
) -> Result<[usize; N], CsvError> {
    let by_name: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    let mut positions = [0usize; N];
    for (slot, name) in positions.iter_mut().zip(required) {
        *slot = *by_name
            .get(&name.to_lowercase())
            .ok_or_else(|| CsvError::MissingColumn(name.to_string()))?;
    }
    Ok(positions)
}

fn reader<R: Read>(data: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data)
}

/// Reads ledger rows. Amount signs are normalized to the row's type and
/// calendar dates are taken in `tz`. The first bad row fails the whole read.
pub fn read_system_csv<R: Read>(data: R, tz: &Tz) -> Result<Vec<SystemTransaction>, CsvError> {
    let mut reader = reader(data);
    let [id_col, amount_col, kind_col, time_col] =
        column_positions(reader.headers()?, &SYSTEM_COLUMNS)?;

    let mut transactions = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = result?;
        let id = record.get(id_col).unwrap_or_default();
        if id.is_empty() {
            skipped += 1;
            continue;
        }

        let amount = parse_cents(record.get(amount_col).unwrap_or_default())?;
        let kind: TxKind = record.get(kind_col).unwrap_or_default().parse()?;
        let timestamp = parse_timestamp(record.get(time_col).unwrap_or_default(), tz)?;

        transactions.push(SystemTransaction::new(id, amount, kind, timestamp));
    }

    tracing::debug!(rows = transactions.len(), skipped, "read system transactions");
    Ok(transactions)
}

/// Reads one bank statement. Amounts keep the sign the bank reported.
pub fn read_bank_csv<R: Read>(data: R, source: &str) -> Result<Vec<BankTransaction>, CsvError> {
    let mut reader = reader(data);
    let [id_col, amount_col, date_col] = column_positions(reader.headers()?, &BANK_COLUMNS)?;

    let mut transactions = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        let record = result?;
        let id = record.get(id_col).unwrap_or_default();
        if id.is_empty() {
            skipped += 1;
            continue;
        }

        let amount = parse_cents(record.get(amount_col).unwrap_or_default())?;
        let raw_date = record.get(date_col).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| CsvError::InvalidDate(raw_date.to_string()))?;

        transactions.push(BankTransaction::new(id, amount, date, source));
    }

    tracing::debug!(source, rows = transactions.len(), skipped, "read bank statement");
    Ok(transactions)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn import_system_file(path: &Path, tz: &Tz) -> Result<Vec<SystemTransaction>, CsvError> {
    let label = file_label(path);
    File::open(path)
        .map_err(CsvError::from)
        .and_then(|file| read_system_csv(file, tz))
        .map_err(|e| e.in_file(&label))
}

/// The file name becomes the source label of every transaction read.
pub fn import_bank_file(path: &Path) -> Result<Vec<BankTransaction>, CsvError> {
    let label = file_label(path);
    File::open(path)
        .map_err(CsvError::from)
        .and_then(|file| read_bank_csv(file, &label))
        .map_err(|e| e.in_file(&label))
}
