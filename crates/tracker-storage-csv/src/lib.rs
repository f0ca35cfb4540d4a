use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use tracker_core::{CoreError, LedgerStorage};
use tracker_domain::{
    format_timestamp, parse_timestamp, DomainError, LedgerSnapshot, Money, RecordKind,
    Transaction,
};

/// Column order of the data file.
pub const HEADER: [&str; 5] = ["type", "category", "amount", "timestamp", "comment"];
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {reason}")]
    Row { line: u64, reason: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StorageError {
    fn row(line: u64, reason: impl Into<String>) -> Self {
        StorageError::Row {
            line,
            reason: reason.into(),
        }
    }

    fn into_read(self, path: &Path) -> CoreError {
        CoreError::PersistenceRead(format!("{}: {}", path.display(), self))
    }

    fn into_write(self, path: &Path) -> CoreError {
        CoreError::PersistenceWrite(format!("{}: {}", path.display(), self))
    }
}

/// Filesystem-backed CSV persistence for a single ledger file.
#[derive(Debug, Clone)]
pub struct CsvLedgerStorage {
    path: PathBuf,
}

impl CsvLedgerStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStorage for CsvLedgerStorage {
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<(), CoreError> {
        save_snapshot_to_path(snapshot, &self.path).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "csv save failed");
            err.into_write(&self.path)
        })
    }

    fn load(&self) -> Result<LedgerSnapshot, CoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file yet; starting empty");
            return Ok(LedgerSnapshot::default());
        }
        load_snapshot_from_path(&self.path).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "csv load failed");
            err.into_read(&self.path)
        })
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    category: &'a str,
    amount: String,
    timestamp: String,
    comment: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(txn: &'a Transaction) -> Self {
        CsvRow {
            kind: txn.kind.as_str(),
            category: &txn.category,
            amount: txn.amount.to_string(),
            timestamp: format_timestamp(txn.timestamp),
            comment: &txn.comment,
        }
    }
}

/// Writes the full snapshot to `path`, staging through a sibling tmp file.
pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_rows(&tmp, snapshot)?;
    fs::rename(&tmp, path)?;
    debug!(
        path = %path.display(),
        rows = snapshot.income.len() + snapshot.spending.len(),
        "csv written"
    );
    Ok(())
}

/// Reads every row of `path`. Any malformed row fails the whole load.
pub fn load_snapshot_from_path(path: &Path) -> Result<LedgerSnapshot, StorageError> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(StorageError::row(1, "missing header"));
    }
    if headers.iter().map(str::trim).ne(HEADER.iter().copied()) {
        return Err(StorageError::row(
            1,
            format!("unexpected header `{}`", headers.iter().collect::<Vec<_>>().join(",")),
        ));
    }

    let mut rows = Vec::new();
    let (mut income, mut spending) = (Money::ZERO, Money::ZERO);
    for result in reader.records() {
        let record = result.map_err(|err| match err.position() {
            Some(position) => StorageError::row(position.line(), err.to_string()),
            None => StorageError::Csv(err),
        })?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let txn = parse_row(&record).map_err(|reason| StorageError::row(line, reason))?;

        let total = match txn.kind {
            RecordKind::Income => &mut income,
            RecordKind::Spending => &mut spending,
        };
        let overflow = DomainError::TotalOverflow(txn.kind);
        *total = total
            .checked_add(txn.amount)
            .ok_or_else(|| StorageError::row(line, overflow.to_string()))?;
        rows.push(txn);
    }
    Ok(LedgerSnapshot::from_transactions(rows)?)
}

fn write_rows(path: &Path, snapshot: &LedgerSnapshot) -> Result<(), StorageError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(File::create(path)?);
    writer.write_record(HEADER)?;
    for txn in snapshot.rows() {
        writer.serialize(CsvRow::from(txn))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_row(record: &StringRecord) -> Result<Transaction, String> {
    let field = |index: usize| record.get(index).map(str::trim).unwrap_or("");
    let required = |index: usize| {
        let value = field(index);
        if value.is_empty() {
            Err(format!("missing `{}`", HEADER[index]))
        } else {
            Ok(value)
        }
    };

    let kind = if required(0)? == RecordKind::Income.as_str() {
        RecordKind::Income
    } else {
        RecordKind::Spending
    };
    let category = required(1)?;
    let amount = Money::parse_rounded(required(2)?).map_err(|err| format!("amount: {err}"))?;
    if !amount.is_positive() {
        return Err(format!("amount {amount} must be greater than zero"));
    }
    let timestamp = parse_timestamp(required(3)?).map_err(|err| err.to_string())?;
    Ok(Transaction::new(kind, category, amount, timestamp, field(4)))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
