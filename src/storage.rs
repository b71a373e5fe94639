// 💾 CSV Persistence - Date,Account,Debit,Credit,Description
//
// Load parses the whole file before handing anything back, so a failed load
// never leaves a half-replaced log. Bad rows are skipped and reported; rows
// with the wrong number of fields are skipped silently.
//
// Save writes a sibling temp file and renames it over the target, so a
// failed save never leaves a truncated file behind.

use crate::error::{Result, ValidationError};
use crate::transaction::Transaction;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 5] = ["Date", "Account", "Debit", "Credit", "Description"];

// ============================================================================
// LOAD REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowIssueKind {
    /// Debit or credit is not a number
    NonNumeric { field: String, value: String },
    /// Parsed, but the same validation as `append` refused it
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    /// 1-based line in the file, header included
    pub line: u64,
    pub kind: RowIssueKind,
    pub record: Vec<String>,
}

impl RowIssue {
    pub fn message(&self) -> String {
        match &self.kind {
            RowIssueKind::NonNumeric { field, value } => format!(
                "line {}: invalid numeric data in {} column: {:?}",
                self.line, field, value
            ),
            RowIssueKind::Rejected(reason) => {
                format!("line {}: transaction rejected: {}", self.line, reason)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    /// Skipped rows the caller should hear about
    pub issues: Vec<RowIssue>,
    /// Rows skipped without a warning (field count other than 5)
    pub ignored: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.ignored == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} transactions loaded, {} rows skipped with warnings, {} malformed rows ignored",
            self.loaded,
            self.issues.len(),
            self.ignored
        )
    }
}

// ============================================================================
// READ
// ============================================================================

fn parse_amount(field: &str, value: &str) -> std::result::Result<f64, RowIssueKind> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RowIssueKind::NonNumeric {
            field: field.to_string(),
            value: value.to_string(),
        })
}

fn parse_record(record: &csv::StringRecord) -> std::result::Result<Transaction, RowIssueKind> {
    let debit = parse_amount("Debit", &record[2])?;
    let credit = parse_amount("Credit", &record[3])?;

    Transaction::new(&record[0], &record[1], debit, credit, &record[4])
        .map_err(|e: ValidationError| RowIssueKind::Rejected(e.to_string()))
}

/// Parse transactions from any reader. The first row is always treated as
/// the header and skipped.
pub fn read_transactions<R: Read>(reader: R) -> Result<(Vec<Transaction>, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut transactions = Vec::new();
    let mut report = LoadReport::default();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != HEADER.len() {
            tracing::debug!(line, fields = record.len(), "ignoring row with wrong field count");
            report.ignored += 1;
            continue;
        }

        match parse_record(&record) {
            Ok(tx) => transactions.push(tx),
            Err(kind) => {
                let issue = RowIssue {
                    line,
                    kind,
                    record: record.iter().map(str::to_string).collect(),
                };
                tracing::warn!("{}", issue.message());
                report.issues.push(issue);
            }
        }
    }

    report.loaded = transactions.len();
    Ok((transactions, report))
}

pub fn load_csv(path: &Path) -> Result<(Vec<Transaction>, LoadReport)> {
    let file = File::open(path)?;
    let (transactions, report) = read_transactions(file)?;

    tracing::info!(path = %path.display(), "{}", report.summary());
    Ok((transactions, report))
}

// ============================================================================
// WRITE
// ============================================================================

pub fn write_transactions<'a, W, I>(writer: W, transactions: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    // Written explicitly so an empty ledger still gets its header row
    wtr.write_record(HEADER)?;

    for tx in transactions {
        wtr.write_record([
            tx.date().to_string(),
            tx.account().to_string(),
            tx.debit().to_string(),
            tx.credit().to_string(),
            tx.description().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ledger.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn save_csv<'a, I>(path: &Path, transactions: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let tmp = temp_path(path);
    let transactions: Vec<&Transaction> = transactions.into_iter().collect();

    let written = (|| -> Result<()> {
        let mut out = BufWriter::new(File::create(&tmp)?);
        write_transactions(&mut out, transactions.iter().copied())?;
        out.flush()?;
        out.get_ref().sync_all()?;
        Ok(())
    })();

    if let Err(e) = written.and_then(|_| fs::rename(&tmp, path).map_err(Into::into)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    tracing::info!(path = %path.display(), count = transactions.len(), "ledger saved");
    Ok(transactions.len())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionLog;
    use proptest::prelude::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("general-ledger-{}-{}.csv", std::process::id(), name))
    }

    fn sample_log() -> TransactionLog {
        let mut log = TransactionLog::new();
        log.append("2025-05-06", "Cash", 1000.0, 0.0, "Initial investment").unwrap();
        log.append("2025-05-06", "Owner's Equity", 0.0, 1000.0, "Initial, \"quoted\"").unwrap();
        log.append("2025-05-07", "Supplies", 0.1, 0.0, "").unwrap();
        log
    }

    #[test]
    fn test_write_has_exact_header() {
        let mut buf = Vec::new();
        write_transactions(&mut buf, &TransactionLog::new()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Date,Account,Debit,Credit,Description\n");
    }

    #[test]
    fn test_stream_round_trip() {
        let log = sample_log();
        let mut buf = Vec::new();
        write_transactions(&mut buf, &log).unwrap();

        let (loaded, report) = read_transactions(buf.as_slice()).unwrap();
        assert_eq!(loaded.as_slice(), log.all());
        assert!(report.is_clean());
        assert_eq!(report.loaded, 3);
    }

    #[test]
    fn test_bad_rows_are_skipped_and_reported() {
        let data = "Date,Account,Debit,Credit,Description\n\
                    2025-01-01,Cash,100,0,ok\n\
                    2025-01-02,Cash,abc,0,not a number\n\
                    2025-01-03,Cash,50,50,equal sides\n\
                    2025-01-04,Cash,10\n\
                    2025-01-05,Sales Revenue,0,100,ok\n";

        let (loaded, report) = read_transactions(data.as_bytes()).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].account(), "Sales Revenue");
        assert_eq!(report.ignored, 1);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].line, 3);
        assert!(matches!(report.issues[0].kind, RowIssueKind::NonNumeric { .. }));
        assert_eq!(
            report.issues[1].kind,
            RowIssueKind::Rejected("debit and credit must differ, both are 50".to_string())
        );
    }

    #[test]
    fn test_amounts_with_whitespace() {
        let data = "Date,Account,Debit,Credit,Description\nd,Cash, 12.5 ,0,x\n";
        let (loaded, _) = read_transactions(data.as_bytes()).unwrap();
        assert_eq!(loaded[0].debit(), 12.5);
    }

    #[test]
    fn test_file_round_trip() {
        let path = scratch_path("round-trip");
        let log = sample_log();

        assert_eq!(save_csv(&path, &log).unwrap(), 3);
        assert!(!temp_path(&path).exists());

        let (loaded, report) = load_csv(&path).unwrap();
        assert_eq!(loaded.as_slice(), log.all());
        assert_eq!(report.loaded, 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_resource_failure() {
        let err = load_csv(&scratch_path("does-not-exist")).unwrap_err();
        assert!(err.is_resource_failure());
    }

    #[test]
    fn test_failed_save_leaves_no_file() {
        let dir = std::env::temp_dir().join(format!("general-ledger-missing-{}", std::process::id()));
        let path = dir.join("ledger.csv");

        let err = save_csv(&path, &sample_log()).unwrap_err();
        assert!(err.is_resource_failure());
        assert!(!path.exists());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_failed_rename_keeps_existing_target() {
        // A non-empty directory at the target: the temp file is written, the rename fails
        let target = std::env::temp_dir().join(format!("general-ledger-dir-target-{}", std::process::id()));
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "old").unwrap();

        let err = save_csv(&target, &sample_log()).unwrap_err();

        assert!(err.is_resource_failure());
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "old");
        assert!(!temp_path(&target).exists());

        fs::remove_dir_all(&target).unwrap();
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let path = scratch_path("existing");
        let original = "Date,Account,Debit,Credit,Description\nd,Cash,1,0,old\n";
        fs::write(&path, original).unwrap();
        // Temp slot taken by a directory, so nothing can be written there
        fs::create_dir_all(temp_path(&path)).unwrap();

        let err = save_csv(&path, &sample_log()).unwrap_err();

        assert!(err.is_resource_failure());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);

        fs::remove_dir(temp_path(&path)).unwrap();
        fs::remove_file(&path).unwrap();
    }

    fn entry_strategy() -> impl Strategy<Value = Transaction> {
        (
            "[0-9]{4}-[0-9]{2}-[0-9]{2}",
            "[A-Za-z' ]{1,16}",
            0u32..10_000_000,
            any::<bool>(),
            "[A-Za-z0-9 ,\"]{0,24}",
        )
            .prop_map(|(date, account, cents, is_debit, description)| {
                let amount = cents as f64 / 100.0 + 0.01;
                let (debit, credit) = if is_debit { (amount, 0.0) } else { (0.0, amount) };
                Transaction::new(date, account, debit, credit, description).unwrap()
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_save_then_load_is_identity(log in prop::collection::vec(entry_strategy(), 0..40)) {
            let path = scratch_path("prop-round-trip");
            prop_assert_eq!(save_csv(&path, &log).unwrap(), log.len());

            let (loaded, report) = load_csv(&path).unwrap();
            fs::remove_file(&path).unwrap();

            prop_assert_eq!(loaded, log);
            prop_assert!(report.is_clean());
        }
    }
}
