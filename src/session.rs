// 🗂️ Session - Owns the transaction log for its whole lifetime
//
// Created at start-up, replaced wholesale on load, dropped at the end.
// Every derivation is recomputed from the current log on each call.
// Hosts that share a session across threads must wrap it in one Mutex.

use crate::balances::{balances, BalanceMap};
use crate::error::{LedgerError, Result, ValidationError};
use crate::export::Workbook;
use crate::statements::{BalanceSheet, IncomeStatement, Period, StatementOfEquity};
use crate::storage::{self, LoadReport};
use crate::taccount::{self, TAccount};
use crate::tax::{FormKind, TaxForm};
use crate::transaction::{Transaction, TransactionLog};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Session {
    log: TransactionLog,
    /// File the log was last loaded from or saved to
    source: Option<PathBuf>,
    /// Rows of `source` that did not make it into the log
    skipped: usize,
}

impl Session {
    pub fn new() -> Self {
        Session {
            log: TransactionLog::new(),
            source: None,
            skipped: 0,
        }
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Session {
            log: transactions.into_iter().collect(),
            source: None,
            skipped: 0,
        }
    }

    /// Open a session from a CSV file; a missing file yields an empty
    /// session bound to that path.
    pub fn open(path: &Path) -> Result<(Self, LoadReport)> {
        let mut session = Session::new();
        if path.exists() {
            let report = session.load(path)?;
            return Ok((session, report));
        }

        tracing::info!(path = %path.display(), "no ledger file yet, starting empty");
        session.source = Some(path.to_path_buf());
        Ok((session, LoadReport::default()))
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    /// Rows skipped by the last load, with or without a warning.
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    // ========================================================================
    // LOG OPERATIONS
    // ========================================================================

    pub fn append(
        &mut self,
        date: &str,
        account: &str,
        debit: f64,
        credit: f64,
        description: &str,
    ) -> std::result::Result<&Transaction, ValidationError> {
        match self.log.append(date, account, debit, credit, description) {
            Ok(tx) => Ok(tx),
            Err(e) => {
                tracing::warn!(account, debit, credit, "transaction rejected: {}", e);
                Err(e)
            }
        }
    }

    pub fn all(&self) -> &[Transaction] {
        self.log.all()
    }

    pub fn replace(&mut self, transactions: Vec<Transaction>) {
        self.log.replace(transactions);
    }

    /// Replace the log with the contents of `path`. On error the current log
    /// is left untouched.
    pub fn load(&mut self, path: &Path) -> Result<LoadReport> {
        let (transactions, report) = storage::load_csv(path)?;
        self.log.replace(transactions);
        self.source = Some(path.to_path_buf());
        self.skipped = report.issues.len() + report.ignored;
        Ok(report)
    }

    /// Write the log to `path`.
    ///
    /// Refuses to overwrite the file the log was loaded from when rows were
    /// skipped during that load, since saving would delete them.
    pub fn save(&mut self, path: &Path) -> Result<usize> {
        if self.skipped > 0 && self.source.as_deref() == Some(path) {
            return Err(LedgerError::LossyOverwrite {
                path: path.display().to_string(),
                skipped: self.skipped,
            });
        }
        self.force_save(path)
    }

    /// Write the log to `path` even if that drops skipped rows.
    pub fn force_save(&mut self, path: &Path) -> Result<usize> {
        let count = storage::save_csv(path, &self.log)?;
        if self.skipped > 0 {
            tracing::warn!(path = %path.display(), skipped = self.skipped, "skipped rows dropped on save");
        }
        self.source = Some(path.to_path_buf());
        self.skipped = 0;
        Ok(count)
    }

    // ========================================================================
    // DERIVATIONS
    // ========================================================================

    pub fn balances(&self) -> BalanceMap {
        balances(&self.log)
    }

    pub fn t_accounts(&self) -> IndexMap<String, TAccount> {
        taccount::build(&self.log)
    }

    pub fn income_statement(&self, period: Period) -> IncomeStatement {
        IncomeStatement::derive(&self.log, period)
    }

    pub fn balance_sheet(&self) -> BalanceSheet {
        BalanceSheet::derive(&self.log)
    }

    pub fn statement_of_equity(&self, period: Period) -> StatementOfEquity {
        StatementOfEquity::derive(&self.log, period)
    }

    pub fn tax_form(&self, form: FormKind) -> TaxForm {
        TaxForm::from_balances(form, &self.balances())
    }

    pub fn workbook(&self) -> Workbook {
        Workbook::build(self.log.all())
    }
}

/// The eight sample entries the tool ships with.
pub fn demo_transactions() -> Vec<Transaction> {
    let rows: [(&str, &str, f64, f64, &str); 8] = [
        ("2025-05-06", "Cash", 1000.00, 0.00, "Initial investment"),
        ("2025-05-06", "Owner's Equity", 0.00, 1000.00, "Initial investment"),
        ("2025-05-07", "Supplies", 200.00, 0.00, "Purchased office supplies"),
        ("2025-05-07", "Cash", 0.00, 200.00, "Purchased office supplies"),
        ("2025-05-08", "Accounts Receivable", 500.00, 0.00, "Sales on credit"),
        ("2025-05-08", "Sales Revenue", 0.00, 500.00, "Sales on credit"),
        ("2025-05-09", "Cash", 300.00, 0.00, "Received cash from customer"),
        ("2025-05-09", "Accounts Receivable", 0.00, 300.00, "Received cash from customer"),
    ];

    rows.iter()
        .filter_map(|(date, account, debit, credit, description)| {
            Transaction::new(*date, *account, *debit, *credit, *description).ok()
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
