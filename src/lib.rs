// General Ledger - Core Library
// Ledger-and-statement derivation engine used by the CLI, TUI and API server

pub mod error;
pub mod transaction;    // Append-only transaction log
pub mod balances;       // Per-account net balances
pub mod classify;       // Suffix-based account classification
pub mod taccount;       // T-account columns
pub mod statements;     // Income Statement, Balance Sheet, Statement of Equity
pub mod tax;            // Forms 1120 / 1065 line projections
pub mod storage;        // CSV persistence
pub mod export;         // Four-sheet workbook
pub mod display;        // Plain-text renderings
pub mod session;        // Owned session object

// Re-export commonly used types
pub use error::{LedgerError, Result, ValidationError};
pub use transaction::{Transaction, TransactionLog};
pub use balances::{balances, BalanceMap};
pub use classify::{
    classify, unclassified_accounts, AccountCategory, ClassificationRule, UnclassifiedAccount,
    CLASSIFICATION_RULES,
};
pub use taccount::{TAccount, TAccountRow};
pub use statements::{
    BalanceSheet, BalanceSheetSection, EquityRow, IncomeStatement, Period, StatementOfEquity,
    StatementRow,
};
pub use tax::{form_1065, form_1120, FormKind, TaxForm, TaxLine};
pub use storage::{load_csv, save_csv, LoadReport, RowIssue, RowIssueKind};
pub use export::{Cell, Sheet, Workbook};
pub use session::{demo_transactions, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
