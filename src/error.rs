// ⚠️ Error Taxonomy
// Validation rejections, resource failures and structural CSV failures are
// kept apart so callers can surface each one differently.

use thiserror::Error;

/// Why an entry was refused by the log.
///
/// A rejection is never fatal: the log is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("debit must be non-negative, got {0}")]
    NegativeDebit(f64),

    #[error("credit must be non-negative, got {0}")]
    NegativeCredit(f64),

    #[error("debit and credit must differ, both are {0}")]
    EqualSides(f64),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Saving would drop rows that were skipped when the file was loaded.
    #[error("refusing to overwrite {path}: {skipped} row(s) were skipped when it was loaded")]
    LossyOverwrite { path: String, skipped: usize },
}

impl LedgerError {
    /// True for failures of the surrounding environment (missing file,
    /// unwritable directory), as opposed to bad ledger data.
    pub fn is_resource_failure(&self) -> bool {
        match self {
            LedgerError::Io(_) => true,
            LedgerError::Csv(e) => matches!(e.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::NegativeDebit(-5.0).to_string(),
            "debit must be non-negative, got -5"
        );
        assert_eq!(
            ValidationError::EqualSides(0.0).to_string(),
            "debit and credit must differ, both are 0"
        );
    }

    #[test]
    fn test_resource_failure_classification() {
        let io = LedgerError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io.is_resource_failure());

        let validation = LedgerError::from(ValidationError::NegativeCredit(-1.0));
        assert!(!validation.is_resource_failure());
        assert_eq!(
            validation.to_string(),
            "invalid transaction: credit must be non-negative, got -1"
        );
    }
}
