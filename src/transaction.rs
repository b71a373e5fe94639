// 📒 Transaction Log - Append-only store of validated entries
// Insertion order is the display order and the T-account entry order.

use crate::error::ValidationError;
use serde::Serialize;

// ============================================================================
// TRANSACTION
// ============================================================================

/// A single dated debit or credit against a named account.
///
/// Values can only be built through [`Transaction::new`], so every
/// transaction in existence has passed validation. They are never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Opaque date token, not parsed as a calendar date
    #[serde(rename = "Date")]
    date: String,

    /// Case-sensitive account identity
    #[serde(rename = "Account")]
    account: String,

    #[serde(rename = "Debit")]
    debit: f64,

    #[serde(rename = "Credit")]
    credit: f64,

    #[serde(rename = "Description")]
    description: String,
}

/// Check the debit/credit pair the same way for every entry point.
///
/// `NaN` fails the non-negative checks, so it is rejected as well.
pub fn validate(debit: f64, credit: f64) -> Result<(), ValidationError> {
    if !(debit >= 0.0) {
        return Err(ValidationError::NegativeDebit(debit));
    }
    if !(credit >= 0.0) {
        return Err(ValidationError::NegativeCredit(credit));
    }
    if debit == credit {
        return Err(ValidationError::EqualSides(debit));
    }
    Ok(())
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        account: impl Into<String>,
        debit: f64,
        credit: f64,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        validate(debit, credit)?;

        Ok(Transaction {
            date: date.into(),
            account: account.into(),
            debit,
            credit,
            description: description.into(),
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn debit(&self) -> f64 {
        self.debit
    }

    pub fn credit(&self) -> f64 {
        self.credit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Signed effect on the account balance (`debit - credit`).
    pub fn net(&self) -> f64 {
        self.debit - self.credit
    }
}

// ============================================================================
// TRANSACTION LOG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionLog {
    entries: Vec<Transaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        TransactionLog { entries: Vec::new() }
    }

    /// Validate and append an entry at the end of the log.
    ///
    /// On rejection nothing is stored and the log stays usable.
    pub fn append(
        &mut self,
        date: impl Into<String>,
        account: impl Into<String>,
        debit: f64,
        credit: f64,
        description: impl Into<String>,
    ) -> Result<&Transaction, ValidationError> {
        let transaction = Transaction::new(date, account, debit, credit, description)?;
        self.push(transaction);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Append an already validated transaction. No deduplication.
    pub fn push(&mut self, transaction: Transaction) {
        self.entries.push(transaction);
    }

    /// Read-only snapshot in insertion order.
    pub fn all(&self) -> &[Transaction] {
        &self.entries
    }

    /// Swap in a whole new sequence of transactions at once.
    pub fn replace(&mut self, transactions: Vec<Transaction>) {
        self.entries = transactions;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Transaction> for TransactionLog {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        TransactionLog {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
