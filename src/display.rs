// 🖨️ Plain-text views of the ledger for terminal output

use crate::balances::BalanceMap;
use crate::statements::{BalanceSheet, IncomeStatement, StatementOfEquity};
use crate::taccount::TAccount;
use crate::tax::TaxForm;
use crate::transaction::Transaction;
use indexmap::IndexMap;
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// General ledger listing, one line per transaction in log order.
pub fn ledger_listing(transactions: &[Transaction]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<24} {:>12} {:>12}  {}",
        "Date", "Account", "Debit", "Credit", "Description"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for tx in transactions {
        let _ = writeln!(
            out,
            "{:<12} {:<24} {:>12} {:>12}  {}",
            tx.date(),
            tx.account(),
            amount(tx.debit()),
            amount(tx.credit()),
            tx.description()
        );
    }
    out
}

pub fn balance_listing(balances: &BalanceMap) -> String {
    let mut out = String::new();
    for (account, balance) in balances {
        let _ = writeln!(out, "{}: ${}", account, amount(*balance));
    }
    out
}

/// One T-account as a two-column block closed by its balance.
pub fn t_account_block(name: &str, account: &TAccount) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} {}", "=".repeat(20), name, "=".repeat(20));
    let _ = writeln!(out, "{:<15} | {:>15}", "Debits", "Credits");
    let _ = writeln!(out, "{}", "-".repeat(31));

    for row in account.rows() {
        let debit = row.debit.map(amount).unwrap_or_default();
        let credit = row.credit.map(amount).unwrap_or_default();
        let _ = writeln!(out, "{:<15} | {:>15}", debit, credit);
    }

    let _ = writeln!(out, "{}", "-".repeat(31));
    let _ = writeln!(out, "{:<15} | {:>15}", "Balance:", amount(account.balance));
    out
}

pub fn t_accounts_listing(accounts: &IndexMap<String, TAccount>) -> String {
    accounts
        .iter()
        .map(|(name, account)| t_account_block(name, account))
        .collect::<Vec<_>>()
        .join("\n")
}

fn excluded_note(out: &mut String, names: impl Iterator<Item = String>) {
    let names: Vec<String> = names.collect();
    if !names.is_empty() {
        let _ = writeln!(out, "\nNot classified (excluded): {}", names.join(", "));
    }
}

pub fn income_statement(stmt: &IncomeStatement) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Income Statement ({})", stmt.period.label());
    let _ = writeln!(out, "{}", "-".repeat(40));
    for row in stmt.to_rows() {
        let _ = writeln!(out, "{:<24} {:>15}", row.category, amount(row.amount));
    }
    excluded_note(&mut out, stmt.unclassified.iter().map(|u| u.account.clone()));
    out
}

pub fn balance_sheet(sheet: &BalanceSheet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Balance Sheet");
    let _ = writeln!(out, "{}", "-".repeat(56));
    for row in sheet.to_rows() {
        let _ = writeln!(
            out,
            "{:<14} {:<26} {:>15}",
            row.category,
            row.account.unwrap_or_default(),
            amount(row.amount)
        );
    }
    excluded_note(&mut out, sheet.unclassified.iter().map(|u| u.account.clone()));
    out
}

pub fn statement_of_equity(stmt: &StatementOfEquity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Statement of Equity ({})", stmt.period.label());
    let _ = writeln!(out, "{}", "-".repeat(60));
    for row in stmt.to_rows() {
        let _ = writeln!(
            out,
            "{:<24} {:<18} {:>15}",
            row.account.unwrap_or_default(),
            row.category,
            amount(row.amount)
        );
    }
    out
}

pub fn tax_form(form: &TaxForm) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", form.form, form.form.title());
    let _ = writeln!(out, "{}", "-".repeat(60));
    for line in &form.lines {
        let _ = writeln!(out, "{:<5} {:<40} {:>12}", line.line, line.description, amount(line.amount));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taccount;
    use crate::transaction::TransactionLog;

    #[test]
    fn test_t_account_block_layout() {
        let mut log = TransactionLog::new();
        log.append("1", "Cash", 1000.0, 0.0, "").unwrap();
        log.append("2", "Cash", 0.0, 200.0, "").unwrap();
        log.append("3", "Cash", 300.0, 0.0, "").unwrap();

        let accounts = taccount::build(&log);
        let block = t_account_block("Cash", &accounts["Cash"]);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "==================== Cash ====================");
        assert_eq!(lines[1], "Debits          |         Credits");
        assert_eq!(lines[3], "1000.00         |          200.00");
        assert_eq!(lines[4], "300.00          |                ");
        assert_eq!(lines[6], "Balance:        |         1100.00");
    }

    #[test]
    fn test_balance_listing() {
        let mut map = BalanceMap::new();
        map.insert("Cash".to_string(), 1100.0);
        map.insert("Owner's Equity".to_string(), -1000.0);

        assert_eq!(balance_listing(&map), "Cash: $1100.00\nOwner's Equity: $-1000.00\n");
    }

    #[test]
    fn test_ledger_listing_rows() {
        let mut log = TransactionLog::new();
        log.append("2025-05-06", "Cash", 1000.0, 0.0, "Initial investment").unwrap();

        let listing = ledger_listing(log.all());
        assert_eq!(listing.lines().count(), 3);
        assert!(listing.lines().nth(2).unwrap().contains("1000.00"));
        assert!(listing.ends_with("Initial investment\n"));
    }
}
