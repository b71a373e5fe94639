// 🧾 Tax-Form Mapper - Fixed line-item projections (Forms 1120 / 1065)
//
// Each line either is not tracked (always 0) or sums the balances of a
// hard-coded list of account names. Names match exactly, not through the
// classifier: renaming an account silently zeroes its line.
//
// This is a template, not a compliant filing engine.

use crate::balances::{balances, sum_of, BalanceMap};
use crate::transaction::Transaction;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// LINE TABLES
// ============================================================================

/// Where a line's amount comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineSource {
    /// Not tracked by this account schema
    Untracked,
    /// Σ balances of these accounts (debit-normal)
    Debit(&'static [&'static str]),
    /// −Σ balances of these accounts (credit-normal income lines)
    Credit(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct LineSpec {
    pub line: &'static str,
    pub description: &'static str,
    pub source: LineSource,
}

const fn line(line: &'static str, description: &'static str, source: LineSource) -> LineSpec {
    LineSpec {
        line,
        description,
        source,
    }
}

use self::LineSource::{Credit, Debit, Untracked};

/// U.S. Corporation Income Tax Return.
pub const FORM_1120_LINES: &[LineSpec] = &[
    line("1a", "Gross receipts or sales", Credit(&["Sales Revenue", "Sales"])),
    line("1b", "Returns and allowances", Debit(&["Sales Returns"])),
    line("2", "Cost of goods sold", Debit(&["COGS"])),
    line("4", "Dividends and inclusions", Untracked),
    line("5", "Interest", Credit(&["Interest Income"])),
    line("6", "Gross rents", Credit(&["Rent Income"])),
    line("7", "Gross royalties", Untracked),
    line("8", "Capital gain net income", Untracked),
    line("10", "Other income", Credit(&["Other Income"])),
    line("12", "Compensation of officers", Debit(&["Officer Compensation"])),
    line("13", "Salaries and wages", Debit(&["Salaries Expense", "Wages Expense"])),
    line("14", "Repairs and maintenance", Debit(&["Repairs Expense"])),
    line("15", "Bad debts", Debit(&["Bad Debt Expense"])),
    line("16", "Rents", Debit(&["Rent Expense"])),
    line("17", "Taxes and licenses", Debit(&["Taxes Expense"])),
    line("18", "Interest", Debit(&["Interest Expense"])),
    line("19", "Charitable contributions", Untracked),
    line("20", "Depreciation", Debit(&["Depreciation Expense"])),
    line("22", "Advertising", Debit(&["Advertising Expense"])),
    line(
        "26",
        "Other deductions",
        Debit(&["Supplies Expense", "Utilities Expense", "Insurance Expense"]),
    ),
];

/// U.S. Return of Partnership Income.
pub const FORM_1065_LINES: &[LineSpec] = &[
    line("1a", "Gross receipts or sales", Credit(&["Sales Revenue", "Sales"])),
    line("1b", "Returns and allowances", Debit(&["Sales Returns"])),
    line("2", "Cost of goods sold", Debit(&["COGS"])),
    line("4", "Ordinary income from other partnerships", Untracked),
    line("5", "Net farm profit", Untracked),
    line("6", "Net gain from Form 4797", Untracked),
    line("7", "Other income", Credit(&["Other Income", "Interest Income"])),
    line("9", "Salaries and wages", Debit(&["Salaries Expense", "Wages Expense"])),
    line("10", "Guaranteed payments to partners", Debit(&["Guaranteed Payments"])),
    line("11", "Repairs and maintenance", Debit(&["Repairs Expense"])),
    line("12", "Bad debts", Debit(&["Bad Debt Expense"])),
    line("13", "Rent", Debit(&["Rent Expense"])),
    line("14", "Taxes and licenses", Debit(&["Taxes Expense"])),
    line("15", "Interest", Debit(&["Interest Expense"])),
    line("16a", "Depreciation", Debit(&["Depreciation Expense"])),
    line(
        "20",
        "Other deductions",
        Debit(&[
            "Supplies Expense",
            "Utilities Expense",
            "Insurance Expense",
            "Advertising Expense",
        ]),
    ),
];

// ============================================================================
// FORMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormKind {
    #[serde(rename = "1120")]
    Form1120,
    #[serde(rename = "1065")]
    Form1065,
}

impl FormKind {
    pub fn number(&self) -> &str {
        match self {
            FormKind::Form1120 => "1120",
            FormKind::Form1065 => "1065",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            FormKind::Form1120 => "U.S. Corporation Income Tax Return",
            FormKind::Form1065 => "U.S. Return of Partnership Income",
        }
    }

    pub fn lines(&self) -> &'static [LineSpec] {
        match self {
            FormKind::Form1120 => FORM_1120_LINES,
            FormKind::Form1065 => FORM_1065_LINES,
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Form {}", self.number())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches("form").trim_start_matches("Form").trim() {
            "1120" => Ok(FormKind::Form1120),
            "1065" => Ok(FormKind::Form1065),
            other => Err(format!("unknown tax form `{}', expected 1120 or 1065", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxLine {
    pub line: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxForm {
    pub form: FormKind,
    pub lines: Vec<TaxLine>,
}

impl TaxForm {
    pub fn from_balances(form: FormKind, balances: &BalanceMap) -> Self {
        let lines = form
            .lines()
            .iter()
            .map(|entry| TaxLine {
                line: entry.line.to_string(),
                description: entry.description.to_string(),
                amount: match entry.source {
                    Untracked => 0.0,
                    Debit(accounts) => sum_of(balances, accounts),
                    Credit(accounts) => 0.0 - sum_of(balances, accounts),
                },
            })
            .collect();

        TaxForm { form, lines }
    }

    pub fn line(&self, number: &str) -> Option<&TaxLine> {
        self.lines.iter().find(|l| l.line == number)
    }
}

pub fn form_1120<'a, I>(transactions: I) -> TaxForm
where
    I: IntoIterator<Item = &'a Transaction>,
{
    TaxForm::from_balances(FormKind::Form1120, &balances(transactions))
}

pub fn form_1065<'a, I>(transactions: I) -> TaxForm
where
    I: IntoIterator<Item = &'a Transaction>,
{
    TaxForm::from_balances(FormKind::Form1065, &balances(transactions))
}
