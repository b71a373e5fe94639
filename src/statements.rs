// 📊 Statement Engine - Income Statement, Balance Sheet, Statement of Equity
//
// Every statement is recomputed from the current log. Sign conventions:
//   - Balance Sheet amounts are raw account balances (debit − credit)
//   - Income Statement revenue is reported credit-normal (−Σ balances),
//     expenses debit-normal (Σ balances)
//
// No accounting-equation check (assets = liabilities + equity) is made.

use crate::balances::{balances, BalanceMap};
use crate::classify::{accounts_in, category_total, unclassified_accounts, AccountCategory, UnclassifiedAccount};
use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// PERIOD
// ============================================================================

/// Reporting period. Carried through to the output, but transactions have
/// no calendar date so it does not filter anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Period {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Period { start, end }
    }

    pub fn label(&self) -> String {
        match (self.start, self.end) {
            (None, None) => "All periods".to_string(),
            (Some(s), None) => format!("From {}", s),
            (None, Some(e)) => format!("Through {}", e),
            (Some(s), Some(e)) => format!("{} to {}", s, e),
        }
    }
}

/// A (category, account, amount) style table row shared by the statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub category: String,
    pub account: Option<String>,
    pub amount: f64,
}

impl StatementRow {
    fn new(category: &str, account: Option<&str>, amount: f64) -> Self {
        StatementRow {
            category: category.to_string(),
            account: account.map(str::to_string),
            amount,
        }
    }
}

// ============================================================================
// INCOME STATEMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeStatement {
    pub period: Period,
    pub revenue: f64,
    pub expenses: f64,
    pub net_income: f64,
    /// Accounts no rule matched, left out of the totals
    pub unclassified: Vec<UnclassifiedAccount>,
}

impl IncomeStatement {
    pub fn derive<'a, I>(transactions: I, period: Period) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::from_balances(&balances(transactions), period)
    }

    pub fn from_balances(balances: &BalanceMap, period: Period) -> Self {
        let revenue = 0.0 - category_total(balances, AccountCategory::Revenue);
        let expenses = category_total(balances, AccountCategory::Expense);

        IncomeStatement {
            period,
            revenue,
            expenses,
            net_income: revenue - expenses,
            unclassified: unclassified_accounts(balances),
        }
    }

    /// Category / Amount rows.
    pub fn to_rows(&self) -> Vec<StatementRow> {
        vec![
            StatementRow::new("Revenue", None, self.revenue),
            StatementRow::new("Expenses", None, self.expenses),
            StatementRow::new("Net Income", None, self.net_income),
        ]
    }
}

// ============================================================================
// BALANCE SHEET
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheetSection {
    pub accounts: BalanceMap,
    pub total: f64,
}

impl BalanceSheetSection {
    fn of(balances: &BalanceMap, category: AccountCategory) -> Self {
        let accounts = accounts_in(balances, category);
        let total = accounts.values().fold(0.0, |acc, b| acc + b);
        BalanceSheetSection { accounts, total }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheet {
    pub assets: BalanceSheetSection,
    pub liabilities: BalanceSheetSection,
    pub equity: BalanceSheetSection,
    pub unclassified: Vec<UnclassifiedAccount>,
}

impl BalanceSheet {
    pub fn derive<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::from_balances(&balances(transactions))
    }

    pub fn from_balances(balances: &BalanceMap) -> Self {
        BalanceSheet {
            assets: BalanceSheetSection::of(balances, AccountCategory::Asset),
            liabilities: BalanceSheetSection::of(balances, AccountCategory::Liability),
            equity: BalanceSheetSection::of(balances, AccountCategory::Equity),
            unclassified: unclassified_accounts(balances),
        }
    }

    /// Category / Account / Amount rows, each section closed by a synthetic
    /// total row.
    pub fn to_rows(&self) -> Vec<StatementRow> {
        let sections = [
            ("Assets", "Total Assets", &self.assets),
            ("Liabilities", "Total Liabilities", &self.liabilities),
            ("Equity", "Total Equity", &self.equity),
        ];

        let mut rows = Vec::new();
        for (category, total_label, section) in sections {
            for (account, balance) in &section.accounts {
                rows.push(StatementRow::new(category, Some(account.as_str()), *balance));
            }
            rows.push(StatementRow::new(category, Some(total_label), section.total));
        }
        rows
    }
}

// ============================================================================
// STATEMENT OF EQUITY
// ============================================================================

/// Current-snapshot equity row. Beginning balance, contributions and
/// distributions are always zero since no period history is kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityRow {
    pub account: String,
    pub beginning_balance: f64,
    pub contributions: f64,
    /// Net income, only for accounts whose name contains "retained earnings"
    pub net_income: f64,
    pub distributions: f64,
    pub ending_balance: f64,
}

impl EquityRow {
    pub const CATEGORIES: [&'static str; 5] = [
        "Beginning Balance",
        "Contributions",
        "Net Income",
        "Distributions",
        "Ending Balance",
    ];

    /// Amounts in the order of [`EquityRow::CATEGORIES`].
    pub fn amounts(&self) -> [f64; 5] {
        [
            self.beginning_balance,
            self.contributions,
            self.net_income,
            self.distributions,
            self.ending_balance,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementOfEquity {
    pub period: Period,
    pub net_income: f64,
    pub accounts: Vec<EquityRow>,
}

impl StatementOfEquity {
    pub fn derive<'a, I>(transactions: I, period: Period) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::from_balances(&balances(transactions), period)
    }

    pub fn from_balances(balances: &BalanceMap, period: Period) -> Self {
        let net_income = IncomeStatement::from_balances(balances, period).net_income;

        let accounts = accounts_in(balances, AccountCategory::Equity)
            .into_iter()
            .map(|(account, balance)| {
                let allocation = if account.to_lowercase().contains("retained earnings") {
                    net_income
                } else {
                    0.0
                };
                EquityRow {
                    account,
                    beginning_balance: 0.0,
                    contributions: 0.0,
                    net_income: allocation,
                    distributions: 0.0,
                    ending_balance: balance,
                }
            })
            .collect();

        StatementOfEquity {
            period,
            net_income,
            accounts,
        }
    }

    /// Account / Category / Amount rows, five per equity account.
    pub fn to_rows(&self) -> Vec<StatementRow> {
        self.accounts
            .iter()
            .flat_map(|row| {
                EquityRow::CATEGORIES
                    .iter()
                    .zip(row.amounts())
                    .map(|(category, amount)| StatementRow::new(category, Some(row.account.as_str()), amount))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
