// 🏷️ Account Classifier - Rules as Data
// Case-insensitive suffix match against a fixed, ordered rule table.
//
// The keyword sets overlap (e.g. "... Equity Income"), so the order of
// CLASSIFICATION_RULES is the tie-break: first matching rule wins.

use crate::balances::BalanceMap;
use serde::Serialize;
use std::fmt;

// ============================================================================
// CATEGORIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AccountCategory {
    Revenue,
    Expense,
    Asset,
    Liability,
    Equity,
    /// Matches no rule; excluded from every statement total
    Unclassified,
}

impl AccountCategory {
    pub fn name(&self) -> &str {
        match self {
            AccountCategory::Revenue => "Revenue",
            AccountCategory::Expense => "Expense",
            AccountCategory::Asset => "Asset",
            AccountCategory::Liability => "Liability",
            AccountCategory::Equity => "Equity",
            AccountCategory::Unclassified => "Unclassified",
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RULE TABLE
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: AccountCategory,
    /// Lowercase suffixes
    pub suffixes: &'static [&'static str],
}

impl ClassificationRule {
    /// `lowered` must already be lowercase.
    fn matches(&self, lowered: &str) -> bool {
        self.suffixes.iter().any(|suffix| lowered.ends_with(suffix))
    }
}

/// Precedence order matters.
pub const CLASSIFICATION_RULES: [ClassificationRule; 5] = [
    ClassificationRule {
        category: AccountCategory::Revenue,
        suffixes: &["revenue", "income", "sales"],
    },
    ClassificationRule {
        category: AccountCategory::Expense,
        suffixes: &["expense", "cost"],
    },
    ClassificationRule {
        category: AccountCategory::Asset,
        suffixes: &["asset", "cash", "receivable", "inventory"],
    },
    ClassificationRule {
        category: AccountCategory::Liability,
        suffixes: &["liability", "payable", "debt"],
    },
    ClassificationRule {
        category: AccountCategory::Equity,
        suffixes: &["equity", "capital", "retained earnings"],
    },
];

/// Tag an account name with its category.
pub fn classify(account: &str) -> AccountCategory {
    let lowered = account.to_lowercase();

    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(AccountCategory::Unclassified)
}

// ============================================================================
// DERIVED GROUPINGS
// ============================================================================

/// Balances of the accounts in one category, first-seen order preserved.
pub fn accounts_in(balances: &BalanceMap, category: AccountCategory) -> BalanceMap {
    balances
        .iter()
        .filter(|(name, _)| classify(name) == category)
        .map(|(name, balance)| (name.clone(), *balance))
        .collect()
}

/// Σ balances of every account in `category`.
pub fn category_total(balances: &BalanceMap, category: AccountCategory) -> f64 {
    balances
        .iter()
        .filter(|(name, _)| classify(name) == category)
        .fold(0.0, |acc, (_, balance)| acc + balance)
}

/// An account left out of the statements because no rule matched it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnclassifiedAccount {
    pub account: String,
    pub balance: f64,
}

/// Accounts that no statement will include, in first-seen order.
pub fn unclassified_accounts(balances: &BalanceMap) -> Vec<UnclassifiedAccount> {
    let excluded: Vec<UnclassifiedAccount> = balances
        .iter()
        .filter(|(name, _)| classify(name) == AccountCategory::Unclassified)
        .map(|(name, balance)| UnclassifiedAccount {
            account: name.clone(),
            balance: *balance,
        })
        .collect();

    for item in &excluded {
        tracing::debug!(
            account = %item.account,
            balance = item.balance,
            "account matches no classification rule, excluded from statements"
        );
    }

    excluded
}

// ============================================================================
// TESTS
// ============================================================================
