// ⚖️ Balance Aggregator - Per-account net balance
// Single left-to-right pass: balance = Σdebit − Σcredit per account.

use crate::transaction::Transaction;
use indexmap::IndexMap;

/// Account name → signed balance, in first-seen order.
pub type BalanceMap = IndexMap<String, f64>;

/// Recompute every account balance from the full log.
///
/// Accounts enter the map the first time they appear, starting at zero.
/// Nothing is cached: calling this again after any mutation of the log is
/// always correct.
pub fn balances<'a, I>(transactions: I) -> BalanceMap
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut map = BalanceMap::new();
    for tx in transactions {
        *map.entry(tx.account().to_string()).or_insert(0.0) += tx.net();
    }
    map
}

/// Sum of balances over an explicit list of account names.
///
/// Names are matched exactly; names absent from the map contribute zero.
pub fn sum_of(balances: &BalanceMap, accounts: &[&str]) -> f64 {
    accounts
        .iter()
        .filter_map(|name| balances.get(*name))
        .fold(0.0, |acc, balance| acc + balance)
}
