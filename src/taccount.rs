// 🅣 T-Account Builder
// Per-account debit and credit columns plus a running balance, built from
// the raw log independently of the balance aggregator.

use crate::transaction::Transaction;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TAccount {
    /// Debit amounts in entry order
    pub debits: Vec<f64>,
    /// Credit amounts in entry order, not paired with the debits
    pub credits: Vec<f64>,
    /// Σdebits − Σcredits
    pub balance: f64,
}

/// One display row of a T-account; `None` is a blank cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TAccountRow {
    pub debit: Option<f64>,
    pub credit: Option<f64>,
}

impl TAccount {
    fn post(&mut self, tx: &Transaction) {
        if tx.debit() > 0.0 {
            self.debits.push(tx.debit());
            self.balance += tx.debit();
        } else if tx.credit() > 0.0 {
            self.credits.push(tx.credit());
            self.balance -= tx.credit();
        }
    }

    /// Debit and credit columns side by side, the shorter padded with blanks.
    pub fn rows(&self) -> Vec<TAccountRow> {
        let height = self.debits.len().max(self.credits.len());
        (0..height)
            .map(|i| TAccountRow {
                debit: self.debits.get(i).copied(),
                credit: self.credits.get(i).copied(),
            })
            .collect()
    }

    pub fn total_debits(&self) -> f64 {
        self.debits.iter().fold(0.0, |acc, d| acc + d)
    }

    pub fn total_credits(&self) -> f64 {
        self.credits.iter().fold(0.0, |acc, c| acc + c)
    }
}

/// Build every T-account in one pass over the log, accounts in first-seen
/// order.
///
/// An entry with a positive debit only posts its debit side; an entry with
/// both sides zero is ignored.
pub fn build<'a, I>(transactions: I) -> IndexMap<String, TAccount>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut accounts: IndexMap<String, TAccount> = IndexMap::new();
    for tx in transactions {
        accounts
            .entry(tx.account().to_string())
            .or_default()
            .post(tx);
    }
    accounts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::balances::balances;
    use crate::transaction::TransactionLog;

    fn sample_log() -> TransactionLog {
        let mut log = TransactionLog::new();
        log.append("1", "Cash", 1000.0, 0.0, "").unwrap();
        log.append("2", "Cash", 0.0, 200.0, "").unwrap();
        log.append("3", "Cash", 300.0, 0.0, "").unwrap();
        log.append("3", "Accounts Receivable", 0.0, 300.0, "").unwrap();
        log
    }

    #[test]
    fn test_columns_keep_entry_order() {
        let accounts = build(&sample_log());
        let cash = &accounts["Cash"];

        assert_eq!(cash.debits, vec![1000.0, 300.0]);
        assert_eq!(cash.credits, vec![200.0]);
        assert_eq!(cash.balance, 1100.0);
    }

    #[test]
    fn test_rows_are_padded() {
        let accounts = build(&sample_log());
        let rows = accounts["Cash"].rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], TAccountRow { debit: Some(1000.0), credit: Some(200.0) });
        assert_eq!(rows[1], TAccountRow { debit: Some(300.0), credit: None });

        let ar_rows = accounts["Accounts Receivable"].rows();
        assert_eq!(ar_rows, vec![TAccountRow { debit: None, credit: Some(300.0) }]);
    }

    #[test]
    fn test_debit_side_wins_for_two_sided_entry() {
        let mut log = TransactionLog::new();
        log.append("1", "Mixed", 10.0, 4.0, "").unwrap();
        let accounts = build(&log);

        assert_eq!(accounts["Mixed"].debits, vec![10.0]);
        assert!(accounts["Mixed"].credits.is_empty());
    }

    #[test]
    fn test_agrees_with_balance_aggregator() {
        let log = sample_log();
        let accounts = build(&log);
        let map = balances(&log);

        assert_eq!(accounts.len(), map.len());
        for (name, account) in &accounts {
            assert_eq!(account.balance, map[name]);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_single_sided_entries_agree_with_aggregator(
            entries in prop::collection::vec((0usize..5, 1u32..50_000, any::<bool>()), 0..60),
        ) {
            let names = ["Cash", "Accounts Receivable", "Sales Revenue", "Supplies", "Loan Payable"];
            let mut log = TransactionLog::new();
            for (account, amount, is_debit) in entries {
                let amount = amount as f64;
                let (debit, credit) = if is_debit { (amount, 0.0) } else { (0.0, amount) };
                log.append("d", names[account], debit, credit, "").unwrap();
            }

            let accounts = build(&log);
            let map = balances(&log);

            prop_assert_eq!(accounts.len(), map.len());
            for (name, account) in &accounts {
                prop_assert_eq!(account.balance, map[name]);
                prop_assert_eq!(account.balance, account.total_debits() - account.total_credits());
            }
        }
    }
}
