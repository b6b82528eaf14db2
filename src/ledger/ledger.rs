use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Account, Salary, Transaction};

/// Accounts, transactions and salaries as currently held in memory.
///
/// Balances are never stored here; they are always derived from `transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub salaries: Vec<Salary>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn salary(&self, id: &str) -> Option<&Salary> {
        self.salaries.iter().find(|salary| salary.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Most recently recorded salary, by insertion order.
    pub fn last_salary(&self) -> Option<&Salary> {
        self.salaries.last()
    }

    pub fn account_name(&self, id: &str) -> Option<&str> {
        self.account(id).map(|account| account.name.as_str())
    }

    pub fn transactions_for_account<'a>(
        &'a self,
        account_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |txn| txn.account_id == account_id)
    }

    pub fn transactions_for_salary<'a>(
        &'a self,
        salary_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |txn| txn.is_linked_to(salary_id))
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.transactions.is_empty() && self.salaries.is_empty()
    }
}

/// Detects dangling references within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let account_ids: HashSet<_> = ledger.accounts.iter().map(|a| a.id.as_str()).collect();
    let salary_ids: HashSet<_> = ledger.salaries.iter().map(|s| s.id.as_str()).collect();
    let mut warnings = Vec::new();

    for txn in &ledger.transactions {
        if !account_ids.contains(txn.account_id.as_str()) {
            warnings.push(format!(
                "transaction {} references unknown account {}",
                txn.id, txn.account_id
            ));
        }
        if let Some(salary) = txn.salary_id.as_deref() {
            if !salary_ids.contains(salary) {
                warnings.push(format!(
                    "transaction {} references missing salary {}",
                    txn.id, salary
                ));
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountColor;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn last_salary_follows_insertion_order() {
        let now = Utc::now();
        let mut ledger = Ledger::new();
        ledger.salaries.push(Salary::new("March", dec!(1000), now));
        ledger.salaries.push(Salary::new("February", dec!(900), now));
        assert_eq!(ledger.last_salary().map(|s| s.name.as_str()), Some("February"));
    }

    #[test]
    fn warnings_flag_dangling_references() {
        let now = Utc::now();
        let mut ledger = Ledger::new();
        let account = Account::new("Rent", AccountColor::Red, now);
        let account_id = account.id.clone();
        ledger.accounts.push(account);
        ledger.transactions.push(Transaction::new(
            account_id,
            "ok",
            dec!(10),
            None,
            now,
        ));
        ledger.transactions.push(Transaction::new(
            "ghost",
            "orphan",
            dec!(5),
            Some("gone".into()),
            now,
        ));

        let warnings = ledger_warnings(&ledger);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("unknown account ghost"));
        assert!(warnings[1].contains("missing salary gone"));
    }
}
