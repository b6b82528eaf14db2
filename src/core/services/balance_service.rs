//! Derived balances. Nothing here is cached: each call scans the transaction log.

use rust_decimal::Decimal;

use crate::{
    currency::{checked_sum, saturating_sum},
    domain::Transaction,
    ledger::Ledger,
};

/// Restricts balance queries to the transactions of a single salary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BalanceScope {
    #[default]
    All,
    BySalary(String),
}

impl BalanceScope {
    pub fn salary(id: impl Into<String>) -> Self {
        BalanceScope::BySalary(id.into())
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            BalanceScope::All => true,
            BalanceScope::BySalary(id) => txn.is_linked_to(id),
        }
    }
}

pub struct BalanceService;

impl BalanceService {
    /// Sum of the account's transaction amounts within `scope`, clamped to the `Decimal` range.
    pub fn account_balance(ledger: &Ledger, account_id: &str, scope: &BalanceScope) -> Decimal {
        saturating_sum(
            ledger
                .transactions_for_account(account_id)
                .filter(|txn| scope.matches(txn))
                .map(|txn| txn.amount),
        )
    }

    /// Exact balance of the account within `scope`, `None` if it leaves the `Decimal` range.
    pub fn checked_account_balance(
        ledger: &Ledger,
        account_id: &str,
        scope: &BalanceScope,
    ) -> Option<Decimal> {
        checked_sum(
            ledger
                .transactions_for_account(account_id)
                .filter(|txn| scope.matches(txn))
                .map(|txn| txn.amount),
        )
    }

    /// Sum of every account's balance within `scope`, clamped to the `Decimal` range.
    pub fn total_balance(ledger: &Ledger, scope: &BalanceScope) -> Decimal {
        saturating_sum(
            ledger
                .accounts
                .iter()
                .map(|account| Self::account_balance(ledger, &account.id, scope)),
        )
    }

    /// The account's transactions, most recent first; equal dates keep ledger order.
    pub fn account_transactions<'a>(
        ledger: &'a Ledger,
        account_id: &str,
        scope: &BalanceScope,
    ) -> Vec<&'a Transaction> {
        let mut txns: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|txn| txn.account_id == account_id && scope.matches(txn))
            .collect();
        txns.sort_by(|a, b| b.date.cmp(&a.date));
        txns
    }
}
