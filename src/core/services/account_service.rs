//! Business logic helpers for account (category) mutations.

use tracing::info;

use crate::{
    core::{
        ledger_store::LedgerStore,
        services::{ServiceError, ServiceResult},
    },
    domain::{Account, AccountColor, Transaction},
    ledger::Ledger,
    storage::Collection,
    time::Clock,
};

/// What deleting an account will remove, shown before the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDeletionPreview {
    pub account_id: String,
    pub name: String,
    pub transaction_count: usize,
}

impl AccountDeletionPreview {
    pub fn message(&self) -> String {
        format!(
            "Delete the category \"{}\"?\n\n{} linked transactions will be deleted as well.",
            self.name, self.transaction_count
        )
    }
}

/// The account and the transactions that were cascaded away with it.
#[derive(Debug, Clone)]
pub struct AccountRemoval {
    pub account: Account,
    pub removed_transactions: Vec<Transaction>,
}

pub struct AccountService;

impl AccountService {
    /// Creates an account and returns its identifier.
    pub fn create(
        store: &mut LedgerStore,
        clock: &dyn Clock,
        name: &str,
        color: AccountColor,
    ) -> ServiceResult<String> {
        let name = Self::validate_name(name)?;
        let account = Account::new(name, color, clock.now());
        let id = account.id.clone();
        store.apply(&[Collection::Accounts], |ledger| ledger.accounts.push(account));
        info!(account = %id, "account created");
        Ok(id)
    }

    /// Renames an account in place.
    pub fn rename(store: &mut LedgerStore, id: &str, name: &str) -> ServiceResult<()> {
        let name = Self::validate_name(name)?;
        if store.ledger().account(id).is_none() {
            return Err(ServiceError::NotFound(format!("account {}", id)));
        }
        store.apply(&[Collection::Accounts], |ledger| {
            if let Some(account) = ledger.accounts.iter_mut().find(|a| a.id == id) {
                account.name = name;
            }
        });
        Ok(())
    }

    pub fn deletion_preview(ledger: &Ledger, id: &str) -> ServiceResult<AccountDeletionPreview> {
        let account = ledger
            .account(id)
            .ok_or_else(|| ServiceError::NotFound(format!("account {}", id)))?;
        Ok(AccountDeletionPreview {
            account_id: account.id.clone(),
            name: account.name.clone(),
            transaction_count: ledger.transactions_for_account(id).count(),
        })
    }

    /// Deletes the account together with every transaction booked on it.
    pub fn remove(store: &mut LedgerStore, id: &str) -> ServiceResult<AccountRemoval> {
        if store.ledger().account(id).is_none() {
            return Err(ServiceError::NotFound(format!("account {}", id)));
        }
        let removal = store.apply(&[Collection::Accounts, Collection::Transactions], |ledger| {
            let position = ledger.accounts.iter().position(|a| a.id == id);
            let account = position.map(|idx| ledger.accounts.remove(idx));
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut ledger.transactions)
                .into_iter()
                .partition(|txn| txn.account_id == id);
            ledger.transactions = kept;
            account.map(|account| AccountRemoval {
                account,
                removed_transactions: removed,
            })
        });
        let removal = removal.ok_or_else(|| ServiceError::NotFound(format!("account {}", id)))?;
        info!(
            account = %id,
            transactions = removal.removed_transactions.len(),
            "account deleted"
        );
        Ok(removal)
    }

    pub fn list(ledger: &Ledger) -> Vec<&Account> {
        ledger.accounts.iter().collect()
    }

    fn validate_name(candidate: &str) -> ServiceResult<String> {
        if candidate.trim().is_empty() {
            Err(ServiceError::Invalid("Account name is required".into()))
        } else {
            Ok(candidate.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{storage::MemoryStore, time::SystemClock};
    use rust_decimal_macros::dec;

    fn empty_store() -> LedgerStore {
        LedgerStore::open(Box::new(MemoryStore::new()))
    }

    #[test]
    fn create_rejects_blank_names() {
        let mut store = empty_store();
        let err = AccountService::create(&mut store, &SystemClock, "   ", AccountColor::Blue)
            .expect_err("blank name must fail");
        assert!(matches!(err, ServiceError::Invalid(ref m) if m.contains("required")));
        assert!(store.accounts().is_empty());
    }

    #[test]
    fn rename_updates_in_place() {
        let mut store = empty_store();
        let id = AccountService::create(&mut store, &SystemClock, "Food", AccountColor::Green)
            .unwrap();
        AccountService::rename(&mut store, &id, "Groceries").unwrap();
        let account = store.ledger().account(&id).unwrap();
        assert_eq!(account.name, "Groceries");
        assert_eq!(account.color, AccountColor::Green);

        assert!(AccountService::rename(&mut store, &id, "").is_err());
        assert!(AccountService::rename(&mut store, "missing", "x").is_err());
    }

    #[test]
    fn remove_cascades_to_own_transactions_only() {
        let mut store = empty_store();
        let clock = SystemClock;
        let a = AccountService::create(&mut store, &clock, "A", AccountColor::Blue).unwrap();
        let b = AccountService::create(&mut store, &clock, "B", AccountColor::Red).unwrap();
        let now = clock.now();
        store.set_transactions(vec![
            Transaction::new(a.clone(), "one", dec!(10), None, now),
            Transaction::new(b.clone(), "two", dec!(20), None, now),
            Transaction::new(a.clone(), "three", dec!(-5), None, now),
        ]);

        let preview = AccountService::deletion_preview(store.ledger(), &a).unwrap();
        assert_eq!(preview.transaction_count, 2);
        assert!(preview.message().contains("\"A\""));

        let removal = AccountService::remove(&mut store, &a).unwrap();
        assert_eq!(removal.account.id, a);
        assert_eq!(removal.removed_transactions.len(), 2);
        assert_eq!(store.transactions().len(), 1);
        assert_eq!(store.transactions()[0].account_id, b);
        assert!(store.ledger().account(&a).is_none());
    }
}
