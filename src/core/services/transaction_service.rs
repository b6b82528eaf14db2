//! Business logic helpers for managing manual transactions.

use rust_decimal::Decimal;
use tracing::info;

use crate::{
    core::{
        ledger_store::LedgerStore,
        services::{ServiceError, ServiceResult},
    },
    currency::parse_amount,
    domain::Transaction,
    ledger::Ledger,
    storage::Collection,
    time::Clock,
};

/// Raw form input for a manual transaction. The amount is user text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub account_id: String,
    pub description: String,
    pub amount: String,
    pub salary_id: Option<String>,
}

impl TransactionDraft {
    /// Prefills a draft from an existing transaction for editing.
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            account_id: txn.account_id.clone(),
            description: txn.description.clone(),
            amount: txn.amount.to_string(),
            salary_id: txn.salary_id.clone(),
        }
    }
}

/// Provides validated CRUD helpers for ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Adds a new transaction and returns its identifier.
    pub fn add(
        store: &mut LedgerStore,
        clock: &dyn Clock,
        draft: &TransactionDraft,
    ) -> ServiceResult<String> {
        let amount = Self::validate(store.ledger(), draft)?;
        let txn = Transaction::new(
            draft.account_id.clone(),
            draft.description.clone(),
            amount,
            Self::salary_link(draft),
            clock.now(),
        );
        let id = txn.id.clone();
        store.apply(&[Collection::Transactions], |ledger| ledger.transactions.push(txn));
        info!(transaction = %id, "transaction added");
        Ok(id)
    }

    /// Replaces the transaction identified by `id`, keeping the identifier.
    pub fn edit(
        store: &mut LedgerStore,
        clock: &dyn Clock,
        id: &str,
        draft: &TransactionDraft,
    ) -> ServiceResult<()> {
        if store.ledger().transaction(id).is_none() {
            return Err(ServiceError::NotFound(format!("transaction {}", id)));
        }
        let amount = Self::validate(store.ledger(), draft)?;
        let replacement = Transaction::new(
            draft.account_id.clone(),
            draft.description.clone(),
            amount,
            Self::salary_link(draft),
            clock.now(),
        )
        .with_id(id);
        store.apply(&[Collection::Transactions], |ledger| {
            if let Some(slot) = ledger.transactions.iter_mut().find(|txn| txn.id == id) {
                *slot = replacement;
            }
        });
        Ok(())
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(store: &mut LedgerStore, id: &str) -> ServiceResult<Transaction> {
        let position = store
            .transactions()
            .iter()
            .position(|txn| txn.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("transaction {}", id)))?;
        let removed = store.apply(&[Collection::Transactions], |ledger| {
            ledger.transactions.remove(position)
        });
        info!(transaction = %id, "transaction deleted");
        Ok(removed)
    }

    /// Returns a snapshot of the ledger's transactions.
    pub fn list(ledger: &Ledger) -> Vec<&Transaction> {
        ledger.transactions.iter().collect()
    }

    fn validate(ledger: &Ledger, draft: &TransactionDraft) -> ServiceResult<Decimal> {
        if draft.description.trim().is_empty() {
            return Err(ServiceError::Invalid("Description is required".into()));
        }
        if draft.account_id.is_empty() {
            return Err(ServiceError::Invalid("An account must be selected".into()));
        }
        let amount = parse_amount(&draft.amount)
            .ok_or_else(|| ServiceError::Invalid("Amount is not a number".into()))?;
        if ledger.account(&draft.account_id).is_none() {
            return Err(ServiceError::NotFound(format!("account {}", draft.account_id)));
        }
        if let Some(salary_id) = Self::salary_link(draft) {
            if ledger.salary(&salary_id).is_none() {
                return Err(ServiceError::NotFound(format!("salary {}", salary_id)));
            }
        }
        Ok(amount)
    }

    fn salary_link(draft: &TransactionDraft) -> Option<String> {
        draft.salary_id.clone().filter(|id| !id.is_empty())
    }
}
