//! Salary bookkeeping outside the allocation workflow: recording and deletion.

use tracing::info;

use crate::{
    core::{
        ledger_store::LedgerStore,
        services::{ServiceError, ServiceResult},
    },
    domain::Salary,
    ledger::Ledger,
    storage::Collection,
};

/// What happens to the transactions linked to a deleted salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryDeletion {
    /// Keep the transactions, clearing their salary link.
    Detach,
    /// Delete every transaction linked to the salary.
    DeleteAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryDeletionPreview {
    pub salary_id: String,
    pub name: String,
    pub linked_transactions: usize,
}

impl SalaryDeletionPreview {
    pub fn message(&self) -> String {
        format!(
            "Delete the salary \"{}\"?\n\nWhat should happen to its {} linked transactions?",
            self.name, self.linked_transactions
        )
    }
}

#[derive(Debug, Clone)]
pub struct SalaryRemoval {
    pub salary: Salary,
    pub mode: SalaryDeletion,
    /// Transactions detached or deleted, depending on `mode`.
    pub affected_transactions: usize,
}

pub struct SalaryService;

impl SalaryService {
    /// Appends a salary to the ledger.
    pub fn record(store: &mut LedgerStore, salary: Salary) {
        let id = salary.id.clone();
        store.apply(&[Collection::Salaries], |ledger| ledger.salaries.push(salary));
        info!(salary = %id, "salary recorded");
    }

    pub fn deletion_preview(ledger: &Ledger, id: &str) -> ServiceResult<SalaryDeletionPreview> {
        let salary = ledger
            .salary(id)
            .ok_or_else(|| ServiceError::NotFound(format!("salary {}", id)))?;
        Ok(SalaryDeletionPreview {
            salary_id: salary.id.clone(),
            name: salary.name.clone(),
            linked_transactions: ledger.transactions_for_salary(id).count(),
        })
    }

    pub fn remove(
        store: &mut LedgerStore,
        id: &str,
        mode: SalaryDeletion,
    ) -> ServiceResult<SalaryRemoval> {
        let position = store
            .salaries()
            .iter()
            .position(|salary| salary.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("salary {}", id)))?;

        let (salary, affected) =
            store.apply(&[Collection::Salaries, Collection::Transactions], |ledger| {
                let salary = ledger.salaries.remove(position);
                let affected = match mode {
                    SalaryDeletion::Detach => {
                        let mut detached = 0;
                        for txn in ledger.transactions.iter_mut().filter(|t| t.is_linked_to(id)) {
                            txn.salary_id = None;
                            detached += 1;
                        }
                        detached
                    }
                    SalaryDeletion::DeleteAll => {
                        let before = ledger.transactions.len();
                        ledger.transactions.retain(|txn| !txn.is_linked_to(id));
                        before - ledger.transactions.len()
                    }
                };
                (salary, affected)
            });
        info!(salary = %id, ?mode, affected, "salary deleted");
        Ok(SalaryRemoval {
            salary,
            mode,
            affected_transactions: affected,
        })
    }

    pub fn list(ledger: &Ledger) -> Vec<&Salary> {
        ledger.salaries.iter().collect()
    }
}
