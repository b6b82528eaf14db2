//! What the user is currently looking at: one account, and the total or one salary.

use tracing::debug;

use crate::core::services::BalanceScope;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerView {
    selected_account: Option<String>,
    scope: BalanceScope,
}

impl LedgerView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> &BalanceScope {
        &self.scope
    }

    pub fn selected_account(&self) -> Option<&str> {
        self.selected_account.as_deref()
    }

    pub fn select_salary(&mut self, salary_id: impl Into<String>) {
        self.scope = BalanceScope::salary(salary_id);
    }

    pub fn show_total(&mut self) {
        self.scope = BalanceScope::All;
    }

    pub fn select_account(&mut self, account_id: Option<String>) {
        self.selected_account = account_id;
    }

    /// Clears the selection if it pointed at the deleted account.
    pub fn on_account_deleted(&mut self, account_id: &str) {
        if self.selected_account.as_deref() == Some(account_id) {
            debug!(account = account_id, "selected account deleted, clearing selection");
            self.selected_account = None;
        }
    }

    /// Falls back to the total view if the deleted salary was scoping it.
    pub fn on_salary_deleted(&mut self, salary_id: &str) {
        if matches!(&self.scope, BalanceScope::BySalary(id) if id == salary_id) {
            debug!(salary = salary_id, "scoped salary deleted, showing total");
            self.scope = BalanceScope::All;
        }
    }
}
