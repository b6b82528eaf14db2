use tracing::{debug, info, warn};

use crate::{
    config::Config,
    core::{
        allocation::{AllocationEngine, AllocationError, AllocationEvent, AllocationState},
        ledger_store::LedgerStore,
        services::SalaryService,
    },
    currency::DEFAULT_CURRENCY_SYMBOL,
    storage::Collection,
    time::Clock,
};

/// Drives [`AllocationEngine`] against a live store.
///
/// Accepted steps are applied immediately: a submitted salary is recorded before the
/// user touches any amount, and generated transactions are appended in one write.
#[derive(Debug)]
pub struct SalaryWorkflow {
    state: AllocationState,
    currency_symbol: String,
}

impl Default for SalaryWorkflow {
    fn default() -> Self {
        Self::with_currency_symbol(DEFAULT_CURRENCY_SYMBOL)
    }
}

impl SalaryWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency_symbol(symbol: impl Into<String>) -> Self {
        Self {
            state: AllocationState::Idle,
            currency_symbol: symbol.into(),
        }
    }

    /// Workflow formatting amounts with the configured currency symbol.
    pub fn from_config(config: &Config) -> Self {
        Self::with_currency_symbol(config.currency_symbol.clone())
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    /// Feeds `event` to the engine and applies the outcome.
    ///
    /// Returns the notice to show the user, if the step produced one.
    pub fn dispatch(
        &mut self,
        store: &mut LedgerStore,
        clock: &dyn Clock,
        event: AllocationEvent,
    ) -> Result<Option<String>, AllocationError> {
        let event_name = event.name();
        let step = AllocationEngine::step_with_symbol(
            &self.state,
            event,
            store.ledger(),
            clock,
            &self.currency_symbol,
        )
        .map_err(|err| {
            warn!(state = self.state.name(), event = event_name, error = %err, "event refused");
            err
        })?;

        if let Some(salary) = step.salary {
            SalaryService::record(store, salary);
        }
        if !step.transactions.is_empty() {
            let count = step.transactions.len();
            let transactions = step.transactions;
            store.apply(&[Collection::Transactions], |ledger| {
                ledger.transactions.extend(transactions)
            });
            info!(count, "workflow transactions recorded");
        }

        debug!(
            from = self.state.name(),
            to = step.state.name(),
            event = event_name,
            "allocation transition"
        );
        self.state = step.state;
        Ok(step.notice)
    }
}
