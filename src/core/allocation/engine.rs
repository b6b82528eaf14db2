//! Pure transition function of the salary workflow.
//!
//! [`AllocationEngine::step`] never touches storage. It reads the ledger, returns the next
//! state and hands back whatever must be recorded: the new salary on submission, the
//! generated transactions on confirmation. On error the caller keeps its current state,
//! which preserves every entered amount and target for correction.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    core::{
        allocation::{
            state::{
                Allocation, AllocationEvent, AllocationState, LeftoverEntry, Reallocation,
                SalaryForm,
            },
            AllocationError,
        },
        services::balance_service::{BalanceScope, BalanceService},
    },
    currency::{format_amount, normalize_decimal, parse_amount, DEFAULT_CURRENCY_SYMBOL},
    domain::{Salary, Transaction},
    ledger::Ledger,
    time::Clock,
};

pub const ALLOCATION_NOTICE: &str = "Salary allocated successfully";
const UNKNOWN_ACCOUNT: &str = "Unknown account";
const AMOUNTS_TOO_LARGE: &str = "Amounts are too large to add up";

/// Outcome of one accepted event.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: AllocationState,
    /// Salary to record, set only when a salary is submitted.
    pub salary: Option<Salary>,
    /// Transactions to append, in emission order.
    pub transactions: Vec<Transaction>,
    /// Message for the user once the step has been applied.
    pub notice: Option<String>,
}

impl Step {
    fn to(state: AllocationState) -> Self {
        Self {
            state,
            salary: None,
            transactions: Vec::new(),
            notice: None,
        }
    }
}

pub struct AllocationEngine;

impl AllocationEngine {
    /// [`Self::step_with_symbol`] with amounts in messages formatted in euro.
    pub fn step(
        state: &AllocationState,
        event: AllocationEvent,
        ledger: &Ledger,
        clock: &dyn Clock,
    ) -> Result<Step, AllocationError> {
        Self::step_with_symbol(state, event, ledger, clock, DEFAULT_CURRENCY_SYMBOL)
    }

    /// Applies `event` to `state`; `symbol` is the currency shown in notices and errors.
    pub fn step_with_symbol(
        state: &AllocationState,
        event: AllocationEvent,
        ledger: &Ledger,
        clock: &dyn Clock,
        symbol: &str,
    ) -> Result<Step, AllocationError> {
        use AllocationEvent as E;
        use AllocationState as S;

        match (state, event) {
            (_, E::Cancel) => Ok(Step::to(Self::cancel(state))),
            (S::Idle, E::BeginSalary) => Ok(Step::to(S::CreatingSalary(SalaryForm::default()))),
            (S::CreatingSalary(form), E::SetSalaryName(name)) => {
                let mut form = form.clone();
                form.name = name;
                Ok(Step::to(S::CreatingSalary(form)))
            }
            (S::CreatingSalary(form), E::SetSalaryAmount(input)) => {
                let mut form = form.clone();
                form.amount = normalize_decimal(&input);
                Ok(Step::to(S::CreatingSalary(form)))
            }
            (S::CreatingSalary(form), E::SubmitSalary) => Self::submit_salary(form, ledger, clock),
            (S::ReallocatingAmounts(work), E::SetReallocationAmount { account_id, input }) => {
                Self::set_reallocation_amount(work, &account_id, &input)
                    .map(|work| Step::to(S::ReallocatingAmounts(work)))
            }
            (S::ReallocatingAmounts(work), E::MoveMax { account_id }) => {
                let mut work = work.clone();
                let entry = work
                    .entry_mut(&account_id)
                    .ok_or_else(|| no_leftover(&account_id))?;
                entry.input = entry.available.normalize().to_string();
                Ok(Step::to(S::ReallocatingAmounts(work)))
            }
            (S::ReallocatingAmounts(work), E::ContinueReallocation) => {
                Self::validate_amounts(work, symbol)?;
                Ok(Step::to(S::ReallocatingTargets(work.clone())))
            }
            (S::ReallocatingAmounts(work), E::SkipReallocation) => Ok(Step::to(S::Allocating(
                Allocation::new(work.current.clone()),
            ))),
            (S::ReallocatingTargets(work), E::ChooseTarget { source_id, target_id }) => {
                if ledger.account(&target_id).is_none() {
                    return Err(AllocationError::Validation(format!(
                        "Account {} does not exist",
                        target_id
                    )));
                }
                let mut work = work.clone();
                let entry = work
                    .entry_mut(&source_id)
                    .ok_or_else(|| no_leftover(&source_id))?;
                entry.target = Some(target_id);
                Ok(Step::to(S::ReallocatingTargets(work)))
            }
            (S::ReallocatingTargets(work), E::BackToAmounts) => {
                Ok(Step::to(S::ReallocatingAmounts(work.clone())))
            }
            (S::ReallocatingTargets(work), E::ConfirmReallocation) => {
                Self::confirm_reallocation(work, ledger, clock, symbol)
            }
            (S::Allocating(work), E::SetAllocation { account_id, input }) => {
                Self::set_allocation(work, ledger, &account_id, &input)
                    .map(|work| Step::to(S::Allocating(work)))
            }
            (S::Allocating(work), E::ConfirmAllocation) => {
                Self::confirm_allocation(work, ledger, clock)
            }
            (state, event) => Err(AllocationError::InvalidTransition {
                state: state.name(),
                event: event.name(),
            }),
        }
    }

    /// Drops the working state of the current step.
    ///
    /// Target selection falls back to amount entry with targets cleared. Every other step
    /// returns to idle; a salary that was already recorded stays recorded.
    fn cancel(state: &AllocationState) -> AllocationState {
        match state {
            AllocationState::ReallocatingTargets(work) => {
                AllocationState::ReallocatingAmounts(work.without_targets())
            }
            _ => AllocationState::Idle,
        }
    }

    fn submit_salary(
        form: &SalaryForm,
        ledger: &Ledger,
        clock: &dyn Clock,
    ) -> Result<Step, AllocationError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AllocationError::Validation("Salary name is required".into()));
        }
        let amount = parse_amount(&form.amount).ok_or_else(|| {
            AllocationError::Validation("Salary amount must be a number".into())
        })?;
        if ledger.accounts.is_empty() {
            return Err(AllocationError::Precondition(
                "Create at least one account before adding a salary".into(),
            ));
        }

        let salary = Salary::new(name, amount, clock.now());
        let leftovers = match ledger.last_salary() {
            Some(previous) => Self::leftovers(ledger, previous),
            None => Vec::new(),
        };

        let state = match ledger.last_salary() {
            Some(previous) if !leftovers.is_empty() => {
                debug!(
                    previous = %previous.id,
                    accounts = leftovers.len(),
                    "leftovers found under previous salary"
                );
                AllocationState::ReallocatingAmounts(Reallocation {
                    previous: previous.clone(),
                    current: salary.clone(),
                    entries: leftovers,
                })
            }
            _ => AllocationState::Allocating(Allocation::new(salary.clone())),
        };

        Ok(Step {
            state,
            salary: Some(salary),
            transactions: Vec::new(),
            notice: None,
        })
    }

    /// Accounts with a positive balance scoped to `previous`, in account order.
    fn leftovers(ledger: &Ledger, previous: &Salary) -> Vec<LeftoverEntry> {
        let scope = BalanceScope::salary(previous.id.clone());
        ledger
            .accounts
            .iter()
            .filter_map(|account| {
                let available = BalanceService::account_balance(ledger, &account.id, &scope);
                (available > Decimal::ZERO).then(|| LeftoverEntry {
                    account_id: account.id.clone(),
                    name: account.name.clone(),
                    color: account.color,
                    available,
                    input: String::new(),
                    target: None,
                })
            })
            .collect()
    }

    /// Values outside `[0, available]` are ignored and leave the entry as it was.
    fn set_reallocation_amount(
        work: &Reallocation,
        account_id: &str,
        input: &str,
    ) -> Result<Reallocation, AllocationError> {
        let mut work = work.clone();
        let entry = work
            .entry_mut(account_id)
            .ok_or_else(|| no_leftover(account_id))?;
        let cleaned = normalize_decimal(input);
        match parse_amount(&cleaned) {
            Some(value) if value > entry.available || value < Decimal::ZERO => {
                debug!(account = account_id, %value, "reallocation amount out of range ignored");
            }
            _ => entry.input = cleaned,
        }
        Ok(work)
    }

    fn validate_amounts(work: &Reallocation, symbol: &str) -> Result<(), AllocationError> {
        let total = work
            .total_selected()
            .ok_or_else(|| AllocationError::Validation(AMOUNTS_TOO_LARGE.into()))?;
        if total <= Decimal::ZERO {
            return Err(AllocationError::Validation(
                "Enter an amount to move before continuing".into(),
            ));
        }
        let problems: Vec<String> = work
            .entries
            .iter()
            .filter(|entry| entry.exceeds_available())
            .map(|entry| {
                format!(
                    "{}: cannot move {} (available: {})",
                    entry.name,
                    format_amount(entry.amount(), symbol),
                    format_amount(entry.available, symbol)
                )
            })
            .collect();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AllocationError::Validation(problems.join("\n")))
        }
    }

    fn confirm_reallocation(
        work: &Reallocation,
        ledger: &Ledger,
        clock: &dyn Clock,
        symbol: &str,
    ) -> Result<Step, AllocationError> {
        let now = clock.now();
        let millis = now.timestamp_millis();
        let route = format!("({} → {})", work.previous.name, work.current.name);
        let mut ids = IdAllocator::new(ledger);
        let mut counter = 0u32;
        let mut total = Decimal::ZERO;
        let mut transactions = Vec::new();

        for entry in work.selected() {
            let Some(target_id) = entry.target.as_deref() else {
                continue;
            };
            let amount = entry.amount();
            total = total
                .checked_add(amount)
                .ok_or_else(|| AllocationError::Validation(AMOUNTS_TOO_LARGE.into()))?;

            let source_name = ledger
                .account_name(&entry.account_id)
                .unwrap_or(UNKNOWN_ACCOUNT);
            transactions.push(
                Transaction::new(
                    entry.account_id.clone(),
                    format!("Reallocation from \"{}\" {}", source_name, route),
                    -amount,
                    Some(work.previous.id.clone()),
                    now,
                )
                .with_id(ids.claim(format!(
                    "realloc_out_{}_{}_{}",
                    entry.account_id, millis, counter
                ))),
            );
            counter += 1;

            let target_name = ledger.account_name(target_id).unwrap_or(UNKNOWN_ACCOUNT);
            transactions.push(
                Transaction::new(
                    target_id,
                    format!("Reallocation to \"{}\" {}", target_name, route),
                    amount,
                    Some(work.current.id.clone()),
                    now,
                )
                .with_id(ids.claim(format!("realloc_in_{}_{}_{}", target_id, millis, counter))),
            );
            counter += 1;
        }

        if transactions.is_empty() {
            return Err(AllocationError::Validation(
                "Choose a destination account for at least one amount".into(),
            ));
        }

        Ok(Step {
            state: AllocationState::Allocating(Allocation::new(work.current.clone())),
            salary: None,
            transactions,
            notice: Some(format!(
                "Reallocated {} from {} to {}",
                format_amount(total, symbol),
                work.previous.name,
                work.current.name
            )),
        })
    }

    /// Negative values are ignored at input time.
    fn set_allocation(
        work: &Allocation,
        ledger: &Ledger,
        account_id: &str,
        input: &str,
    ) -> Result<Allocation, AllocationError> {
        if ledger.account(account_id).is_none() {
            return Err(AllocationError::Validation(format!(
                "Account {} does not exist",
                account_id
            )));
        }
        let mut work = work.clone();
        let cleaned = normalize_decimal(input);
        match parse_amount(&cleaned) {
            Some(value) if value < Decimal::ZERO => {
                debug!(account = account_id, %value, "negative allocation ignored");
            }
            _ => {
                work.inputs.insert(account_id.to_string(), cleaned);
            }
        }
        Ok(work)
    }

    /// Allocating exactly the salary amount is accepted; anything above it is refused.
    fn confirm_allocation(
        work: &Allocation,
        ledger: &Ledger,
        clock: &dyn Clock,
    ) -> Result<Step, AllocationError> {
        let total = work
            .total_entered()
            .ok_or_else(|| AllocationError::Validation(AMOUNTS_TOO_LARGE.into()))?;
        if total > work.salary.amount {
            return Err(AllocationError::Validation(
                "Allocated total exceeds the available salary".into(),
            ));
        }

        let now = clock.now();
        let millis = now.timestamp_millis();
        let mut ids = IdAllocator::new(ledger);
        let mut transactions = Vec::new();
        for account in &ledger.accounts {
            let amount = work.amount_for(&account.id);
            if amount <= Decimal::ZERO {
                continue;
            }
            transactions.push(
                Transaction::new(
                    account.id.clone(),
                    format!("Salary {}", work.salary.name),
                    amount,
                    Some(work.salary.id.clone()),
                    now,
                )
                .with_id(ids.claim(format!("salary_{}_{}", account.id, millis))),
            );
        }

        Ok(Step {
            state: AllocationState::Idle,
            salary: None,
            transactions,
            notice: Some(ALLOCATION_NOTICE.to_string()),
        })
    }
}

/// Hands out transaction ids not yet present in the ledger nor issued in the same step.
struct IdAllocator<'a> {
    ledger: &'a Ledger,
    issued: HashSet<String>,
}

impl<'a> IdAllocator<'a> {
    fn new(ledger: &'a Ledger) -> Self {
        Self {
            ledger,
            issued: HashSet::new(),
        }
    }

    fn is_taken(&self, id: &str) -> bool {
        self.issued.contains(id) || self.ledger.transaction(id).is_some()
    }

    /// Returns `base`, or `base_<n>` with the smallest free `n` when `base` is taken.
    fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.is_taken(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.issued.insert(candidate.clone());
        candidate
    }
}

fn no_leftover(account_id: &str) -> AllocationError {
    AllocationError::Validation(format!("Account {} has no leftover to move", account_id))
}
