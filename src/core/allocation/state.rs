//! States, events and working memory of the salary allocation workflow.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::{
    currency::{amount_or_zero, checked_sum, saturating_sum},
    domain::{AccountColor, Salary},
};

/// Raw form fields while a salary is being entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalaryForm {
    pub name: String,
    pub amount: String,
}

/// An account still holding money under the previous salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeftoverEntry {
    pub account_id: String,
    pub name: String,
    pub color: AccountColor,
    /// Balance scoped to the previous salary when the workflow started.
    pub available: Decimal,
    /// Normalised amount-to-move as typed.
    pub input: String,
    pub target: Option<String>,
}

impl LeftoverEntry {
    /// Amount to move; unparsed input counts as zero.
    pub fn amount(&self) -> Decimal {
        amount_or_zero(&self.input)
    }

    pub fn exceeds_available(&self) -> bool {
        self.amount() > self.available
    }
}

/// Working state shared by both reallocation steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reallocation {
    pub previous: Salary,
    pub current: Salary,
    pub entries: Vec<LeftoverEntry>,
}

impl Reallocation {
    pub fn total_available(&self) -> Decimal {
        saturating_sum(self.entries.iter().map(|entry| entry.available))
    }

    /// `None` when the amounts to move do not fit in a `Decimal`.
    pub fn total_selected(&self) -> Option<Decimal> {
        checked_sum(self.entries.iter().map(LeftoverEntry::amount))
    }

    pub fn entry(&self, account_id: &str) -> Option<&LeftoverEntry> {
        self.entries.iter().find(|entry| entry.account_id == account_id)
    }

    pub(crate) fn entry_mut(&mut self, account_id: &str) -> Option<&mut LeftoverEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.account_id == account_id)
    }

    /// Entries with a positive amount to move, the ones that need a destination.
    pub fn selected(&self) -> impl Iterator<Item = &LeftoverEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.amount() > Decimal::ZERO)
    }

    pub(crate) fn without_targets(&self) -> Self {
        let mut cleared = self.clone();
        for entry in &mut cleared.entries {
            entry.target = None;
        }
        cleared
    }
}

/// Working state while the new salary is split across accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub salary: Salary,
    /// Normalised input per account id.
    pub inputs: BTreeMap<String, String>,
}

impl Allocation {
    pub fn new(salary: Salary) -> Self {
        Self {
            salary,
            inputs: BTreeMap::new(),
        }
    }

    pub fn amount_for(&self, account_id: &str) -> Decimal {
        self.inputs
            .get(account_id)
            .map(|input| amount_or_zero(input))
            .unwrap_or(Decimal::ZERO)
    }

    /// `None` when the entered amounts do not fit in a `Decimal`.
    pub fn total_entered(&self) -> Option<Decimal> {
        checked_sum(self.inputs.values().map(|input| amount_or_zero(input)))
    }

    /// What is left of the salary; negative once over-allocated.
    pub fn remaining(&self) -> Option<Decimal> {
        self.total_entered()
            .and_then(|total| self.salary.amount.checked_sub(total))
    }
}

/// Where the workflow currently stands.
///
/// The leftover check after salary creation is computed inside the transition and never
/// observed as a state of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllocationState {
    #[default]
    Idle,
    CreatingSalary(SalaryForm),
    ReallocatingAmounts(Reallocation),
    ReallocatingTargets(Reallocation),
    Allocating(Allocation),
}

impl AllocationState {
    pub fn name(&self) -> &'static str {
        match self {
            AllocationState::Idle => "idle",
            AllocationState::CreatingSalary(_) => "creating salary",
            AllocationState::ReallocatingAmounts(_) => "reallocating amounts",
            AllocationState::ReallocatingTargets(_) => "reallocating targets",
            AllocationState::Allocating(_) => "allocating",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AllocationState::Idle)
    }
}

/// User actions fed into the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationEvent {
    BeginSalary,
    SetSalaryName(String),
    SetSalaryAmount(String),
    SubmitSalary,
    SetReallocationAmount { account_id: String, input: String },
    MoveMax { account_id: String },
    ContinueReallocation,
    SkipReallocation,
    ChooseTarget { source_id: String, target_id: String },
    BackToAmounts,
    ConfirmReallocation,
    SetAllocation { account_id: String, input: String },
    ConfirmAllocation,
    Cancel,
}

impl AllocationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AllocationEvent::BeginSalary => "begin salary",
            AllocationEvent::SetSalaryName(_) => "set salary name",
            AllocationEvent::SetSalaryAmount(_) => "set salary amount",
            AllocationEvent::SubmitSalary => "submit salary",
            AllocationEvent::SetReallocationAmount { .. } => "set reallocation amount",
            AllocationEvent::MoveMax { .. } => "move max",
            AllocationEvent::ContinueReallocation => "continue reallocation",
            AllocationEvent::SkipReallocation => "skip reallocation",
            AllocationEvent::ChooseTarget { .. } => "choose target",
            AllocationEvent::BackToAmounts => "back to amounts",
            AllocationEvent::ConfirmReallocation => "confirm reallocation",
            AllocationEvent::SetAllocation { .. } => "set allocation",
            AllocationEvent::ConfirmAllocation => "confirm allocation",
            AllocationEvent::Cancel => "cancel",
        }
    }
}
