//! Salary creation, leftover reallocation and allocation as an explicit state machine.

pub mod engine;
pub mod state;
pub mod workflow;

pub use engine::{AllocationEngine, Step, ALLOCATION_NOTICE};
pub use state::{
    Allocation, AllocationEvent, AllocationState, LeftoverEntry, Reallocation, SalaryForm,
};
pub use workflow::SalaryWorkflow;

/// Reasons an event was refused. The workflow state is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// Blank field, amount over its ceiling or over the salary total.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Precondition(String),
    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}
