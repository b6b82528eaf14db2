pub mod account_service;
pub mod balance_service;
pub mod chart_service;
pub mod salary_service;
pub mod transaction_service;

pub use account_service::{AccountDeletionPreview, AccountRemoval, AccountService};
pub use balance_service::{BalanceScope, BalanceService};
pub use chart_service::{ChartEntry, ChartService, ColorGroup};
pub use salary_service::{SalaryDeletion, SalaryDeletionPreview, SalaryRemoval, SalaryService};
pub use transaction_service::{TransactionDraft, TransactionService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(String),
}
