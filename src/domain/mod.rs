pub mod account;
pub mod common;
pub mod salary;
pub mod transaction;

pub use account::{Account, AccountColor};
pub use common::new_id;
pub use salary::Salary;
pub use transaction::Transaction;
