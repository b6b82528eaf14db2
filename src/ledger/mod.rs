//! In-memory ledger value holding the three persisted collections.

#[allow(clippy::module_inception)]
pub mod ledger;

pub use ledger::{ledger_warnings, Ledger};
