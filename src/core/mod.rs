pub mod allocation;
pub mod ledger_store;
pub mod services;
pub mod utils;
pub mod view;

pub use ledger_store::LedgerStore;
pub use view::LedgerView;
