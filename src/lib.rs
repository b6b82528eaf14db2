#![doc(test(attr(deny(warnings))))]

//! Salary Ledger keeps spending accounts, their transactions and the salaries that fund
//! them, and drives the workflow that splits each new salary across accounts after
//! moving whatever the previous salary left behind.

pub mod backup;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter and emits a startup info log.
pub fn init() {
    init_with(&config::Config::default());
}

/// Like [`init`] but filters logs with `config.log_filter`. Only the first call takes effect.
pub fn init_with(config: &config::Config) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(&config.log_filter);
        tracing::info!(filter = %config.log_filter, "Salary ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    #[test]
    fn init_does_not_panic() {
        super::init();
    }

    #[test]
    fn init_with_config_filter_does_not_panic() {
        let config = Config {
            log_filter: "salary_ledger=debug".into(),
            ..Config::default()
        };
        super::init_with(&config);
        super::init_with(&Config::default());
    }
}
