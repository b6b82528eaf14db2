#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use salary_ledger::{
    config::{Config, ConfigManager},
    core::{
        allocation::{AllocationEvent, SalaryWorkflow},
        LedgerStore,
    },
    time::FixedClock,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated file-backed store and config manager for each test.
pub fn setup_test_env() -> (LedgerStore, ConfigManager, PathBuf) {
    let base = temp_base();
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let store =
        LedgerStore::open_with_config(&Config::default(), &base).expect("open ledger store");
    (store, config_manager, base)
}

pub fn clock() -> FixedClock {
    FixedClock(at(2024, 3, 1))
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Submits a salary through the workflow, leaving it in whatever state follows.
pub fn submit_salary(
    workflow: &mut SalaryWorkflow,
    store: &mut LedgerStore,
    clock: &FixedClock,
    name: &str,
    amount: &str,
) {
    for event in [
        AllocationEvent::BeginSalary,
        AllocationEvent::SetSalaryName(name.into()),
        AllocationEvent::SetSalaryAmount(amount.into()),
        AllocationEvent::SubmitSalary,
    ] {
        workflow
            .dispatch(store, clock, event)
            .expect("salary submission");
    }
}

/// Enters `allocations` and confirms them.
pub fn allocate(
    workflow: &mut SalaryWorkflow,
    store: &mut LedgerStore,
    clock: &FixedClock,
    allocations: &[(&str, &str)],
) -> Option<String> {
    for (account_id, input) in allocations {
        workflow
            .dispatch(
                store,
                clock,
                AllocationEvent::SetAllocation {
                    account_id: account_id.to_string(),
                    input: input.to_string(),
                },
            )
            .expect("allocation input");
    }
    workflow
        .dispatch(store, clock, AllocationEvent::ConfirmAllocation)
        .expect("allocation confirm")
}
