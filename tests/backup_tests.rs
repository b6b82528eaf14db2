mod common;

use common::{allocate, clock, setup_test_env, submit_salary};
use salary_ledger::{
    backup::{BackupError, BackupService, FsTransport, ShareOutcome},
    config::Config,
    core::{allocation::SalaryWorkflow, services::AccountService, LedgerStore},
    domain::AccountColor,
};
use std::sync::Arc;

#[test]
fn file_backup_restores_into_a_fresh_store() {
    let (mut store, config_manager, base) = setup_test_env();
    let clock = clock();
    let rent = AccountService::create(&mut store, &clock, "Rent", AccountColor::Red).unwrap();
    let mut workflow = SalaryWorkflow::new();
    submit_salary(&mut workflow, &mut store, &clock, "May", "1200,50");
    allocate(&mut workflow, &mut store, &clock, &[(rent.as_str(), "700.25")]);

    let config = config_manager.load().unwrap();
    let transport =
        FsTransport::new(config.resolve_backup_dir(&base)).with_clock(Arc::new(clock));
    let report = BackupService::backup_and_share(&store, &clock, &transport).unwrap();
    assert_eq!(report.share, ShareOutcome::Unavailable);
    assert!(report.message().contains(&report.locator));

    let other_base = common::temp_base();
    let mut restored = LedgerStore::open_with_config(&Config::default(), &other_base).unwrap();
    let picker = FsTransport::new(other_base.join("backups")).with_import_path(&report.locator);
    assert!(BackupService::restore(&mut restored, &picker).unwrap());
    assert_eq!(restored.ledger(), store.ledger());

    let reopened = LedgerStore::open_with_config(&Config::default(), &other_base).unwrap();
    assert_eq!(reopened.ledger(), store.ledger());
}

#[test]
fn rejected_import_leaves_store_untouched() {
    let (mut store, _config, _base) = setup_test_env();
    AccountService::create(&mut store, &clock(), "Keep", AccountColor::Cyan).unwrap();
    let before = store.ledger().clone();

    let err = BackupService::import(
        &mut store,
        r#"{"meta":{"version":1},"data":{"accounts":[],"transactions":"oops","salaries":[]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, BackupError::UnrecognizedStructure(_)));
    assert_eq!(store.ledger(), &before);
}

#[test]
fn null_collection_is_refused_before_anything_is_replaced() {
    let (mut store, _config, _base) = setup_test_env();
    AccountService::create(&mut store, &clock(), "Keep", AccountColor::Orange).unwrap();
    let before = store.ledger().clone();

    let err = BackupService::import(
        &mut store,
        r#"{"data":{"accounts":null,"transactions":[],"salaries":[]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, BackupError::UnrecognizedStructure(_)));
    assert_eq!(store.ledger(), &before);
}

#[test]
fn import_accepts_documents_from_the_mobile_app() {
    let (mut store, _config, _base) = setup_test_env();
    let blob = r##"{
        "meta": { "createdAt": "2024-05-02T10:00:00.000Z", "version": 1 },
        "data": {
            "accounts": [{ "id": "1714644000000", "name": "Casa", "color": "#4CAF50", "createdAt": "2024-05-02T10:00:00.000Z" }],
            "transactions": [{ "id": "salary_1714644000000_1714644100000", "accountId": "1714644000000", "description": "Salary May", "amount": 850.5, "salaryId": "1714644050000", "date": "2024-05-02T10:01:40.000Z", "createdAt": "2024-05-02T10:01:40.000Z" }],
            "salaries": [{ "id": "1714644050000", "name": "May", "amount": 1000, "createdAt": "2024-05-02T10:00:50.000Z" }]
        }
    }"##;
    BackupService::import(&mut store, blob).unwrap();
    assert_eq!(store.accounts()[0].color, AccountColor::Green);
    assert_eq!(store.transactions()[0].salary_id.as_deref(), Some("1714644050000"));
    assert_eq!(store.salaries()[0].name, "May");
}
