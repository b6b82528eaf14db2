mod common;

use common::{allocate, clock, setup_test_env, submit_salary};
use rust_decimal_macros::dec;
use salary_ledger::{
    core::{
        allocation::SalaryWorkflow,
        services::{
            AccountService, BalanceScope, BalanceService, SalaryDeletion, SalaryService,
            TransactionDraft, TransactionService,
        },
        LedgerStore, LedgerView,
    },
    domain::AccountColor,
};

fn draft(account_id: &str, amount: &str, salary_id: Option<&str>) -> TransactionDraft {
    TransactionDraft {
        account_id: account_id.into(),
        description: "entry".into(),
        amount: amount.into(),
        salary_id: salary_id.map(str::to_string),
    }
}

/// Two accounts funded by one salary plus a manual expense on the first.
fn funded_store() -> (LedgerStore, String, String, String) {
    let (mut store, _config, _base) = setup_test_env();
    let clock = clock();
    let a = AccountService::create(&mut store, &clock, "Home", AccountColor::Orange).unwrap();
    let b = AccountService::create(&mut store, &clock, "Car", AccountColor::Brown).unwrap();
    let mut workflow = SalaryWorkflow::new();
    submit_salary(&mut workflow, &mut store, &clock, "April", "900");
    allocate(
        &mut workflow,
        &mut store,
        &clock,
        &[(a.as_str(), "600"), (b.as_str(), "300")],
    );
    TransactionService::add(&mut store, &clock, &draft(&a, "-45.5", None)).unwrap();
    let salary = store.salaries()[0].id.clone();
    (store, a, b, salary)
}

#[test]
fn deleting_an_account_cascades_to_its_transactions_only() {
    let (mut store, a, b, _) = funded_store();
    let mut view = LedgerView::new();
    view.select_account(Some(a.clone()));
    let total_before = BalanceService::total_balance(store.ledger(), &BalanceScope::All);
    let a_balance = BalanceService::account_balance(store.ledger(), &a, &BalanceScope::All);

    let preview = AccountService::deletion_preview(store.ledger(), &a).unwrap();
    assert_eq!(preview.transaction_count, 2);

    let removal = AccountService::remove(&mut store, &a).unwrap();
    view.on_account_deleted(&removal.account.id);

    assert_eq!(removal.removed_transactions.len(), 2);
    assert_eq!(store.transactions().len(), 1);
    assert!(store.transactions().iter().all(|txn| txn.account_id == b));
    assert_eq!(
        BalanceService::total_balance(store.ledger(), &BalanceScope::All),
        total_before - a_balance
    );
    assert_eq!(view.selected_account(), None);
}

#[test]
fn detaching_a_salary_keeps_every_transaction() {
    let (mut store, _, _, salary) = funded_store();
    let mut view = LedgerView::new();
    view.select_salary(salary.clone());
    let count = store.transactions().len();

    let preview = SalaryService::deletion_preview(store.ledger(), &salary).unwrap();
    assert_eq!(preview.linked_transactions, 2);

    let removal = SalaryService::remove(&mut store, &salary, SalaryDeletion::Detach).unwrap();
    view.on_salary_deleted(&salary);

    assert_eq!(removal.affected_transactions, 2);
    assert_eq!(store.transactions().len(), count);
    assert!(store.transactions().iter().all(|txn| txn.salary_id.is_none()));
    assert!(store.salaries().is_empty());
    assert_eq!(view.scope(), &BalanceScope::All);
}

#[test]
fn deleting_a_salary_with_everything_removes_linked_transactions() {
    let (mut store, a, _, salary) = funded_store();
    SalaryService::remove(&mut store, &salary, SalaryDeletion::DeleteAll).unwrap();
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(
        BalanceService::account_balance(store.ledger(), &a, &BalanceScope::All),
        dec!(-45.5)
    );
}

#[test]
fn scoped_balances_partition_the_unscoped_balance() {
    let (mut store, a, _, salary) = funded_store();
    let clock = clock();
    let id = TransactionService::add(&mut store, &clock, &draft(&a, "12", Some(&salary))).unwrap();

    let ledger = store.ledger();
    let scoped = BalanceService::account_balance(ledger, &a, &BalanceScope::salary(salary.clone()));
    let unlinked: rust_decimal::Decimal = ledger
        .transactions_for_account(&a)
        .filter(|txn| txn.salary_id.is_none())
        .map(|txn| txn.amount)
        .sum();
    assert_eq!(
        scoped + unlinked,
        BalanceService::account_balance(ledger, &a, &BalanceScope::All)
    );

    let before = BalanceService::account_balance(store.ledger(), &a, &BalanceScope::All);
    let removed = TransactionService::remove(&mut store, &id).unwrap();
    assert_eq!(
        BalanceService::account_balance(store.ledger(), &a, &BalanceScope::All),
        before - removed.amount
    );
}
