//! Physical transaction lifecycles observed through the journal.

use pretty_assertions::assert_eq;
use std::sync::Arc;
use txprop_core::NewRecord;
use txprop_store::RecordStore;
use txprop_tests::prelude::*;
use txprop_transaction::{TransactionError, TransactionManager};

#[test]
fn test_recover_with_independent_log_lifecycle() {
    // GIVEN / WHEN
    let outcome = Scenario::new("bad-log")
        .mode(OrchestrationMode::V2)
        .log_repository(NEW)
        .run()
        .unwrap();

    // THEN
    assert_eq!(
        event_kinds(&outcome.events),
        vec![
            "begin",
            "join",
            "release",
            "suspend",
            "begin",
            "mark_rollback_only",
            "rollback",
            "resume",
            "commit",
        ]
    );
}

#[test]
fn test_recover_with_shared_log_lifecycle() {
    // GIVEN / WHEN
    let outcome = Scenario::new("bad-log")
        .mode(OrchestrationMode::V2)
        .run()
        .unwrap();

    // THEN the joined log context poisons the service's transaction
    assert_eq!(
        event_kinds(&outcome.events),
        vec![
            "begin",
            "join",
            "release",
            "join",
            "mark_rollback_only",
            "release",
            "rollback",
        ]
    );
}

#[test]
fn test_outer_off_lifecycle_has_two_owners() {
    let outcome = Scenario::new("grace").service(OFF).run().unwrap();

    assert_eq!(
        event_kinds(&outcome.events),
        vec!["begin", "commit", "begin", "commit"]
    );
}

#[test]
fn test_double_end_through_store_flow() {
    // GIVEN
    let store = Arc::new(RecordStore::named("member"));
    let mut tx = TransactionManager::new();
    let ctx = tx.begin(PropagationMode::JoinOrCreate);
    store.save(&mut tx, NewRecord::new("heidi", "heidi")).unwrap();
    tx.commit(&ctx).unwrap();

    // WHEN
    let again = tx.end(&ctx);
    let mark = tx.mark_rollback_only(&ctx);

    // THEN
    assert_eq!(again, Err(TransactionError::DoubleEnd { context: ctx.id() }));
    assert_eq!(mark, Err(TransactionError::DoubleEnd { context: ctx.id() }));
    assert!(store.find("heidi").is_some());
}

#[test]
fn test_shared_manager_across_calls_accumulates_journal() {
    // GIVEN
    let service = MemberService::in_memory().unwrap();
    let config = ServiceConfig::default();
    let mut tx = TransactionManager::new();

    // WHEN
    service
        .orchestrate_in(&mut tx, OrchestrationMode::V1, "ivan", &config)
        .unwrap();
    service
        .orchestrate_in(&mut tx, OrchestrationMode::V1, "judy", &config)
        .unwrap();

    // THEN
    let stats = tx.stats();
    assert_eq!((stats.transactions_begun, stats.committed), (2, 2));
    assert!(!tx.is_active());
}
