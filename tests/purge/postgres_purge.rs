use crate::helpers::{days_ago, now, spawn_database};
use claims::assert_none;
use crm_purge::domain::OrderPolicy;
use crm_purge::purge::{PurgeSettings, preview_inactive_customers, purge_inactive_customers, run};
use crm_purge::purge_log::PurgeLog;
use crm_purge::repository;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn inactive_customers_are_deleted_and_active_ones_kept() {
    let db = spawn_database().await;
    let alice = db.customer("Alice", &[400]).await;
    let bob = db.customer("Bob", &[10]).await;
    let carol = db.customer("Carol", &[]).await;
    let david = db.customer("David", &[365]).await;

    let outcome = purge_inactive_customers(&db.store, now(), &PurgeSettings::default())
        .await
        .unwrap();

    assert_eq!(outcome.deleted_customers, 2);
    assert_eq!(outcome.deleted_orders, 1);
    let remaining = db.customer_ids().await;
    assert_eq!(remaining, vec![bob, david]);
    assert!(!remaining.contains(&alice));
    assert!(!remaining.contains(&carol));
    assert_eq!(db.order_count().await, 2);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn a_second_purge_deletes_nothing() {
    let db = spawn_database().await;
    db.customer("Alice", &[400]).await;
    db.customer("Carol", &[]).await;

    let first = purge_inactive_customers(&db.store, now(), &PurgeSettings::default())
        .await
        .unwrap();
    let second = purge_inactive_customers(&db.store, now(), &PurgeSettings::default())
        .await
        .unwrap();

    assert_eq!(first.deleted_customers, 2);
    assert_eq!(second.deleted_customers, 0);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn archive_policy_keeps_a_copy_of_the_orders() {
    let db = spawn_database().await;
    let alice = db.customer("Alice", &[400, 500]).await;
    let settings = PurgeSettings {
        order_policy: OrderPolicy::Archive,
        ..PurgeSettings::default()
    };

    let outcome = purge_inactive_customers(&db.store, now(), &settings)
        .await
        .unwrap();

    assert_eq!(outcome.archived_orders, 2);
    assert_eq!(db.order_count().await, 0);
    assert_eq!(db.archived_order_count(alice).await, 2);
    assert_none!(db.get_customer(alice).await);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn protect_policy_keeps_customers_with_order_history() {
    let db = spawn_database().await;
    let alice = db.customer("Alice", &[400]).await;
    db.customer("Carol", &[]).await;
    let settings = PurgeSettings {
        order_policy: OrderPolicy::Protect,
        ..PurgeSettings::default()
    };

    let outcome = purge_inactive_customers(&db.store, now(), &settings)
        .await
        .unwrap();

    assert_eq!(outcome.deleted_customers, 1);
    assert_eq!(outcome.retained_customers, 1);
    assert_eq!(db.customer_ids().await, vec![alice]);
    assert_eq!(db.orders_for(alice).await.len(), 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn dry_run_deletes_nothing() {
    let db = spawn_database().await;
    let alice = db.customer("Alice", &[400]).await;
    db.customer("Bob", &[10]).await;

    let candidates = preview_inactive_customers(&db.store, now(), &PurgeSettings::default())
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].customer.id, alice);
    assert_eq!(candidates[0].historical_orders, 1);
    assert_eq!(db.customer_ids().await.len(), 2);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn run_records_the_count_in_the_log_file() {
    let db = spawn_database().await;
    db.customer("Alice", &[400]).await;
    db.customer("Carol", &[]).await;
    db.customer("David", &[]).await;
    let log = PurgeLog::new(std::env::temp_dir().join(format!("purge-{}.txt", Uuid::new_v4())));

    run(&db.store, &log, now(), &PurgeSettings::default())
        .await
        .unwrap();

    let contents = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.ends_with(" - Deleted 3 inactive customers\n"));
    std::fs::remove_file(log.path()).unwrap();
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn an_order_committed_while_the_purge_waits_keeps_the_customer() {
    let db = spawn_database().await;
    let alice = db.customer("Alice", &[400]).await;
    let carol = db.customer("Carol", &[]).await;

    // The pending insert holds a key-share lock on Alice's row
    let mut order_transaction = db.db_pool.begin().await.unwrap();
    repository::insert_order(&mut order_transaction, alice, days_ago(1))
        .await
        .unwrap();

    let store = db.store.clone();
    let purge = tokio::spawn(async move {
        purge_inactive_customers(&store, now(), &PurgeSettings::default()).await
    });
    tokio::time::sleep(Duration::from_millis(500)).await;
    order_transaction.commit().await.unwrap();

    let outcome = purge.await.unwrap().unwrap();

    assert_eq!(outcome.deleted_customers, 1);
    assert_eq!(outcome.deleted_orders, 0);
    assert_eq!(db.customer_ids().await, vec![alice]);
    assert_none!(db.get_customer(carol).await);
    assert_eq!(db.orders_for(alice).await.len(), 2);
}
