use crate::helpers::{now, spawn_database};
use crm_purge::purge::{PurgeSettings, purge_inactive_customers};
use crm_purge::seed::seed;

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn seeding_stores_the_sample_data() {
    let db = spawn_database().await;

    let ids = seed(&db.store, now(), false).await.unwrap();

    assert_eq!(ids.len(), 5);
    assert_eq!(db.customer_ids().await, ids);
    assert_eq!(db.order_count().await, 6);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn a_failed_seed_leaves_the_database_untouched() {
    let db = spawn_database().await;
    let ids = seed(&db.store, now(), false).await.unwrap();

    // Duplicate emails abort the whole transaction
    assert!(seed(&db.store, now(), false).await.is_err());

    assert_eq!(db.customer_ids().await, ids);
}

#[tokio::test]
#[ignore = "requires a running Postgres instance"]
async fn seeded_data_purges_inactive_customers_only() {
    let db = spawn_database().await;
    seed(&db.store, now(), true).await.unwrap();

    let outcome = purge_inactive_customers(&db.store, now(), &PurgeSettings::default())
        .await
        .unwrap();

    assert_eq!(outcome.deleted_customers, 2);
    assert_eq!(db.customer_ids().await.len(), 3);
}
