use chrono::{DateTime, Duration, TimeZone, Utc};
use crm_purge::configuration::{self, DatabaseConfigs};
use crm_purge::domain::{Customer, NewCustomer, Order};
use crm_purge::repository;
use crm_purge::store::{PgCustomerStore, get_connection_pool};
use crm_purge::telemetry;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::OnceLock;
use uuid::Uuid;

static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::stdout,
            );
            telemetry::init_subscriber(subscriber).expect("Failed to init subscriber");
        } else {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            telemetry::init_subscriber(subscriber).expect("Failed to init subscriber");
        };
    });
}

pub struct TestDatabase {
    pub db_pool: PgPool,
    pub store: PgCustomerStore,
}

impl TestDatabase {
    pub async fn customer(&self, name: &str, order_ages: &[i64]) -> i64 {
        let email = format!("{}-{}@example.com", name.to_lowercase(), Uuid::new_v4());
        let customer = NewCustomer::new(name.to_string(), email, None).unwrap();

        let mut transaction = self.db_pool.begin().await.unwrap();
        let customer_id = repository::insert_customer(&customer, &mut transaction)
            .await
            .unwrap();
        for age in order_ages {
            repository::insert_order(&mut transaction, customer_id, days_ago(*age))
                .await
                .unwrap();
        }
        transaction.commit().await.unwrap();
        customer_id
    }

    pub async fn customer_ids(&self) -> Vec<i64> {
        sqlx::query_scalar("SELECT id FROM customers ORDER BY id")
            .fetch_all(&self.db_pool)
            .await
            .expect("Failed to fetch customer ids")
    }

    pub async fn order_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count orders")
    }

    pub async fn get_customer(&self, customer_id: i64) -> Option<Customer> {
        sqlx::query_as("SELECT id, name, email, phone, created_at FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_optional(&self.db_pool)
            .await
            .expect("Failed to fetch customer")
    }

    pub async fn orders_for(&self, customer_id: i64) -> Vec<Order> {
        sqlx::query_as(
            "SELECT id, customer_id, created_at FROM orders WHERE customer_id = $1 ORDER BY created_at",
        )
        .bind(customer_id)
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to fetch customer orders")
    }

    pub async fn archived_order_count(&self, customer_id: i64) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM archived_orders WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count archived orders")
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub async fn spawn_database() -> TestDatabase {
    init_tracing();

    let configuration = {
        let mut c = configuration::get_config().expect("Failed to read configuration.");
        c.database.database_name = Uuid::new_v4().to_string();
        c
    };

    configure_database(&configuration.database).await;
    let db_pool = get_connection_pool(&configuration.database);

    TestDatabase {
        store: PgCustomerStore::new(db_pool.clone()),
        db_pool,
    }
}

async fn configure_database(config: &DatabaseConfigs) -> PgPool {
    let mut connection = PgConnection::connect_with(&config.connect_options_without_db())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
