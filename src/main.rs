use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use crm_purge::configuration::{Configuration, get_config};
use crm_purge::domain::OrderPolicy;
use crm_purge::purge::{self, PurgeSettings};
use crm_purge::purge_log::PurgeLog;
use crm_purge::seed;
use crm_purge::store::{PgCustomerStore, get_connection_pool};
use crm_purge::telemetry::{get_subscriber, init_subscriber};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Defaults to `purge` with the configured settings
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Delete customers without an order in the inactivity window
    Purge(PurgeArgs),
    /// Apply the database migrations
    Migrate,
    /// Load the sample customers and orders
    Seed {
        /// Remove all customers and orders first
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Default, Args)]
struct PurgeArgs {
    /// Only list the customers that would be deleted
    #[arg(long)]
    dry_run: bool,

    /// Days without an order after which a customer is purged
    #[arg(long)]
    older_than: Option<u32>,

    /// What to do with the orders of purged customers
    #[arg(long, value_enum)]
    order_policy: Option<OrderPolicy>,

    /// File the purge count is appended to
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("crm-purge".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let cli = Cli::parse();
    let configuration = get_config().context("Failed to read configuration")?;
    let store = PgCustomerStore::new(get_connection_pool(&configuration.database));

    match cli.command.unwrap_or(Commands::Purge(PurgeArgs::default())) {
        Commands::Purge(args) => run_purge(&store, &configuration, args).await?,
        Commands::Migrate => {
            sqlx::migrate!("./migrations")
                .run(store.pool())
                .await
                .context("Failed to migrate the database")?;
            tracing::info!("Database migrations applied");
        }
        Commands::Seed { reset } => {
            seed::seed(&store, Utc::now(), reset).await?;
        }
    }

    Ok(())
}

async fn run_purge(
    store: &PgCustomerStore,
    configuration: &Configuration,
    args: PurgeArgs,
) -> Result<(), anyhow::Error> {
    let settings = PurgeSettings {
        inactivity_days: args
            .older_than
            .unwrap_or(configuration.purge.inactivity_days),
        order_policy: args
            .order_policy
            .unwrap_or(configuration.purge.order_policy),
    };
    let now = Utc::now();

    if args.dry_run {
        let candidates = purge::preview_inactive_customers(store, now, &settings).await?;
        tracing::info!(candidates = candidates.len(), "Dry run finished, nothing deleted");
        return Ok(());
    }

    let log = PurgeLog::new(
        args.log_file
            .unwrap_or_else(|| configuration.purge.log_file.clone()),
    );
    purge::run(store, &log, now, &settings).await?;
    Ok(())
}
