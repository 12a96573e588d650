pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod fixtures;
pub mod seed;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
pub use config::Config;
use db::Store;
use seed::Seeder;

/// `RUST_LOG` wins over the configured level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    init_tracing(&config.general.log_level);

    match cli.command {
        Some(Commands::InitConfig) => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }

        Some(Commands::Summary) => {
            config.validate()?;
            let store = connect(&config).await?;
            print_summary(&store).await
        }

        Some(Commands::Seed { fixtures, fresh }) => {
            if let Some(dir) = fixtures {
                config.general.fixtures_path = Some(dir.display().to_string());
            }
            config.validate()?;
            cmd_seed(config, fresh).await
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("shopseed - populate the demo shop database");
    println!();
    println!("USAGE:");
    println!("  shopseed [--config <path>] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("  seed [--fixtures <dir>] [--fresh]  Seed every family into the database");
    println!("  summary                            Print row counts of the seeded tables");
    println!("  init-config                        Create default config file");
    println!("  help                               Show this help message");
}

async fn connect(config: &Config) -> anyhow::Result<Store> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .with_context(|| format!("Failed to open database {}", config.general.database_path))?;

    store.ping().await.context("Database is not responding")?;
    Ok(store)
}

async fn cmd_seed(config: Config, fresh: bool) -> anyhow::Result<()> {
    let store = connect(&config).await?;

    info!(
        domain = %config.application.domain,
        fixtures = config.general.fixtures_path.as_deref().unwrap_or("embedded"),
        fresh,
        "Seeding database"
    );

    let report = Seeder::new(store, config).with_fresh(fresh).run().await?;

    println!("{:<20} {:>8} {:>8}", "FAMILY", "CREATED", "FAILED");
    for family in &report.families {
        println!(
            "{:<20} {:>8} {:>8}",
            family.family, family.created, family.failed
        );
    }
    println!(
        "{:<20} {:>8} {:>8}",
        "total",
        report.created(),
        report.failed()
    );
    if report.metadata_files_rewritten > 0 {
        println!(
            "Rewrote base URL in {} metadata file(s)",
            report.metadata_files_rewritten
        );
    }

    Ok(())
}

async fn print_summary(store: &Store) -> anyhow::Result<()> {
    let counts = store.table_counts().await?;

    let rows = [
        ("users", counts.users),
        ("challenges", counts.challenges),
        ("hints", counts.hints),
        ("products", counts.products),
        ("delivery_methods", counts.delivery_methods),
        ("baskets", counts.baskets),
        ("basket_items", counts.basket_items),
        ("complaints", counts.complaints),
        ("recycles", counts.recycles),
        ("memories", counts.memories),
    ];

    for (table, count) in rows {
        println!("{table:<20} {count:>8}");
    }
    Ok(())
}
