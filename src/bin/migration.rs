//! Applies or rolls back the schema migrations.
//!
//! Run with: cargo run --bin migration -- up

use anyhow::Context;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use maintenance_api::{config, db, migrator::Migrator};

#[derive(Parser)]
#[command(name = "migration", about = "Maintenance desk schema migrations")]
struct Cli {
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<MigrationCommand>,
}

#[derive(Subcommand)]
enum MigrationCommand {
    /// Apply all pending migrations (default)
    Up,
    /// Roll back the most recent migration
    Down,
    /// Print applied and pending migrations
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command.unwrap_or(MigrationCommand::Up) {
        MigrationCommand::Up => {
            db::run_migrations(&pool).await?;
            info!("Migrations applied");
        }
        MigrationCommand::Down => {
            Migrator::down(&pool, Some(1)).await?;
            info!("Rolled back one migration");
        }
        MigrationCommand::Status => {
            Migrator::status(&pool).await?;
        }
    }

    Ok(())
}
