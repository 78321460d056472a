//! Seeds the three built-in accounts: `admin`, `maintenance` and `requester`.
//!
//! Passwords are read from `SEED_ADMIN_PASSWORD`, `SEED_MAINTENANCE_PASSWORD`
//! and `SEED_REQUESTER_PASSWORD`. Existing accounts are left untouched.
//!
//! Run with: cargo run --bin seed-users

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use maintenance_api::{
    auth::{AuthConfig, AuthService, NewUser, Role},
    config, db,
};

#[derive(Parser)]
#[command(name = "seed-users", about = "Create the default maintenance desk accounts", version)]
struct Cli {
    /// Overrides the configured `database_url`
    #[arg(long)]
    database_url: Option<String>,

    /// Skip running migrations before seeding
    #[arg(long)]
    skip_migrations: bool,
}

struct SeedAccount {
    username: &'static str,
    display_name: &'static str,
    role: Role,
    password_var: &'static str,
}

const ACCOUNTS: [SeedAccount; 3] = [
    SeedAccount {
        username: "admin",
        display_name: "Administrator",
        role: Role::Admin,
        password_var: "SEED_ADMIN_PASSWORD",
    },
    SeedAccount {
        username: "maintenance",
        display_name: "Maintenance Staff",
        role: Role::Maintenance,
        password_var: "SEED_MAINTENANCE_PASSWORD",
    },
    SeedAccount {
        username: "requester",
        display_name: "Requester",
        role: Role::Requester,
        password_var: "SEED_REQUESTER_PASSWORD",
    },
];

fn password_for(account: &SeedAccount) -> anyhow::Result<String> {
    match std::env::var(account.password_var) {
        Ok(password) if !password.trim().is_empty() => Ok(password),
        _ => bail!(
            "{} must be set to seed the '{}' account",
            account.password_var,
            account.username
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    // Fail before touching the database if any password is missing.
    let passwords = ACCOUNTS
        .iter()
        .map(password_for)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    if !cli.skip_migrations {
        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let auth = AuthService::new(AuthConfig::from_app_config(&cfg), Arc::new(pool));

    for (account, password) in ACCOUNTS.iter().zip(passwords) {
        let (user, created) = auth
            .ensure_user(NewUser {
                username: account.username.to_string(),
                display_name: account.display_name.to_string(),
                email: None,
                role: account.role,
                password,
            })
            .await
            .with_context(|| format!("failed to seed '{}'", account.username))?;

        if created {
            info!(username = %user.username, role = %user.role, "Created user");
        } else {
            info!(username = %user.username, "User already exists; left unchanged");
        }
    }

    Ok(())
}
