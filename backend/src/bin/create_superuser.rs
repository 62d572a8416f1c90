//! Create an administrative account directly in the database.
//!
//! # Examples
//! ```sh
//! RECIPES_DATABASE_URL=postgres://localhost/recipes \
//!   cargo run --bin create-superuser -- --email admin@example.com --password s3cretpass
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use recipe_backend::domain::ports::UserRepository;
use recipe_backend::domain::{CredentialHasher, User};
use recipe_backend::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_migrations,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// `create-superuser` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-superuser",
    about = "Create a staff account with superuser rights",
    version
)]
struct CliArgs {
    /// Login email; the domain part is lowercased.
    #[arg(long, value_name = "email")]
    email: String,
    /// Plain-text password to hash with Argon2.
    #[arg(long, value_name = "password")]
    password: String,
    /// Optional display name.
    #[arg(long, value_name = "name", default_value = "")]
    name: String,
    /// Database connection URL.
    #[arg(long = "database-url", env = "RECIPES_DATABASE_URL", value_name = "url")]
    database_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = CliArgs::parse();
    if args.database_url.trim().is_empty() {
        return Err(eyre!("a database URL is required"));
    }

    run_migrations(&args.database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&args.database_url).with_max_size(1))
        .await
        .wrap_err("create database pool")?;
    let users = DieselUserRepository::new(pool);

    let user = User::create_superuser(
        Some(&args.email),
        &args.password,
        &args.name,
        &CredentialHasher::default(),
    )
    .wrap_err("build superuser")?;
    users.insert(&user).await.wrap_err("store superuser")?;

    info!(user_id = %user.id(), email = %user.email(), "superuser created");
    Ok(())
}
