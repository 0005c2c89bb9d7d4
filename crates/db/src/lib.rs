//! PostgreSQL connection pool factory and startup migration runner.
//!
//! The pool is created once at bootstrap and handed to modules at
//! construction; this crate never retries or translates store errors.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use bookstore_kernel::settings::DatabaseSettings;
use bookstore_kernel::Migration;

/// Establish the shared connection pool from database settings.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .idle_timeout(Duration::from_millis(settings.idle_timeout_ms))
        .acquire_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .connect(&settings.url())
        .await
        .with_context(|| {
            format!(
                "failed to connect to postgres at {}:{}/{}",
                settings.host, settings.port, settings.name
            )
        })?;

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        max_connections = settings.max_connections,
        "connected to PostgreSQL"
    );

    Ok(pool)
}

/// Apply module-contributed migrations in the order collected by the registry.
pub async fn run_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    for (module, migration) in migrations {
        tracing::info!(module = %module, migration = migration.id, "applying migration");

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| {
                format!("failed to apply migration '{}/{}'", module, migration.id)
            })?;
    }

    Ok(())
}
