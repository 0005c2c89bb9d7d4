mod modules;
mod utils;

use anyhow::Context;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;

    tracing::info!(
        env = ?settings.environment,
        db_host = %settings.database.host,
        db_name = %settings.database.name,
        "bookstore bootstrap starting"
    );

    let pool = bookstore_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool.clone(), &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;

    bookstore_db::run_migrations(&pool, &registry.collect_migrations()).await?;

    registry.start_all(&ctx).await?;

    // Serves until a shutdown signal arrives.
    bookstore_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    pool.close().await;

    tracing::info!("bookstore shutdown complete");
    Ok(())
}
