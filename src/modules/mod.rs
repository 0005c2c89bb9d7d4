pub mod books;
pub mod health;

use sqlx::PgPool;

use bookstore_kernel::settings::Settings;
use bookstore_kernel::ModuleRegistry;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, pool: PgPool, settings: &Settings) {
    registry.register(health::create_module(settings.environment.clone()));
    registry.register(books::create_module(pool));
}
