mod modules;

use std::sync::Arc;

use anyhow::Context;
use lectern_kernel::settings::{LogFormat, Settings};
use lectern_kernel::{InitCtx, ModuleRegistry};
use lectern_store::{memory::sample_catalog, BookStore, MemoryStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load lectern settings")?;
    init_tracing(&settings);

    tracing::info!(
        env = ?settings.environment,
        "lectern bootstrap starting"
    );

    let store = Arc::new(MemoryStore::new());
    if settings.store.seed_sample_data {
        seed_catalog(store.as_ref())
            .await
            .with_context(|| "failed to seed sample catalog")?;
    }

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    lectern_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match settings.telemetry.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn seed_catalog(store: &dyn BookStore) -> anyhow::Result<()> {
    for book in sample_catalog() {
        store.insert(book).await?;
    }
    tracing::info!("sample catalog seeded");
    Ok(())
}
