use std::sync::Arc;

use anyhow::Context;
use libris_app::view::{ConsoleView, OutputFormat};
use libris_app::Library;
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        store = %settings.store.uri(),
        database = %settings.store.database,
        "libris-app bootstrap starting"
    );

    let view = Arc::new(ConsoleView::new(OutputFormat::Text));
    let library = Library::connect(&settings.store, view)
        .await
        .with_context(|| format!("failed to connect to {}", settings.store.uri()))?;

    let outcome = library.startup().await;
    library.close().await;
    outcome.with_context(|| "failed to load library contents")?;

    tracing::info!("libris-app bootstrap complete");
    Ok(())
}
