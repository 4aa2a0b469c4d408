mod app;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use brewdex_core::{
    catalog::{loader, CatalogStore, CatalogSync},
    config::{self, AppConfig, DataSource},
    i18n::TranslationDir,
    prefs::PrefsStore,
    remote::RemoteCatalog,
};
use tokio::sync::mpsc;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let prefs_store = PrefsStore::new(PrefsStore::default_path());
    let prefs = prefs_store.load();

    let translation_dir = TranslationDir::new(config.translations_dir.clone());
    let translations = translation_dir.load(&prefs.language);

    let catalog = match config.data_source {
        DataSource::Local => loader::load_or_empty(config.data_file()),
        DataSource::Remote => RemoteCatalog::new(config.mirror()).catalog_or_empty().await,
    };
    let store = CatalogStore::new(catalog);
    store.set_sort(&prefs.sort);

    let (sync_tx, sync_rx) = mpsc::channel(8);
    if config.data_source == DataSource::Local {
        let sync = CatalogSync::new(config.data_file());
        tokio::spawn(async move {
            if let Err(err) = sync.run(sync_tx).await {
                tracing::error!("Catalog sync task error: {err}");
            }
        });
    }

    let initial_route = std::env::args().nth(1).unwrap_or_default();
    let mut app = app::BrewdexApp::new(
        config,
        store,
        prefs_store,
        prefs,
        translation_dir,
        translations,
    );
    app.attach_sync(sync_rx);
    app.run(&initial_route).await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("brewdex.log");

    let env_filter = EnvFilter::from_default_env();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
