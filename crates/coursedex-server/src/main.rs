//! coursedex-server: serve the catalog search API.

use anyhow::Context;
use coursedex_core::Config;
use coursedex_loader::Loader;
use coursedex_server::AppState;
use tracing::info;

fn main() -> anyhow::Result<()> {
    coursedex_core::logging::init();

    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        println!(
            "{}",
            coursedex_core::build_info::BUILD_INFO.version_line("coursedex-server")
        );
        return Ok(());
    }

    info!("coursedex server starting...");

    let config = load_config()?;
    let snapshot = Loader::new(config.clone())
        .load_or_build()
        .context("failed to load the catalog index")?;
    info!("Index ready: {} documents", snapshot.docs.len());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.worker_threads.max(1))
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    runtime.block_on(coursedex_server::serve(AppState::new(config, snapshot)))
}

/// Load the config file, writing the defaults on first start.
fn load_config() -> anyhow::Result<Config> {
    let config_path = coursedex_core::paths::config_path();

    if config_path.exists() {
        return Config::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()));
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    config.save(&config_path)?;
    info!("Wrote default config to {}", config_path.display());
    Ok(config)
}
