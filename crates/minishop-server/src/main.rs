mod api;
mod middleware;
mod probe;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = minishop_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog_config = match &config.catalog_path {
        Some(path) => minishop_core::CatalogConfig::from_yaml_file(path)?,
        None => minishop_core::CatalogConfig::builtin(),
    };
    let mut catalog = minishop_core::Catalog::build(catalog_config)?;
    if config.probe_images {
        catalog =
            probe::verify_image_urls(catalog, Duration::from_secs(config.probe_timeout_secs))
                .await?;
    }
    tracing::info!(products = catalog.products().len(), "catalog ready");

    let app = build_app(
        Arc::new(catalog),
        &config.allowed_origin,
        default_rate_limit_state(),
    )?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
