mod api;
mod middleware;

use std::sync::Arc;

use cityscout_core::{load_categories, CategoryMap};
use cityscout_places::PlacesFacade;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_provider_quota, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cityscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let categories = match &config.categories_path {
        Some(path) => load_categories(path)?,
        None => CategoryMap::default(),
    };
    let facade = Arc::new(PlacesFacade::from_app_config(&config, categories));

    // Warm the provider so the first lookup does not pay for the load. A
    // failure here is not fatal; the next lookup retries.
    let warm = Arc::clone(&facade);
    tokio::spawn(async move {
        if let Err(e) = warm.ensure_loaded().await {
            tracing::warn!(error = %e, "maps provider warm-up failed");
        }
    });

    let app = build_app(
        AppState {
            facade,
            detail_concurrency: config.detail_concurrency,
        },
        default_provider_quota(),
    );

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting cityscout server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
