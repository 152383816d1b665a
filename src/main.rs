use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{serve, Extension};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{info, warn};
use wikidata_relay::{
    api,
    infrastructure::{config::Config, sparql, state::AppState},
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init();
    let config = Arc::new(Config::from_env()?);
    let site = api::site::ensure_site_document(&config.app)?;
    info!(document = %site.display(), "serving site document");

    let endpoint = sparql::build_endpoint(&config.sparql)
        .context("failed to initialise SPARQL client")?;
    let state = Arc::new(AppState::new(Arc::clone(&config), endpoint));

    let router = api::build_router(Arc::clone(&config)).layer(Extension(Arc::clone(&state)));

    let addr: SocketAddr = config.bind_address().parse()?;
    info!(
        %addr,
        endpoint = %config.sparql.endpoint_url,
        user_agent = %config.sparql.user_agent(),
        "starting sparql relay"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server = serve(listener, router.into_make_service());

    tokio::select! {
        res = server => {
            if let Err(err) = res {
                warn!(error = ?err, "server exited with error");
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
