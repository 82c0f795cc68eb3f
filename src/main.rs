#![warn(clippy::pedantic, clippy::all, clippy::nursery)]

use crate::{config::RuntimeConfiguration, routes::router, state::RollbookState};
use std::future::IntoFuture;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod config;
mod data;
mod error;
mod routes;
mod state;
mod storage;

/// How long in-flight requests get to finish once a shutdown signal arrives.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

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
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let state = RollbookState::new(config.clone())
        .await
        .expect("unable to create state");
    info!(env = config.env(), "storage initialised");

    let app = router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.address())
        .await
        .expect("unable to listen on server address");
    info!(address = config.address(), "Listening");

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let graceful = {
        let mut rx = shutdown_rx.clone();
        async move {
            let _ = rx.changed().await;
        }
    };

    let server = axum::serve(listener, app).with_graceful_shutdown(graceful).into_future();
    let mut deadline_rx = shutdown_rx;

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!(?e, "unable to serve app");
            }
        }
        () = async {
            let _ = deadline_rx.changed().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        } => {
            warn!("in-flight requests did not finish in time, exiting");
        }
    }
}
