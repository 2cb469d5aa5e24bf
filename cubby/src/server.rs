use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use cubby_store::{Registry, RegistryRef};
use tokio::{net::TcpListener, sync::broadcast, task::JoinHandle};
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::{
    args::ServerOptions,
    errors::ShareError,
    http::{
        ServerState, default_handler, download_handler, lookup_handler, status_handler,
        upload_handler,
    },
};

/// Headroom on top of the file cap for multipart framing, so an upload just
/// over the cap still reaches the registry's descriptive rejection.
const BODY_LIMIT_SLACK: usize = 8 * 1024 * 1024;

const STOP_INTERVAL: Duration = Duration::from_millis(100);

pub struct ShareServer {
    host: String,
    port: u16,
    pub registry: RegistryRef,
    handles: Vec<JoinHandle<()>>,

    shutdown: broadcast::Sender<()>,
}

impl ShareServer {
    pub fn new(options: ServerOptions) -> ShareServer {
        let (shutdown, _) = broadcast::channel(16);
        let registry = Arc::new(Registry::new(options.max_file_size()));

        ShareServer {
            host: options.ip.to_string(),
            port: options.port,
            registry,
            handles: vec![],
            shutdown,
        }
    }

    pub async fn start(&mut self) -> Result<(), ShareError> {
        let state = ServerState {
            registry: self.registry.clone(),
        };
        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        let max_body = self.registry.max_file_size() as usize + BODY_LIMIT_SLACK;
        let shutdown_rx = self.shutdown.subscribe();

        self.handles
            .push(tokio::spawn(start_share_server(state, addr, max_body, shutdown_rx)));
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), ShareError> {
        self.shutdown.send(())?;

        let mut interval = tokio::time::interval(STOP_INTERVAL);

        loop {
            self.handles.retain(|handle| !handle.is_finished());
            if self.handles.is_empty() {
                break;
            }
            interval.tick().await;
        }

        Ok(())
    }
}

pub(crate) fn share_router(state: ServerState, max_body: usize) -> Router {
    Router::new()
        .route("/share", post(upload_handler))
        .route("/share/{code}", get(lookup_handler))
        .route("/share/{code}/content", get(download_handler))
        .route("/status", get(status_handler))
        .fallback(default_handler)
        .layer((
            DefaultBodyLimit::max(max_body),
            TimeoutLayer::new(Duration::from_secs(60)),
        ))
        .with_state(state)
}

async fn start_share_server(
    state: ServerState,
    addr: SocketAddr,
    max_body: usize,
    mut shutdown: broadcast::Receiver<()>,
) {
    let app = share_router(state, max_body);

    info!("share server is starting up. binding addr: {addr}");
    match TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(err) = axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                    info!("share server shutting down gracefully.");
                })
                .await
            {
                error!("starting share server failed, error: {err}");
            }
        }
        Err(err) => error!("binding share server address {addr} failed, error: {err}"),
    }
}
