//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum routers (site and HTTPS redirect)
//! - Wire up middleware (tracing, request ID, access log, timeout, panics, CORS)
//! - Serve the public directory with the single-page fallback
//! - Run the plain and TLS listeners until shutdown

use axum::{handler::Handler, middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::fallback::{spa_fallback, Pages};
use crate::http::middleware::access_log;
use crate::http::redirect::redirect_to_https;
use crate::http::request::MakeRequestUuid;
use crate::http::response::internal_error;
use crate::lifecycle::Shutdown;
use crate::net::tls::load_tls_config;

/// Error type for running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load TLS configuration: {0}")]
    Tls(#[source] std::io::Error),

    #[error("invalid {field} {value:?}")]
    Address { field: &'static str, value: String },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Static file server for a single-page application.
pub struct HttpServer {
    config: ServerConfig,
    pages: Arc<Pages>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration. Reads the index and not-found pages.
    pub fn new(config: ServerConfig) -> Self {
        let pages = Arc::new(Pages::load(&config.static_files));
        Self { config, pages }
    }

    /// Router serving the site: public files, then the single-page fallback.
    #[allow(deprecated)]
    pub fn site_router(&self) -> Router {
        let fallback = spa_fallback.with_state(self.pages.clone());
        let files = ServeDir::new(&self.config.static_files.root)
            .call_fallback_on_method_not_allowed(true)
            .fallback(fallback);

        Router::new()
            .fallback_service(files)
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(internal_error))
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeouts.request_secs)))
            .layer(middleware::from_fn(access_log))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Router answering every request with a redirect to the HTTPS listener.
    pub fn redirect_router(&self) -> Result<Router, ServerError> {
        let https_port = self.https_address()?.port();
        Ok(Router::new()
            .fallback(redirect_to_https)
            .with_state(https_port)
            .layer(middleware::from_fn(access_log))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http()))
    }

    /// Run the server until `shutdown` fires.
    ///
    /// `listener` is the plain HTTP listener. With TLS configured, HTTPS is bound on
    /// `listener.https_address` and, if enabled, plain HTTP only redirects.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), ServerError> {
        let grace = Duration::from_secs(self.config.timeouts.shutdown_secs);
        let http_shutdown = shutdown.subscribe();

        let Some(tls) = self.config.tls.clone() else {
            return serve_http(listener, self.site_router(), http_shutdown).await;
        };

        let rustls = load_tls_config(&tls.cert_path, &tls.key_path)
            .await
            .map_err(ServerError::Tls)?;
        let https_addr = self.https_address()?;
        let plain = if self.config.listener.redirect_to_https {
            self.redirect_router()?
        } else {
            self.site_router()
        };

        let handle = axum_server::Handle::new();
        let mut rx = shutdown.subscribe();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = rx.recv().await;
            drain.graceful_shutdown(Some(grace));
        });

        tracing::info!(address = %https_addr, "HTTPS server starting");
        let https = axum_server::bind_rustls(https_addr, rustls)
            .handle(handle)
            .serve(self.site_router().into_make_service());

        tokio::try_join!(
            async { https.await.map_err(ServerError::from) },
            serve_http(listener, plain, http_shutdown),
        )?;
        Ok(())
    }

    fn https_address(&self) -> Result<SocketAddr, ServerError> {
        let value = &self.config.listener.https_address;
        value.parse().map_err(|_| ServerError::Address {
            field: "listener.https_address",
            value: value.clone(),
        })
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

async fn serve_http(
    listener: TcpListener,
    router: Router,
    mut rx: broadcast::Receiver<()>,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = rx.recv().await;
        })
        .await?;

    tracing::info!(address = %addr, "HTTP server stopped");
    Ok(())
}
