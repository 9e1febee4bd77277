//! # HTTP Server
//!
//! Combines the endpoint routers into a single axum application.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::Services;

use super::application_routes::application_routes;
use super::certificate_routes::certificate_routes;
use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::intake_routes::intake_routes;
use super::submission_routes::submission_routes;

/// HTTP server for the cohort program API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, services: Arc<Services>) -> Self {
        let router = Self::build_router(&config, services);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, services: Arc<Services>) -> Router {
        Router::new()
            .merge(health_routes())
            .nest("/intake", intake_routes(Arc::clone(&services)))
            .nest("/submissions", submission_routes(Arc::clone(&services)))
            .nest("/applications", application_routes(Arc::clone(&services)))
            .nest("/certificates", certificate_routes(services))
            .layer(TraceLayer::new_for_http())
            .layer(config.cors_layer())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.bind_addr()?;

        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "cohortd HTTP server listening");

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
