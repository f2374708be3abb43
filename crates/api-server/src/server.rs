//! API server — HTTP routes and the Prometheus metrics exporter.

use std::net::SocketAddr;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use vanta_core::config::AppConfig;

use crate::{admin_rest, employer_rest, rest, AppState};

pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the full route table.
    pub fn router(state: AppState) -> Router {
        Router::new()
            // Member surface
            .route("/v1/perks", get(rest::list_perks))
            .route("/v1/redeem", post(rest::handle_redeem))
            .route(
                "/v1/members/:id",
                get(rest::get_member).put(rest::update_member),
            )
            .route("/v1/members/:id/purchases", get(rest::member_purchases))
            .route(
                "/v1/members/:id/recommendations",
                get(rest::member_recommendations),
            )
            .route("/v1/chat", post(rest::handle_chat))
            // Admin surface
            .route(
                "/v1/admin/perks",
                get(admin_rest::list_perks).post(admin_rest::create_perk),
            )
            .route(
                "/v1/admin/perks/:id",
                put(admin_rest::update_perk).delete(admin_rest::delete_perk),
            )
            .route("/v1/admin/perks/seed", post(admin_rest::seed_perks))
            // Employer surface
            .route("/v1/employer/summary", get(employer_rest::summary))
            .route("/v1/employer/trends", get(employer_rest::trends))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server. Runs until the listener fails.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = Self::router(self.state.clone());
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Install the Prometheus exporter on the metrics port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.metrics.port);
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
