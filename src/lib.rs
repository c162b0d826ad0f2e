//! Conduit - a thin relay in front of a model inference backend
//!
//! This library validates inbound JSON payloads, forwards them unmodified to
//! the backend's invocation endpoint, and relays the backend's response back
//! to the caller tagged with the caller's requested content type.

use axum::Router;
use axum::routing::{get, post};
use axum_prometheus::{
    GenericMetricLayer, Handle, PrometheusMetricLayerBuilder,
    metrics_exporter_prometheus::PrometheusHandle,
};
use std::borrow::Cow;
use tracing::{info, instrument};

pub mod backend;
pub mod client;
pub mod errors;
pub mod handlers;
pub mod relay;
pub mod test_utils;

use backend::Backend;
use client::{HttpClient, HyperClient, PoolConfig};
use handlers::{invocations, ping};

/// The main application state containing the HTTP client and the backend
/// destination. Stateless per call: both fields are shared, read-only
/// handles, so nothing mutates across invocations.
#[derive(Clone, Debug)]
pub struct AppState<T: HttpClient> {
    pub http_client: T,
    pub backend: Backend,
}

impl AppState<HyperClient> {
    /// Create a new AppState with the default Hyper client
    pub fn new(backend: Backend) -> Self {
        Self::with_pool(backend, PoolConfig::default())
    }

    /// Create a new AppState with explicit connection pool sizing
    pub fn with_pool(backend: Backend, pool: PoolConfig) -> Self {
        Self {
            http_client: client::create_hyper_client(pool),
            backend,
        }
    }
}

impl<T: HttpClient> AppState<T> {
    /// Create a new AppState with a custom HTTP client (useful for testing)
    pub fn with_client(backend: Backend, http_client: T) -> Self {
        Self {
            http_client,
            backend,
        }
    }
}

/// Build the main router for the relay
/// This creates routes for:
/// - `GET /ping` - liveness probe
/// - `POST /invocations` - the relay hop to the backend
#[instrument(skip(state))]
pub fn build_router<T: HttpClient + Clone + Send + Sync + 'static>(state: AppState<T>) -> Router {
    info!("Building router");
    Router::new()
        .route("/ping", get(ping))
        .route("/invocations", post(invocations))
        .with_state(state)
}

/// Builds a router for the metrics endpoint.
#[instrument(skip(handle))]
pub fn build_metrics_router(handle: PrometheusHandle) -> Router {
    info!("Building metrics router");
    Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

type MetricsLayerAndHandle = (
    GenericMetricLayer<'static, PrometheusHandle, Handle>,
    PrometheusHandle,
);

/// Builds a layer and handle for prometheus metrics collection.
pub fn build_metrics_layer_and_handle(
    prefix: impl Into<Cow<'static, str>>,
) -> MetricsLayerAndHandle {
    info!("Building metrics layer");
    PrometheusMetricLayerBuilder::new()
        .with_prefix(prefix)
        .enable_response_body_size(true)
        .with_endpoint_label_type(axum_prometheus::EndpointLabel::Exact)
        .with_default_metrics()
        .build_pair()
}
