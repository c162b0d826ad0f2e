/// Axum handlers for the relay server
use crate::AppState;
use crate::client::HttpClient;
use crate::errors::RelayError;
use crate::relay;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, instrument};

/// The invocation handler: validate the inbound payload, forward it to the
/// backend unmodified, and relay the response tagged with the caller's
/// accept content type.
///
/// One synchronous pass-through per call. No retries, no caching; the
/// request either completes or an error goes back to the caller.
#[instrument(skip(state, headers, body), fields(payload_bytes = body.len()))]
pub async fn invocations<T: HttpClient>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let payload = relay::prepare_input(&body, content_type)?;
    debug!("Accepted payload of {} bytes", payload.len());

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());

    let upstream_url = state
        .backend
        .invocation_url()
        .map_err(|e| RelayError::Backend {
            message: format!("invalid backend url: {e}"),
        })?;
    let upstream_uri = Uri::try_from(upstream_url.as_str()).map_err(|e| RelayError::Backend {
        message: format!("invalid backend uri {upstream_url}: {e}"),
    })?;

    // The host header must match the backend, not the relay.
    let mut builder = axum::http::Request::builder()
        .method(Method::POST)
        .uri(upstream_uri)
        .header(header::CONTENT_TYPE, relay::JSON_CONTENT_TYPE);
    if let Some(host) = upstream_url.host_str() {
        let host_value = match upstream_url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        builder = builder.header(header::HOST, host_value);
    }
    let req = builder
        .body(Body::from(payload))
        .map_err(|e| RelayError::Backend {
            message: format!("failed to build backend request: {e}"),
        })?;

    let response = match state.http_client.request(req).await {
        Ok(response) => response,
        Err(e) => {
            error!("Error forwarding invocation to {}: {}", upstream_url, e);
            return Err(RelayError::Backend {
                message: format!("failed to reach backend: {e}"),
            });
        }
    };

    let status = response.status();
    let response_body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| RelayError::Backend {
            message: format!("failed to read backend response: {e}"),
        })?;

    let (bytes, content_type) = relay::prepare_output(status, response_body, accept)?;
    info!(
        response_bytes = bytes.len(),
        content_type = %content_type,
        "Relaying backend response"
    );

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Liveness probe for the hosting platform.
#[instrument]
pub async fn ping() -> StatusCode {
    StatusCode::OK
}
