//! Shopora Storefront - JSON catalog API.
//!
//! This crate provides the storefront functionality as a library, allowing
//! it to be tested and reused. The binary in `main.rs` only wires up
//! configuration, observability and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, body::Body, http::Request, response::Response};
use std::time::Duration;
use tower::Layer;
use tower_http::compression::CompressionLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::{Span, field::Empty, info_span};

use crate::state::AppState;

/// The storefront service: the router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// Build the full application: routes, middleware and Sentry layers.
///
/// Trailing slashes are trimmed before routing, so `/api/products/` and
/// `/api/products` reach the same handler.
pub fn app(state: AppState) -> App {
    let cors = middleware::cors_layer(&state.config().cors_origins);

    let router = routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = Empty,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(CompressionLayer::new().gzip(true))
        .layer(cors)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
