//! HTTP adapter layer: routing, per-request tracing, and panic recovery.
//!
//! Handlers are pure adapters between the HTTP surface and the store
//! contract; all state access goes through the [`StoreClient`].

pub mod envelope;
pub mod handlers;

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::clients::StoreClient;

use envelope::Envelope;

/// Entry point for every request: tags it with a fresh request id, recovers
/// handler panics into the generic 500 envelope, and emits an access log line.
pub async fn handle_request<B>(store: StoreClient, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let start = Instant::now();

        let response = match AssertUnwindSafe(route(&store, req)).catch_unwind().await {
            Ok(response) => response,
            Err(_) => {
                error!("Handler panicked");
                envelope::internal_error()
            }
        };

        info!(
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Method+path dispatch. The whole surface lives under `/api`.
async fn route<B>(store: &StoreClient, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match path.as_str() {
        "/api/users" => match method {
            Method::POST => match read_body(req).await {
                Ok(body) => handlers::insert(store, &body).await,
                Err(response) => response,
            },
            Method::GET => handlers::find_all(store).await,
            _ => method_not_allowed(),
        },
        other => {
            if let Some(raw_id) = other.strip_prefix("/api/user/") {
                match method {
                    Method::GET => handlers::find_by_id(store, raw_id).await,
                    Method::PUT => match read_body(req).await {
                        Ok(body) => handlers::update(store, raw_id, &body).await,
                        Err(response) => response,
                    },
                    Method::DELETE => handlers::delete(store, raw_id).await,
                    _ => method_not_allowed(),
                }
            } else {
                not_found_route()
            }
        }
    }
}

/// Read the request body in full. A transport failure mid-body is treated the
/// same as an undecodable body.
async fn read_body<B>(req: Request<B>) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    match req.into_body().collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) => {
            debug!(error = %err, "Failed to read request body");
            Err(handlers::invalid_body())
        }
    }
}

// Paths and methods outside the surface still answer with the envelope.
fn not_found_route() -> Response<Full<Bytes>> {
    envelope::respond(StatusCode::NOT_FOUND, &Envelope::error("route not found"))
}

fn method_not_allowed() -> Response<Full<Bytes>> {
    envelope::respond(
        StatusCode::METHOD_NOT_ALLOWED,
        &Envelope::error("method not allowed"),
    )
}
