use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::domain::{User, UserRecord};

/// The uniform `{error, data}` wrapper around every response body. Exactly one
/// side is populated; 204 responses carry no body at all.
#[derive(Debug, Serialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Payload>,
}

/// The payload shapes that can sit behind the envelope's `data` field, one per
/// endpoint contract. Serialized untagged so the wire keeps the plain forms: a
/// bare id string, a record object, an array of records, or a message string
/// (the not-found responses put their message here, not in `error`).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Id(Uuid),
    Record(User),
    Records(Vec<UserRecord>),
    Message(String),
}

impl Envelope {
    pub fn data(payload: Payload) -> Self {
        Self {
            error: None,
            data: Some(payload),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            data: None,
        }
    }
}

/// Encode the envelope and build the response.
///
/// An encoding failure is logged and degrades to the generic 500 envelope,
/// which is built from a constant and cannot itself fail to encode. If the
/// transport then fails to write that, the connection task logs and gives up.
pub fn respond(status: StatusCode, envelope: &Envelope) -> Response<Full<Bytes>> {
    match serde_json::to_vec(envelope) {
        Ok(body) => json_response(status, Bytes::from(body)),
        Err(err) => {
            error!(error = %err, "Failed to encode response envelope");
            internal_error()
        }
    }
}

/// Status line only, no envelope. Used for the 204 success paths.
pub fn respond_empty(status: StatusCode) -> Response<Full<Bytes>> {
    json_response(status, Bytes::new())
}

/// The generic degraded response for failures of the service itself.
pub fn internal_error() -> Response<Full<Bytes>> {
    const FALLBACK: &[u8] = br#"{"error":"something went wrong"}"#;
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        Bytes::from_static(FALLBACK),
    )
}

fn json_response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
