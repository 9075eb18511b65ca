use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::clients::StoreClient;
use crate::domain::{User, UserRecord};
use crate::error::StoreError;

use super::envelope::{self, Envelope, Payload};

pub const INVALID_BODY: &str = "invalid body";
pub const INVALID_PARAM: &str = "invalid Param";
pub const USER_NOT_FOUND: &str = "user not found";

/// POST /api/users
#[instrument(skip(store, body))]
pub async fn insert(store: &StoreClient, body: &[u8]) -> Response<Full<Bytes>> {
    let user: User = match serde_json::from_slice(body) {
        Ok(user) => user,
        Err(err) => {
            debug!(error = %err, "Rejecting undecodable body");
            return invalid_body();
        }
    };

    match store.insert_user(user).await {
        Ok(id) => envelope::respond(StatusCode::CREATED, &Envelope::data(Payload::Id(id))),
        Err(err) => store_failure(err),
    }
}

/// GET /api/users
///
/// Never fails: an empty store lists as `[]`.
#[instrument(skip(store))]
pub async fn find_all(store: &StoreClient) -> Response<Full<Bytes>> {
    match store.list_users().await {
        Ok(pairs) => {
            let records: Vec<UserRecord> = pairs
                .into_iter()
                .map(|(id, user)| UserRecord::new(id, user))
                .collect();
            envelope::respond(StatusCode::OK, &Envelope::data(Payload::Records(records)))
        }
        Err(err) => store_failure(err),
    }
}

/// GET /api/user/{id}
#[instrument(skip(store))]
pub async fn find_by_id(store: &StoreClient, raw_id: &str) -> Response<Full<Bytes>> {
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.get_user(id).await {
        Ok(Some(user)) => {
            envelope::respond(StatusCode::OK, &Envelope::data(Payload::Record(user)))
        }
        Ok(None) => not_found(),
        Err(err) => store_failure(err),
    }
}

/// PUT /api/user/{id}
///
/// Body decoding is checked before the id, so when both are malformed the
/// body error wins. The stored record is replaced wholesale.
#[instrument(skip(store, body))]
pub async fn update(store: &StoreClient, raw_id: &str, body: &[u8]) -> Response<Full<Bytes>> {
    let user: User = match serde_json::from_slice(body) {
        Ok(user) => user,
        Err(err) => {
            debug!(error = %err, "Rejecting undecodable body");
            return invalid_body();
        }
    };

    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.update_user(id, user).await {
        Ok(true) => envelope::respond_empty(StatusCode::NO_CONTENT),
        Ok(false) => not_found(),
        Err(err) => store_failure(err),
    }
}

/// DELETE /api/user/{id}
#[instrument(skip(store))]
pub async fn delete(store: &StoreClient, raw_id: &str) -> Response<Full<Bytes>> {
    let id = match parse_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.delete_user(id).await {
        Ok(true) => envelope::respond_empty(StatusCode::NO_CONTENT),
        Ok(false) => not_found(),
        Err(err) => store_failure(err),
    }
}

pub fn invalid_body() -> Response<Full<Bytes>> {
    envelope::respond(
        StatusCode::UNPROCESSABLE_ENTITY,
        &Envelope::error(INVALID_BODY),
    )
}

fn parse_id(raw_id: &str) -> Result<Uuid, Response<Full<Bytes>>> {
    match Uuid::parse_str(raw_id) {
        Ok(id) => Ok(id),
        Err(err) => {
            debug!(error = %err, raw_id, "Rejecting unparsable id");
            Err(envelope::respond(
                StatusCode::UNPROCESSABLE_ENTITY,
                &Envelope::error(INVALID_PARAM),
            ))
        }
    }
}

fn not_found() -> Response<Full<Bytes>> {
    envelope::respond(
        StatusCode::NOT_FOUND,
        &Envelope::data(Payload::Message(USER_NOT_FOUND.to_string())),
    )
}

/// A channel failure means the store actor is gone, which only happens while
/// the system shuts down. Nothing the client can do about it.
fn store_failure(err: StoreError) -> Response<Full<Bytes>> {
    error!(error = %err, "Store request failed");
    envelope::internal_error()
}
