//! # Mock Framework
//!
//! Utilities for testing handlers in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_insert`] or [`expect_get`] to assert behavior.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::clients::StoreClient;
use crate::domain::User;
use crate::messages::{StoreRequest, StoreResponse};

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// Handler tests don't need to spin up a full `UserStore` when they only
/// exercise the HTTP adapter logic. Instead we hand the handler a client whose
/// messages arrive on a channel we control, inspect the messages, and answer
/// them however the test requires (hit, miss, silence) deterministically.
pub fn create_mock_client(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Insert request
pub async fn expect_insert(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(User, StoreResponse<Uuid>)> {
    match receiver.recv().await {
        Some(StoreRequest::Insert { user, respond_to }) => Some((user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(Uuid, StoreResponse<Option<User>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(Uuid, User, StoreResponse<bool>)> {
    match receiver.recv().await {
        Some(StoreRequest::Update {
            id,
            user,
            respond_to,
        }) => Some((id, user, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(Uuid, StoreResponse<bool>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        // Test Insert
        let insert_task = tokio::spawn(async move {
            client.insert_user(User::new("Ada", "Lovelace", "math")).await
        });

        let (user, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(user.first_name, "Ada");

        let id = Uuid::new_v4();
        responder.send(id).unwrap();

        let result = insert_task.await.unwrap();
        assert_eq!(result, Ok(id));
    }
}
