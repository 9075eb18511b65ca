use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::User;
use crate::error::StoreError;
use crate::messages::StoreRequest;

/// Generate client methods with the oneshot channel boilerplate and automatic
/// tracing. A send failure means the actor is gone; a receive failure means it
/// dropped the reply channel mid-request.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, StoreError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| StoreError::ActorClosed)?;

                response.await.map_err(|_| StoreError::ResponseDropped)
            }
        }
    };
}

/// Cloneable handle to the store actor. A thin wrapper around the mailbox
/// sender; handlers receive one of these instead of any shared map reference.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    /// Manual method: shutdown carries no response channel.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        debug!("Sending shutdown request");
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|_| StoreError::ActorClosed)
    }
}

// Generate client methods with automatic tracing
client_method!(StoreClient => fn insert_user(user: User) -> Uuid as StoreRequest::Insert);
client_method!(StoreClient => fn get_user(id: Uuid) -> Option<User> as StoreRequest::Get);
client_method!(StoreClient => fn update_user(id: Uuid, user: User) -> bool as StoreRequest::Update);
client_method!(StoreClient => fn delete_user(id: Uuid) -> bool as StoreRequest::Delete);
client_method!(StoreClient => fn list_users() -> Vec<(Uuid, User)> as StoreRequest::List);

// Test-only method for internal state inspection
#[cfg(test)]
client_method!(StoreClient => fn user_count() -> usize as StoreRequest::Count);
