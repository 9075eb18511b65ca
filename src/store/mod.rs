use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::clients::StoreClient;
use crate::domain::User;
use crate::messages::{StoreRequest, StoreResponse};

/// The single owner of the user map.
///
/// Every request handler talks to this actor through its mailbox, which
/// serializes all reads and writes. Handlers here are synchronous: each runs
/// to completion against the map before the next message is taken.
pub struct UserStore {
    receiver: mpsc::Receiver<StoreRequest>,
    users: HashMap<Uuid, User>,
}

impl UserStore {
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            users: HashMap::new(),
        };
        let client = StoreClient::new(sender);
        (store, client)
    }

    #[instrument(name = "user_store", skip(self))]
    pub async fn run(mut self) {
        info!("UserStore starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { user, respond_to } => {
                    self.handle_insert(user, respond_to);
                }
                StoreRequest::Get { id, respond_to } => {
                    self.handle_get(id, respond_to);
                }
                StoreRequest::Update {
                    id,
                    user,
                    respond_to,
                } => {
                    self.handle_update(id, user, respond_to);
                }
                StoreRequest::Delete { id, respond_to } => {
                    self.handle_delete(id, respond_to);
                }
                StoreRequest::List { respond_to } => {
                    self.handle_list(respond_to);
                }
                StoreRequest::Shutdown => {
                    info!("UserStore shutting down");
                    break;
                }
                #[cfg(test)]
                StoreRequest::Count { respond_to } => {
                    let _ = respond_to.send(self.users.len());
                }
            }
        }

        info!("UserStore stopped");
    }

    /// Assigns a fresh v4 id, never derived from the record. Always succeeds.
    #[instrument(fields(first_name = %user.first_name), skip(self, user, respond_to))]
    fn handle_insert(&mut self, user: User, respond_to: StoreResponse<Uuid>) {
        debug!("Processing insert request");

        let id = Uuid::new_v4();
        self.users.insert(id, user);

        info!(user_id = %id, "User inserted");
        let _ = respond_to.send(id);
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_get(&self, id: Uuid, respond_to: StoreResponse<Option<User>>) {
        debug!("Processing get request");

        let user = self.users.get(&id).cloned();

        match &user {
            Some(user) => info!(first_name = %user.first_name, "User found"),
            None => debug!("User not found"),
        }

        let _ = respond_to.send(user);
    }

    /// Wholesale replace. A miss reports `false` and must not create an entry.
    #[instrument(fields(user_id = %id), skip(self, user, respond_to))]
    fn handle_update(&mut self, id: Uuid, user: User, respond_to: StoreResponse<bool>) {
        debug!("Processing update request");

        let found = match self.users.get_mut(&id) {
            Some(slot) => {
                *slot = user;
                info!("User updated");
                true
            }
            None => {
                debug!("User not found for update");
                false
            }
        };

        let _ = respond_to.send(found);
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_delete(&mut self, id: Uuid, respond_to: StoreResponse<bool>) {
        debug!("Processing delete request");

        let found = self.users.remove(&id).is_some();

        if found {
            info!("User deleted");
        } else {
            debug!("User not found for delete");
        }

        let _ = respond_to.send(found);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list(&self, respond_to: StoreResponse<Vec<(Uuid, User)>>) {
        debug!("Processing list request");

        let users: Vec<(Uuid, User)> = self
            .users
            .iter()
            .map(|(id, user)| (*id, user.clone()))
            .collect();

        info!(user_count = users.len(), "Listed users");
        let _ = respond_to.send(users);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn spawn_store() -> StoreClient {
        let (store, client) = UserStore::new(10);
        tokio::spawn(store.run());
        client
    }

    #[tokio::test]
    async fn insert_yields_fresh_ids_and_get_returns_the_record() {
        let client = spawn_store();

        let first = client
            .insert_user(User::new("Ada", "Lovelace", "math"))
            .await
            .unwrap();
        let second = client
            .insert_user(User::new("Alan", "Turing", "computing"))
            .await
            .unwrap();

        assert_ne!(first, second);

        let user = client.get_user(first).await.unwrap();
        assert_eq!(user, Some(User::new("Ada", "Lovelace", "math")));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let client = spawn_store();

        let id = client
            .insert_user(User::new("Ada", "Lovelace", "math"))
            .await
            .unwrap();

        assert!(client.delete_user(id).await.unwrap());
        assert_eq!(client.get_user(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_on_missing_id_reports_not_found_and_leaves_state_alone() {
        let client = spawn_store();

        client
            .insert_user(User::new("Ada", "Lovelace", "math"))
            .await
            .unwrap();

        assert!(!client.delete_user(Uuid::new_v4()).await.unwrap());
        assert_eq!(client.user_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let client = spawn_store();

        let id = client
            .insert_user(User::new("Ada", "Lovelace", "math"))
            .await
            .unwrap();

        // Empty fields in the replacement must win over the stored values.
        let replacement = User::new("Ada", "Byron", "");
        assert!(client.update_user(id, replacement.clone()).await.unwrap());

        assert_eq!(client.get_user(id).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn update_on_missing_id_does_not_create_an_entry() {
        let client = spawn_store();

        let missing = Uuid::new_v4();
        let updated = client
            .update_user(missing, User::new("Ada", "Byron", "math"))
            .await
            .unwrap();

        assert!(!updated);
        assert_eq!(client.user_count().await.unwrap(), 0);
        assert_eq!(client.get_user(missing).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_returns_exactly_the_live_pairs() {
        let client = spawn_store();

        let kept = client
            .insert_user(User::new("Ada", "Lovelace", "math"))
            .await
            .unwrap();
        let dropped = client
            .insert_user(User::new("Alan", "Turing", "computing"))
            .await
            .unwrap();
        client.delete_user(dropped).await.unwrap();

        let listed = client.list_users().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, kept);
        assert_eq!(listed[0].1, User::new("Ada", "Lovelace", "math"));
    }

    #[tokio::test]
    async fn requests_after_shutdown_fail_with_actor_closed() {
        let (store, client) = UserStore::new(10);
        let handle = tokio::spawn(store.run());

        client.shutdown().await.unwrap();
        handle.await.unwrap();

        let result = client.get_user(Uuid::new_v4()).await;
        assert_eq!(result, Err(StoreError::ActorClosed));
    }
}
