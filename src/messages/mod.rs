use tokio::sync::oneshot;
use uuid::Uuid;

use crate::domain::User;

/// Reply channel for store requests.
///
/// Store operations are total: "not found" is reported as a boolean or an
/// absent value, never as an error, so replies carry the result directly.
pub type StoreResponse<T> = oneshot::Sender<T>;

/// Typed messages for the store actor. Each variant carries its parameters
/// and a oneshot channel for the reply.
#[derive(Debug)]
pub enum StoreRequest {
    /// Generate a fresh id, associate it with the record, reply with the id.
    Insert {
        user: User,
        respond_to: StoreResponse<Uuid>,
    },
    Get {
        id: Uuid,
        respond_to: StoreResponse<Option<User>>,
    },
    /// Replace the record wholesale if the id exists; reply whether it did.
    Update {
        id: Uuid,
        user: User,
        respond_to: StoreResponse<bool>,
    },
    /// Remove the entry if present; reply whether it existed.
    Delete {
        id: Uuid,
        respond_to: StoreResponse<bool>,
    },
    /// Snapshot of the live (id, record) pairs, in unspecified order.
    List {
        respond_to: StoreResponse<Vec<(Uuid, User)>>,
    },
    Shutdown,
    #[cfg(test)]
    Count {
        respond_to: StoreResponse<usize>,
    },
}
