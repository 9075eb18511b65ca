use thiserror::Error;

/// Errors surfaced by the store client.
///
/// The store itself has no failure modes: inserts always succeed and misses
/// are reported as absence. The only thing that can go wrong is the channel
/// to the actor, which happens when the system is shutting down.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("store actor closed")]
    ActorClosed,
    #[error("store response dropped")]
    ResponseDropped,
}
