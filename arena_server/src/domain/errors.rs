use super::entity::EntityId;
use thiserror::Error;

// Entity store contract violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("entity {0} not found")]
    NotFound(EntityId),
    #[error("entity {0} cannot move")]
    NotMovable(EntityId),
}
