pub mod around_me;
pub mod pagination;
pub mod ranking;

use thiserror::Error;

use crate::error::StorageError;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Player '{0}' not found")]
    PlayerNotFound(String),

    #[error("Requested page {0} doesn't hold any records")]
    PageOutOfRange(u32),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
