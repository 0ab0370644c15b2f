use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeederError>;

#[derive(Error, Debug)]
pub enum SeederError {
    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
