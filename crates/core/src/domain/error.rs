// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid task token: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
