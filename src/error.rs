use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid store handle: no store is open")]
    InvalidHandle,
    #[error("Poisoned lock on shared store")]
    Poisoned,
    #[error("Syntax error: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
