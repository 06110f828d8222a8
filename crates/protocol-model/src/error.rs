use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("category code must not be empty")]
    EmptyCategory,
    #[error("item code is not an integer: {0:?}")]
    InvalidItemCode(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
