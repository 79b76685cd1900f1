use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
