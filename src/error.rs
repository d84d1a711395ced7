use thiserror::Error;

/// Errors raised outside the rendering core: reading scene descriptions and
/// writing images.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    InvalidScene(String),
}

pub type Result<T> = std::result::Result<T, Error>;
