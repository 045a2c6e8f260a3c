use thiserror::Error;

#[derive(Error, Debug)]
pub enum CutlineError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Not a PNG data URL (expected prefix {expected:?})")]
    DataUrl { expected: &'static str },

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Build superseded by generation {current}")]
    Cancelled { current: u64 },

    #[error("Background build failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CutlineError>;
