//! Error types for the simulator

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Trace parse error: {0}")]
    TraceParse(#[from] serde_json::Error),
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    #[error("Config serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("Flight trace has no frames")]
    EmptyTrace,
}

pub type Result<T> = std::result::Result<T, SimError>;
