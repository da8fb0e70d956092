use thiserror::Error;

use crate::core::types::UnitId;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Level has zero area: {width}x{height}")]
    ZeroAreaLevel { width: usize, height: usize },

    #[error("No AI spawn points configured for this level")]
    NoSpawnPoints,

    #[error("Unit not found: {0:?}")]
    UnitNotFound(UnitId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;
