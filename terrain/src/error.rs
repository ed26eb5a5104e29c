use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("missing required parameters")]
    Builder,

    #[error("elevation provider '{provider}' failed: {reason}")]
    Provider { provider: String, reason: String },
}
