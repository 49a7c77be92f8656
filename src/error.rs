use thiserror::Error;

pub type TrellisResult<T> = Result<T, TrellisError>;

#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("invalid container size: width={width}, height={height}")]
    InvalidContainer { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
