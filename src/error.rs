use thiserror::Error;

use crate::filters::FilterKind;

#[derive(Debug, Error)]
pub enum ChalkError {
    #[error("invalid {kind:?} filter: cutoff {cutoff_hz} Hz at sample rate {sample_rate} Hz")]
    InvalidFilterSpec {
        kind: FilterKind,
        cutoff_hz: f64,
        sample_rate: u32,
    },

    #[error("invalid physical parameters: {0}")]
    InvalidParams(String),

    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, ChalkError>;
