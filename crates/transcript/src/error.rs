#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid transcript item at index {index}: start={start}, end={end}")]
    InvalidItem { index: usize, start: f64, end: f64 },
    #[error("invalid max duration: {0}")]
    InvalidMaxDuration(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
