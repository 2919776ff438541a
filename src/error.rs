use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodsplitError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Audio decoding failed: {0}")]
    Decode(String),

    #[error("Voice analysis failed: {0}")]
    Analysis(String),

    #[error("Segment export failed: {0}")]
    Export(String),

    #[error("Podcast library error: {0}")]
    Library(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sql(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, PodsplitError>;
