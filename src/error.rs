//! Error types
//!
//! Nothing in the pond is fatal to the page: callers log these and fall back
//! to fewer or simpler visuals.

pub type PondResult<T> = Result<T, PondError>;

#[derive(thiserror::Error, Debug)]
pub enum PondError {
    #[error("no browser window available")]
    MissingWindow,

    #[error("element not found: #{0}")]
    MissingElement(String),

    #[error("dom error: {0}")]
    Dom(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PondError {
    pub fn missing_element(id: impl Into<String>) -> Self {
        Self::MissingElement(id.into())
    }

    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for PondError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
