use std::time::Duration;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("maps api key is not configured")]
    MissingApiKey,

    #[error("no map provider available")]
    Unavailable,

    #[error("maps script failed to load: {0}")]
    Load(String),

    #[error("maps script did not load within {0:?}")]
    Timeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
