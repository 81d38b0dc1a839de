#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request to Telegram failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("unexpected Telegram response (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("{description}")]
    Api {
        description: String,
        error_code: Option<i64>,
    },

    #[error("Telegram response carried no result")]
    MissingResult,
}

// Request URLs embed the bot token.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
