use thiserror::Error;

/// Failures the bot distinguishes when deciding whether to stop, skip or carry on.
#[derive(Debug, Error)]
pub enum BotError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("config error: {0}")]
    Config(String),

    /// Network, HTTP or decoding failure talking to the Bot API.
    #[error("transport error: {0}")]
    Transport(String),

    /// An update that lacks the fields needed to handle it.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest includes the request URL in its Display output, which carries the token
        BotError::Transport(e.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
