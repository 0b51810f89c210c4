// Error types shared by the library. The binary wraps these in `anyhow`
// at the edge; inside the crate every fallible call returns `Result<T>`.

use thiserror::Error;

/// Everything that can go wrong while talking to the server or the operator.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad local input. Raised before any request is built.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The token endpoint refused us or could not be reached.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-2xx answer from any endpoint other than the token endpoint.
    #[error("Request failed: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but the body was not what we expected.
    #[error("Unexpected response: {0}")]
    Response(String),

    /// Menu selection that is not an integer.
    #[error("Wrong input {0:?}. Please enter a number")]
    InputParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
