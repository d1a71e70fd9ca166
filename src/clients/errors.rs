use rspotify::ClientError;
use thiserror::Error;

use crate::clients::spotify::AuthFailure;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Spotify client is not authenticated. Call authenticate() first.")]
    NotAuthenticated,

    #[error("Failed to authenticate with Spotify: {0}")]
    AuthenticationFailed(AuthFailure),

    #[error("Spotify connection test failed")]
    ConnectionTestFailed,

    #[error("Spotify client not initialized")]
    NotInitialized,

    #[error("{0}")]
    Validation(String),

    #[error("Spotify error: {0}")]
    SpotifyError(#[from] ClientError),

    #[error("Spotify API unexpected response: {0}")]
    UnexpectedResponse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("MCP server error: {0}")]
    ServerError(String),
}

impl Error {
    /// Whether the failure came from the Spotify service rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::SpotifyError(_) | Error::UnexpectedResponse(_))
    }
}

impl From<dotenvy::Error> for Error {
    fn from(err: dotenvy::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}
