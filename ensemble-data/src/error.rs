use thiserror::Error;

/// Failure of a single registry exchange.
///
/// Only [`RegistryError::Rejected`] carries a message written by the server;
/// every other variant means the request never produced an answer the console
/// could understand, and its text is for the log only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server answered HTTP {0}")]
    Status(u16),

    #[error("unexpected response: {0}")]
    Malformed(String),

    #[error("cannot read {path}: {reason}")]
    File { path: String, reason: String },

    /// Tagged `"Error"` result.
    #[error("{0}")]
    Rejected(String),
}

impl RegistryError {
    /// True for transport, status, parse and local file failures.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    /// Server-supplied message, if this is an application-level error.
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
