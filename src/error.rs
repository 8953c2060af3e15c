use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the fetch → normalize → write pipeline.
///
/// Single-item operations return the first one of these unmodified. Batch
/// operations collect them per item next to the identifier that failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The service answered with a non-success status.
    #[error("Jira returned HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// The request never produced a usable response (connect, TLS, decode).
    #[error("Jira request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A raw issue could not be mapped onto a canonical record.
    #[error("malformed issue {key}: {message}")]
    MalformedInput { key: String, message: String },

    #[error("failed to write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedInput {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.into(),
            source,
        }
    }
}
