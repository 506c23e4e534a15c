//! Operational errors.
//!
//! Problems in user documents are diagnostics, not errors. This enum only
//! covers failures of the toolchain itself.

use std::path::PathBuf;

use crate::base::DocumentUri;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// `mythic.toml` exists but could not be parsed.
    #[error("config parse: {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A schema association pattern is not a valid glob.
    #[error("invalid glob `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The document is not open.
    #[error("unknown document: {0}")]
    UnknownDocument(DocumentUri),

    /// Post-parse was requested before the document was pre-parsed.
    #[error("document was never pre-parsed: {0}")]
    NotParsed(DocumentUri),
}

pub type Result<T> = std::result::Result<T, Error>;
