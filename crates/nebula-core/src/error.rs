//! Error types for loading audio sources
use thiserror::Error;

/// Why an audio source could not become the active track.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The bytes could not be fetched or read
    #[error("could not read audio source `{name}`: {reason}")]
    Read { name: String, reason: String },

    /// The bytes were read but the decoder rejected them
    #[error("could not decode audio source `{name}`: {reason}")]
    Decode { name: String, reason: String },

    /// Decoding succeeded but produced nothing playable
    #[error("audio source `{name}` contains no samples")]
    Empty { name: String },
}

impl LoadError {
    pub fn read(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn source_name(&self) -> &str {
        match self {
            Self::Read { name, .. } | Self::Decode { name, .. } | Self::Empty { name } => name,
        }
    }
}

/// Result type for load operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;
