//! Errors raised while reading post sources

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("no front-matter block (file must start with a `---` line)")]
    MissingFrontMatter,

    #[error("front-matter block is never closed by a `---` line")]
    UnterminatedFrontMatter,

    #[error("invalid YAML front-matter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("front-matter has no title")]
    MissingTitle,

    #[error("file is not valid UTF-8")]
    InvalidEncoding,

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        // read_to_string reports undecodable bytes as InvalidData
        if source.kind() == std::io::ErrorKind::InvalidData {
            return Self::InvalidEncoding;
        }
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error describes the file's contents rather than the filesystem
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}
