//! Error types for the hoor library
//!
//! Errors fall in two groups: those that abort a run before any file is
//! touched (discovery and configuration), and per-file errors that are logged
//! by the worker owning the file while the run carries on.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum HoorError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A content file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content file could not be persisted
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Front matter parsing or reconstruction errors
    #[error("Invalid front matter in {path}: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    /// The publish date could not be parsed
    #[error("Invalid date {value:?} in {path}")]
    InvalidDate { path: PathBuf, value: String },

    /// The host could not enumerate content files
    #[error("Cannot discover content files in {path}: {reason}")]
    Discovery { path: PathBuf, reason: String },

    /// Site configuration could not be loaded
    #[error("Invalid configuration {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HoorError>;

impl HoorError {
    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a new write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid front matter error
    pub fn invalid_front_matter(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFrontMatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid date error
    pub fn invalid_date(path: impl Into<PathBuf>, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            path: path.into(),
            value: value.into(),
        }
    }

    /// Create a new discovery error
    pub fn discovery(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attach a file path to an error raised without one.
    ///
    /// Codec errors surface from serde without knowing which file they came
    /// from; this turns them into front matter errors naming the file.
    pub fn at(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Yaml(e) => Self::invalid_front_matter(path, e.to_string()),
            Self::Json(e) => Self::invalid_front_matter(path, e.to_string()),
            Self::TomlDe(e) => Self::invalid_front_matter(path, e.to_string()),
            Self::TomlSer(e) => Self::invalid_front_matter(path, e.to_string()),
            Self::InvalidFrontMatter { reason, .. } => Self::invalid_front_matter(path, reason),
            Self::InvalidDate { value, .. } => Self::invalid_date(path, value),
            other => other,
        }
    }

    /// Whether this error aborts a whole run rather than a single file
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Discovery { .. } | Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = HoorError::file_not_found("test.md");
        assert!(matches!(err, HoorError::FileNotFound { .. }));
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "File not found: test.md");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(HoorError::discovery("content", "missing").is_fatal());
        assert!(HoorError::config("config.toml", "bad").is_fatal());
        assert!(!HoorError::invalid_date("a.md", "x").is_fatal());
    }

    #[test]
    fn test_at_attaches_path() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err = HoorError::from(yaml_err).at("post.md");
        match err {
            HoorError::InvalidFrontMatter { path, .. } => assert_eq!(path, PathBuf::from("post.md")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = HoorError::invalid_date("", "nope").at("post.md");
        assert_eq!(err.to_string(), "Invalid date \"nope\" in post.md");
    }
}
