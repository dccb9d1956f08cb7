use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sitemap generation.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The requested output format is not one of xml, csv or json.
    #[error("Unsupported sitemap format '{format}'. Expected one of: xml, csv, json")]
    UnsupportedFormat {
        /// The format tag that was requested
        format: String,
    },

    /// A serializer could not produce usable output.
    #[error("Failed to encode sitemap as {format}: {message}")]
    Encoding {
        /// Format being encoded
        format: String,
        /// Error message
        message: String,
    },

    /// Creating the output directory or writing the file failed.
    #[error("Unable to create sitemap file '{path}': {message}")]
    FileWrite {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// The page source could not provide records.
    #[error("Failed to load pages: {message}")]
    Source {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an unsupported format error.
    #[must_use]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an encoding error for the given format.
    #[must_use]
    pub fn encoding(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates a file write error with path context.
    #[must_use]
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a page source error.
    #[must_use]
    pub fn page_source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Returns true if the requested format was not recognized.
    #[must_use]
    pub const fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Returns true if a serializer failed.
    #[must_use]
    pub const fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Returns true if directory creation or the file write failed.
    #[must_use]
    pub const fn is_file_write(&self) -> bool {
        matches!(self, Self::FileWrite { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::encoding("json", e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = Error::unsupported_format("yaml");
        assert!(err.is_unsupported_format());
        assert!(err.to_string().contains("'yaml'"));
    }

    #[test]
    fn test_file_write_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::file_write("/tmp/sitemaps/sitemap.xml", io_err);
        assert!(err.is_file_write());
        assert!(err.to_string().contains("/tmp/sitemaps/sitemap.xml"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_serde_json_error_is_encoding() {
        let json_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_encoding());
        assert!(err.to_string().contains("json"));
    }

    #[test]
    fn test_error_clone() {
        let err = Error::config("test");
        let cloned = err.clone();
        assert!(cloned.is_config());
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
