//! Error types for the bnet toolkit.

use std::path::PathBuf;

/// The standard result type for fallible bnet operations.
pub type Result<T> = std::result::Result<T, BnetError>;

/// Errors reported by network construction, transformation and I/O.
///
/// Every fallible entry point returns one of these; no operation leaves a
/// network in a half-built state. Validators run to completion so that
/// [`BnetError::Invariant`] carries the full diagnostic list.
#[derive(Debug, thiserror::Error)]
pub enum BnetError {
    /// A file could not be opened, read, or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Malformed input: bad header, unexpected EOF, illegal literal,
    /// redefinition, or undefined reference.
    #[error("format error: {msg}")]
    Format {
        /// Description of the malformation, with a line number when known.
        msg: String,
    },

    /// A structural invariant check failed during `wrap_up`.
    #[error("invariant check failed with {} error(s)", diagnostics.len())]
    Invariant {
        /// One entry per violation, in discovery order.
        diagnostics: Vec<String>,
    },

    /// A request that is invalid for the given arguments, e.g. creating a
    /// DFF from a non-FF cell or reusing a port name.
    #[error("domain error: {msg}")]
    Domain {
        /// Description of the rejected request.
        msg: String,
    },

    /// The network contains constructs the requested output format cannot
    /// express.
    #[error("unsupported: {msg}")]
    Unsupported {
        /// Description of the offending construct.
        msg: String,
    },
}

/// Stream-level failures during an encode/decode (truncation, bad UTF-8)
/// surface as format errors; file-open failures keep their path via
/// [`BnetError::io`].
impl From<std::io::Error> for BnetError {
    fn from(source: std::io::Error) -> Self {
        Self::Format {
            msg: source.to_string(),
        }
    }
}

impl BnetError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a format error with the given message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format { msg: msg.into() }
    }

    /// Creates a domain error with the given message.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain { msg: msg.into() }
    }

    /// Creates an unsupported-construct error with the given message.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported { msg: msg.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_display() {
        let err = BnetError::format("aag 3: bad header");
        assert_eq!(format!("{err}"), "format error: aag 3: bad header");
    }

    #[test]
    fn domain_display() {
        let err = BnetError::domain("'clk' is already in use");
        assert!(err.to_string().contains("already in use"));
    }

    #[test]
    fn invariant_counts_diagnostics() {
        let err = BnetError::Invariant {
            diagnostics: vec![
                "Port#0(a).bit[0] is not set".to_string(),
                "DFF#1(r).clock is not valid".to_string(),
            ],
        };
        assert!(err.to_string().contains("2 error(s)"));
    }

    #[test]
    fn io_display_contains_path() {
        let err = BnetError::io(
            "/tmp/missing.blif",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("missing.blif"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn unsupported_display() {
        let err = BnetError::unsupported("BLIF cannot express Bdd nodes");
        assert!(err.to_string().starts_with("unsupported:"));
    }
}
