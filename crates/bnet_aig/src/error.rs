//! Error type for AIGER reading and writing.

/// Errors from parsing or serialising AIGER data.
#[derive(Debug, thiserror::Error)]
pub enum AigError {
    /// The input violates the AIGER format: bad header, unexpected EOF,
    /// odd literal where an even one is required, redefinition, or a
    /// reference to an undefined literal.
    #[error("AIG format error: {msg}")]
    Format {
        /// Description of the violation.
        msg: String,
    },

    /// An underlying read or write failed.
    #[error("AIG I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl AigError {
    /// Creates a format error with the given message.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format { msg: msg.into() }
    }
}
