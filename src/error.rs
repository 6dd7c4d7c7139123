//! Error types for paper-prep

use thiserror::Error;

/// Result type alias for paper-prep
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for paper-prep
#[derive(Error, Debug)]
pub enum Error {
    /// Input PDF not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// qpdf error
    #[error("qpdf error: {reason}")]
    QpdfError { reason: String },

    /// External tool could not be started
    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Return a short message suitable for end users.
    /// Paths and library details are omitted; log the full error via tracing first.
    pub fn client_message(&self) -> String {
        match self {
            Error::PdfNotFound { .. } => "PDF not found".to_string(),
            Error::InvalidPdf { .. } => "Invalid PDF file".to_string(),
            Error::QpdfError { .. } => "PDF processing error".to_string(),
            Error::ToolLaunch { tool, .. } => format!("Could not run {}", tool),
            Error::Config { .. } => "Invalid configuration".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Serialization(_) => "Serialization error".to_string(),
        }
    }
}
