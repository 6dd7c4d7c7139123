//! paper-prep library
//!
//! Prepares PDF papers for reading on an e-ink tablet:
//! - `crop`: trim page margins with `pdfcrop`
//! - `center`: frame the content for the tablet screen
//! - `blank`: insert a blank page after every page
//! - `shrink`: reduce file size with Ghostscript
//!
//! Every operation writes a new file next to its input and falls back to the
//! input path when the external tool fails.

pub mod config;
pub mod discover;
pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod process;

pub use config::ToolConfig;
pub use error::{Error, Result};
pub use pdf::PdfOps;
pub use pipeline::{Layout, Pipeline, PipelineOptions, PipelineReport};
pub use process::{ProcessRunner, SystemRunner};
