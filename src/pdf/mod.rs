//! PDF operations
//!
//! Each operation takes a path and returns the path of a new file, or the
//! input path unchanged when the underlying tool fails.

mod blank;
mod crop;
mod paths;
mod shrink;

#[cfg(test)]
pub(crate) use blank::tests::labelled_pdf;
pub use blank::{blank_pdf, insert_blank_pages, page_count};
pub use crop::{center_pdf, crop_pdf, parse_hires_bboxes, BoundingBox, PageCropper, Pdfcrop};
pub use paths::{derive_output_path, ensure_pdf_input, is_derived_output};
pub use shrink::{ghostscript_args, shrink_pdf};

use crate::config::ToolConfig;
use crate::error::Result;
use crate::process::{ProcessRunner, SystemRunner};
use std::path::{Path, PathBuf};

/// Decide what an external tool run produced: `output` if it exited 0 and
/// wrote the file, otherwise `input` after logging why.
pub(crate) fn settle_tool_outcome(
    input: &Path,
    output: PathBuf,
    status: Result<i32>,
    action: &str,
) -> PathBuf {
    match status {
        Ok(0) if output.exists() => output,
        Ok(0) => {
            tracing::warn!(
                expected = %output.display(),
                "Can't find {} output where expected",
                action
            );
            input.to_path_buf()
        }
        Ok(code) => {
            tracing::warn!(
                path = %input.display(),
                status = code,
                "Failed to {} the pdf file",
                action
            );
            input.to_path_buf()
        }
        Err(e) => {
            tracing::warn!(
                path = %input.display(),
                error = %e,
                "Failed to {} the pdf file",
                action
            );
            input.to_path_buf()
        }
    }
}

/// Tool configuration and process runner bundled for the four operations
pub struct PdfOps<R = SystemRunner> {
    config: ToolConfig,
    runner: R,
}

impl PdfOps<SystemRunner> {
    /// Operations running the real external tools
    pub fn new(config: ToolConfig) -> Self {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: ProcessRunner> PdfOps<R> {
    pub fn with_runner(config: ToolConfig, runner: R) -> Self {
        Self { config, runner }
    }

    fn cropper(&self) -> Pdfcrop<&R> {
        Pdfcrop::new(&self.config, &self.runner)
    }

    pub fn crop(&self, input: &Path) -> Result<PathBuf> {
        crop_pdf(input, &self.cropper())
    }

    pub fn center(&self, input: &Path) -> Result<PathBuf> {
        center_pdf(input, &self.cropper())
    }

    pub fn blank(&self, input: &Path) -> Result<PathBuf> {
        blank_pdf(input)
    }

    pub fn shrink(&self, input: &Path) -> Result<PathBuf> {
        shrink_pdf(input, &self.config, &self.runner)
    }
}
