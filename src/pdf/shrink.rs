//! File size reduction with Ghostscript

use super::paths::{clear_stale_output, derive_output_path, ensure_pdf_input, SHRINK_SUFFIX};
use super::settle_tool_outcome;
use crate::config::ToolConfig;
use crate::error::Result;
use crate::process::ProcessRunner;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Ghostscript flags: PDF 1.4 output with the `/printer` quality preset, non-interactive.
const GS_FLAGS: [&str; 6] = [
    "-sDEVICE=pdfwrite",
    "-dCompatibilityLevel=1.4",
    "-dPDFSETTINGS=/printer",
    "-dNOPAUSE",
    "-dBATCH",
    "-dQUIET",
];

/// Full Ghostscript argument list for rewriting `input` into `output`
pub fn ghostscript_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut out_flag = OsString::from("-sOutputFile=");
    out_flag.push(output);

    let mut args: Vec<OsString> = GS_FLAGS.iter().map(OsString::from).collect();
    args.push(out_flag);
    args.push(input.as_os_str().to_owned());
    args
}

/// Recompress a PDF, writing `<stem>-shrink.pdf`.
///
/// A file already present at the output path is removed first. Falls back to
/// `input` when Ghostscript fails, cannot be started, or writes nothing.
pub fn shrink_pdf<R: ProcessRunner + ?Sized>(
    input: &Path,
    config: &ToolConfig,
    runner: &R,
) -> Result<PathBuf> {
    ensure_pdf_input(input)?;
    tracing::info!(path = %input.display(), "Shrinking pdf file");

    let output = derive_output_path(input, SHRINK_SUFFIX);
    let status = clear_stale_output(&output)
        .and_then(|()| runner.run(&config.compressor_path, &ghostscript_args(input, &output)));
    Ok(settle_tool_outcome(input, output, status, "shrink"))
}
