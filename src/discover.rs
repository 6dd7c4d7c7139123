//! Input discovery: expand directories into the PDF files they contain

use crate::error::{Error, Result};
use crate::pdf::is_derived_output;
use std::path::{Path, PathBuf};

/// Expand `inputs` into a list of PDF files.
///
/// Files are taken as given. Directories are scanned for `*.pdf` (any case),
/// optionally recursively, keeping names that match `pattern` if one is given.
/// Files a previous run wrote there (`-crop`, `-center`, `-blank`, `-shrink`)
/// are skipped.
pub fn expand_inputs(
    inputs: &[PathBuf],
    recursive: bool,
    pattern: Option<&str>,
) -> Result<Vec<PathBuf>> {
    let pattern = pattern
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| Error::Config {
                reason: format!("invalid pattern {:?}: {}", p, e),
            })
        })
        .transpose()?;

    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            collect_pdfs(input, recursive, pattern.as_ref(), &mut found)?;
            // Sort by path for consistent ordering
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(Error::PdfNotFound {
                path: input.display().to_string(),
            });
        }
    }
    Ok(files)
}

fn collect_pdfs(
    dir: &Path,
    recursive: bool,
    pattern: Option<&glob::Pattern>,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(Error::Io)?;

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue, // Skip entries we can't read
        };

        let path = entry.path();

        if path.is_dir() {
            if recursive {
                if let Err(e) = collect_pdfs(&path, recursive, pattern, files) {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable directory");
                }
            }
        } else if path.is_file() {
            let is_pdf = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
            if !is_pdf {
                continue;
            }
            if is_derived_output(&path) {
                tracing::debug!(path = %path.display(), "Skipping earlier output");
                continue;
            }

            if let Some(pat) = pattern {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                if !pat.matches(&name) {
                    continue;
                }
            }

            files.push(path);
        }
    }

    Ok(())
}
