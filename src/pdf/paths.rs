//! Output path derivation

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub(crate) const CROP_SUFFIX: &str = "crop";
pub(crate) const CENTER_SUFFIX: &str = "center";
pub(crate) const BLANK_SUFFIX: &str = "blank";
pub(crate) const SHRINK_SUFFIX: &str = "shrink";

const OPERATION_SUFFIXES: [&str; 4] = [CROP_SUFFIX, CENTER_SUFFIX, BLANK_SUFFIX, SHRINK_SUFFIX];

/// Derive the output path of an operation: `<dir>/<stem>-<suffix>.pdf`.
///
/// The stem is the file name without its last extension, so
/// `paper.pdf` + `crop` becomes `paper-crop.pdf` and running it again on the
/// result gives `paper-crop-crop.pdf`.
pub fn derive_output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = input.file_stem() {
        name.push(stem);
    }
    name.push("-");
    name.push(suffix);
    name.push(".pdf");
    input.with_file_name(name)
}

/// Check that the input is an existing regular file.
pub fn ensure_pdf_input(input: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(Error::PdfNotFound {
            path: input.display().to_string(),
        });
    }
    Ok(())
}

/// Whether `path` looks like the output of one of the operations
/// (`<stem>-crop.pdf`, `<stem>-center.pdf`, `<stem>-blank.pdf`, `<stem>-shrink.pdf`).
pub fn is_derived_output(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    OPERATION_SUFFIXES.iter().any(|suffix| {
        stem.strip_suffix(suffix)
            .and_then(|rest| rest.strip_suffix('-'))
            .is_some_and(|base| !base.is_empty())
    })
}

/// Remove a file left at `output` by an earlier run, so that only a file the
/// tool writes now counts as its output.
pub(crate) fn clear_stale_output(output: &Path) -> Result<()> {
    match std::fs::remove_file(output) {
        Ok(()) => {
            tracing::debug!(path = %output.display(), "Removed stale output");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("paper.pdf", "crop", "paper-crop.pdf")]
    #[case("paper.pdf", "center", "paper-center.pdf")]
    #[case("paper.pdf", "blank", "paper-blank.pdf")]
    #[case("paper.pdf", "shrink", "paper-shrink.pdf")]
    #[case("paper-crop.pdf", "crop", "paper-crop-crop.pdf")]
    #[case("paper", "crop", "paper-crop.pdf")]
    #[case("paper.v2.pdf", "blank", "paper.v2-blank.pdf")]
    #[case("/tmp/papers/paper.PDF", "shrink", "/tmp/papers/paper-shrink.pdf")]
    fn test_derive_output_path(#[case] input: &str, #[case] suffix: &str, #[case] expected: &str) {
        assert_eq!(
            derive_output_path(Path::new(input), suffix),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn test_derived_path_keeps_directory() {
        let out = derive_output_path(Path::new("a/b/c.pdf"), "crop");
        assert_eq!(out.parent(), Some(Path::new("a/b")));
    }

    #[rstest]
    #[case("paper-crop.pdf", true)]
    #[case("paper-crop-shrink.pdf", true)]
    #[case("dir/paper-center.PDF", true)]
    #[case("paper-blank.pdf", true)]
    #[case("paper.pdf", false)]
    #[case("croprotation.pdf", false)]
    #[case("-shrink.pdf", false)]
    #[case("paper-cropped.pdf", false)]
    fn test_is_derived_output(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_derived_output(Path::new(path)), expected);
    }

    #[test]
    fn test_clear_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("paper-crop.pdf");
        std::fs::write(&stale, b"old").unwrap();

        clear_stale_output(&stale).unwrap();
        assert!(!stale.exists());
        // nothing to remove is fine
        clear_stale_output(&stale).unwrap();
    }

    #[test]
    fn test_ensure_pdf_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("paper.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();

        assert!(ensure_pdf_input(&file).is_ok());
        assert!(matches!(
            ensure_pdf_input(&dir.path().join("missing.pdf")),
            Err(Error::PdfNotFound { .. })
        ));
        // directories are not documents
        assert!(ensure_pdf_input(dir.path()).is_err());
    }
}
