//! Blank page interleaving using the qpdf crate (vendored FFI)
//!
//! Writes a copy of a PDF with an empty page after every original page, giving
//! room for handwritten notes on the tablet.

use super::paths::{derive_output_path, ensure_pdf_input, BLANK_SUFFIX};
use crate::error::{Error, Result};
use qpdf::{QPdf, QPdfDictionary, QPdfObject};
use std::path::{Path, PathBuf};

/// Used for blank pages whose predecessor has no media box anywhere in its tree.
const LETTER_MEDIA_BOX: &str = "[0 0 612 792]";

/// Page attributes a page may inherit from its `/Pages` ancestors.
const INHERITABLE_KEYS: [&str; 4] = ["/MediaBox", "/CropBox", "/Resources", "/Rotate"];

/// Bound on the `/Parent` walk; page trees are shallow and this stops cycles.
const MAX_TREE_DEPTH: usize = 64;

/// Map qpdf crate errors to our error types
fn map_qpdf_error(e: qpdf::QPdfError) -> Error {
    Error::QpdfError {
        reason: e.to_string(),
    }
}

/// Helper: open a QPdf from memory after a header sanity check
fn open_qpdf(data: &[u8]) -> Result<QPdf> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    QPdf::read_from_memory(data).map_err(map_qpdf_error)
}

/// Copy inherited attributes from the page's ancestors onto the page itself.
///
/// Copying a page into another document drops its `/Parent`, so anything it
/// only inherits would be lost. The nearest ancestor wins.
fn push_inherited_attributes(page: &QPdfDictionary) {
    let mut missing: Vec<&str> = INHERITABLE_KEYS
        .into_iter()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get("/Parent").map(QPdfDictionary::from);
    let mut depth = 0;

    while let Some(node) = parent {
        if missing.is_empty() || depth == MAX_TREE_DEPTH {
            break;
        }
        missing.retain(|key| match node.get(key) {
            Some(value) => {
                page.set(key, &value);
                false
            }
            None => true,
        });
        parent = node.get("/Parent").map(QPdfDictionary::from);
        depth += 1;
    }
}

/// Build a document where every page of `input_data` is followed by a blank page.
///
/// Original pages keep their order and any attributes they inherit from the
/// page tree. Each blank page takes the media box of the page before it.
pub fn insert_blank_pages(input_data: &[u8]) -> Result<Vec<u8>> {
    let source = open_qpdf(input_data)?;
    let pages = source.get_pages().map_err(map_qpdf_error)?;

    let dest = QPdf::empty();

    for page in &pages {
        push_inherited_attributes(page);
        let copied = QPdfDictionary::from(dest.copy_from_foreign(page));
        let media_box: QPdfObject = match copied.get("/MediaBox") {
            Some(media_box) => media_box,
            None => dest
                .parse_object(LETTER_MEDIA_BOX)
                .map_err(map_qpdf_error)?,
        };
        dest.add_page(&copied, false).map_err(map_qpdf_error)?;

        let blank = dest.new_dictionary_from([
            ("/Type", dest.new_name("/Page")),
            ("/MediaBox", media_box),
            ("/Resources", dest.new_dictionary().into()),
        ]);
        dest.add_page(&blank, false).map_err(map_qpdf_error)?;
    }

    dest.writer().write_to_memory().map_err(map_qpdf_error)
}

/// Get the page count of a PDF
pub fn page_count(input_data: &[u8]) -> Result<u32> {
    let qpdf = open_qpdf(input_data)?;
    qpdf.get_num_pages().map_err(map_qpdf_error)
}

fn write_blanked(input: &Path, output: &Path) -> Result<()> {
    let data = std::fs::read(input)?;
    let blanked = insert_blank_pages(&data)?;
    if let Err(e) = std::fs::write(output, blanked) {
        let _ = std::fs::remove_file(output);
        return Err(e.into());
    }
    Ok(())
}

/// Insert a blank page after every page, writing `<stem>-blank.pdf`.
///
/// A PDF that cannot be read or written is passed through: the warning is
/// logged and `input` is returned unchanged.
pub fn blank_pdf(input: &Path) -> Result<PathBuf> {
    ensure_pdf_input(input)?;
    tracing::info!(path = %input.display(), "Adding blank pages");

    let output = derive_output_path(input, BLANK_SUFFIX);
    match write_blanked(input, &output) {
        Ok(()) => Ok(output),
        Err(e) => {
            tracing::warn!(
                path = %input.display(),
                error = %e,
                "Failed to add blank pages to the pdf file"
            );
            Ok(input.to_path_buf())
        }
    }
}
