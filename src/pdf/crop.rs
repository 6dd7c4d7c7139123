//! Cropping and centering via `pdfcrop`
//!
//! The page geometry work happens in external tools. [`PageCropper`] is the
//! seam: [`Pdfcrop`] drives the real binaries, tests substitute their own.

use super::paths::{
    clear_stale_output, derive_output_path, ensure_pdf_input, CENTER_SUFFIX, CROP_SUFFIX,
};
use super::settle_tool_outcome;
use crate::config::{ToolConfig, CROP_MARGIN, TABLET_HEIGHT, TABLET_WIDTH};
use crate::error::Result;
use crate::process::ProcessRunner;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Helper that writes a cropped or centered copy of a PDF.
///
/// Both methods return the helper's exit status, `0` meaning success.
pub trait PageCropper {
    /// Crop the margins of every page, leaving `margin` points around the content.
    fn crop(&self, input: &Path, output: &Path, margin: u32) -> Result<i32>;

    /// Re-frame the pages so the content sits centered on the tablet screen.
    fn center(&self, input: &Path, output: &Path) -> Result<i32>;
}

/// Content bounding box in PostScript points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Smallest box containing both boxes
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    pub fn pad(self, margin: f64) -> BoundingBox {
        BoundingBox {
            left: self.left - margin,
            bottom: self.bottom - margin,
            right: self.right + margin,
            top: self.top + margin,
        }
    }

    /// Grow the box around its center until `height / width` matches the target ratio.
    pub fn fit_aspect(self, target_width: f64, target_height: f64) -> BoundingBox {
        let ratio = target_height / target_width;
        let (w, h) = (self.width(), self.height());
        if w <= 0.0 || h <= 0.0 {
            return self;
        }
        if h / w > ratio {
            let extra = (h / ratio - w) / 2.0;
            BoundingBox {
                left: self.left - extra,
                right: self.right + extra,
                ..self
            }
        } else {
            let extra = (w * ratio - h) / 2.0;
            BoundingBox {
                bottom: self.bottom - extra,
                top: self.top + extra,
                ..self
            }
        }
    }

    /// Format as the `--bbox` argument of pdfcrop: `"left bottom right top"`.
    pub fn to_pdfcrop_arg(&self) -> String {
        format!(
            "{:.3} {:.3} {:.3} {:.3}",
            self.left, self.bottom, self.right, self.top
        )
    }
}

/// Parse the `%%HiResBoundingBox:` lines emitted by Ghostscript's bbox device.
/// Blank pages report an empty box and are skipped.
pub fn parse_hires_bboxes(output: &str) -> Vec<BoundingBox> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("%%HiResBoundingBox:"))
        .filter_map(|rest| {
            let nums: Vec<f64> = rest
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<std::result::Result<_, _>>()
                .ok()?;
            match nums[..] {
                [left, bottom, right, top] => Some(BoundingBox {
                    left,
                    bottom,
                    right,
                    top,
                }),
                _ => None,
            }
        })
        .filter(|b| b.width() > 0.0 && b.height() > 0.0)
        .collect()
}

/// [`PageCropper`] backed by `pdfcrop`, with Ghostscript measuring content for centering
pub struct Pdfcrop<R> {
    pdfcrop: PathBuf,
    ghostscript: PathBuf,
    runner: R,
}

impl<R: ProcessRunner> Pdfcrop<R> {
    pub fn new(config: &ToolConfig, runner: R) -> Self {
        Self {
            pdfcrop: config.cropper_path.clone(),
            ghostscript: config.compressor_path.clone(),
            runner,
        }
    }

    /// Union of the content boxes of all pages, or `None` if nothing was drawn.
    fn measure(&self, input: &Path) -> Result<(i32, Option<BoundingBox>)> {
        let args: Vec<OsString> = vec![
            "-dSAFER".into(),
            "-dNOPAUSE".into(),
            "-dBATCH".into(),
            "-sDEVICE=bbox".into(),
            input.as_os_str().to_owned(),
        ];
        let output = self.runner.capture(&self.ghostscript, &args)?;
        if output.status != 0 {
            return Ok((output.status, None));
        }
        let union = parse_hires_bboxes(&output.stderr)
            .into_iter()
            .reduce(BoundingBox::union);
        Ok((0, union))
    }
}

impl<R: ProcessRunner> PageCropper for Pdfcrop<R> {
    fn crop(&self, input: &Path, output: &Path, margin: u32) -> Result<i32> {
        let args: Vec<OsString> = vec![
            "--margins".into(),
            margin.to_string().into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ];
        self.runner.run(&self.pdfcrop, &args)
    }

    fn center(&self, input: &Path, output: &Path) -> Result<i32> {
        let bbox = match self.measure(input)? {
            (0, Some(bbox)) => bbox,
            (0, None) => {
                tracing::warn!(path = %input.display(), "No page content found to center");
                return Ok(1);
            }
            (status, _) => return Ok(status),
        };
        let framed = bbox
            .pad(f64::from(CROP_MARGIN))
            .fit_aspect(TABLET_WIDTH, TABLET_HEIGHT);
        tracing::debug!(bbox = %framed.to_pdfcrop_arg(), "Centering bounding box");

        let args: Vec<OsString> = vec![
            "--bbox".into(),
            framed.to_pdfcrop_arg().into(),
            input.as_os_str().to_owned(),
            output.as_os_str().to_owned(),
        ];
        self.runner.run(&self.pdfcrop, &args)
    }
}

/// Crop the margins of a PDF, writing `<stem>-crop.pdf`.
///
/// A file already present at the output path is removed first. Returns the
/// cropped file, or `input` unchanged if the cropper fails or writes nothing.
/// Only a missing input is an error.
pub fn crop_pdf<C: PageCropper + ?Sized>(input: &Path, cropper: &C) -> Result<PathBuf> {
    ensure_pdf_input(input)?;
    tracing::info!(path = %input.display(), "Cropping pdf file");

    let output = derive_output_path(input, CROP_SUFFIX);
    let status =
        clear_stale_output(&output).and_then(|()| cropper.crop(input, &output, CROP_MARGIN));
    Ok(settle_tool_outcome(input, output, status, "crop"))
}

/// Center a PDF for the tablet screen, writing `<stem>-center.pdf`.
///
/// Same fallback behaviour as [`crop_pdf`].
pub fn center_pdf<C: PageCropper + ?Sized>(input: &Path, cropper: &C) -> Result<PathBuf> {
    ensure_pdf_input(input)?;
    tracing::info!(path = %input.display(), "Centering pdf file");

    let output = derive_output_path(input, CENTER_SUFFIX);
    let status = clear_stale_output(&output).and_then(|()| cropper.center(input, &output));
    Ok(settle_tool_outcome(input, output, status, "center"))
}
