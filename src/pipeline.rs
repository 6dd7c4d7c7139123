//! Processing pipeline
//!
//! Chains the operations in a fixed order (layout, blank pages, shrink), each
//! step consuming the previous step's output. A failed step passes its input
//! forward, so the chain always ends on a readable PDF.

use crate::error::Result;
use crate::pdf::{ensure_pdf_input, PdfOps};
use crate::process::{ProcessRunner, SystemRunner};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the page content is framed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Leave the pages as they are
    None,
    /// Trim the margins
    #[default]
    Crop,
    /// Center the content for the tablet screen
    Center,
}

impl Layout {
    /// Layout selected by the `--center` / `--no-crop` switches; centering wins.
    pub fn from_switches(center: bool, no_crop: bool) -> Self {
        if center {
            Layout::Center
        } else if no_crop {
            Layout::None
        } else {
            Layout::Crop
        }
    }
}

/// Pipeline settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub layout: Layout,
    /// Insert a blank page after every page
    pub blank: bool,
    /// Recompress the final file
    pub shrink: bool,
    /// Keep the files produced by intermediate steps
    pub keep_intermediates: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Crop,
            blank: false,
            shrink: true,
            keep_intermediates: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Crop,
    Center,
    Blank,
    Shrink,
}

/// Outcome of one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub operation: Operation,
    pub input: PathBuf,
    pub output: PathBuf,
    /// The step failed and passed its input through
    pub degraded: bool,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub steps: Vec<StepReport>,
    /// Intermediate files deleted after the run
    pub removed: Vec<PathBuf>,
}

impl PipelineReport {
    pub fn degraded_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.degraded)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct Pipeline<R = SystemRunner> {
    ops: PdfOps<R>,
    options: PipelineOptions,
}

impl<R: ProcessRunner> Pipeline<R> {
    pub fn new(ops: PdfOps<R>, options: PipelineOptions) -> Self {
        Self { ops, options }
    }

    /// Operations run by this pipeline, in order
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops = Vec::with_capacity(3);
        match self.options.layout {
            Layout::None => {}
            Layout::Crop => ops.push(Operation::Crop),
            Layout::Center => ops.push(Operation::Center),
        }
        if self.options.blank {
            ops.push(Operation::Blank);
        }
        if self.options.shrink {
            ops.push(Operation::Shrink);
        }
        ops
    }

    fn apply(&self, operation: Operation, input: &Path) -> Result<PathBuf> {
        match operation {
            Operation::Crop => self.ops.crop(input),
            Operation::Center => self.ops.center(input),
            Operation::Blank => self.ops.blank(input),
            Operation::Shrink => self.ops.shrink(input),
        }
    }

    /// Run every configured step on `input`.
    pub fn run(&self, input: &Path) -> Result<PipelineReport> {
        ensure_pdf_input(input)?;

        let mut current = input.to_path_buf();
        let mut steps = Vec::new();
        for operation in self.operations() {
            let output = self.apply(operation, &current)?;
            steps.push(StepReport {
                operation,
                degraded: output == current,
                input: current,
                output: output.clone(),
            });
            current = output;
        }

        let removed = if self.options.keep_intermediates {
            Vec::new()
        } else {
            remove_intermediates(input, &current, &steps)
        };

        tracing::info!(
            input = %input.display(),
            output = %current.display(),
            steps = steps.len(),
            "Finished processing"
        );

        Ok(PipelineReport {
            input: input.to_path_buf(),
            output: current,
            steps,
            removed,
        })
    }
}

/// Delete step outputs that are neither the original input nor the final result.
fn remove_intermediates(input: &Path, output: &Path, steps: &[StepReport]) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for step in steps {
        let path = &step.output;
        if path == input || path == output || removed.contains(path) {
            continue;
        }
        match std::fs::remove_file(path) {
            Ok(()) => removed.push(path.clone()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove intermediate file")
            }
        }
    }
    removed
}
