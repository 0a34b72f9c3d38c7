//! Top-level error type for report assembly and output

use crate::content::ContentError;
use crate::latex_writer::LatexWriteError;
use crate::section_accumulator::AccumulatorError;
use crate::toolchain::ToolchainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or writing a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Nesting(#[from] AccumulatorError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Write(#[from] LatexWriteError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error("Failed to create output directory {path}: {source}", path = .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy class file {path}: {source}", path = .path.display())]
    ClassFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
