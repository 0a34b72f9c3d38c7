//! texreport - LaTeX report assembler
//!
//! Reports are built from a stream of content (text, lists, tables, figures,
//! equations) interleaved with section boundaries. A [`SectionAccumulator`]
//! buffers the content and folds it into a section tree; a [`Style`]
//! supplies the document class, preamble and front matter; the
//! [`latex_writer`] serialises the result and the [`toolchain`] optionally
//! compiles it to PDF.
//!
//! ```no_run
//! use texreport::{Report, ReportMetadata, StyleKind};
//!
//! let mut report = Report::new(StyleKind::BasicReport, ReportMetadata::titled("Results"));
//! report.create_section("Introduction")?;
//! report.add_text("Text goes here.");
//! report.write(std::path::Path::new("build"))?;
//! # Ok::<(), texreport::ReportError>(())
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod content;
pub mod error;
pub mod latex_model;
pub mod latex_writer;
pub mod report;
pub mod report_config;
pub mod script;
pub mod section_accumulator;
pub mod style;
pub mod templates;
pub mod toolchain;

pub use error::ReportError;
pub use latex_model::{Document, Node, Scope, ScopeLevel};
pub use report::{OutputArtifacts, Report};
pub use report_config::ReportConfig;
pub use section_accumulator::{AccumulatorError, SectionAccumulator};
pub use style::{Author, ReportMetadata, Style, StyleKind};
