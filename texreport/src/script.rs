//! Declarative content scripts
//!
//! The `[[content]]` entries of texreport.toml are a list of steps, each one
//! mapping to a single `Report` call. `apply_steps` replays them in order.

use crate::content::{
    EquationBlock, FigureBlock, ListBlock, MatrixBlock, MatrixBracket, SideNote, TableBlock,
    TextMark, TextOptions, VSpace,
};
use crate::error::ReportError;
use crate::latex_model::ScopeLevel;
use crate::report::{resolve_path, Report};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// A failed content step
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Content step #{} ({kind}) failed: {source}", .index + 1)]
    Step {
        /// Zero-based position in the step list
        index: usize,
        kind: &'static str,
        #[source]
        source: ReportError,
    },
}

/// A table or matrix cell as written in TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One `label: text` entry of a description list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    pub label: String,
    pub text: String,
}

fn default_true() -> bool {
    true
}

fn default_offset() -> String {
    "0cm".to_string()
}

/// A single content step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ContentStep {
    Section {
        title: String,
        #[serde(default = "default_true")]
        numbering: bool,
    },
    Subsection {
        title: String,
        #[serde(default = "default_true")]
        numbering: bool,
    },
    Subsubsection {
        title: String,
        #[serde(default = "default_true")]
        numbering: bool,
    },
    /// LaTeX text, optionally highlighted
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mark: Option<TextMark>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        new_paragraph: bool,
    },
    Paragraph,
    LineBreak,
    NewPage,
    Vspace {
        #[serde(default)]
        size: VSpace,
    },
    /// Bulleted, or numbered when `numbered` is set
    List {
        items: Vec<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        numbered: bool,
    },
    Description {
        items: Vec<DescriptionEntry>,
    },
    /// Inline table; the first row is the header
    Table {
        rows: Vec<Vec<Cell>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Table loaded from a CSV file relative to the configuration file
    CsvTable {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Figure {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<String>,
    },
    Equation {
        latex: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        inline: bool,
    },
    Matrix {
        name: String,
        rows: Vec<Vec<Cell>>,
        #[serde(default)]
        bracket: MatrixBracket,
    },
    FullWidth {
        text: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        new_paragraph: bool,
    },
    SideNote {
        text: String,
        #[serde(default = "default_true")]
        numbered: bool,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        symbol: String,
        #[serde(default = "default_offset")]
        offset: String,
    },
    Quote {
        text: String,
        attribution: String,
    },
    Code {
        code: String,
    },
    Appendix {
        title: String,
        text: String,
    },
    Abstract {
        text: String,
    },
    Keywords {
        keywords: Vec<String>,
    },
}

impl ContentStep {
    /// The `kind` tag as written in TOML
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentStep::Section { .. } => "section",
            ContentStep::Subsection { .. } => "subsection",
            ContentStep::Subsubsection { .. } => "subsubsection",
            ContentStep::Text { .. } => "text",
            ContentStep::Paragraph => "paragraph",
            ContentStep::LineBreak => "line-break",
            ContentStep::NewPage => "new-page",
            ContentStep::Vspace { .. } => "vspace",
            ContentStep::List { .. } => "list",
            ContentStep::Description { .. } => "description",
            ContentStep::Table { .. } => "table",
            ContentStep::CsvTable { .. } => "csv-table",
            ContentStep::Figure { .. } => "figure",
            ContentStep::Equation { .. } => "equation",
            ContentStep::Matrix { .. } => "matrix",
            ContentStep::FullWidth { .. } => "full-width",
            ContentStep::SideNote { .. } => "side-note",
            ContentStep::Quote { .. } => "quote",
            ContentStep::Code { .. } => "code",
            ContentStep::Appendix { .. } => "appendix",
            ContentStep::Abstract { .. } => "abstract",
            ContentStep::Keywords { .. } => "keywords",
        }
    }

    /// Apply this step to `report`
    ///
    /// # Parameters
    /// * `report` - Report being built
    /// * `base_dir` - Directory relative paths (CSV files, figures) are resolved against
    pub fn apply(&self, report: &mut Report, base_dir: &Path) -> Result<(), ReportError> {
        match self {
            ContentStep::Section { title, numbering } => {
                report.create_scope(ScopeLevel::Section, title, *numbering)?
            }
            ContentStep::Subsection { title, numbering } => {
                report.create_scope(ScopeLevel::Subsection, title, *numbering)?
            }
            ContentStep::Subsubsection { title, numbering } => {
                report.create_scope(ScopeLevel::Subsubsection, title, *numbering)?
            }
            ContentStep::Text {
                text,
                mark,
                color,
                new_paragraph,
            } => {
                let options = TextOptions {
                    mark: *mark,
                    color: color.clone(),
                    new_paragraph: *new_paragraph,
                };
                report.add_text_with(text, &options);
            }
            ContentStep::Paragraph => report.new_line(),
            ContentStep::LineBreak => report.line_break(),
            ContentStep::NewPage => report.new_page(),
            ContentStep::Vspace { size } => report.add_vspace(*size),
            ContentStep::List { items, numbered } => {
                let list = if *numbered {
                    ListBlock::enumerate(items.iter().cloned())
                } else {
                    ListBlock::itemize(items.iter().cloned())
                };
                report.add_list(list);
            }
            ContentStep::Description { items } => {
                let entries = items.iter().map(|e| (e.label.clone(), e.text.clone()));
                report.add_list(ListBlock::description(entries));
            }
            ContentStep::Table {
                rows,
                caption,
                label,
            } => {
                let table = TableBlock::new(rows)?;
                report.add_table(labelled_table(table, caption, label));
            }
            ContentStep::CsvTable {
                path,
                caption,
                label,
            } => {
                let table = TableBlock::from_csv(&base_dir.join(path))?;
                report.add_table(labelled_table(table, caption, label));
            }
            ContentStep::Figure {
                path,
                caption,
                label,
                width,
            } => {
                let mut figure = FigureBlock::new(resolve_path(base_dir, path));
                figure.caption = caption.clone();
                figure.label = label.clone();
                if let Some(width) = width {
                    figure = figure.with_width(width);
                }
                report.add_figure(figure);
            }
            ContentStep::Equation {
                latex,
                caption,
                label,
                inline,
            } => {
                let mut equation = if *inline {
                    EquationBlock::inline(latex)
                } else {
                    EquationBlock::display(latex)
                };
                equation.caption = caption.clone();
                equation.label = label.clone();
                report.add_equation(equation);
            }
            ContentStep::Matrix {
                name,
                rows,
                bracket,
            } => report.add_matrix(MatrixBlock::new(name, rows, *bracket)?),
            ContentStep::FullWidth {
                text,
                new_paragraph,
            } => report.add_full_width_text(text, *new_paragraph),
            ContentStep::SideNote {
                text,
                numbered,
                symbol,
                offset,
            } => {
                let note = SideNote {
                    numbered: *numbered,
                    symbol: symbol.clone(),
                    offset: offset.clone(),
                };
                report.add_side_note(text, &note);
            }
            ContentStep::Quote { text, attribution } => report.add_quote(text, attribution),
            ContentStep::Code { code } => report.add_code(code),
            ContentStep::Appendix { title, text } => report.add_appendix(title, text),
            ContentStep::Abstract { text } => report.create_abstract(text),
            ContentStep::Keywords { keywords } => report.create_keywords(keywords),
        }
        Ok(())
    }
}

fn labelled_table(
    mut table: TableBlock,
    caption: &Option<String>,
    label: &Option<String>,
) -> TableBlock {
    table.caption = caption.clone();
    table.label = label.clone();
    table
}

/// Replay `steps` on `report` in order, stopping at the first failure
pub fn apply_steps(
    report: &mut Report,
    steps: &[ContentStep],
    base_dir: &Path,
) -> Result<(), ScriptError> {
    for (index, step) in steps.iter().enumerate() {
        log::trace!("Applying content step #{} ({})", index + 1, step.kind_name());
        step.apply(report, base_dir)
            .map_err(|source| ScriptError::Step {
                index,
                kind: step.kind_name(),
                source,
            })?;
    }
    log::debug!("Applied {} content step(s)", steps.len());
    Ok(())
}
