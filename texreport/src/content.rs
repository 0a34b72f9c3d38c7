//! Content fragments
//!
//! Builders for the leaf content a report is made of: colored text, lists,
//! tables, figures, equations, matrices and the extra blocks used by the
//! business and conference styles. Every builder produces `Node`s; placing
//! them in the section tree is the accumulator's job.

use crate::latex_model::{escape_latex, Node};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default width for included graphics
pub const DEFAULT_FIGURE_WIDTH: &str = r"0.8\textwidth";

/// Errors raised while building content fragments
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Table has no rows")]
    EmptyTable,

    #[error("Table row {row} has {found} cell(s), expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Matrix has no rows")]
    EmptyMatrix,

    #[error("Matrix row {row} has {found} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV error for {path}: {source}", path = .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Highlight applied to a piece of text
///
/// Each mark maps to one of the TODO colors every style defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextMark {
    /// Orange: work still to do
    Todo,
    /// Red: warnings
    Warning,
    /// Green: information
    Info,
    /// Blue: open questions
    Question,
}

impl TextMark {
    /// Name of the color defined for this mark
    pub fn color_name(self) -> &'static str {
        match self {
            TextMark::Todo => "TODOorange",
            TextMark::Warning => "TODOred",
            TextMark::Info => "TODOgreen",
            TextMark::Question => "TODOblue",
        }
    }
}

/// Options for `text`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Highlight color
    pub mark: Option<TextMark>,
    /// Arbitrary named color wrapping the whole text
    pub color: Option<String>,
    /// Start a new paragraph before the text
    pub new_paragraph: bool,
}

/// Build a text node
///
/// `text` is LaTeX source and is not escaped, so inline commands like
/// `\textbf{...}` or `$x$` work as written.
pub fn text(text: &str, options: &TextOptions) -> Node {
    let mut latex = match options.mark {
        Some(mark) => format!(r"{{\color{{{}}}{{{}}}}}", mark.color_name(), text),
        None => text.to_string(),
    };

    if options.new_paragraph {
        latex = format!(r"\medskip \par {}", latex);
    }

    if let Some(color) = &options.color {
        latex = format!(r"\textcolor{{{}}}{{{}}}", color, latex);
    }

    Node::Raw(format!("{} ", latex))
}

/// Vertical space size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VSpace {
    Small,
    #[default]
    Medium,
    Large,
}

impl VSpace {
    /// The skip command for this size
    pub fn command(self) -> &'static str {
        match self {
            VSpace::Small => r"\smallskip",
            VSpace::Medium => r"\medskip",
            VSpace::Large => r"\bigskip",
        }
    }
}

/// Kind of list environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListKind {
    /// Bulleted list
    Itemize,
    /// Numbered list
    Enumerate,
    /// Labelled description list
    Description,
}

impl ListKind {
    /// LaTeX environment name
    pub fn environment(self) -> &'static str {
        match self {
            ListKind::Itemize => "itemize",
            ListKind::Enumerate => "enumerate",
            ListKind::Description => "description",
        }
    }
}

/// A list item; `label` is only used by description lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub label: Option<String>,
    pub text: String,
}

/// A compact (`noitemsep`) list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBlock {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

impl ListBlock {
    /// Bulleted list
    pub fn itemize<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::plain(ListKind::Itemize, items)
    }

    /// Numbered list
    pub fn enumerate<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::plain(ListKind::Enumerate, items)
    }

    /// Description list from `(label, description)` pairs
    pub fn description<I, L, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, S)>,
        L: Into<String>,
        S: Into<String>,
    {
        Self {
            kind: ListKind::Description,
            items: entries
                .into_iter()
                .map(|(label, text)| ListItem {
                    label: Some(label.into()),
                    text: text.into(),
                })
                .collect(),
        }
    }

    fn plain<I, S>(kind: ListKind, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            items: items
                .into_iter()
                .map(|text| ListItem {
                    label: None,
                    text: text.into(),
                })
                .collect(),
        }
    }
}

/// A bordered table; the first row is the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub rows: Vec<Vec<String>>,
    pub caption: Option<String>,
    pub label: Option<String>,
}

impl TableBlock {
    /// Create a table from rows of cells
    ///
    /// Every row must have as many cells as the header row.
    pub fn new<R, C>(rows: R) -> Result<Self, ContentError>
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Display,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.to_string()).collect())
            .collect();

        let expected = rows.first().map(Vec::len).ok_or(ContentError::EmptyTable)?;
        if expected == 0 {
            return Err(ContentError::EmptyTable);
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ContentError::RaggedTable {
                row,
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            rows,
            caption: None,
            label: None,
        })
    }

    /// Load a table from a CSV file; the CSV header becomes the table header
    pub fn from_csv(path: &Path) -> Result<Self, ContentError> {
        let csv_error = |source| ContentError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        let mut rows = Vec::new();

        let headers = reader.headers().map_err(csv_error)?;
        rows.push(headers.iter().map(|s| s.to_string()).collect::<Vec<_>>());

        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        log::debug!("Loaded {} CSV row(s) from {}", rows.len(), path.display());
        Self::new(rows)
    }

    /// Set the caption
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the label (referenced as `tab: <label>`)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Column specification with vertical rules, e.g. `|c|c|c|`
    pub fn column_spec(&self) -> String {
        format!("|{}|", vec!["c"; self.columns()].join("|"))
    }
}

/// A floating figure with one included graphic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureBlock {
    pub path: PathBuf,
    pub caption: Option<String>,
    pub label: Option<String>,
    pub width: String,
}

impl FigureBlock {
    /// Figure at the default width
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            caption: None,
            label: None,
            width: DEFAULT_FIGURE_WIDTH.to_string(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the label (referenced as `fig: <label>`)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the width as a LaTeX length
    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = width.into();
        self
    }
}

/// An equation, displayed in a captionable float or inline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationBlock {
    /// Math-mode LaTeX
    pub latex: String,
    pub caption: Option<String>,
    pub label: Option<String>,
    pub inline: bool,
}

impl EquationBlock {
    /// Numbered display equation
    pub fn display(latex: impl Into<String>) -> Self {
        Self {
            latex: latex.into(),
            caption: None,
            label: None,
            inline: false,
        }
    }

    /// Inline `$...$` equation
    pub fn inline(latex: impl Into<String>) -> Self {
        Self {
            inline: true,
            ..Self::display(latex)
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Set the label (referenced as `eq:<label>`)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Bracket style of a matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixBracket {
    /// `( )`
    Paren,
    /// `[ ]`
    #[default]
    Bracket,
    /// `{ }`
    Brace,
    /// `| |`
    Bar,
    /// `|| ||`
    DoubleBar,
}

impl MatrixBracket {
    /// amsmath environment name
    pub fn environment(self) -> &'static str {
        match self {
            MatrixBracket::Paren => "pmatrix",
            MatrixBracket::Bracket => "bmatrix",
            MatrixBracket::Brace => "Bmatrix",
            MatrixBracket::Bar => "vmatrix",
            MatrixBracket::DoubleBar => "Vmatrix",
        }
    }
}

/// A matrix shown as `name = [...]` in display math
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixBlock {
    /// Left-hand side, LaTeX math
    pub name: String,
    pub rows: Vec<Vec<String>>,
    pub bracket: MatrixBracket,
}

impl MatrixBlock {
    /// Create a matrix from rows of displayable entries
    pub fn new<T: Display>(
        name: impl Into<String>,
        data: &[Vec<T>],
        bracket: MatrixBracket,
    ) -> Result<Self, ContentError> {
        let expected = data.first().map(Vec::len).ok_or(ContentError::EmptyMatrix)?;
        if let Some((row, entries)) = data.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(ContentError::RaggedMatrix {
                row,
                expected,
                found: entries.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            rows: data
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
            bracket,
        })
    }
}

/// Text spanning the full page width, including the margin column
pub fn full_width(text: &str) -> Node {
    Node::environment("fullwidth", vec![Node::raw(text)])
}

/// Placement of a margin note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideNote {
    /// Numbered sidenote (true) or plain margin note (false)
    pub numbered: bool,
    /// Custom mark for numbered notes
    pub symbol: String,
    /// Vertical offset as a LaTeX length
    pub offset: String,
}

impl Default for SideNote {
    fn default() -> Self {
        Self {
            numbered: true,
            symbol: String::new(),
            offset: "0cm".to_string(),
        }
    }
}

/// A note in the margin column
pub fn side_note(text: &str, note: &SideNote) -> Node {
    if note.numbered {
        Node::Raw(format!(
            r"\sidenote[{}][{}]{{{}}}",
            note.symbol, note.offset, text
        ))
    } else {
        Node::Raw(format!(r"\marginnote{{{}}}[{}]", text, note.offset))
    }
}

/// A large-quoted citation with attribution
pub fn quote(quote: &str, attribution: &str) -> Node {
    Node::environment(
        "quote",
        vec![
            Node::raw(r"    \textbf{\LARGE ``}"),
            Node::Raw(format!(r"{}.\textbf{{''}}", quote)),
            Node::raw(""),
            Node::Raw(format!(r"\hfill--- {}", escape_latex(attribution))),
        ],
    )
}

/// A verbatim code listing
pub fn code_listing(code: &str) -> Node {
    Node::environment("lstlisting", vec![Node::raw(code)])
}

/// The abstract of a paper
pub fn abstract_block(text: &str) -> Node {
    Node::environment("abstract", vec![Node::raw(text)])
}

/// IEEE keywords block
pub fn keywords<S: AsRef<str>>(keywords: &[S]) -> Node {
    let joined = keywords
        .iter()
        .map(|k| escape_latex(k.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    Node::environment("IEEEkeywords", vec![Node::Raw(joined)])
}
