//! Document tree for LaTeX output
//!
//! This module defines the structures a report is assembled into before it
//! is serialised by `latex_writer`:
//! - `Node`: a leaf content unit or a closed section scope
//! - `Scope`: a section, subsection or subsubsection with ordered children
//! - `Document`: class, packages, colors, preamble and the three body parts

use crate::content::{EquationBlock, FigureBlock, ListBlock, MatrixBlock, TableBlock, VSpace};
use itertools::Itertools;
use std::fmt;

/// Nesting level of a section scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeLevel {
    /// `\section` (depth 0)
    Section,
    /// `\subsection` (depth 1)
    Subsection,
    /// `\subsubsection` (depth 2)
    Subsubsection,
}

impl ScopeLevel {
    /// Position of this level in the scope stack (0 = section)
    pub fn depth(self) -> usize {
        match self {
            ScopeLevel::Section => 0,
            ScopeLevel::Subsection => 1,
            ScopeLevel::Subsubsection => 2,
        }
    }

    /// Look up the level for a stack depth
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            0 => Some(ScopeLevel::Section),
            1 => Some(ScopeLevel::Subsection),
            2 => Some(ScopeLevel::Subsubsection),
            _ => None,
        }
    }

    /// LaTeX sectioning command name without the backslash
    pub fn command(self) -> &'static str {
        match self {
            ScopeLevel::Section => "section",
            ScopeLevel::Subsection => "subsection",
            ScopeLevel::Subsubsection => "subsubsection",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}

/// A section scope and everything attached to it
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    /// Sectioning level
    pub level: ScopeLevel,
    /// Heading text (escaped on output)
    pub title: String,
    /// Whether the heading is numbered (`\section` vs `\section*`)
    pub numbering: bool,
    /// Ordered content: leaf nodes and closed nested scopes
    pub children: Vec<Node>,
}

impl Scope {
    /// Create an empty scope
    pub fn new(level: ScopeLevel, title: impl Into<String>, numbering: bool) -> Self {
        Self {
            level,
            title: title.into(),
            numbering,
            children: Vec::new(),
        }
    }

    /// Append a child node
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Nested scopes directly below this one
    pub fn subscopes(&self) -> impl Iterator<Item = &Scope> {
        self.children.iter().filter_map(|child| match child {
            Node::Scope(scope) => Some(scope),
            _ => None,
        })
    }
}

/// A unit of document content
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Verbatim LaTeX, written as-is
    Raw(String),
    /// Plain text, escaped on output
    Text(String),
    /// `\newpage`
    NewPage,
    /// `\linebreak`
    LineBreak,
    /// `\par`
    Paragraph,
    /// Vertical skip
    VSpace(VSpace),
    /// itemize / enumerate / description list
    List(ListBlock),
    /// Floating bordered table
    Table(TableBlock),
    /// Floating figure with an included graphic
    Figure(FigureBlock),
    /// Display or inline equation
    Equation(EquationBlock),
    /// Named matrix in display math
    Matrix(MatrixBlock),
    /// A LaTeX environment wrapping other nodes
    Environment {
        /// Environment name (e.g. `quote`, `fullwidth`)
        name: String,
        /// Optional `[...]` argument after `\begin{name}`
        options: Option<String>,
        /// Environment content
        body: Vec<Node>,
    },
    /// A closed section scope
    Scope(Scope),
}

impl Node {
    /// Shorthand for a verbatim node
    pub fn raw(latex: impl Into<String>) -> Self {
        Node::Raw(latex.into())
    }

    /// Shorthand for an environment without options
    pub fn environment(name: impl Into<String>, body: Vec<Node>) -> Self {
        Node::Environment {
            name: name.into(),
            options: None,
            body,
        }
    }

    /// Packages this node (and anything nested in it) needs to compile
    pub fn required_packages(&self) -> Vec<&'static str> {
        let mut packages = Vec::new();
        self.collect_packages(&mut packages);
        packages
    }

    fn collect_packages(&self, packages: &mut Vec<&'static str>) {
        match self {
            Node::List(_) => packages.push("enumitem"),
            Node::Table(_) => packages.push("float"),
            Node::Figure(_) => packages.extend(["float", "graphicx"]),
            Node::Matrix(_) => packages.push("amsmath"),
            Node::Environment { name, body, .. } => {
                if name == "lstlisting" {
                    packages.push("listings");
                }
                for node in body {
                    node.collect_packages(packages);
                }
            }
            Node::Scope(scope) => {
                for node in &scope.children {
                    node.collect_packages(packages);
                }
            }
            _ => {}
        }
    }

    /// Number of nodes in this subtree, scopes included
    pub fn node_count(&self) -> usize {
        match self {
            Node::Scope(scope) => 1 + scope.children.iter().map(Node::node_count).sum::<usize>(),
            Node::Environment { body, .. } => 1 + body.iter().map(Node::node_count).sum::<usize>(),
            _ => 1,
        }
    }

    /// Number of scopes in this subtree
    pub fn scope_count(&self) -> usize {
        match self {
            Node::Scope(scope) => {
                1 + scope.children.iter().map(Node::scope_count).sum::<usize>()
            }
            _ => 0,
        }
    }
}

/// A `\usepackage` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name
    pub name: String,
    /// Optional package options
    pub options: Option<String>,
}

impl Package {
    /// Package without options
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: None,
        }
    }

    /// Package with options
    pub fn with_options(name: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Some(options.into()),
        }
    }
}

/// A `\definecolor` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorDef {
    /// Color name used in `\color{...}`
    pub name: String,
    /// Color model (`HTML`, `rgb`, ...)
    pub model: String,
    /// Color value in the given model
    pub spec: String,
}

impl ColorDef {
    /// Define a color
    pub fn new(name: &str, model: &str, spec: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            spec: spec.to_string(),
        }
    }
}

/// A complete LaTeX document ready for serialisation
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document class name
    pub class: String,
    /// Document class options
    pub class_options: Vec<String>,
    /// Packages requested explicitly by the style or report
    pub packages: Vec<Package>,
    /// Color definitions
    pub colors: Vec<ColorDef>,
    /// Preamble lines after packages and colors
    pub preamble: Vec<String>,
    /// Content placed right after `\begin{document}` (title page, TOC)
    pub front_matter: Vec<Node>,
    /// Main content, filled by the section accumulator
    pub body: Vec<Node>,
    /// Content placed right before `\end{document}`
    pub closing: Vec<Node>,
    /// Whether display equations may carry captions (needs the `equ` caption type)
    pub captioned_equations: bool,
}

impl Document {
    /// Create an empty document of the given class
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            class_options: Vec::new(),
            packages: Vec::new(),
            colors: Vec::new(),
            preamble: Vec::new(),
            front_matter: Vec::new(),
            body: Vec::new(),
            closing: Vec::new(),
            captioned_equations: true,
        }
    }

    /// Request a package unless it is already listed
    pub fn require_package(&mut self, name: &str) {
        if !self.packages.iter().any(|p| p.name == name) {
            self.packages.push(Package::new(name));
        }
    }

    /// All packages to load: explicit ones first, then those required by
    /// content, deduplicated by name in first-use order
    pub fn resolved_packages(&self) -> Vec<Package> {
        let color_support = (!self.colors.is_empty()).then(|| Package::new("xcolor"));

        let content_packages = self
            .front_matter
            .iter()
            .chain(&self.body)
            .chain(&self.closing)
            .flat_map(Node::required_packages)
            .map(Package::new);

        self.packages
            .iter()
            .cloned()
            .chain(color_support)
            .chain(content_packages)
            .unique_by(|p| p.name.clone())
            .collect()
    }

    /// Top-level scopes of the body
    pub fn sections(&self) -> impl Iterator<Item = &Scope> {
        self.body.iter().filter_map(|node| match node {
            Node::Scope(scope) => Some(scope),
            _ => None,
        })
    }

    /// Total number of scopes in the body
    pub fn scope_count(&self) -> usize {
        self.body.iter().map(Node::scope_count).sum()
    }

    /// Total number of nodes in the body
    pub fn node_count(&self) -> usize {
        self.body.iter().map(Node::node_count).sum()
    }
}

/// Escape text for use in LaTeX source
///
/// Special characters are replaced by their LaTeX-safe forms so arbitrary
/// strings (titles, captions, table cells, list items) can be embedded.
pub fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str(r"\&"),
            '%' => escaped.push_str(r"\%"),
            '$' => escaped.push_str(r"\$"),
            '#' => escaped.push_str(r"\#"),
            '_' => escaped.push_str(r"\_"),
            '{' => escaped.push_str(r"\{"),
            '}' => escaped.push_str(r"\}"),
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '^' => escaped.push_str(r"\^{}"),
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '[' => escaped.push_str("{[}"),
            ']' => escaped.push_str("{]}"),
            '\n' => escaped.push_str(r"\newline "),
            _ => escaped.push(ch),
        }
    }
    escaped
}
