//! Report assembly
//!
//! `Report` is the entry point for building a document: it owns a style, the
//! document being built and a section accumulator. Every `add_*` call builds a
//! content node and emits it; `create_*section` calls declare scope
//! boundaries. `finish` performs the terminal flush and returns the document,
//! `write`/`output` serialise it (and optionally compile it).

use crate::content::{
    self, EquationBlock, FigureBlock, ListBlock, MatrixBlock, SideNote, TableBlock, TextMark,
    TextOptions, VSpace,
};
use crate::error::ReportError;
use crate::latex_model::{escape_latex, Document, Node, ScopeLevel};
use crate::latex_writer;
use crate::report_config::ReportConfig;
use crate::section_accumulator::SectionAccumulator;
use crate::style::{ReportMetadata, Style, StyleKind};
use crate::toolchain::{self, LatexEngine};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Punctuation stripped from titles when deriving file names
static NON_WORD: OnceLock<Regex> = OnceLock::new();

/// Derive a file name from a title: lowercase, punctuation removed,
/// whitespace runs replaced by single underscores
pub fn slugify(title: &str) -> String {
    let re = NON_WORD.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));
    let lowered = title.to_lowercase();
    re.replace_all(&lowered, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Resolve a path written in a configuration file
///
/// Relative paths are taken relative to `base_dir` and made absolute, since
/// the LaTeX engine runs in the output directory rather than next to the
/// configuration. Absolute paths are returned unchanged.
pub fn resolve_path(base_dir: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let joined = base_dir.join(path);
    fs::canonicalize(&joined)
        .or_else(|_| std::path::absolute(&joined))
        .unwrap_or(joined)
}

/// Files and statistics produced by `Report::write` / `Report::output`
#[derive(Debug, Clone)]
pub struct OutputArtifacts {
    /// The written `.tex` file
    pub tex_path: PathBuf,
    /// The compiled PDF, if an engine was run
    pub pdf_path: Option<PathBuf>,
    /// The copied class file, if the style uses one
    pub class_file: Option<PathBuf>,
    /// Number of section scopes in the body
    pub scope_count: usize,
    /// Number of nodes in the body
    pub node_count: usize,
}

/// A LaTeX report under construction
#[derive(Debug)]
pub struct Report {
    metadata: ReportMetadata,
    style: Style,
    document: Document,
    sections: SectionAccumulator,
    output_name: Option<String>,
    appendix_open: bool,
}

impl Report {
    /// Start a report in one of the built-in styles
    pub fn new(kind: StyleKind, metadata: ReportMetadata) -> Self {
        let style = Style::build(kind, &metadata);
        Self::with_style(style, metadata)
    }

    /// Start a report with a prepared (possibly customised) style
    pub fn with_style(style: Style, metadata: ReportMetadata) -> Self {
        let document = style.new_document();
        Self {
            metadata,
            style,
            document,
            sections: SectionAccumulator::new(),
            output_name: None,
            appendix_open: false,
        }
    }

    /// Start a report from a loaded configuration
    ///
    /// Relative `class_file` and `logo` paths are resolved against
    /// `base_dir`. Content steps are not applied here; see
    /// `script::apply_steps`.
    pub fn from_config(config: &ReportConfig, base_dir: &Path) -> Self {
        let mut metadata = config.metadata();
        metadata.logo = metadata
            .logo
            .map(|logo| resolve_path(base_dir, logo).display().to_string());

        let mut style = Style::build(config.style, &metadata);
        if let Some(class_file) = &config.class_file {
            style = style.with_class_file(resolve_path(base_dir, class_file));
        }

        let mut report = Self::with_style(style, metadata);
        report.output_name = config.output_name.clone();
        report
    }

    /// Report metadata
    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    /// The style in use
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Override the output file name (without extension)
    pub fn set_output_name(&mut self, name: impl Into<String>) {
        self.output_name = Some(name.into());
    }

    /// Output file name without extension
    pub fn output_name(&self) -> String {
        match &self.output_name {
            Some(name) => name.clone(),
            None => {
                let slug = slugify(&self.metadata.title);
                if slug.is_empty() {
                    "report".to_string()
                } else {
                    slug
                }
            }
        }
    }

    /// Number of open section scopes
    pub fn depth(&self) -> usize {
        self.sections.depth()
    }

    // ---- Sectioning ----

    /// Open a scope at any level
    pub fn create_scope(
        &mut self,
        level: ScopeLevel,
        title: &str,
        numbering: bool,
    ) -> Result<(), ReportError> {
        self.sections.begin_scope(level, title, numbering)?;
        Ok(())
    }

    /// Open a numbered section, closing any open section
    pub fn create_section(&mut self, title: &str) -> Result<(), ReportError> {
        self.create_scope(ScopeLevel::Section, title, true)
    }

    /// Open a numbered subsection in the current section
    pub fn create_subsection(&mut self, title: &str) -> Result<(), ReportError> {
        self.create_scope(ScopeLevel::Subsection, title, true)
    }

    /// Open a numbered subsubsection in the current subsection
    pub fn create_subsubsection(&mut self, title: &str) -> Result<(), ReportError> {
        self.create_scope(ScopeLevel::Subsubsection, title, true)
    }

    /// Attach everything emitted so far and close all open scopes
    pub fn flush(&mut self) {
        self.sections.flush(0);
    }

    /// Emit an arbitrary node
    pub fn emit(&mut self, node: Node) {
        self.sections.emit(node);
    }

    // ---- Text and spacing ----

    /// Add LaTeX text
    pub fn add_text(&mut self, text: &str) {
        self.add_text_with(text, &TextOptions::default());
    }

    /// Add LaTeX text highlighted with a TODO color
    pub fn add_marked_text(&mut self, text: &str, mark: TextMark) {
        let options = TextOptions {
            mark: Some(mark),
            ..Default::default()
        };
        self.add_text_with(text, &options);
    }

    /// Add LaTeX text with explicit options
    pub fn add_text_with(&mut self, text: &str, options: &TextOptions) {
        self.emit(content::text(text, options));
    }

    /// Add plain text, escaping LaTeX special characters
    pub fn add_plain_text(&mut self, text: &str) {
        self.emit(Node::Text(text.to_string()));
    }

    /// Start a new paragraph
    pub fn new_line(&mut self) {
        self.emit(Node::Paragraph);
    }

    /// Break the current line
    pub fn line_break(&mut self) {
        self.emit(Node::LineBreak);
    }

    /// Start a new page
    pub fn new_page(&mut self) {
        self.emit(Node::NewPage);
    }

    /// Add vertical space
    pub fn add_vspace(&mut self, size: VSpace) {
        self.emit(Node::VSpace(size));
    }

    // ---- Blocks ----

    pub fn add_list(&mut self, list: ListBlock) {
        self.emit(Node::List(list));
    }

    pub fn add_table(&mut self, table: TableBlock) {
        self.emit(Node::Table(table));
    }

    /// Add a figure
    ///
    /// The path is written as given. LaTeX looks up relative paths from the
    /// output directory, so pass absolute paths (see `resolve_path`) unless
    /// the image is copied there. A missing file is only a warning.
    pub fn add_figure(&mut self, figure: FigureBlock) {
        if figure.path.is_absolute() && !figure.path.exists() {
            log::warn!("Figure image {} does not exist", figure.path.display());
        } else if figure.path.is_relative() {
            log::debug!(
                "Figure image {} is relative to the output directory",
                figure.path.display()
            );
        }
        self.emit(Node::Figure(figure));
    }

    pub fn add_equation(&mut self, equation: EquationBlock) {
        self.emit(Node::Equation(equation));
    }

    pub fn add_matrix(&mut self, matrix: MatrixBlock) {
        self.emit(Node::Matrix(matrix));
    }

    // ---- Business report extras ----

    /// Add text spanning the full page width
    pub fn add_full_width_text(&mut self, text: &str, new_paragraph: bool) {
        self.check_margin_support("full-width text");
        self.emit(content::full_width(text));
        if new_paragraph {
            self.new_line();
        }
    }

    /// Add a margin note
    pub fn add_side_note(&mut self, text: &str, note: &SideNote) {
        self.check_margin_support("side notes");
        self.emit(content::side_note(text, note));
    }

    /// Add a highlighted quotation
    pub fn add_quote(&mut self, quote: &str, attribution: &str) {
        self.emit(content::quote(quote, attribution));
    }

    /// Add a code listing
    pub fn add_code(&mut self, code: &str) {
        self.emit(content::code_listing(code));
    }

    /// Add an appendix section; the first call opens the appendices block
    ///
    /// Appendices are placed at the document root: open sections are closed
    /// first, and appendix headings are verbatim `\section` commands rather
    /// than scopes, so they do not count towards `scope_count`.
    pub fn add_appendix(&mut self, title: &str, text: &str) {
        self.sections.flush(0);
        if !self.appendix_open {
            self.document.require_package("appendix");
            self.emit(Node::NewPage);
            self.emit(Node::raw(r"\section*{Appendices}"));
            self.emit(Node::raw(r"\begin{appendices}"));
            self.appendix_open = true;
        }
        self.emit(Node::Raw(format!(r"\section{{{}}}", escape_latex(title))));
        self.emit(Node::raw(text));
    }

    // ---- Conference extras ----

    /// Add the paper abstract
    pub fn create_abstract(&mut self, text: &str) {
        self.check_abstract_support("abstract");
        self.emit(content::abstract_block(text));
    }

    /// Add the index terms
    pub fn create_keywords<S: AsRef<str>>(&mut self, keywords: &[S]) {
        self.check_abstract_support("keywords");
        self.emit(content::keywords(keywords));
    }

    fn check_margin_support(&self, what: &str) {
        if !self.style.supports_margin_content() {
            log::warn!(
                "{} needs the business-report class; style '{}' may not define it",
                what,
                self.style.kind
            );
        }
    }

    fn check_abstract_support(&self, what: &str) {
        if !self.style.supports_abstract() {
            log::warn!(
                "{} is meant for the ieee-conference style, not '{}'",
                what,
                self.style.kind
            );
        }
    }

    // ---- Output ----

    /// Flush all content and return the finished document
    pub fn finish(mut self) -> Result<Document, ReportError> {
        self.sections.flush(0);
        let body = self.sections.into_root()?;

        let mut document = self.document;
        document.body = body;
        if self.appendix_open {
            document.body.push(Node::raw(r"\end{appendices}"));
        }
        Ok(document)
    }

    /// Write `<output_name>.tex` (and the class file, if any) into `output_dir`
    pub fn write(self, output_dir: &Path) -> Result<OutputArtifacts, ReportError> {
        fs::create_dir_all(output_dir).map_err(|source| ReportError::OutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let name = self.output_name();
        let kind = self.style.kind;
        let class_file = self.style.class_file.clone();
        let document = self.finish()?;

        let tex_path = output_dir.join(format!("{}.tex", name));
        latex_writer::to_file(&document, &tex_path)?;

        let copied_class = match class_file {
            Some(source_path) => Some(copy_class_file(&source_path, output_dir, &document.class)?),
            None => {
                if kind == StyleKind::BusinessReport {
                    log::warn!(
                        "The business-report style needs {}.cls next to the output; set class_file",
                        document.class
                    );
                }
                None
            }
        };

        Ok(OutputArtifacts {
            tex_path,
            pdf_path: None,
            class_file: copied_class,
            scope_count: document.scope_count(),
            node_count: document.node_count(),
        })
    }

    /// Write the report and, when `engine` is given, compile it to PDF
    pub fn output(
        self,
        output_dir: &Path,
        engine: Option<LatexEngine>,
    ) -> Result<OutputArtifacts, ReportError> {
        let mut artifacts = self.write(output_dir)?;
        if let Some(engine) = engine {
            artifacts.pdf_path = Some(toolchain::compile(&artifacts.tex_path, engine)?);
        }
        Ok(artifacts)
    }
}

/// Copy a class file into the output directory unless it already lives there
fn copy_class_file(
    source_path: &Path,
    output_dir: &Path,
    class: &str,
) -> Result<PathBuf, ReportError> {
    let dest = match source_path.file_name() {
        Some(name) => output_dir.join(name),
        None => output_dir.join(format!("{}.cls", class)),
    };

    let same_file = match (fs::canonicalize(source_path), fs::canonicalize(&dest)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    if !same_file {
        log::info!(
            "Copying class file {} to {}",
            source_path.display(),
            dest.display()
        );
        fs::copy(source_path, &dest).map_err(|source| ReportError::ClassFile {
            path: source_path.to_path_buf(),
            source,
        })?;
    }
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex_model::Scope;

    fn report() -> Report {
        Report::new(
            StyleKind::BasicReport,
            ReportMetadata::titled("Conference Paper Title*"),
        )
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Conference Paper Title*"), "conference_paper_title");
        assert_eq!(slugify("  Aircraft   Tutorial - Group: 22 "), "aircraft_tutorial_group_22");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_resolve_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.png"), b"png").unwrap();

        let resolved = resolve_path(dir.path(), "logo.png");
        assert!(resolved.is_absolute());
        assert_eq!(resolved, fs::canonicalize(dir.path().join("logo.png")).unwrap());

        let missing = resolve_path(dir.path(), "figures/missing.png");
        assert!(missing.is_absolute());
        assert!(missing.ends_with("figures/missing.png"));

        let absolute = dir.path().join("elsewhere.png");
        assert_eq!(resolve_path(Path::new("ignored"), &absolute), absolute);
    }

    #[test]
    fn test_output_name_defaults() {
        let mut r = report();
        assert_eq!(r.output_name(), "conference_paper_title");
        r.set_output_name("paper");
        assert_eq!(r.output_name(), "paper");

        let untitled = Report::new(StyleKind::BasicReport, ReportMetadata::titled("?!"));
        assert_eq!(untitled.output_name(), "report");
    }

    #[test]
    fn test_sections_and_content_nest() {
        let mut r = report();
        r.create_section("Introduction").unwrap();
        r.create_subsection("No Line Breaks").unwrap();
        r.add_text("Text goes here.");
        r.create_subsection("Special text").unwrap();
        r.create_subsubsection("Referencing").unwrap();
        r.add_marked_text("Add referencing", TextMark::Todo);
        r.create_section("Lists and Tables").unwrap();
        r.add_text("Intro text");

        let doc = r.finish().unwrap();
        let sections: Vec<&Scope> = doc.sections().collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Introduction");

        let subs: Vec<&Scope> = sections[0].subscopes().collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].children, vec![Node::raw("Text goes here. ")]);
        let referencing = subs[1].subscopes().next().unwrap();
        assert_eq!(
            referencing.children,
            vec![Node::raw(r"{\color{TODOorange}{Add referencing}} ")]
        );
        assert_eq!(sections[1].children, vec![Node::raw("Intro text ")]);
    }

    #[test]
    fn test_skipping_a_level_is_an_error() {
        let mut r = report();
        r.create_section("A").unwrap();
        let err = r.create_subsubsection("C").unwrap_err();
        assert!(matches!(err, ReportError::Nesting(_)));
        assert_eq!(r.depth(), 1);
    }

    #[test]
    fn test_appendix_block_is_closed() {
        let mut r = Report::new(
            StyleKind::BusinessReport,
            ReportMetadata::titled("Quarterly"),
        );
        r.create_section("Body").unwrap();
        r.add_appendix("Data", "raw data");
        r.add_appendix("More", "more data");

        let doc = r.finish().unwrap();
        let latex = latex_writer::to_latex(&doc);
        assert_eq!(latex.matches(r"\begin{appendices}").count(), 1);
        assert!(latex.contains(r"\section{Data}"));
        assert!(latex.contains(r"\section{More}"));
        let end = latex.find(r"\end{appendices}").unwrap();
        assert!(end > latex.find("more data").unwrap());
        assert!(latex.contains(r"\usepackage{appendix}"));

        // Appendices sit at the root after the closed section
        assert_eq!(doc.scope_count(), 1);
        match &doc.body[0] {
            Node::Scope(scope) => assert_eq!(scope.title, "Body"),
            other => panic!("expected the body section, got {:?}", other),
        }
        assert_eq!(doc.body[4], Node::raw(r"\section{Data}"));
        assert_eq!(doc.body.last(), Some(&Node::raw(r"\end{appendices}")));
    }

    #[test]
    fn test_write_creates_tex_and_copies_class() {
        let src = tempfile::tempdir().unwrap();
        let class_path = src.path().join("businessReport.cls");
        fs::write(&class_path, "% class").unwrap();

        let style = Style::build(StyleKind::BusinessReport, &ReportMetadata::titled("Q3 Review"))
            .with_class_file(&class_path);
        let mut r = Report::with_style(style, ReportMetadata::titled("Q3 Review"));
        r.create_section("Summary").unwrap();
        r.add_full_width_text("Wide", true);

        let out = tempfile::tempdir().unwrap();
        let artifacts = r.write(out.path()).unwrap();

        assert_eq!(artifacts.tex_path, out.path().join("q3_review.tex"));
        assert!(artifacts.tex_path.exists());
        assert_eq!(artifacts.class_file, Some(out.path().join("businessReport.cls")));
        assert!(out.path().join("businessReport.cls").exists());
        assert_eq!(artifacts.scope_count, 1);
        assert!(artifacts.pdf_path.is_none());

        let latex = fs::read_to_string(&artifacts.tex_path).unwrap();
        assert!(latex.starts_with(r"\documentclass[a4paper,12pt]{businessReport}"));
        assert!(latex.contains("\\begin{fullwidth}\nWide\n\\end{fullwidth}\n\\par"));
    }
}
