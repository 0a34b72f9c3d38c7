//! Report styles
//!
//! A style supplies everything around the content: document class, packages,
//! color definitions, preamble and the front matter (title page, table of
//! contents, headers and footers). Styles are plain values built from the
//! report metadata; a `Report` owns one and does not care which kind it is.

use crate::latex_model::{escape_latex, ColorDef, Document, Node, Package};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Built-in style kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleKind {
    /// Title page, table of contents, fancy headers
    #[default]
    BasicReport,
    /// Compact header with student name and ID, code listings
    BasicHomework,
    /// Wide-margin business report (needs `businessReport.cls`)
    BusinessReport,
    /// IEEE conference paper (IEEEtran)
    IeeeConference,
}

impl StyleKind {
    /// All built-in styles
    pub fn all() -> [StyleKind; 4] {
        [
            StyleKind::BasicReport,
            StyleKind::BasicHomework,
            StyleKind::BusinessReport,
            StyleKind::IeeeConference,
        ]
    }

    /// Identifier used in configuration files and on the command line
    pub fn id(self) -> &'static str {
        match self {
            StyleKind::BasicReport => "basic-report",
            StyleKind::BasicHomework => "basic-homework",
            StyleKind::BusinessReport => "business-report",
            StyleKind::IeeeConference => "ieee-conference",
        }
    }

    /// One-line description for listings
    pub fn description(self) -> &'static str {
        match self {
            StyleKind::BasicReport => "Report with title page, table of contents and headers",
            StyleKind::BasicHomework => "Homework sheet with student name/ID header",
            StyleKind::BusinessReport => "Business report with margin notes (requires class file)",
            StyleKind::IeeeConference => "IEEE conference paper with abstract and keywords",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for StyleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        StyleKind::all()
            .into_iter()
            .find(|kind| kind.id() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown style '{}'. Available: {}",
                    s,
                    StyleKind::all().map(StyleKind::id).join(", ")
                )
            })
    }
}

/// An author entry; only `name` is required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Author {
    /// Author with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Name followed by the ID in parentheses, if any
    fn display_name(&self) -> String {
        match &self.id {
            Some(id) => format!("{} ({})", escape_latex(&self.name), escape_latex(id)),
            None => escape_latex(&self.name),
        }
    }
}

/// Metadata that styles render into the title page and headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMetadata {
    pub title: String,
    pub subtitle: Option<String>,
    pub authors: Vec<Author>,
    /// Path to a logo image, used as written
    pub logo: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    /// Date line; `\today` when absent
    pub date: Option<String>,
    /// Left header text; defaults to the title
    pub header: Option<String>,
    /// Bibliography resource (`.bib`) to load with biblatex
    pub bibliography: Option<String>,
    /// Funding acknowledgement (conference title footnote)
    pub thanks: Option<String>,
    /// Note under the conference title
    pub title_note: Option<String>,
    /// Put a DRAFT box in the footer
    pub draft: bool,
}

impl ReportMetadata {
    /// Metadata with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn date_line(&self) -> String {
        self.date
            .as_deref()
            .map(escape_latex)
            .unwrap_or_else(|| r"\today".to_string())
    }

    fn header_text(&self) -> String {
        escape_latex(self.header.as_deref().unwrap_or(&self.title))
    }
}

/// TODO highlight colors every style defines
fn todo_colors() -> Vec<ColorDef> {
    vec![
        ColorDef::new("TODOblue", "HTML", "0099ff"),
        ColorDef::new("TODOgreen", "HTML", "00cc00"),
        ColorDef::new("TODOorange", "HTML", "ffcc00"),
        ColorDef::new("TODOred", "HTML", "ff0000"),
    ]
}

/// Everything a document needs apart from its body
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub kind: StyleKind,
    pub class: String,
    pub class_options: Vec<String>,
    pub packages: Vec<Package>,
    pub colors: Vec<ColorDef>,
    pub preamble: Vec<String>,
    pub front_matter: Vec<String>,
    pub closing: Vec<String>,
    /// Custom `.cls` file copied next to the output
    pub class_file: Option<PathBuf>,
    /// Whether display equations are wrapped in the captionable `equ` float
    pub captioned_equations: bool,
}

impl Style {
    /// Build a style for the given metadata
    pub fn build(kind: StyleKind, meta: &ReportMetadata) -> Self {
        let mut style = Style {
            kind,
            class: "article".to_string(),
            class_options: Vec::new(),
            packages: Vec::new(),
            colors: todo_colors(),
            preamble: Vec::new(),
            front_matter: Vec::new(),
            closing: Vec::new(),
            class_file: None,
            captioned_equations: true,
        };

        match kind {
            StyleKind::BasicReport => style.apply_basic_report(meta),
            StyleKind::BasicHomework => style.apply_basic_homework(meta),
            StyleKind::BusinessReport => style.apply_business_report(meta),
            StyleKind::IeeeConference => style.apply_ieee_conference(meta),
        }

        style
    }

    /// Use a custom document class file; the class name becomes the file stem
    pub fn with_class_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(stem) = class_name(&path) {
            self.class = stem.to_string();
        }
        self.class_file = Some(path);
        self
    }

    /// Whether the class provides `fullwidth`, `\sidenote` and appendices
    pub fn supports_margin_content(&self) -> bool {
        self.kind == StyleKind::BusinessReport
    }

    /// Whether the class provides `abstract`/`IEEEkeywords`
    pub fn supports_abstract(&self) -> bool {
        self.kind == StyleKind::IeeeConference
    }

    /// Start an empty document carrying this style
    pub fn new_document(&self) -> Document {
        let mut doc = Document::new(self.class.clone());
        doc.class_options = self.class_options.clone();
        doc.packages = self.packages.clone();
        doc.colors = self.colors.clone();
        doc.preamble = self.preamble.clone();
        doc.front_matter = self.front_matter.iter().map(Node::raw).collect();
        doc.closing = self.closing.iter().map(Node::raw).collect();
        doc.captioned_equations = self.captioned_equations;
        doc
    }

    fn use_packages(&mut self, names: &[&str]) {
        self.packages.extend(names.iter().map(|name| Package::new(*name)));
    }

    fn pre(&mut self, line: impl Into<String>) {
        self.preamble.push(line.into());
    }

    fn front(&mut self, line: impl Into<String>) {
        self.front_matter.push(line.into());
    }

    fn apply_bibliography(&mut self, meta: &ReportMetadata) {
        if let Some(bib) = &meta.bibliography {
            self.packages
                .push(Package::with_options("biblatex", "style=numeric"));
            self.pre(format!(r"\addbibresource{{{}}}", bib));
            self.closing.push(r"\printbibliography".to_string());
        }
    }

    fn apply_footer(&mut self, meta: &ReportMetadata) {
        if meta.draft {
            self.pre(r"\fancyfoot[R]{ \fbox{\textbf{DRAFT}}}");
        }
    }

    fn apply_basic_report(&mut self, meta: &ReportMetadata) {
        self.class_options = vec!["11pt".to_string(), "a4paper".to_string()];
        self.packages.push(Package::with_options(
            "geometry",
            "top=0.8in, bottom=0.8in, left=0.6in, right=0.6in",
        ));
        self.use_packages(&["caption", "titlesec", "fancyhdr", "graphicx"]);
        self.apply_bibliography(meta);

        self.pre(r"\DeclareCaptionType{equ}[][]");
        self.pre(r"\titleformat{\section}{\normalfont\Large\bfseries}{\thesection}{1em}{}");
        self.pre(r"\newcommand{\HRule}{\rule{\linewidth}{0.5mm}}");
        self.pre(r"\pagestyle{fancy}");
        self.pre(r"\fancyhead[R]{\slshape \rightmark}");
        self.pre(format!(r"\fancyhead[L]{{ \textbf{{{}}}}}", meta.header_text()));
        self.apply_footer(meta);
        self.pre(r"\setlength{\headheight}{14pt}");

        // Title page
        self.front(r"\begin{titlepage}");
        self.front(r"\begin{center}");
        if let Some(logo) = &meta.logo {
            self.front(format!(r"\includegraphics[scale=0.50]{{{}}}\\[24pt]", logo));
        }
        if let Some(org) = &meta.organization {
            self.front(format!(r"\textsc{{\LARGE {}}}\\[24pt]", escape_latex(org)));
        }
        if let Some(dept) = &meta.department {
            self.front(format!(r"\textsc{{\Large {}}}\\[6pt]", escape_latex(dept)));
        }
        self.front(r"\HRule\\[12pt]");
        self.front(format!(r"{{ \huge \bfseries {} }}\\[6pt]", escape_latex(&meta.title)));
        if let Some(subtitle) = &meta.subtitle {
            self.front(format!(r"{{ \Large {} }}\\[6pt]", escape_latex(subtitle)));
        }
        self.front(r"\HRule\\[48pt]");
        if !meta.authors.is_empty() {
            self.front(r"\begin{minipage}{0.4\textwidth}");
            self.front(r"\begin{flushleft} \large");
            self.front(r"\emph{Authors:}\\");
            for author in &meta.authors {
                self.front(format!(r"    {}\\", author.display_name()));
            }
            self.front(r"\end{flushleft}");
            self.front(r"\end{minipage}");
        }
        self.front(r"\vfill");
        self.front(format!(r"{{\large {}}}", meta.date_line()));
        self.front(r"\end{center}");
        self.front(r"\end{titlepage}");

        // Table of contents on its own unnumbered page
        self.front(r"\pagenumbering{gobble}");
        self.front(r"\tableofcontents");
        self.front(r"\newpage");
        self.front(r"\pagenumbering{arabic}");
    }

    fn apply_basic_homework(&mut self, meta: &ReportMetadata) {
        self.class_options = vec!["11pt".to_string(), "a4paper".to_string()];
        self.packages.push(Package::with_options(
            "geometry",
            "top=1in, bottom=1in, left=0.8in, right=0.8in",
        ));
        self.use_packages(&[
            "caption", "titlesec", "fancyhdr", "graphicx", "eso-pic", "listings",
        ]);
        self.colors.extend([
            ColorDef::new("codegreen", "rgb", "0,0.6,0"),
            ColorDef::new("codegray", "rgb", "0.5,0.5,0.5"),
            ColorDef::new("codepurple", "rgb", "0.58,0,0.82"),
            ColorDef::new("backcolour", "rgb", "0.95,0.95,0.92"),
        ]);

        self.pre(r"\DeclareCaptionType{equ}[][]");
        for line in [
            r"\lstdefinestyle{mystyle}{",
            r" backgroundcolor=\color{backcolour},",
            r" commentstyle=\color{codegreen},",
            r" keywordstyle=\color{magenta},",
            r" numberstyle=\tiny\color{codegray},",
            r" stringstyle=\color{codepurple},",
            r" basicstyle=\footnotesize,",
            r" breakatwhitespace=false,",
            r" breaklines=true,",
            r" captionpos=b,",
            r" keepspaces=true,",
            r" numbers=left,",
            r" numbersep=5pt,",
            r" showspaces=false,",
            r" showstringspaces=false,",
            r" showtabs=false,",
            r" tabsize=2",
            r"}",
            r"\lstset{style=mystyle}",
        ] {
            self.pre(line);
        }

        let student = meta.authors.first().cloned().unwrap_or_default();
        self.pre(r"\renewcommand\maketitle{");
        self.pre(r" \begin{flushleft}");
        self.pre(format!(
            r"     Student Name: {{{}}}",
            escape_latex(&student.name)
        ));
        if let Some(id) = &student.id {
            self.pre(format!(r"     \par Student ID: {{{}}}", escape_latex(id)));
        }
        self.pre(r" \end{flushleft}");
        self.pre(r" \begin{center}");
        self.pre(format!(
            r"     \par \textbf{{\large {{{}}} }}",
            escape_latex(&meta.title)
        ));
        if let Some(subtitle) = &meta.subtitle {
            self.pre(format!(r"     \par {{{}}}", escape_latex(subtitle)));
        }
        self.pre(r" \end{center}");
        self.pre(r" \rule{\linewidth}{0.1mm}");
        self.pre(r" \bigskip");
        self.pre(r" \bigskip");
        self.pre(r"}");

        let right_header = meta
            .subtitle
            .as_deref()
            .map(escape_latex)
            .unwrap_or_else(|| meta.header_text());
        self.pre(r"\pagestyle{fancy}");
        self.pre(format!(r"\fancyhead[R]{{{}}}", right_header));
        self.pre(format!(r"\fancyhead[L]{{{}}}", escape_latex(&student.name)));
        self.apply_footer(meta);
        self.pre(r"\setlength{\headheight}{15pt}");

        self.front(r"\thispagestyle{empty}");
        if let Some(logo) = &meta.logo {
            self.front(r"\AddToShipoutPicture*");
            self.front(format!(
                r"  {{\put(490,750){{\includegraphics[height=3cm]{{{}}}}}}}",
                logo
            ));
        }
        self.front(r"\maketitle");
    }

    fn apply_business_report(&mut self, meta: &ReportMetadata) {
        self.class = "businessReport".to_string();
        self.class_options = vec!["a4paper".to_string(), "12pt".to_string()];
        self.use_packages(&["mathpazo", "plex-serif", "plex-mono"]);
        self.packages
            .push(Package::with_options("plex-sans", "sfdefault"));
        self.apply_bibliography(meta);

        self.pre(r"\newcommand{\textel}[1]{{\fontseries{el}\selectfont #1}}");
        self.pre(r"\newcommand{\textl}[1]{{\fontseries{l}\selectfont #1}}");
        self.pre(r"\newcommand{\textsb}[1]{{\fontseries{sb}\selectfont #1}}");

        self.pre(format!(r"\reporttitle{{{}}}", escape_latex(&meta.title)));
        self.pre(format!(
            r"\reportsubtitle{{{}}}",
            escape_latex(meta.subtitle.as_deref().unwrap_or_default())
        ));
        let authors = meta
            .authors
            .iter()
            .map(Author::display_name)
            .collect::<Vec<_>>()
            .join(r"\\");
        self.pre(format!(
            r"\reportauthors{{Report created by:\\\smallskip {}}}",
            authors
        ));
        self.pre(format!(r"\reportdate{{{}}}", meta.date_line()));
        if let Some(logo) = &meta.logo {
            self.pre(format!(
                r"\rightheadercontent{{\includegraphics[width=3cm]{{{}}}}}",
                logo
            ));
        }

        self.front(r"\thispagestyle{empty}");
        self.front(r"\begin{fullwidth}");
        self.front(r"	\vspace*{-0.075\textheight}");
        if let Some(logo) = &meta.logo {
            self.front(format!(r"	\hfill\includegraphics[width=5cm]{{{}}}\\", logo));
        }
        self.front(r"	\vspace{0.15\textheight}\\");
        self.front(
            r"	\parbox{0.9\fulltextwidth}{\fontsize{50pt}{52pt}\selectfont\raggedright\textbf{\reporttitle}\par}\\",
        );
        self.front(r"	\vspace{0.03\textheight}\\");
        self.front(r"	{\LARGE\textit{\textbf{\reportsubtitle}}\par}");
        self.front(r"	\vfill");
        self.front(r"	{\Large\reportauthors\par}");
        self.front(r"	\vfill\vfill\vfill");
        self.front(r"	{\large\reportdate\par}");
        self.front(r"\end{fullwidth}");
        self.front(r"\newpage");
        self.front(r"\begin{twothirdswidth}");
        self.front(r"    \tableofcontents");
        self.front(r"\end{twothirdswidth}");
        self.front(r"\newpage");
    }

    fn apply_ieee_conference(&mut self, meta: &ReportMetadata) {
        self.class = "IEEEtran".to_string();
        self.class_options = vec!["conference".to_string()];
        self.captioned_equations = false;
        self.use_packages(&["cite", "amsmath", "amssymb", "amsfonts", "graphicx", "textcomp"]);
        self.apply_bibliography(meta);

        self.pre(r"\IEEEoverridecommandlockouts");

        let thanks = meta
            .thanks
            .as_deref()
            .map(|t| format!(r"\thanks{{{}}}", escape_latex(t)))
            .unwrap_or_default();
        let note = meta
            .title_note
            .as_deref()
            .map(|n| format!(r"\\{{\footnotesize \textsuperscript{{*}}{}}}", escape_latex(n)))
            .unwrap_or_default();
        self.pre(format!(r"\title{{{}{}{}}}", escape_latex(&meta.title), thanks, note));

        let blocks = meta
            .authors
            .iter()
            .map(ieee_author_block)
            .collect::<Vec<_>>()
            .join("\n\\and\n");
        self.pre(format!("\\author{{{}}}", blocks));

        self.front(r"\maketitle");
    }
}

/// One `\IEEEauthorblockN`/`\IEEEauthorblockA` pair
fn ieee_author_block(author: &Author) -> String {
    let mut lines = Vec::new();
    if let Some(dept) = &author.department {
        lines.push(format!(r"\textit{{{}}}", escape_latex(dept)));
    }
    if let Some(org) = &author.organization {
        lines.push(format!(r"\textit{{{}}}", escape_latex(org)));
    }
    let place = [&author.city, &author.country]
        .into_iter()
        .flatten()
        .map(|s| escape_latex(s))
        .collect::<Vec<_>>();
    if !place.is_empty() {
        lines.push(place.join(", "));
    }
    if let Some(contact) = &author.contact {
        lines.push(escape_latex(contact));
    }

    format!(
        "\\IEEEauthorblockN{{{}}}\n\\IEEEauthorblockA{{{}}}",
        escape_latex(&author.name),
        lines.join(" \\\\\n")
    )
}

/// Class name for a class file path, if it has a usable stem
pub fn class_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}
