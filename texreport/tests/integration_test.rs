use std::path::{Path, PathBuf};
use texreport::content::{EquationBlock, ListBlock, TableBlock, TextMark};
use texreport::latex_writer;
use texreport::{script, Author, Node, Report, ReportConfig, ReportMetadata, StyleKind};

fn fixture_project() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/project")
}

/// Assert that `needles` appear in `haystack` in the given order
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        let found = haystack[from..]
            .find(needle)
            .unwrap_or_else(|| panic!("'{}' not found after byte {}:\n{}", needle, from, haystack));
        from += found + needle.len();
    }
}

#[test]
fn test_fixture_project_builds() {
    let project = fixture_project();
    let config = ReportConfig::load(project.join("texreport.toml")).unwrap();
    assert_eq!(config.content.len(), 8);

    let mut report = Report::from_config(&config, &project);
    script::apply_steps(&mut report, &config.content, &project).unwrap();

    let out = tempfile::tempdir().unwrap();
    let artifacts = report.output(out.path(), None).unwrap();

    assert_eq!(
        artifacts.tex_path,
        out.path().join("aircraft_tutorial_group_22.tex")
    );
    assert!(artifacts.pdf_path.is_none());
    assert!(artifacts.class_file.is_none());
    assert_eq!(artifacts.scope_count, 4);

    let latex = std::fs::read_to_string(&artifacts.tex_path).unwrap();
    assert_in_order(
        &latex,
        &[
            r"\documentclass[11pt,a4paper]{article}",
            r"\begin{document}",
            r"\tableofcontents",
            r"\section{Introduction}",
            "Text goes here.",
            r"\subsection{Scope}",
            r"{\color{TODOred}{Check the load cases.}}",
            r"\section{Results}",
            r"\textbf{Model}&\textbf{Accuracy}&\textbf{F1}\\",
            r"tuned&0.93&0.91\\",
            r"\label{tab: scores}",
            r"K =\begin{bmatrix}",
            r"\section*{Acknowledgements}",
            r"\end{document}",
        ],
    );
    for package in ["float", "amsmath", "xcolor"] {
        assert!(
            latex.contains(&format!(r"\usepackage{{{}}}", package)),
            "missing package {}",
            package
        );
    }
}

#[test]
fn test_conference_paper_through_api() {
    let metadata = ReportMetadata {
        title: "Conference Paper Title*".to_string(),
        authors: vec![
            Author {
                name: "Given Name Surname".to_string(),
                organization: Some("Organization".to_string()),
                ..Default::default()
            },
            Author::new("Second Author"),
        ],
        ..Default::default()
    };

    let mut report = Report::new(StyleKind::IeeeConference, metadata);
    report.create_abstract("This document is a model.");
    report.create_keywords(&["component", "formatting"]);
    report.create_section("Introduction").unwrap();
    report.add_text("Intro text.");
    report.create_section("Ease of Use").unwrap();
    report.create_subsection("Maintaining Integrity").unwrap();
    report.add_equation(
        EquationBlock::display(r"a + b = \gamma")
            .with_caption("dropped")
            .with_label("sum"),
    );
    report.add_list(ListBlock::itemize(["one", "two"]));

    let doc = report.finish().unwrap();
    let latex = latex_writer::to_latex(&doc);

    assert!(latex.starts_with(r"\documentclass[conference]{IEEEtran}"));
    assert_in_order(
        &latex,
        &[
            r"\maketitle",
            r"\begin{abstract}",
            r"\begin{IEEEkeywords}",
            "component, formatting",
            r"\section{Introduction}",
            r"\section{Ease of Use}",
            r"\subsection{Maintaining Integrity}",
            r"\begin{equation}",
            r"\label{eq:sum}",
            r"\begin{itemize}[noitemsep]",
        ],
    );
    assert!(!latex.contains(r"\begin{equ}"));
    assert!(latex.contains(r"\and"));
}

#[test]
fn test_content_before_first_section_stays_at_root() {
    let mut report = Report::new(StyleKind::BasicHomework, ReportMetadata::titled("HW 1"));
    report.add_text("Preface");
    report.create_section("Question 1").unwrap();
    report.add_marked_text("Unsure", TextMark::Question);
    report.add_table(TableBlock::new(vec![vec!["x", "y"], vec!["1", "2"]]).unwrap());

    let doc = report.finish().unwrap();
    assert_eq!(doc.body.len(), 2);
    assert_eq!(doc.body[0], Node::raw("Preface "));
    match &doc.body[1] {
        Node::Scope(scope) => {
            assert_eq!(scope.title, "Question 1");
            assert_eq!(scope.children.len(), 2);
        }
        other => panic!("expected a section, got {:?}", other),
    }
}

#[test]
fn test_failed_step_keeps_index() {
    let project = fixture_project();
    let mut config = ReportConfig::load(project.join("texreport.toml")).unwrap();
    config.content.push(texreport::script::ContentStep::CsvTable {
        path: "data/missing.csv".to_string(),
        caption: None,
        label: None,
    });

    let mut report = Report::from_config(&config, &project);
    let err = script::apply_steps(&mut report, &config.content, Path::new(&project)).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Content step #9 (csv-table) failed"), "{}", message);
    assert!(message.contains("missing.csv"));
}

#[test]
fn test_figure_and_logo_paths_resolve_from_config_dir() {
    let project = tempfile::tempdir().unwrap();
    std::fs::create_dir(project.path().join("figures")).unwrap();
    std::fs::write(project.path().join("logo.png"), b"png").unwrap();
    std::fs::write(project.path().join("figures/plot.png"), b"png").unwrap();

    let config = ReportConfig::parse(
        r#"
style = "basic-report"
title = "Paths"
logo = "logo.png"

[[content]]
kind = "section"
title = "Plots"

[[content]]
kind = "figure"
path = "figures/plot.png"
caption = "A plot"
"#,
    )
    .unwrap();

    let mut report = Report::from_config(&config, project.path());
    script::apply_steps(&mut report, &config.content, project.path()).unwrap();

    let out = tempfile::tempdir().unwrap();
    let artifacts = report.write(out.path()).unwrap();
    let latex = std::fs::read_to_string(&artifacts.tex_path).unwrap();

    let logo = std::fs::canonicalize(project.path().join("logo.png")).unwrap();
    let plot = std::fs::canonicalize(project.path().join("figures/plot.png")).unwrap();
    assert!(logo.is_absolute());
    assert!(
        latex.contains(&format!(r"\includegraphics[scale=0.50]{{{}}}", logo.display())),
        "{}",
        latex
    );
    assert!(
        latex.contains(&format!(
            r"\includegraphics[width=0.8\textwidth]{{{}}}",
            plot.display()
        )),
        "{}",
        latex
    );
}
