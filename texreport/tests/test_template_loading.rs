use std::path::{Path, PathBuf};
use texreport::style::StyleKind;
use texreport::{latex_writer, script, templates, Report};

/// Test that the embedded starters exist in src/templates
#[test]
fn test_starter_templates_exist() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/templates");
    for name in ["report.toml", "business.toml", "conference.toml"] {
        let path = dir.join(name);
        assert!(path.exists(), "Starter should exist at {:?}", path);
    }
}

/// Test that every starter parses and assembles into a document
#[test]
fn test_starters_build_documents() {
    for kind in StyleKind::all() {
        let config = templates::get_template(kind)
            .parse(Some("Starter Check"))
            .unwrap_or_else(|e| panic!("starter for {} does not parse: {}", kind, e));

        let mut report = Report::from_config(&config, Path::new("."));
        script::apply_steps(&mut report, &config.content, Path::new("."))
            .unwrap_or_else(|e| panic!("starter for {} fails: {}", kind, e));
        let doc = report.finish().unwrap();

        assert!(doc.scope_count() >= 2, "{} starter has too few sections", kind);
        let latex = latex_writer::to_latex(&doc);
        assert!(latex.contains(r"\begin{document}"));
        assert!(latex.ends_with("\\end{document}\n"));
    }
}
