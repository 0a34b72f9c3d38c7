//! Embedded starter configurations
//!
//! This module contains the texreport.toml starters compiled into the binary,
//! one per family of styles.

use crate::report_config::{ReportConfig, ReportConfigError};
use crate::style::StyleKind;

/// Title used when `init` is not given one
pub const DEFAULT_TITLE: &str = "Report Title";

/// A starter configuration for one style
#[derive(Debug, Clone)]
pub struct StarterTemplate {
    /// Style the starter is rendered for
    pub kind: StyleKind,
    /// Template TOML content with `{{STYLE}}` and `{{TITLE}}` placeholders
    pub content: &'static str,
}

/// Get the starter for a style
///
/// # Parameters
/// * `kind` - Style the project will use
///
/// # Returns
/// * `StarterTemplate` - Template exercising the content that style supports
pub fn get_template(kind: StyleKind) -> StarterTemplate {
    let content = match kind {
        StyleKind::BasicReport | StyleKind::BasicHomework => include_str!("templates/report.toml"),
        StyleKind::BusinessReport => include_str!("templates/business.toml"),
        StyleKind::IeeeConference => include_str!("templates/conference.toml"),
    };
    StarterTemplate { kind, content }
}

impl StarterTemplate {
    /// Fill in the placeholders
    pub fn render(&self, title: Option<&str>) -> String {
        self.content
            .replace("{{STYLE}}", self.kind.id())
            .replace("{{TITLE}}", &toml_escape(title.unwrap_or(DEFAULT_TITLE)))
    }

    /// Render and parse into a configuration
    pub fn parse(&self, title: Option<&str>) -> Result<ReportConfig, ReportConfigError> {
        ReportConfig::parse(&self.render(title))
    }
}

/// Escape text for a TOML basic string
fn toml_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_style_has_a_parsing_starter() {
        for kind in StyleKind::all() {
            let config = get_template(kind)
                .parse(None)
                .unwrap_or_else(|e| panic!("starter for {} does not parse: {}", kind, e));
            assert_eq!(config.style, kind);
            assert_eq!(config.title, DEFAULT_TITLE);
            assert!(!config.content.is_empty());
        }
    }

    #[test]
    fn test_title_is_escaped() {
        let config = get_template(StyleKind::BasicReport)
            .parse(Some(r#"The "Quoted" \ Title"#))
            .unwrap();
        assert_eq!(config.title, r#"The "Quoted" \ Title"#);
    }
}
