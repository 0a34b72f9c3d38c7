//! Report configuration from texreport.toml

use crate::script::ContentStep;
use crate::style::{Author, ReportMetadata, StyleKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in a project directory
pub const CONFIG_FILE_NAME: &str = "texreport.toml";

/// Main report configuration from texreport.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Built-in style to render with
    #[serde(default)]
    pub style: StyleKind,

    /// Report title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Logo image path, used as written in the LaTeX source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Date line; `\today` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Header text; defaults to the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    /// `.bib` file loaded with biblatex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bibliography: Option<String>,

    /// Funding note in the conference title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thanks: Option<String>,

    /// Note under the conference title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_note: Option<String>,

    /// Mark pages as draft
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,

    /// Custom class file, relative to the configuration file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_file: Option<String>,

    /// Output file name without extension; derived from the title when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,

    /// Report authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,

    /// Content steps replayed in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentStep>,
}

impl ReportConfig {
    /// Configuration with a style and title and nothing else
    pub fn new(style: StyleKind, title: impl Into<String>) -> Self {
        Self {
            style,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Metadata that styles render into the title page and headers
    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            authors: self.authors.clone(),
            logo: self.logo.clone(),
            department: self.department.clone(),
            organization: self.organization.clone(),
            date: self.date.clone(),
            header: self.header.clone(),
            bibliography: self.bibliography.clone(),
            thanks: self.thanks.clone(),
            title_note: self.title_note.clone(),
            draft: self.draft,
        }
    }

    /// Load configuration from a texreport.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the texreport.toml configuration file
    ///
    /// # Returns
    /// * `Ok(ReportConfig)` - Successfully loaded configuration
    /// * `Err(ReportConfigError)` - Error reading or parsing the configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReportConfigError> {
        let content = fs::read_to_string(&path).map_err(ReportConfigError::IoError)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ReportConfigError> {
        toml::from_str(content).map_err(ReportConfigError::ParseError)
    }

    /// Save configuration to a texreport.toml file
    ///
    /// # Parameters
    /// * `path` - Path where the texreport.toml file will be written
    ///
    /// # Returns
    /// * `Ok(())` - Successfully saved configuration
    /// * `Err(ReportConfigError)` - Error serializing or writing the configuration file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportConfigError> {
        let content = toml::to_string_pretty(self).map_err(ReportConfigError::SerializeError)?;

        fs::write(&path, content).map_err(ReportConfigError::IoError)?;

        Ok(())
    }
}

/// Errors that can occur when loading or saving report configuration
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ReportConfigError {
    /// IO error when reading or writing file
    IoError(std::io::Error),

    /// Error parsing TOML
    ParseError(toml::de::Error),

    /// Error serializing to TOML
    SerializeError(toml::ser::Error),
}

impl std::fmt::Display for ReportConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ReportConfigError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ReportConfigError::SerializeError(e) => write!(f, "TOML serialize error: {}", e),
        }
    }
}

impl std::error::Error for ReportConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportConfigError::IoError(e) => Some(e),
            ReportConfigError::ParseError(e) => Some(e),
            ReportConfigError::SerializeError(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TextMark;

    #[test]
    fn test_parse_example_toml() {
        let toml_content = r#"
style = "basic-homework"
title = "Aircraft Tutorial"
subtitle = "Group 22"
logo = "logo.png"
date = "10 December 2012"

[[authors]]
name = "Emilie Bessette"
id = "4534921"

[[content]]
kind = "section"
title = "Introduction"

[[content]]
kind = "text"
text = "Text goes here."
mark = "todo"
"#;

        let config = ReportConfig::parse(toml_content).unwrap();

        assert_eq!(config.style, StyleKind::BasicHomework);
        assert_eq!(config.title, "Aircraft Tutorial");
        assert_eq!(config.authors[0].id.as_deref(), Some("4534921"));
        assert_eq!(config.content.len(), 2);
        assert!(matches!(
            &config.content[1],
            ContentStep::Text { mark: Some(TextMark::Todo), .. }
        ));
        assert!(!config.draft);
        assert!(config.class_file.is_none());
    }

    #[test]
    fn test_report_config_roundtrip() {
        let mut config = ReportConfig::new(StyleKind::IeeeConference, "Conference Paper Title");
        config.thanks = Some("Funded by X".to_string());
        config.draft = true;
        config.authors = vec![Author::new("Ada"), Author::new("Grace")];
        config.content = vec![
            ContentStep::Section {
                title: "Introduction".to_string(),
                numbering: true,
            },
            ContentStep::Paragraph,
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        config.save(&path).unwrap();
        let parsed = ReportConfig::load(&path).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_metadata_copies_fields() {
        let mut config = ReportConfig::new(StyleKind::BasicReport, "Title");
        config.organization = Some("TU Delft".to_string());
        config.draft = true;

        let meta = config.metadata();
        assert_eq!(meta.title, "Title");
        assert_eq!(meta.organization.as_deref(), Some("TU Delft"));
        assert!(meta.draft);
    }

    #[test]
    fn test_errors_are_reported() {
        let err = ReportConfig::load("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().starts_with("IO error"));

        let err = ReportConfig::parse("style = \"fancy\"\ntitle = \"x\"").unwrap_err();
        assert!(err.to_string().starts_with("TOML parse error"));

        let err = ReportConfig::parse("style = \"basic-report\"").unwrap_err();
        assert!(matches!(err, ReportConfigError::ParseError(_)));
    }
}
