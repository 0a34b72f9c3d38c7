//! External LaTeX toolchain
//!
//! Runs a LaTeX engine on a written `.tex` file to produce a PDF. The engine
//! is an opaque blocking subprocess; this module only builds the command
//! line, reports failures with the tail of the engine log and removes
//! auxiliary files afterwards.

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Auxiliary files left behind by raw engine runs
const AUX_EXTENSIONS: &[&str] = &["aux", "log", "out", "toc", "lof", "lot"];

/// Number of engine output lines kept in error reports
const LOG_TAIL_LINES: usize = 20;

/// Errors that can occur while compiling a document
#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("LaTeX engine '{program}' was not found on PATH")]
    NotFound { program: String },

    #[error("Failed to run '{program}': {source}")]
    IoError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed with {status}:\n{log_tail}")]
    EngineFailed {
        program: String,
        status: String,
        log_tail: String,
    },

    #[error("Invalid input path {path}", path = .0.display())]
    InvalidInput(PathBuf),

    #[error("Engine finished but {path} was not produced", path = .0.display())]
    MissingOutput(PathBuf),
}

/// Supported LaTeX engines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatexEngine {
    /// latexmk driving pdflatex, handles reruns itself
    #[default]
    Latexmk,
    Pdflatex,
    Xelatex,
    Lualatex,
}

impl LatexEngine {
    /// Executable name
    pub fn program(self) -> &'static str {
        match self {
            LatexEngine::Latexmk => "latexmk",
            LatexEngine::Pdflatex => "pdflatex",
            LatexEngine::Xelatex => "xelatex",
            LatexEngine::Lualatex => "lualatex",
        }
    }

    /// Arguments for one compilation pass of `file_name`
    fn compile_args(self, file_name: &str) -> Vec<String> {
        let mut args = Vec::new();
        if self == LatexEngine::Latexmk {
            args.push("-pdf".to_string());
        }
        args.push("-interaction=nonstopmode".to_string());
        args.push("-halt-on-error".to_string());
        args.push(file_name.to_string());
        args
    }
}

/// Compile `tex_path` to PDF next to it
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the produced PDF
/// * `Err(ToolchainError)` - Engine missing, failed, or produced no PDF
pub fn compile(tex_path: &Path, engine: LatexEngine) -> Result<PathBuf, ToolchainError> {
    let dir = tex_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = tex_path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ToolchainError::InvalidInput(tex_path.to_path_buf()))?;
    let stem = tex_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ToolchainError::InvalidInput(tex_path.to_path_buf()))?;

    log::info!(
        "Compiling {} with {}",
        tex_path.display(),
        engine.program()
    );

    match engine {
        LatexEngine::Latexmk => {
            run(dir, engine.program(), &engine.compile_args(file_name))?;
            if let Err(e) = run(dir, engine.program(), &["-c".to_string(), file_name.to_string()]) {
                log::warn!("Failed to clean auxiliary files: {}", e);
            }
        }
        _ => {
            // Second pass resolves references and the table of contents
            for pass in 1..=2 {
                log::debug!("{} pass {}", engine.program(), pass);
                run(dir, engine.program(), &engine.compile_args(file_name))?;
            }
            clean_auxiliary_files(dir, stem);
        }
    }

    let pdf = dir.join(format!("{}.pdf", stem));
    if !pdf.exists() {
        return Err(ToolchainError::MissingOutput(pdf));
    }
    Ok(pdf)
}

/// Run one engine invocation in `dir`
fn run(dir: &Path, program: &str, args: &[String]) -> Result<(), ToolchainError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ToolchainError::NotFound {
                    program: program.to_string(),
                }
            } else {
                ToolchainError::IoError {
                    program: program.to_string(),
                    source,
                }
            }
        })?;

    if output.status.success() {
        return Ok(());
    }

    Err(ToolchainError::EngineFailed {
        program: program.to_string(),
        status: output.status.to_string(),
        log_tail: log_tail(&String::from_utf8_lossy(&output.stdout), LOG_TAIL_LINES),
    })
}

/// Last `count` lines of an engine log
fn log_tail(log: &str, count: usize) -> String {
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}

/// Remove auxiliary files produced by raw engine runs
fn clean_auxiliary_files(dir: &Path, stem: &str) {
    for ext in AUX_EXTENSIONS {
        let path = dir.join(format!("{}.{}", stem, ext));
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_args() {
        assert_eq!(
            LatexEngine::Latexmk.compile_args("report.tex"),
            vec!["-pdf", "-interaction=nonstopmode", "-halt-on-error", "report.tex"]
        );
        assert_eq!(
            LatexEngine::Xelatex.compile_args("report.tex"),
            vec!["-interaction=nonstopmode", "-halt-on-error", "report.tex"]
        );
    }

    #[test]
    fn test_log_tail_keeps_last_lines() {
        let log = (1..=30).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let tail = log_tail(&log, 3);
        assert_eq!(tail, "28\n29\n30");
        assert_eq!(log_tail("short", 20), "short");
    }

    #[test]
    fn test_clean_auxiliary_files() {
        let dir = tempfile::tempdir().unwrap();
        for ext in ["aux", "log", "toc", "tex", "pdf"] {
            std::fs::write(dir.path().join(format!("report.{}", ext)), "").unwrap();
        }

        clean_auxiliary_files(dir.path(), "report");

        assert!(!dir.path().join("report.aux").exists());
        assert!(!dir.path().join("report.log").exists());
        assert!(!dir.path().join("report.toc").exists());
        assert!(dir.path().join("report.tex").exists());
        assert!(dir.path().join("report.pdf").exists());
    }

    #[test]
    fn test_missing_engine_is_reported() {
        let err = run(
            Path::new("."),
            "texreport-definitely-not-an-engine",
            &["x.tex".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, ToolchainError::NotFound { .. }));
    }
}
