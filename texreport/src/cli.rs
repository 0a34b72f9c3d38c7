//! Command-line interface definitions for texreport

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use texreport::toolchain::LatexEngine;

/// LaTeX engine selection
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum Engine {
    /// latexmk with pdflatex, reruns as needed
    #[default]
    Latexmk,
    /// Two pdflatex passes
    Pdflatex,
    /// Two xelatex passes
    Xelatex,
    /// Two lualatex passes
    Lualatex,
}

impl From<Engine> for LatexEngine {
    fn from(engine: Engine) -> Self {
        match engine {
            Engine::Latexmk => LatexEngine::Latexmk,
            Engine::Pdflatex => LatexEngine::Pdflatex,
            Engine::Xelatex => LatexEngine::Xelatex,
            Engine::Lualatex => LatexEngine::Lualatex,
        }
    }
}

/// CLI structure for the texreport application
#[derive(Parser)]
#[command(name = "texreport")]
#[command(version)]
#[command(about = "Assemble LaTeX reports from a texreport.toml", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for texreport
#[derive(Subcommand)]
pub enum Commands {
    /// Create a starter texreport.toml for a style
    Init {
        /// Style identifier (e.g., basic-report, ieee-conference)
        style: String,

        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing texreport.toml
        #[arg(short, long)]
        force: bool,

        /// Report title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Build the report to LaTeX and PDF
    Build {
        /// Project directory or texreport.toml file (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "build")]
        output: PathBuf,

        /// LaTeX engine used to compile the PDF
        #[arg(long, value_enum, default_value = "latexmk")]
        engine: Engine,

        /// Only write the .tex file, do not run a LaTeX engine
        #[arg(long)]
        tex_only: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List available styles
    ListStyles,
}
