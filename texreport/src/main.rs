//! texreport - LaTeX report assembler
//!
//! A CLI tool that builds LaTeX reports (and PDFs) from a texreport.toml
//! describing the style, metadata and content of the report.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, Engine};
use std::path::{Path, PathBuf};
use texreport::report_config::{ReportConfig, CONFIG_FILE_NAME};
use texreport::style::StyleKind;
use texreport::toolchain::LatexEngine;
use texreport::{script, templates, Report};

/// Main entry point for the texreport CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            style,
            path,
            force,
            title,
        } => {
            handle_init_command(&style, path, force, title)?;
        }

        Commands::Build {
            input,
            output,
            engine,
            tex_only,
            verbose,
        } => {
            handle_build_command(input, output, engine, tex_only, verbose)?;
        }

        Commands::ListStyles => {
            handle_list_styles_command();
        }
    }

    Ok(())
}

/// Handle the init command
fn handle_init_command(
    style: &str,
    path: Option<PathBuf>,
    force: bool,
    title: Option<String>,
) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    let kind: StyleKind = style
        .parse()
        .map_err(anyhow::Error::msg)
        .with_context(|| "Run 'texreport list-styles' to see available styles")?;

    println!("Initializing {} report", kind);
    println!("Target path: {}", target_path.display());
    if let Some(ref title_text) = title {
        println!("Title: {}", title_text);
    }

    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    let config_path = target_path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            config_path.display()
        );
    }

    let content = templates::get_template(kind).render(title.as_deref());
    std::fs::write(&config_path, content)
        .with_context(|| format!("Failed to write file {}", config_path.display()))?;

    println!("\n✓ Successfully created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to describe your report", CONFIG_FILE_NAME);
    if kind == StyleKind::BusinessReport {
        println!("  2. Set 'class_file' to your businessReport.cls");
    } else {
        println!("  2. Add figures, CSV data and bibliography files next to it");
    }
    println!("  3. Run 'texreport build' to generate the report");

    Ok(())
}

/// Handle the build command
fn handle_build_command(
    input: PathBuf,
    output: PathBuf,
    engine: Engine,
    tex_only: bool,
    verbose: bool,
) -> Result<()> {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config_path = if input.is_dir() {
        input.join(CONFIG_FILE_NAME)
    } else {
        input.clone()
    };
    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    println!("Building report...");
    println!("Config: {}", config_path.display());
    println!("Output: {}", output.display());

    // Stage 1: Load configuration
    println!("\n[Stage 1/3] Loading configuration...");
    let config = ReportConfig::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    println!(
        "✓ Loaded '{}' ({} style, {} content steps)",
        config.title,
        config.style,
        config.content.len()
    );

    // Stage 2: Assemble the document
    println!("\n[Stage 2/3] Assembling document...");
    let mut report = Report::from_config(&config, &base_dir);
    script::apply_steps(&mut report, &config.content, &base_dir)
        .with_context(|| format!("Failed to assemble content from {}", config_path.display()))?;
    println!("✓ Assembled {} content steps", config.content.len());

    // Stage 3: Write LaTeX and compile
    let engine: Option<LatexEngine> = if tex_only { None } else { Some(engine.into()) };
    match engine {
        Some(engine) => println!(
            "\n[Stage 3/3] Writing LaTeX and compiling with {}...",
            engine.program()
        ),
        None => println!("\n[Stage 3/3] Writing LaTeX..."),
    }
    let artifacts = report
        .output(&output, engine)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    println!("✓ Successfully wrote: {}", artifacts.tex_path.display());
    if verbose {
        println!("  - {} sections", artifacts.scope_count);
        println!("  - {} nodes", artifacts.node_count);
    }
    if let Some(class_file) = &artifacts.class_file {
        println!("✓ Copied class file: {}", class_file.display());
    }
    if let Some(pdf) = &artifacts.pdf_path {
        println!("✓ Successfully wrote: {}", pdf.display());
    }

    println!("\n✓ Build completed successfully!");

    Ok(())
}

/// Handle the list-styles command
fn handle_list_styles_command() {
    println!("Available styles:\n");

    for kind in StyleKind::all() {
        println!("  {} - {}", kind.id(), kind.description());
    }

    println!();
    println!("Usage: texreport init <style> [path]");
    println!("Example: texreport init ieee-conference ./paper --title \"My Paper\"");
}
