//! LaTeX writer
//!
//! This module serialises a `Document` into LaTeX source:
//! - Class, packages, colors and preamble
//! - Front matter, body (section tree) and closing content
//! - Tables, figures, lists, equations and matrices in their LaTeX environments

use crate::content::{EquationBlock, FigureBlock, ListBlock, ListKind, MatrixBlock, TableBlock};
use crate::latex_model::{escape_latex, Document, Node, Scope};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing LaTeX output
#[derive(Error, Debug)]
pub enum LatexWriteError {
    #[error("Failed to write {path}: {source}", path = .path.display())]
    IoError {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Serialise a document to a LaTeX string
pub fn to_latex(doc: &Document) -> String {
    let mut output = String::new();

    write_document_class(&mut output, doc);

    for package in doc.resolved_packages() {
        match &package.options {
            Some(options) => {
                output.push_str(&format!("\\usepackage[{}]{{{}}}\n", options, package.name))
            }
            None => output.push_str(&format!("\\usepackage{{{}}}\n", package.name)),
        }
    }

    for color in &doc.colors {
        output.push_str(&format!(
            "\\definecolor{{{}}}{{{}}}{{{}}}\n",
            color.name, color.model, color.spec
        ));
    }

    for line in &doc.preamble {
        output.push_str(line);
        output.push('\n');
    }

    output.push_str("%\n\\begin{document}\n");

    for node in &doc.front_matter {
        write_node(&mut output, node, doc);
    }
    for node in &doc.body {
        write_node(&mut output, node, doc);
    }
    for node in &doc.closing {
        write_node(&mut output, node, doc);
    }

    output.push_str("\\end{document}\n");
    output
}

/// Serialise a document and write it to `output_path`
pub fn to_file(doc: &Document, output_path: &Path) -> Result<(), LatexWriteError> {
    let latex = to_latex(doc);
    log::info!(
        "Writing {} bytes of LaTeX to {}",
        latex.len(),
        output_path.display()
    );
    fs::write(output_path, latex).map_err(|source| LatexWriteError::IoError {
        path: output_path.to_path_buf(),
        source,
    })
}

fn write_document_class(output: &mut String, doc: &Document) {
    if doc.class_options.is_empty() {
        output.push_str(&format!("\\documentclass{{{}}}\n", doc.class));
    } else {
        output.push_str(&format!(
            "\\documentclass[{}]{{{}}}\n",
            doc.class_options.join(","),
            doc.class
        ));
    }
}

/// Write a single node to the output
fn write_node(output: &mut String, node: &Node, doc: &Document) {
    match node {
        Node::Raw(latex) => line(output, latex),
        Node::Text(text) => line(output, &escape_latex(text)),
        Node::NewPage => line(output, r"\newpage"),
        Node::LineBreak => line(output, r"\linebreak"),
        Node::Paragraph => line(output, r"\par"),
        Node::VSpace(size) => line(output, size.command()),
        Node::List(list) => write_list(output, list),
        Node::Table(table) => write_table(output, table),
        Node::Figure(figure) => write_figure(output, figure),
        Node::Equation(equation) => write_equation(output, equation, doc.captioned_equations),
        Node::Matrix(matrix) => write_matrix(output, matrix),
        Node::Environment {
            name,
            options,
            body,
        } => {
            match options {
                Some(options) => line(output, &format!(r"\begin{{{}}}[{}]", name, options)),
                None => line(output, &format!(r"\begin{{{}}}", name)),
            }
            for child in body {
                write_node(output, child, doc);
            }
            line(output, &format!(r"\end{{{}}}", name));
        }
        Node::Scope(scope) => write_scope(output, scope, doc),
    }
}

fn line(output: &mut String, text: &str) {
    output.push_str(text);
    output.push('\n');
}

/// Write a section heading followed by its children
fn write_scope(output: &mut String, scope: &Scope, doc: &Document) {
    let star = if scope.numbering { "" } else { "*" };
    output.push('\n');
    line(
        output,
        &format!(
            r"\{}{}{{{}}}",
            scope.level.command(),
            star,
            escape_latex(&scope.title)
        ),
    );
    for child in &scope.children {
        write_node(output, child, doc);
    }
}

fn write_list(output: &mut String, list: &ListBlock) {
    if list.kind == ListKind::Enumerate {
        line(output, r"\setlist{nolistsep}");
    }
    let env = list.kind.environment();
    line(output, &format!(r"\begin{{{}}}[noitemsep]", env));
    for item in &list.items {
        match &item.label {
            Some(label) => line(
                output,
                &format!(
                    r"\item[{}] {}",
                    escape_latex(label),
                    escape_latex(&item.text)
                ),
            ),
            None => line(output, &format!(r"\item {}", escape_latex(&item.text))),
        }
    }
    line(output, &format!(r"\end{{{}}}", env));
}

fn write_table(output: &mut String, table: &TableBlock) {
    line(output, r"\begin{table}[H]");
    if let Some(caption) = &table.caption {
        line(output, &format!(r"\caption{{{}}}", escape_latex(caption)));
    }
    line(output, r"\centering");
    line(output, &format!(r"\begin{{tabular}}{{{}}}", table.column_spec()));

    for (index, row) in table.rows.iter().enumerate() {
        line(output, r"\hline");
        let cells: Vec<String> = if index == 0 {
            row.iter()
                .map(|cell| format!(r"\textbf{{{}}}", escape_latex(cell)))
                .collect()
        } else {
            row.iter().map(|cell| escape_latex(cell)).collect()
        };
        line(output, &format!(r"{}\\", cells.join("&")));
    }

    line(output, r"\hline");
    line(output, r"\end{tabular}");
    if let Some(label) = &table.label {
        line(output, &format!(r"\label{{tab: {}}}", label));
    }
    line(output, r"\end{table}");
}

fn write_figure(output: &mut String, figure: &FigureBlock) {
    line(output, r"\begin{figure}[H]");
    line(output, r"\centering");
    line(
        output,
        &format!(
            r"\includegraphics[width={}]{{{}}}",
            figure.width,
            figure.path.display()
        ),
    );
    if let Some(caption) = &figure.caption {
        line(output, &format!(r"\caption{{{}}}", escape_latex(caption)));
    }
    if let Some(label) = &figure.label {
        line(output, &format!(r"\label{{fig: {}}}", label));
    }
    line(output, r"\end{figure}");
}

fn write_equation(output: &mut String, equation: &EquationBlock, captioned: bool) {
    if equation.inline {
        line(output, &format!("${}$", equation.latex));
        return;
    }

    if captioned {
        line(output, r"\begin{equ}[!ht]");
    } else if equation.caption.is_some() {
        log::warn!("Equation captions are not supported by this style; caption dropped");
    }

    line(output, r"\begin{equation}");
    line(output, &equation.latex);
    if !captioned {
        if let Some(label) = &equation.label {
            line(output, &format!(r"\label{{eq:{}}}", label));
        }
    }
    line(output, r"\end{equation}");

    if captioned {
        if let Some(caption) = &equation.caption {
            line(output, &format!(r"\caption{{{}}}", escape_latex(caption)));
        }
        if let Some(label) = &equation.label {
            line(output, &format!(r"\label{{eq:{}}}", label));
        }
        line(output, r"\end{equ}");
    }
}

fn write_matrix(output: &mut String, matrix: &MatrixBlock) {
    let env = matrix.bracket.environment();
    let body = matrix
        .rows
        .iter()
        .map(|row| row.join("&"))
        .collect::<Vec<_>>()
        .join("\\\\\n");

    line(output, r"\[");
    line(output, &format!("{} =\\begin{{{}}}", matrix.name, env));
    line(output, &body);
    line(output, &format!("\\end{{{}}}", env));
    line(output, r"\]");
}
