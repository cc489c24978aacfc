//! Rich error rendering using ariadne
//!
//! The run output uses one-line diagnostics (`main:1:5: name y is not
//! bound`). This module renders the same errors with a source snippet, an
//! underline and help text, for terminals and other places with room.

use crate::{CompileError, Error};
use ariadne::{ColorGenerator, Config, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error with rich formatting to stderr
///
/// # Example
/// ```no_run
/// use lazylam::{RunOptions, compile, render_error};
///
/// let source = "\\x. y";
/// if let Err(e) = compile("main", source, &RunOptions::default()) {
///     render_error(&e.into());
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for web UIs, logs, etc.)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Compile(err) => render_compile_error(err, writer, use_color),
        Error::Timeout { limit } => {
            writeln!(writer, "Timeout: evaluation exceeded {:?}", limit)
        }
        Error::Runtime(_) | Error::ResourceExceeded { .. } => {
            writeln!(writer, "Runtime error: {}", error)
        }
    }
}

fn render_compile_error(
    err: &CompileError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let diag = err.to_diagnostic();
    let source = &err.pos().source;

    // Errors inside the prelude have nothing to point at.
    let Some(span) = diag.span.clone() else {
        return writeln!(writer, "Error: {}", diag);
    };

    let name = source.name();
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let mut report = Report::build(ReportKind::Error, (name, span.clone()))
        .with_message(format!("{}: {}", diag.location, diag.message))
        .with_config(
            Config::default()
                .with_color(use_color)
                .with_index_type(IndexType::Byte),
        )
        .with_label(
            Label::new((name, span))
                .with_message(&diag.message)
                .with_color(colors.next()),
        );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((name, Source::from(source.text())), &mut *writer)
}
