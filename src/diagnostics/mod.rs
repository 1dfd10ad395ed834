use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("IO error: {msg}")]
    Io { msg: String, path: PathBuf },
}

impl LintError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }
}

/// Render a LintError with ariadne for nice terminal output.
pub fn render_error(source: &str, err: &LintError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        LintError::Syntax { msg, span } => {
            Report::build(ReportKind::Error, (), span.start)
                .with_message("syntax error")
                .with_label(
                    Label::new(span.start..span.end)
                        .with_message(msg),
                )
                .finish()
                .eprint(Source::from(source))
                .unwrap();
        }
        LintError::Config { msg, path } | LintError::Io { msg, path } => {
            eprintln!("error: {msg}");
            eprintln!("  --> {}", path.display());
        }
    }
}

/// Render an ordering violation as an ariadne warning report.
pub fn render_violation(source: &str, v: &crate::analysis::Violation) {
    use ariadne::{Label, Report, ReportKind, Source};

    Report::build(ReportKind::Warning, (), v.span.start)
        .with_message(v.rule_name())
        .with_label(
            Label::new(v.span.start..v.span.end)
                .with_message(v.message()),
        )
        .finish()
        .eprint(Source::from(source))
        .unwrap();
}
