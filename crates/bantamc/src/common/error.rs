//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic as Report, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use thiserror::Error;
use super::{Diagnostic, FileId, Severity, Span, BUILTIN_FILE};

/// Hard failure that stops processing of a compilation unit
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error at {span}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span}: {message}")]
    Parser { message: String, span: Span },

    #[error("semantic analysis failed with {count} diagnostic(s)")]
    Semantic { count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(count: usize) -> Self {
        Self::Semantic { count }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> FileId {
        self.files.add(name.into(), source.into())
    }

    pub fn file_name(&self, file_id: FileId) -> Option<&str> {
        self.files.get(file_id).ok().map(|f| f.name().as_str())
    }

    pub fn source(&self, file_id: FileId) -> Option<&str> {
        self.files.get(file_id).ok().map(|f| f.source().as_str())
    }

    /// Print a lexer/parser failure to stderr
    pub fn report_error(&self, file_id: FileId, error: &CompileError) {
        let report = Self::error_report(file_id, error);
        self.emit_stderr(&report);
    }

    /// Print a semantic diagnostic to stderr
    pub fn report_diagnostic(&self, diagnostic: &Diagnostic) {
        let report = Self::diagnostic_report(diagnostic);
        self.emit_stderr(&report);
    }

    /// Render a semantic diagnostic without colour, for logs and tests
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let report = Self::diagnostic_report(diagnostic);
        let mut buffer = NoColor::new(Vec::new());
        self.emit(&mut buffer, &report);
        String::from_utf8_lossy(&buffer.into_inner()).into_owned()
    }

    fn emit_stderr(&self, report: &Report<FileId>) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit(&mut writer.lock(), report);
    }

    fn emit(&self, writer: &mut dyn WriteColor, report: &Report<FileId>) {
        if let Err(e) = term::emit(writer, &self.config, &self.files, report) {
            log::warn!("failed to render diagnostic: {}", e);
        }
    }

    fn error_report(file_id: FileId, error: &CompileError) -> Report<FileId> {
        match error {
            CompileError::Lexer { message, span } => Report::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Parser { message, span } => Report::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            CompileError::Semantic { count } => {
                Report::error().with_message(format!("{} semantic error(s)", count))
            }

            CompileError::Io(err) => {
                Report::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    fn diagnostic_report(diagnostic: &Diagnostic) -> Report<FileId> {
        let message = match diagnostic.severity() {
            Severity::Fatal => format!("fatal: {}", diagnostic.message()),
            Severity::Error => diagnostic.message(),
        };

        let report = Report::error()
            .with_message(message)
            .with_code(diagnostic.kind().as_str());

        if diagnostic.file() == BUILTIN_FILE {
            return report;
        }

        let span = diagnostic.span();
        report.with_labels(vec![Label::primary(diagnostic.file(), span.start..span.end)])
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
