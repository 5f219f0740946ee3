//! Structured semantic diagnostics and the per-compilation sink that collects them

use super::{FileId, Span};
use std::fmt;
use thiserror::Error;

/// A semantic violation together with the data needed to describe it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    // Class hierarchy
    #[error("class '{name}' is already defined")]
    DuplicateClass { name: String },

    #[error("class '{class}' extends undefined class '{parent}'")]
    UndefinedParent { class: String, parent: String },

    #[error("class '{class}' cannot extend built-in class '{parent}'")]
    IllegalParent { class: String, parent: String },

    #[error("class '{class}' is part of an inheritance cycle: {cycle}")]
    InheritanceCycle { class: String, cycle: String },

    // Entry point
    #[error("no class named '{class}' is defined")]
    MissingEntryClass { class: String },

    #[error("entry class '{class}' must be defined exactly once")]
    DuplicateEntryClass { class: String },

    #[error("class '{class}' does not declare a method '{method}'")]
    MissingEntryMethod { class: String, method: String },

    #[error("entry method '{class}.{method}' {reason}")]
    MalformedEntryMethod {
        class: String,
        method: String,
        reason: String,
    },

    // Member declarations
    #[error("field '{field}' is declared more than once in class '{class}'")]
    DuplicateField { class: String, field: String },

    #[error("method '{method}' is declared more than once in class '{class}'")]
    DuplicateMethod { class: String, method: String },

    #[error("undefined type '{name}'")]
    UndefinedType { name: String },

    #[error("'{name}' is a reserved name")]
    ReservedName { name: String },

    #[error("method '{class}.{method}' overrides '{expected}' with incompatible signature '{found}'")]
    OverrideMismatch {
        class: String,
        method: String,
        expected: String,
        found: String,
    },

    #[error("class '{class}' has {count} fields, exceeding the limit of {max}")]
    TooManyFields {
        class: String,
        count: usize,
        max: usize,
    },

    // Method bodies
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("operator '{op}' expects {expected} operands, found {found}")]
    BadOperand {
        op: String,
        expected: String,
        found: String,
    },

    #[error("operator '{op}' cannot compare {left} with {right}")]
    IncomparableOperands {
        op: String,
        left: String,
        right: String,
    },

    #[error("method '{method}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("argument {index} of '{method}' expects {expected}, found {found}")]
    ArgumentType {
        method: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("method '{method}' must return a value of type {expected}")]
    MissingReturnValue { method: String, expected: String },

    #[error("void method '{method}' cannot return a value")]
    UnexpectedReturnValue { method: String },

    #[error("expected an array, found {found}")]
    NotAnArray { found: String },

    #[error("undeclared variable '{name}'")]
    UndeclaredVariable { name: String },

    #[error("type {ty} has no method '{method}'")]
    UndefinedMethod { ty: String, method: String },

    #[error("type {ty} has no field '{field}'")]
    UndefinedField { ty: String, field: String },

    #[error("cannot cast {from} to {to}")]
    IllegalCast { from: String, to: String },

    #[error("break statement outside of a loop")]
    IllegalBreak,

    #[error("method '{method}' may finish without returning a value")]
    MissingReturn { method: String },

    #[error("variable '{name}' is already declared in this scope")]
    DuplicateLocal { name: String },

    #[error("{target} cannot be assigned to")]
    InvalidAssignment { target: String },

    #[error("expression cannot be used as a statement")]
    InvalidExpressionStatement,
}

impl SemanticError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::DuplicateClass { .. } => DiagnosticKind::DuplicateClass,
            Self::UndefinedParent { .. } => DiagnosticKind::UndefinedParent,
            Self::IllegalParent { .. } => DiagnosticKind::IllegalParent,
            Self::InheritanceCycle { .. } => DiagnosticKind::InheritanceCycle,
            Self::MissingEntryClass { .. } | Self::DuplicateEntryClass { .. } => {
                DiagnosticKind::MissingEntryClass
            }
            Self::MissingEntryMethod { .. } | Self::MalformedEntryMethod { .. } => {
                DiagnosticKind::MissingEntryMethod
            }
            Self::DuplicateField { .. } => DiagnosticKind::DuplicateField,
            Self::DuplicateMethod { .. } => DiagnosticKind::DuplicateMethod,
            Self::UndefinedType { .. } => DiagnosticKind::UndefinedType,
            Self::ReservedName { .. } => DiagnosticKind::ReservedName,
            Self::OverrideMismatch { .. } => DiagnosticKind::OverrideMismatch,
            Self::TooManyFields { .. } => DiagnosticKind::TooManyFields,
            Self::TypeMismatch { .. }
            | Self::BadOperand { .. }
            | Self::IncomparableOperands { .. }
            | Self::ArgumentCount { .. }
            | Self::ArgumentType { .. }
            | Self::MissingReturnValue { .. }
            | Self::UnexpectedReturnValue { .. }
            | Self::NotAnArray { .. } => DiagnosticKind::TypeMismatch,
            Self::UndeclaredVariable { .. } => DiagnosticKind::UndeclaredVariable,
            Self::UndefinedMethod { .. } => DiagnosticKind::UndefinedMethod,
            Self::UndefinedField { .. } => DiagnosticKind::UndefinedField,
            Self::IllegalCast { .. } => DiagnosticKind::IllegalCast,
            Self::IllegalBreak => DiagnosticKind::IllegalBreak,
            Self::MissingReturn { .. } => DiagnosticKind::MissingReturn,
            Self::DuplicateLocal { .. } => DiagnosticKind::DuplicateLocal,
            Self::InvalidAssignment { .. } => DiagnosticKind::InvalidAssignment,
            Self::InvalidExpressionStatement => DiagnosticKind::InvalidExpressionStatement,
        }
    }
}

/// Category of a diagnostic, independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DuplicateClass,
    UndefinedParent,
    IllegalParent,
    InheritanceCycle,
    MissingEntryClass,
    MissingEntryMethod,
    DuplicateField,
    DuplicateMethod,
    UndefinedType,
    ReservedName,
    OverrideMismatch,
    TooManyFields,
    TypeMismatch,
    UndeclaredVariable,
    UndefinedMethod,
    UndefinedField,
    IllegalCast,
    IllegalBreak,
    MissingReturn,
    DuplicateLocal,
    InvalidAssignment,
    InvalidExpressionStatement,
}

impl DiagnosticKind {
    /// Short stable name, used as the diagnostic code when rendering
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateClass => "duplicate-class",
            Self::UndefinedParent => "undefined-parent",
            Self::IllegalParent => "illegal-parent",
            Self::InheritanceCycle => "inheritance-cycle",
            Self::MissingEntryClass => "missing-entry-class",
            Self::MissingEntryMethod => "missing-entry-method",
            Self::DuplicateField => "duplicate-field",
            Self::DuplicateMethod => "duplicate-method",
            Self::UndefinedType => "undefined-type",
            Self::ReservedName => "reserved-name",
            Self::OverrideMismatch => "override-mismatch",
            Self::TooManyFields => "too-many-fields",
            Self::TypeMismatch => "type-mismatch",
            Self::UndeclaredVariable => "undeclared-variable",
            Self::UndefinedMethod => "undefined-method",
            Self::UndefinedField => "undefined-field",
            Self::IllegalCast => "illegal-cast",
            Self::IllegalBreak => "illegal-break",
            Self::MissingReturn => "missing-return",
            Self::DuplicateLocal => "duplicate-local",
            Self::InvalidAssignment => "invalid-assignment",
            Self::InvalidExpressionStatement => "invalid-expression-statement",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far a diagnostic stops the compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Recorded; analysis continues but code generation must not run
    Error,
    /// Stops progression to the next analysis phase
    Fatal,
}

/// One recorded semantic diagnostic. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    error: SemanticError,
    severity: Severity,
    file: FileId,
    span: Span,
}

impl Diagnostic {
    pub fn new(error: SemanticError, severity: Severity, file: FileId, span: Span) -> Self {
        Self {
            error,
            severity,
            file,
            span,
        }
    }

    pub fn error(error: SemanticError, file: FileId, span: Span) -> Self {
        Self::new(error, Severity::Error, file, span)
    }

    pub fn fatal(error: SemanticError, file: FileId, span: Span) -> Self {
        Self::new(error, Severity::Fatal, file, span)
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.error.kind()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        write!(f, "{}[{}] at {}: {}", level, self.kind(), self.span, self.error)
    }
}

/// Append-only collector for the diagnostics of one compilation unit
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, error: SemanticError, file: FileId, span: Span) {
        self.report(Diagnostic::error(error, file, span));
    }

    pub fn fatal(&mut self, error: SemanticError, file: FileId, span: Span) {
        self.report(Diagnostic::fatal(error, file, span));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    /// True when anything was recorded; every diagnostic blocks code generation
    pub fn has_errors(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.items.iter().map(Diagnostic::kind).collect()
    }

    /// Diagnostics ordered by file, then line, then position; stable for ties
    pub fn sorted(&self) -> Vec<&Diagnostic> {
        let mut sorted: Vec<&Diagnostic> = self.items.iter().collect();
        sorted.sort_by_key(|d| (d.file, d.span.line, d.span.start));
        sorted
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(line: u32, start: usize) -> Span {
        Span::new(start, start + 1, line)
    }

    #[test]
    fn test_fatal_query() {
        let mut diags = Diagnostics::new();
        diags.error(SemanticError::IllegalBreak, 0, at(3, 10));
        assert!(diags.has_errors());
        assert!(!diags.has_fatal());

        diags.fatal(
            SemanticError::MissingEntryClass { class: "Main".into() },
            0,
            at(1, 0),
        );
        assert!(diags.has_fatal());
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_sorted_by_file_then_line() {
        let mut diags = Diagnostics::new();
        diags.error(SemanticError::IllegalBreak, 1, at(2, 5));
        diags.error(SemanticError::InvalidExpressionStatement, 0, at(9, 80));
        diags.error(SemanticError::IllegalBreak, 0, at(4, 30));

        let order: Vec<(FileId, u32)> = diags.sorted().iter().map(|d| (d.file(), d.line())).collect();
        assert_eq!(order, vec![(0, 4), (0, 9), (1, 2)]);
    }

    #[test]
    fn test_kind_and_message() {
        let diag = Diagnostic::error(
            SemanticError::ArgumentCount {
                method: "foo".into(),
                expected: 2,
                found: 1,
            },
            0,
            at(7, 0),
        );
        assert_eq!(diag.kind(), DiagnosticKind::TypeMismatch);
        assert_eq!(diag.message(), "method 'foo' expects 2 argument(s), found 1");
        assert_eq!(diag.to_string(), "error[type-mismatch] at line 7: method 'foo' expects 2 argument(s), found 1");
    }
}
