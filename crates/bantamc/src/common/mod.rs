//! Common infrastructure shared across the frontend and semantic analysis

mod diagnostic;
mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics, SemanticError, Severity};
pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use span::{BUILTIN_FILE, FileId, Span};
