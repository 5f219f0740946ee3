//! Bantam Compiler - semantic analyzer for the Bantam Java teaching language
//!
//! This library checks Bantam programs: it resolves the class hierarchy,
//! builds per-class member tables, validates the entry point and type checks
//! every method body.
//!
//! ## Architecture
//!
//! The compiler is organized into:
//! - **Frontend** (`frontend/`): Lexing and parsing into an AST
//! - **Semantic analysis** (`sema/`): Hierarchy, member tables, entry point, type checking
//! - **Driver** (`driver/`): Multi-file pipeline and diagnostic reporting
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics, spans)

pub mod common;
pub mod driver;
pub mod frontend;
pub mod sema;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, Diagnostic, DiagnosticKind, DiagnosticReporter, Diagnostics, Span};
pub use driver::{Pipeline, PipelineConfig};
pub use sema::{Analysis, Analyzer, AnalyzerConfig, ClassTree};
