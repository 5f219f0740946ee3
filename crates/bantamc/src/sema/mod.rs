//! Semantic analysis
//!
//! Phases run strictly in order, all reporting into one [`Diagnostics`] sink:
//!
//! 1. [`ClassHierarchyBuilder`] resolves the class tree
//! 2. [`SymbolTableBuilder`] computes every class's member table
//! 3. [`EntryPointValidator`] gates the rest of the analysis
//! 4. [`TypeChecker`] annotates every expression with its type

pub mod builtins;
pub mod checker;
pub mod entry;
pub mod hierarchy;
pub mod members;
pub mod returns;
pub mod scope;
pub mod types;

pub use checker::TypeChecker;
pub use entry::EntryPointValidator;
pub use hierarchy::{ClassHierarchyBuilder, ClassId, ClassNode, ClassTree};
pub use members::{FieldEntry, MemberTable, MethodSig, SymbolTableBuilder};

use crate::common::Diagnostics;
use crate::frontend::ast::Program;

/// Default ceiling on the cumulative field count of one class
pub const DEFAULT_MAX_FIELDS: usize = 1500;

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Class that must declare the entry method
    pub entry_class: String,
    /// Entry method: no parameters, returns void
    pub entry_method: String,
    pub max_fields: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            entry_class: "Main".to_string(),
            entry_method: "main".to_string(),
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

/// Outcome of analysing one compilation unit
#[derive(Debug)]
pub struct Analysis {
    pub tree: ClassTree,
    /// False when the entry-point gate failed and bodies were not checked
    pub checked: bool,
}

/// Runs every semantic phase over a parsed program
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyse `program`. The caller must check `diagnostics.has_fatal()` and
    /// `diagnostics.has_errors()` before handing the tree to a later stage.
    pub fn analyze(&self, program: Program, diagnostics: &mut Diagnostics) -> Analysis {
        let mut tree = ClassHierarchyBuilder::new(diagnostics).build(program.classes);
        SymbolTableBuilder::new(diagnostics, self.config.max_fields).build(&mut tree);

        let gate = EntryPointValidator::new(&self.config.entry_class, &self.config.entry_method);
        if !gate.validate(&tree, diagnostics) || diagnostics.has_fatal() {
            log::debug!("entry point gate failed; skipping type checking");
            return Analysis { tree, checked: false };
        }

        TypeChecker::check_program(&mut tree, diagnostics);
        log::debug!("semantic analysis finished with {} diagnostic(s)", diagnostics.len());
        Analysis { tree, checked: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticKind;
    use crate::frontend::parse_source;
    use pretty_assertions::assert_eq;

    fn analyze_with(config: AnalyzerConfig, source: &str) -> (Analysis, Diagnostics) {
        let program = parse_source(source, 0).unwrap();
        let mut diagnostics = Diagnostics::new();
        let analysis = Analyzer::new(config).analyze(program, &mut diagnostics);
        (analysis, diagnostics)
    }

    #[test]
    fn test_gate_blocks_type_checking() {
        let (analysis, diags) = analyze_with(AnalyzerConfig::default(), "class A { void f() { break; } }");

        assert!(!analysis.checked);
        assert_eq!(diags.kinds(), vec![DiagnosticKind::MissingEntryClass]);
    }

    #[test]
    fn test_structural_errors_do_not_block_type_checking() {
        let source = "class A extends Missing { } class Main { void main() { break; } }";
        let (analysis, diags) = analyze_with(AnalyzerConfig::default(), source);

        assert!(analysis.checked);
        assert_eq!(diags.kinds(), vec![DiagnosticKind::UndefinedParent, DiagnosticKind::IllegalBreak]);
        assert!(!diags.has_fatal());
    }

    #[test]
    fn test_configured_entry_point() {
        let config = AnalyzerConfig {
            entry_class: "App".to_string(),
            entry_method: "run".to_string(),
            ..AnalyzerConfig::default()
        };
        let (analysis, diags) = analyze_with(config, "class App { void run() { } }");

        assert!(analysis.checked);
        assert!(diags.is_empty());
    }
}
