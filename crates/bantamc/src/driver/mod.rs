//! Compilation driver and pipeline orchestration

use crate::common::{CompileError, CompileResult, DiagnosticReporter, Diagnostics, FileId};
use crate::frontend::ast::Program;
use crate::frontend::{parse_source, Lexer};
use crate::sema::{Analysis, Analyzer, AnalyzerConfig};
use std::fs;
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Dump tokens (for debugging)
    pub dump_tokens: bool,
    /// Dump AST (for debugging)
    pub dump_ast: bool,
    /// Dump the resolved class hierarchy
    pub dump_hierarchy: bool,
    /// Verbose output
    pub verbose: bool,
    pub analyzer: AnalyzerConfig,
}

/// Compilation pipeline: every source file of one compilation unit is parsed,
/// the classes are analysed together and the diagnostics reported in order
pub struct Pipeline {
    config: PipelineConfig,
    reporter: DiagnosticReporter,
    files: Vec<FileId>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            reporter: DiagnosticReporter::new(),
            files: Vec::new(),
        }
    }

    /// Register source text under a display name
    pub fn add_source(&mut self, name: impl Into<String>, source: impl Into<String>) -> FileId {
        let file_id = self.reporter.add_file(name, source);
        self.files.push(file_id);
        file_id
    }

    pub fn load_file(&mut self, path: &Path) -> CompileResult<FileId> {
        let source = fs::read_to_string(path)?;
        Ok(self.add_source(path.display().to_string(), source))
    }

    /// Parse every registered file. Each syntax error is reported; the first one is returned.
    pub fn parse(&self) -> CompileResult<Program> {
        let mut program = Program::default();
        let mut first_error = None;

        for &file_id in &self.files {
            let source = self.reporter.source(file_id).unwrap_or_default();

            if self.config.dump_tokens {
                self.dump_tokens(file_id, source);
            }

            match parse_source(source, file_id) {
                Ok(parsed) => program.extend(parsed),
                Err(e) => {
                    self.reporter.report_error(file_id, &e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(program),
        }
    }

    /// Run semantic analysis over an already parsed program
    pub fn analyze(&self, program: Program) -> (Analysis, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let analysis = Analyzer::new(self.config.analyzer.clone()).analyze(program, &mut diagnostics);
        (analysis, diagnostics)
    }

    /// Parse, analyse and report. Fails when any diagnostic was recorded.
    pub fn run(&self) -> CompileResult<Analysis> {
        let program = self.parse()?;
        log::debug!("parsed {} classes from {} file(s)", program.classes.len(), self.files.len());

        if self.config.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!("=== End AST ===\n");
        }

        let (analysis, diagnostics) = self.analyze(program);

        if self.config.dump_hierarchy {
            eprintln!("=== Class Hierarchy ===");
            eprint!("{}", analysis.tree);
            eprintln!("=== End Class Hierarchy ===\n");
        }

        for diagnostic in diagnostics.sorted() {
            self.reporter.report_diagnostic(diagnostic);
        }

        if diagnostics.has_errors() {
            return Err(CompileError::semantic(diagnostics.len()));
        }

        if self.config.verbose {
            eprintln!("Checked {} classes", analysis.tree.len());
        }
        Ok(analysis)
    }

    fn dump_tokens(&self, file_id: FileId, source: &str) {
        let name = self.reporter.file_name(file_id).unwrap_or("<input>");
        eprintln!("=== Tokens: {} ===", name);
        match Lexer::new(source).tokenize_all() {
            Ok(tokens) => {
                for token in tokens {
                    eprintln!("{:?}", token);
                }
            }
            Err(e) => eprintln!("{}", e),
        }
        eprintln!("=== End Tokens ===\n");
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
