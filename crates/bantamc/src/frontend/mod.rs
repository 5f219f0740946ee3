//! Bantam frontend: lexing and parsing
//!
//! The frontend turns source text into the parse tree consumed by
//! semantic analysis:
//! 1. Lexing source code into tokens
//! 2. Parsing tokens into an AST

pub mod ast;
pub mod lexer;
pub mod parser;

pub use lexer::Lexer;
pub use parser::Parser;

use crate::common::{CompileResult, FileId};
use ast::Program;

/// Parse one source file into its class declarations
pub fn parse_source(source: &str, file: FileId) -> CompileResult<Program> {
    let mut parser = Parser::new(source, file);
    parser.parse_program()
}
