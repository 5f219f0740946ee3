//! Bantam AST definitions

mod types;
mod expr;
mod stmt;
mod class;

pub use types::*;
pub use expr::*;
pub use stmt::*;
pub use class::*;

/// A parsed program: the classes of every source file of one compilation unit
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub classes: Vec<ClassDecl>,
}

impl Program {
    pub fn new(classes: Vec<ClassDecl>) -> Self {
        Self { classes }
    }

    /// Append the classes of another parsed file
    pub fn extend(&mut self, other: Program) {
        self.classes.extend(other.classes);
    }
}
