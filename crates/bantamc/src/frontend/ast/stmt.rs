//! Bantam statement AST nodes

use super::{Expr, Type};
use crate::common::Span;

/// A block of statements: `{ ... }`
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }

    pub fn empty(span: Span) -> Self {
        Self {
            stmts: Vec::new(),
            span,
        }
    }
}

/// A statement
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement kinds
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Local variable declaration: int x = 5;
    Local {
        name: String,
        ty: Type,
        init: Option<Expr>,
    },

    /// Expression statement: foo();
    Expr(Expr),

    /// if (cond) stmt [else stmt]
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// while (cond) stmt
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    /// for (init; cond; update) stmt
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },

    Break,

    /// return [expr];
    Return(Option<Expr>),

    Block(Block),
}
