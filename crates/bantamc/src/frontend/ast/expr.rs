//! Bantam expression AST nodes

use super::Type;
use crate::common::Span;
use std::fmt;

/// A Bantam expression; `ty` is filled in by the type checker
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span, ty: None }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i32),
    BoolLiteral(bool),
    StringLiteral(String),
    Null,
    This,
    Super,

    /// Bare name: x
    Name(String),

    /// Field access: obj.field, this.field, arr.length
    Field {
        object: Box<Expr>,
        field: String,
    },

    /// Array element: arr[i]
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },

    /// Method call: obj.m(a, b) or m(a, b)
    Call {
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },

    /// Instantiation: new C()
    New {
        class: String,
    },

    /// Array instantiation: new T[n]
    NewArray {
        element: Type,
        size: Box<Expr>,
    },

    /// Cast: (T)(expr)
    Cast {
        ty: Type,
        expr: Box<Expr>,
    },

    /// Runtime type test: expr instanceof T
    InstanceOf {
        expr: Box<Expr>,
        ty: Type,
    },

    /// Unary operation: -x, !x
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// ++x, x--, ...
    IncDec {
        op: IncDecOp,
        prefix: bool,
        target: Box<Expr>,
    },

    /// Binary operation: a + b
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Assignment: target = value
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,

    // Relational
    Lt,
    Le,
    Gt,
    Ge,

    // Equality
    Eq,
    Ne,

    // Logical
    And,
    Or,
}

impl BinOp {
    /// Get operator precedence (higher binds tighter)
    pub fn precedence(&self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne => 3,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::Rem => 6,
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Rem)
    }

    pub fn is_relational(&self) -> bool {
        matches!(self, BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        write!(f, "{}", s)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

/// Increment and decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc,
    Dec,
}

impl fmt::Display for IncDecOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncDecOp::Inc => write!(f, "++"),
            IncDecOp::Dec => write!(f, "--"),
        }
    }
}
