//! Class and member declarations

use super::{Block, Expr, Type};
use crate::common::{FileId, Span};

/// A class declaration as it appears in the parse tree
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: String,
    /// Declared parent; `None` means the implicit root class
    pub parent: Option<String>,
    pub members: Vec<Member>,
    pub file: FileId,
    pub span: Span,
}

impl ClassDecl {
    pub fn new(name: String, parent: Option<String>, members: Vec<Member>, file: FileId, span: Span) -> Self {
        Self { name, parent, members, file, span }
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            Member::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(m) => Some(m),
            Member::Field(_) => None,
        })
    }
}

/// A field or method, in declaration order
#[derive(Debug, Clone)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Field(f) => &f.name,
            Member::Method(m) => &m.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Member::Field(f) => f.span,
            Member::Method(m) => m.span,
        }
    }
}

/// Field declaration: `int count = 0;`
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub init: Option<Expr>,
    pub span: Span,
}

impl FieldDecl {
    pub fn new(name: String, ty: Type, init: Option<Expr>, span: Span) -> Self {
        Self { name, ty, init, span }
    }
}

/// Formal parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

impl Param {
    pub fn new(name: String, ty: Type, span: Span) -> Self {
        Self { name, ty, span }
    }
}

/// Method declaration
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Block,
    pub span: Span,
    /// Position of the closing brace
    pub end_span: Span,
}

impl MethodDecl {
    pub fn new(name: String, params: Vec<Param>, return_type: Type, body: Block, span: Span, end_span: Span) -> Self {
        Self { name, params, return_type, body, span, end_span }
    }

    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }
}
