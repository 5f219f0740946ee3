//! Lexical scopes for method bodies

use crate::common::SemanticError;
use crate::frontend::ast::Type;
use std::collections::HashMap;

/// A name visible inside a method body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Scope stack; each level owns its parent
#[derive(Debug, Default)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
    parent: Option<Box<Scope>>,
    loop_depth: usize,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol in the innermost level
    pub fn define(&mut self, symbol: Symbol) -> Result<(), SemanticError> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(SemanticError::DuplicateLocal { name: symbol.name });
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Look a name up, innermost level first
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        if let Some(sym) = self.symbols.get(name) {
            Some(sym)
        } else if let Some(parent) = &self.parent {
            parent.lookup(name)
        } else {
            None
        }
    }

    pub fn push_child(&mut self) {
        let old_scope = std::mem::take(self);
        self.loop_depth = old_scope.loop_depth;
        self.parent = Some(Box::new(old_scope));
    }

    pub fn pop_to_parent(&mut self) -> bool {
        if let Some(parent) = self.parent.take() {
            *self = *parent;
            true
        } else {
            false
        }
    }

    pub fn enter_loop(&mut self) {
        self.loop_depth += 1;
    }

    pub fn exit_loop(&mut self) {
        if self.loop_depth > 0 {
            self.loop_depth -= 1;
        }
    }

    pub fn in_loop(&self) -> bool {
        self.loop_depth > 0
    }
}
