//! Entry point validation

use super::hierarchy::ClassTree;
use crate::common::{Diagnostics, FileId, SemanticError, Span, BUILTIN_FILE};
use crate::frontend::ast::MethodDecl;

/// Checks that the program declares its entry method. Every violation is fatal.
pub struct EntryPointValidator<'a> {
    class: &'a str,
    method: &'a str,
}

impl<'a> EntryPointValidator<'a> {
    pub fn new(class: &'a str, method: &'a str) -> Self {
        Self { class, method }
    }

    /// Returns true when the entry point is well formed
    pub fn validate(&self, tree: &ClassTree, diagnostics: &mut Diagnostics) -> bool {
        let Some(node) = tree.get(self.class) else {
            diagnostics.fatal(
                SemanticError::MissingEntryClass { class: self.class.to_string() },
                BUILTIN_FILE,
                Span::default(),
            );
            return false;
        };
        let decl = &node.decl;
        let mut problems: Vec<(SemanticError, FileId, Span)> = tree
            .redeclarations(self.class)
            .iter()
            .map(|&(file, span)| (SemanticError::DuplicateEntryClass { class: self.class.to_string() }, file, span))
            .collect();

        // Only the class's own declaration counts, not an inherited one
        let candidates: Vec<&MethodDecl> = decl.methods().filter(|m| m.name == self.method).collect();

        match candidates.as_slice() {
            [] => {
                let error = if node.members.method(self.method).is_some() {
                    self.malformed("is inherited and must be declared in the class itself")
                } else {
                    SemanticError::MissingEntryMethod {
                        class: self.class.to_string(),
                        method: self.method.to_string(),
                    }
                };
                problems.push((error, decl.file, decl.span));
            }
            [method] => {
                if !method.params.is_empty() {
                    problems.push((self.malformed("must not take any parameters"), decl.file, method.span));
                }
                if !method.return_type.is_void() {
                    problems.push((self.malformed("must return void"), decl.file, method.span));
                }
                // A rejected override leaves the parent's signature in the table
                let own = tree.lookup(self.class);
                if node.members.method(self.method).is_some_and(|sig| Some(sig.owner) != own) {
                    let reason = "conflicts with an inherited signature and must not override it";
                    problems.push((self.malformed(reason), decl.file, method.span));
                }
            }
            [_, rest @ ..] => {
                for method in rest {
                    problems.push((self.malformed("is declared more than once"), decl.file, method.span));
                }
            }
        }

        let valid = problems.is_empty();
        for (error, file, span) in problems {
            diagnostics.fatal(error, file, span);
        }
        log::debug!("entry point {}.{} valid: {}", self.class, self.method, valid);
        valid
    }

    fn malformed(&self, reason: &str) -> SemanticError {
        SemanticError::MalformedEntryMethod {
            class: self.class.to_string(),
            method: self.method.to_string(),
            reason: reason.to_string(),
        }
    }
}
