//! Per-class member tables
//!
//! Each class's table starts as a copy of its parent's and is overlaid with
//! the class's own declarations. Tables are built in pre-order so a parent's
//! table is always complete before any child copies it.

use super::builtins::is_reserved;
use super::hierarchy::{ClassId, ClassTree};
use crate::common::{Diagnostics, SemanticError};
use crate::frontend::ast::{ClassDecl, MethodDecl, Type};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A field visible in a class, with the class that declared it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub ty: Type,
    pub owner: ClassId,
}

/// A method signature, with the class whose body implements it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSig {
    pub params: Vec<Type>,
    pub return_type: Type,
    pub owner: ClassId,
}

impl MethodSig {
    /// Same ordered formal types and same return type
    pub fn same_signature(&self, other: &MethodSig) -> bool {
        self.params == other.params && self.return_type == other.return_type
    }

    pub fn describe(&self, name: &str) -> String {
        format!("{} {}{}", self.return_type, name, self)
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "({})", params.join(", "))
    }
}

/// Fields and methods visible in one class, inherited entries included
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    fields: HashMap<String, FieldEntry>,
    methods: HashMap<String, MethodSig>,
    field_count: usize,
}

impl MemberTable {
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.get(name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodSig> {
        self.methods.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.fields.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodSig)> {
        self.methods.iter().map(|(name, sig)| (name.as_str(), sig))
    }

    /// Fields declared by this class and all its ancestors, shadowed ones included
    pub fn field_count(&self) -> usize {
        self.field_count
    }
}

/// Computes the [`MemberTable`] of every class in a [`ClassTree`]
pub struct SymbolTableBuilder<'d> {
    diagnostics: &'d mut Diagnostics,
    max_fields: usize,
}

impl<'d> SymbolTableBuilder<'d> {
    pub fn new(diagnostics: &'d mut Diagnostics, max_fields: usize) -> Self {
        Self {
            diagnostics,
            max_fields,
        }
    }

    pub fn build(&mut self, tree: &mut ClassTree) {
        for id in tree.preorder() {
            let table = self.build_class(tree, id);
            tree.node_mut(id).members = table;
        }
        log::debug!("member tables built for {} classes", tree.len());
    }

    fn build_class(&mut self, tree: &ClassTree, id: ClassId) -> MemberTable {
        let mut table = tree
            .parent(id)
            .map(|parent| tree.node(parent).members.clone())
            .unwrap_or_default();
        let decl = &tree.node(id).decl;

        self.add_fields(tree, id, decl, &mut table);
        self.add_methods(tree, id, decl, &mut table);

        if table.field_count > self.max_fields {
            self.diagnostics.error(
                SemanticError::TooManyFields {
                    class: decl.name.clone(),
                    count: table.field_count,
                    max: self.max_fields,
                },
                decl.file,
                decl.span,
            );
        }

        table
    }

    fn add_fields(&mut self, tree: &ClassTree, id: ClassId, decl: &ClassDecl, table: &mut MemberTable) {
        let mut declared = HashSet::new();

        for field in decl.fields() {
            if is_reserved(&field.name) {
                self.diagnostics.error(
                    SemanticError::ReservedName { name: field.name.clone() },
                    decl.file,
                    field.span,
                );
                continue;
            }

            if !declared.insert(field.name.as_str()) {
                self.diagnostics.error(
                    SemanticError::DuplicateField {
                        class: decl.name.clone(),
                        field: field.name.clone(),
                    },
                    decl.file,
                    field.span,
                );
                continue;
            }

            if let Some(name) = tree.unresolved_name(&field.ty) {
                self.diagnostics.error(
                    SemanticError::UndefinedType { name: name.to_string() },
                    decl.file,
                    field.span,
                );
                continue;
            }

            // Redeclaring an inherited field shadows it
            table.fields.insert(field.name.clone(), FieldEntry { ty: field.ty.clone(), owner: id });
            table.field_count += 1;
        }
    }

    fn add_methods(&mut self, tree: &ClassTree, id: ClassId, decl: &ClassDecl, table: &mut MemberTable) {
        let mut declared = HashSet::new();

        for method in decl.methods() {
            if is_reserved(&method.name) {
                self.diagnostics.error(
                    SemanticError::ReservedName { name: method.name.clone() },
                    decl.file,
                    method.span,
                );
                continue;
            }

            if !declared.insert(method.name.as_str()) {
                self.diagnostics.error(
                    SemanticError::DuplicateMethod {
                        class: decl.name.clone(),
                        method: method.name.clone(),
                    },
                    decl.file,
                    method.span,
                );
                continue;
            }

            if !self.signature_resolves(tree, decl, method) {
                continue;
            }

            let sig = MethodSig {
                params: method.param_types(),
                return_type: method.return_type.clone(),
                owner: id,
            };

            match table.methods.get(&method.name) {
                Some(inherited) if !inherited.same_signature(&sig) => {
                    self.diagnostics.error(
                        SemanticError::OverrideMismatch {
                            class: decl.name.clone(),
                            method: method.name.clone(),
                            expected: inherited.describe(&method.name),
                            found: sig.describe(&method.name),
                        },
                        decl.file,
                        method.span,
                    );
                }
                _ => {
                    table.methods.insert(method.name.clone(), sig);
                }
            }
        }
    }

    /// Report every unknown class named in a method's signature
    fn signature_resolves(&mut self, tree: &ClassTree, decl: &ClassDecl, method: &MethodDecl) -> bool {
        let mut ok = true;
        let types = method.params.iter().map(|p| &p.ty).chain(std::iter::once(&method.return_type));

        for ty in types {
            if let Some(name) = tree.unresolved_name(ty) {
                self.diagnostics.error(
                    SemanticError::UndefinedType { name: name.to_string() },
                    decl.file,
                    method.span,
                );
                ok = false;
            }
        }

        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticKind;
    use crate::frontend::parse_source;
    use crate::sema::hierarchy::ClassHierarchyBuilder;
    use pretty_assertions::assert_eq;

    fn tables(source: &str, max_fields: usize) -> (ClassTree, Diagnostics) {
        let program = parse_source(source, 0).unwrap();
        let mut diagnostics = Diagnostics::new();
        let mut tree = ClassHierarchyBuilder::new(&mut diagnostics).build(program.classes);
        SymbolTableBuilder::new(&mut diagnostics, max_fields).build(&mut tree);
        (tree, diagnostics)
    }

    fn members<'t>(tree: &'t ClassTree, class: &str) -> &'t MemberTable {
        &tree.get(class).unwrap().members
    }

    #[test]
    fn test_inherits_parent_members() {
        let (tree, diags) = tables(
            "class A { int x; int get() { return x; } } class B extends A { boolean y; }",
            1500,
        );
        assert!(diags.is_empty());

        let b = members(&tree, "B");
        assert_eq!(b.field("x").unwrap().ty, Type::Int);
        assert_eq!(b.field("y").unwrap().ty, Type::Boolean);
        assert_eq!(b.method("get").unwrap().owner, tree.lookup("A").unwrap());
        assert_eq!(b.field_count(), 2);
        // Object's methods reach every class
        assert!(b.method("toString").is_some());
    }

    #[test]
    fn test_identical_override_records_subclass_body() {
        let (tree, diags) = tables(
            "class A { int f(int a) { return a; } } class B extends A { int f(int b) { return 0; } }",
            1500,
        );

        assert!(diags.is_empty());
        assert_eq!(members(&tree, "B").method("f").unwrap().owner, tree.lookup("B").unwrap());
        assert_eq!(members(&tree, "A").method("f").unwrap().owner, tree.lookup("A").unwrap());
    }

    #[test]
    fn test_override_mismatch_keeps_inherited_signature() {
        let source = r#"
            class A { int f(int a) { return a; } int g() { return 1; } }
            class B extends A {
                int f(int a, int b) { return a; }
                boolean g() { return true; }
            }
        "#;
        let (tree, diags) = tables(source, 1500);

        assert_eq!(diags.kinds(), vec![DiagnosticKind::OverrideMismatch, DiagnosticKind::OverrideMismatch]);
        let a = tree.lookup("A").unwrap();
        let b = members(&tree, "B");
        assert_eq!(b.method("f").unwrap().params, vec![Type::Int]);
        assert_eq!(b.method("f").unwrap().owner, a);
        assert_eq!(b.method("g").unwrap().return_type, Type::Int);
        assert!(diags.iter().next().unwrap().message().contains("'int f(int)' with incompatible signature 'int f(int, int)'"));
    }

    #[test]
    fn test_covariant_return_is_mismatch() {
        let source = r#"
            class A { A make() { return this; } }
            class B extends A { B make() { return this; } }
        "#;
        let (_, diags) = tables(source, 1500);
        assert_eq!(diags.kinds(), vec![DiagnosticKind::OverrideMismatch]);
    }

    #[test]
    fn test_duplicate_members() {
        let source = r#"
            class A {
                int x;
                boolean x;
                void f() { }
                int f() { return 1; }
            }
        "#;
        let (tree, diags) = tables(source, 1500);

        assert_eq!(diags.kinds(), vec![DiagnosticKind::DuplicateField, DiagnosticKind::DuplicateMethod]);
        let a = members(&tree, "A");
        assert_eq!(a.field("x").unwrap().ty, Type::Int);
        assert_eq!(a.method("f").unwrap().return_type, Type::Void);
    }

    #[test]
    fn test_field_shadowing_is_allowed() {
        let (tree, diags) = tables("class A { int x; } class B extends A { boolean x; }", 1500);

        assert!(diags.is_empty());
        assert_eq!(members(&tree, "A").field("x").unwrap().ty, Type::Int);
        assert_eq!(members(&tree, "B").field("x").unwrap().ty, Type::Boolean);
        assert_eq!(members(&tree, "B").field_count(), 2);
    }

    #[test]
    fn test_unresolved_and_reserved_members() {
        let source = r#"
            class A {
                Missing m;
                int this;
                Gone[] f(Nope n) { return null; }
            }
        "#;
        let (tree, diags) = tables(source, 1500);

        assert_eq!(diags.kinds(), vec![
            DiagnosticKind::UndefinedType,
            DiagnosticKind::ReservedName,
            DiagnosticKind::UndefinedType,
            DiagnosticKind::UndefinedType,
        ]);
        let a = members(&tree, "A");
        assert!(a.field("m").is_none());
        assert!(a.method("f").is_none());
    }

    #[test]
    fn test_field_ceiling_counts_inherited() {
        let source = "class A { int a; int b; } class B extends A { int c; } class C extends A { }";
        let (_, diags) = tables(source, 2);

        assert_eq!(diags.kinds(), vec![DiagnosticKind::TooManyFields]);
        assert!(diags.iter().next().unwrap().message().contains("class 'B' has 3 fields"));
    }
}
