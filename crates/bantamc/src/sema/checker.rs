//! Type checking of field initializers and method bodies
//!
//! Every expression node is annotated with its resolved [`Type`]. A failed
//! check records a diagnostic and continues with [`Type::Error`], which is
//! compatible with everything, so one mistake produces one diagnostic.

use super::builtins::{is_reserved, STRING};
use super::hierarchy::{ClassId, ClassTree};
use super::members::{MemberTable, MethodSig};
use super::returns::block_returns;
use super::scope::{Scope, Symbol};
use super::types::{is_assignable, is_castable, is_comparable};
use crate::common::{Diagnostics, FileId, SemanticError, Span};
use crate::frontend::ast::*;

/// The method whose body is being checked
struct MethodContext {
    name: String,
    return_type: Type,
}

/// Checks the members of one class against a fully tabled [`ClassTree`]
pub struct TypeChecker<'a> {
    tree: &'a ClassTree,
    diagnostics: &'a mut Diagnostics,
    class: ClassId,
    file: FileId,
    scope: Scope,
    method: Option<MethodContext>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(tree: &'a ClassTree, diagnostics: &'a mut Diagnostics, class: ClassId) -> Self {
        Self {
            tree,
            diagnostics,
            class,
            file: tree.node(class).decl.file,
            scope: Scope::new(),
            method: None,
        }
    }

    /// Check every user class in declaration order, annotating the tree in place
    pub fn check_program(tree: &mut ClassTree, diagnostics: &mut Diagnostics) {
        let classes: Vec<ClassId> = tree.ids().filter(|id| !tree.node(*id).builtin).collect();

        for id in classes {
            // Detach the bodies so they can be annotated while the tree is shared
            let mut members = std::mem::take(&mut tree.node_mut(id).decl.members);
            TypeChecker::new(tree, diagnostics, id).check_class(&mut members);
            tree.node_mut(id).decl.members = members;
        }
    }

    pub fn check_class(&mut self, members: &mut [Member]) {
        let tree = self.tree;
        let node = tree.node(self.class);
        log::trace!("type checking class '{}'", node.name());

        self.scope = Scope::new();
        self.define(Symbol::new("this", Type::class(node.name())), node.decl.span);
        if let Some(parent) = node.parent() {
            let parent = tree.node(parent).name();
            self.define(Symbol::new("super", Type::class(parent)), node.decl.span);
        }

        for member in members {
            match member {
                Member::Field(field) => self.check_field(field),
                Member::Method(method) => self.check_method(method),
            }
        }
    }

    // ==================== Members ====================

    fn check_field(&mut self, field: &mut FieldDecl) {
        let Some(init) = &mut field.init else {
            return;
        };

        let declared = self.declared_type(&field.ty);
        let found = self.check_expr(init);
        if !is_assignable(self.tree, &declared, &found) {
            self.mismatch(&declared, &found, init.span);
        }
    }

    fn check_method(&mut self, method: &mut MethodDecl) {
        log::trace!("type checking method '{}'", method.name);
        let return_type = self.declared_type(&method.return_type);

        self.scope.push_child();
        for param in &method.params {
            if is_reserved(&param.name) {
                self.error(SemanticError::ReservedName { name: param.name.clone() }, param.span);
                continue;
            }
            let ty = self.declared_type(&param.ty);
            self.define(Symbol::new(param.name.clone(), ty), param.span);
        }

        self.method = Some(MethodContext {
            name: method.name.clone(),
            return_type: return_type.clone(),
        });
        self.check_block(&mut method.body);

        if !return_type.is_void() && !return_type.is_error() && !block_returns(&method.body) {
            self.error(SemanticError::MissingReturn { method: method.name.clone() }, method.end_span);
        }

        self.method = None;
        self.scope.pop_to_parent();
    }

    // ==================== Statements ====================

    fn check_block(&mut self, block: &mut Block) {
        self.scope.push_child();
        for stmt in &mut block.stmts {
            self.check_stmt(stmt);
        }
        self.scope.pop_to_parent();
    }

    /// A branch gets its own level even without braces
    fn check_nested(&mut self, stmt: &mut Stmt) {
        self.scope.push_child();
        self.check_stmt(stmt);
        self.scope.pop_to_parent();
    }

    fn check_loop_body(&mut self, body: &mut Stmt) {
        self.scope.push_child();
        self.scope.enter_loop();
        self.check_stmt(body);
        self.scope.exit_loop();
        self.scope.pop_to_parent();
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        let span = stmt.span;

        match &mut stmt.kind {
            StmtKind::Local { name, ty, init } => {
                let declared = self.resolve_type(ty, span);
                if let Some(init) = init {
                    let found = self.check_expr(init);
                    if !is_assignable(self.tree, &declared, &found) {
                        self.mismatch(&declared, &found, init.span);
                    }
                }

                if is_reserved(name) {
                    self.error(SemanticError::ReservedName { name: name.clone() }, span);
                } else {
                    self.define(Symbol::new(name.clone(), declared), span);
                }
            }

            StmtKind::Expr(expr) => self.check_statement_expr(expr),

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition);
                self.check_nested(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_nested(else_branch);
                }
            }

            StmtKind::While { condition, body } => {
                self.check_condition(condition);
                self.check_loop_body(body);
            }

            StmtKind::For {
                init,
                condition,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.check_statement_expr(init);
                }
                if let Some(condition) = condition {
                    self.check_condition(condition);
                }
                if let Some(update) = update {
                    self.check_statement_expr(update);
                }
                self.check_loop_body(body);
            }

            StmtKind::Break => {
                if !self.scope.in_loop() {
                    self.error(SemanticError::IllegalBreak, span);
                }
            }

            StmtKind::Return(value) => self.check_return(value.as_mut(), span),

            StmtKind::Block(block) => self.check_block(block),
        }
    }

    fn check_statement_expr(&mut self, expr: &mut Expr) {
        self.check_expr(expr);
        let valid = matches!(
            expr.kind,
            ExprKind::Assign { .. } | ExprKind::Call { .. } | ExprKind::New { .. } | ExprKind::IncDec { .. }
        );
        if !valid {
            self.error(SemanticError::InvalidExpressionStatement, expr.span);
        }
    }

    fn check_condition(&mut self, condition: &mut Expr) {
        let found = self.check_expr(condition);
        if !found.is_error() && found != Type::Boolean {
            self.mismatch(&Type::Boolean, &found, condition.span);
        }
    }

    fn check_return(&mut self, value: Option<&mut Expr>, span: Span) {
        let Some(context) = &self.method else {
            return;
        };
        let method = context.name.clone();
        let expected = context.return_type.clone();

        match value {
            None => {
                if !expected.is_void() && !expected.is_error() {
                    self.error(
                        SemanticError::MissingReturnValue {
                            method,
                            expected: expected.to_string(),
                        },
                        span,
                    );
                }
            }
            Some(value) => {
                let found = self.check_expr(value);
                if expected.is_void() {
                    self.error(SemanticError::UnexpectedReturnValue { method }, value.span);
                } else if !is_assignable(self.tree, &expected, &found) {
                    self.mismatch(&expected, &found, value.span);
                }
            }
        }
    }

    // ==================== Expressions ====================

    /// Infer the type of `expr` and record it on the node
    pub fn check_expr(&mut self, expr: &mut Expr) -> Type {
        let ty = self.infer(expr);
        expr.ty = Some(ty.clone());
        ty
    }

    fn infer(&mut self, expr: &mut Expr) -> Type {
        let span = expr.span;

        match &mut expr.kind {
            ExprKind::IntLiteral(_) => Type::Int,
            ExprKind::BoolLiteral(_) => Type::Boolean,
            ExprKind::StringLiteral(_) => Type::class(STRING),
            ExprKind::Null => Type::Null,
            ExprKind::This => self.self_reference("this"),
            ExprKind::Super => self.self_reference("super"),
            ExprKind::Name(name) => self.lookup_variable(name, span),

            ExprKind::Field { object, field } => {
                let object_ty = self.check_expr(object);
                self.field_type(&object_ty, field, span)
            }

            ExprKind::Index { array, index } => {
                let array_ty = self.check_expr(array);
                let index_ty = self.check_expr(index);
                if !index_ty.is_error() && index_ty != Type::Int {
                    self.mismatch(&Type::Int, &index_ty, index.span);
                }

                match array_ty {
                    Type::Array(element) => *element,
                    Type::Error => Type::Error,
                    other => {
                        self.error(SemanticError::NotAnArray { found: other.to_string() }, array.span);
                        Type::Error
                    }
                }
            }

            ExprKind::Call { receiver, method, args } => {
                let receiver_ty = match receiver {
                    Some(receiver) => self.check_expr(receiver),
                    None => self.self_reference("this"),
                };
                let arg_types: Vec<(Type, Span)> = args
                    .iter_mut()
                    .map(|arg| (self.check_expr(arg), arg.span))
                    .collect();

                match self.method_signature(&receiver_ty, method, span) {
                    Some(sig) => {
                        self.check_arguments(method, &sig, &arg_types, span);
                        sig.return_type
                    }
                    None => Type::Error,
                }
            }

            ExprKind::New { class } => {
                if self.tree.contains(class) {
                    Type::class(class.clone())
                } else {
                    self.error(SemanticError::UndefinedType { name: class.clone() }, span);
                    Type::Error
                }
            }

            ExprKind::NewArray { element, size } => {
                let size_ty = self.check_expr(size);
                if !size_ty.is_error() && size_ty != Type::Int {
                    self.mismatch(&Type::Int, &size_ty, size.span);
                }

                match self.resolve_type(element, span) {
                    Type::Error => Type::Error,
                    element => Type::array(element),
                }
            }

            ExprKind::Cast { ty, expr: inner } => {
                let source = self.check_expr(inner);
                let target = self.resolve_type(ty, span);
                self.check_castable(&target, &source, span);
                target
            }

            ExprKind::InstanceOf { expr: inner, ty } => {
                let source = self.check_expr(inner);
                let target = self.resolve_type(ty, span);
                self.check_castable(&target, &source, span);
                Type::Boolean
            }

            ExprKind::Unary { op, operand } => {
                let expected = match op {
                    UnaryOp::Neg => Type::Int,
                    UnaryOp::Not => Type::Boolean,
                };
                let found = self.check_expr(operand);
                if !found.is_error() && found != expected {
                    self.bad_operand(op.to_string(), &expected, &found, span);
                }
                expected
            }

            ExprKind::IncDec { op, target, .. } => {
                let found = self.check_expr(target);
                if let Some(reason) = invalid_target(target) {
                    self.error(SemanticError::InvalidAssignment { target: reason.to_string() }, target.span);
                } else if !found.is_error() && found != Type::Int {
                    self.bad_operand(op.to_string(), &Type::Int, &found, span);
                }
                Type::Int
            }

            ExprKind::Binary { op, left, right } => {
                let left_ty = self.check_expr(left);
                let right_ty = self.check_expr(right);
                self.check_binary(*op, &left_ty, &right_ty, span)
            }

            ExprKind::Assign { target, value } => {
                let mut target_ty = self.check_expr(target);
                if let Some(reason) = invalid_target(target) {
                    self.error(SemanticError::InvalidAssignment { target: reason.to_string() }, target.span);
                    target_ty = Type::Error;
                }

                let value_ty = self.check_expr(value);
                if !is_assignable(self.tree, &target_ty, &value_ty) {
                    self.mismatch(&target_ty, &value_ty, value.span);
                }
                target_ty
            }
        }
    }

    fn check_binary(&mut self, op: BinOp, left: &Type, right: &Type, span: Span) -> Type {
        if op.is_equality() {
            if !is_comparable(self.tree, left, right) {
                self.error(
                    SemanticError::IncomparableOperands {
                        op: op.to_string(),
                        left: left.to_string(),
                        right: right.to_string(),
                    },
                    span,
                );
            }
            return Type::Boolean;
        }

        let operand = if op.is_logical() { Type::Boolean } else { Type::Int };
        if let Some(bad) = [left, right].into_iter().find(|t| !t.is_error() && **t != operand) {
            self.bad_operand(op.to_string(), &operand, bad, span);
        }

        if op.is_arithmetic() { Type::Int } else { Type::Boolean }
    }

    fn check_arguments(&mut self, method: &str, sig: &MethodSig, args: &[(Type, Span)], span: Span) {
        if sig.params.len() != args.len() {
            self.error(
                SemanticError::ArgumentCount {
                    method: method.to_string(),
                    expected: sig.params.len(),
                    found: args.len(),
                },
                span,
            );
            return;
        }

        for (index, (formal, (actual, arg_span))) in sig.params.iter().zip(args).enumerate() {
            if !is_assignable(self.tree, formal, actual) {
                self.error(
                    SemanticError::ArgumentType {
                        method: method.to_string(),
                        index: index + 1,
                        expected: formal.to_string(),
                        found: actual.to_string(),
                    },
                    *arg_span,
                );
            }
        }
    }

    fn check_castable(&mut self, target: &Type, source: &Type, span: Span) {
        if !is_castable(self.tree, target, source) {
            self.error(
                SemanticError::IllegalCast {
                    from: source.to_string(),
                    to: target.to_string(),
                },
                span,
            );
        }
    }

    // ==================== Resolution ====================

    fn self_reference(&self, name: &str) -> Type {
        self.scope.lookup(name).map_or(Type::Error, |symbol| symbol.ty.clone())
    }

    /// Scopes innermost first, then the fields of the enclosing class
    fn lookup_variable(&mut self, name: &str, span: Span) -> Type {
        if let Some(symbol) = self.scope.lookup(name) {
            return symbol.ty.clone();
        }
        if let Some(field) = self.tree.node(self.class).members.field(name) {
            return field.ty.clone();
        }

        self.error(SemanticError::UndeclaredVariable { name: name.to_string() }, span);
        Type::Error
    }

    fn field_type(&mut self, object: &Type, field: &str, span: Span) -> Type {
        let found = match object {
            Type::Error => return Type::Error,
            Type::Array(_) if field == "length" => return Type::Int,
            Type::Class(name) => match self.tree.get(name) {
                Some(node) => node.members.field(field).map(|entry| entry.ty.clone()),
                None => return Type::Error,
            },
            _ => None,
        };

        found.unwrap_or_else(|| {
            self.error(
                SemanticError::UndefinedField {
                    ty: object.to_string(),
                    field: field.to_string(),
                },
                span,
            );
            Type::Error
        })
    }

    /// Arrays answer the methods of the root class
    fn method_signature(&mut self, receiver: &Type, method: &str, span: Span) -> Option<MethodSig> {
        let tree = self.tree;
        let table: Option<&MemberTable> = match receiver {
            Type::Error => return None,
            Type::Class(name) => Some(&tree.get(name)?.members),
            Type::Array(_) => Some(&tree.node(tree.root()).members),
            _ => None,
        };

        let sig = table.and_then(|table| table.method(method)).cloned();
        if sig.is_none() {
            self.error(
                SemanticError::UndefinedMethod {
                    ty: receiver.to_string(),
                    method: method.to_string(),
                },
                span,
            );
        }
        sig
    }

    /// A member's declared type; unknown classes were reported when the tables were built
    fn declared_type(&self, ty: &Type) -> Type {
        if self.tree.resolves(ty) { ty.clone() } else { Type::Error }
    }

    /// A type written in a method body, reported here when unknown
    fn resolve_type(&mut self, ty: &Type, span: Span) -> Type {
        match self.tree.unresolved_name(ty) {
            Some(name) => {
                self.error(SemanticError::UndefinedType { name: name.to_string() }, span);
                Type::Error
            }
            None => ty.clone(),
        }
    }

    // ==================== Helpers ====================

    fn define(&mut self, symbol: Symbol, span: Span) {
        if let Err(error) = self.scope.define(symbol) {
            self.error(error, span);
        }
    }

    fn error(&mut self, error: SemanticError, span: Span) {
        self.diagnostics.error(error, self.file, span);
    }

    fn mismatch(&mut self, expected: &Type, found: &Type, span: Span) {
        self.error(
            SemanticError::TypeMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            span,
        );
    }

    fn bad_operand(&mut self, op: String, expected: &Type, found: &Type, span: Span) {
        self.error(
            SemanticError::BadOperand {
                op,
                expected: expected.to_string(),
                found: found.to_string(),
            },
            span,
        );
    }
}

/// Why `expr` cannot appear on the left of an assignment, if it cannot
fn invalid_target(expr: &Expr) -> Option<&'static str> {
    match &expr.kind {
        ExprKind::Name(_) | ExprKind::Index { .. } => None,
        ExprKind::Field { object, field } => {
            let array_length = field == "length" && matches!(object.ty, Some(Type::Array(_)));
            array_length.then_some("array length")
        }
        ExprKind::This => Some("'this'"),
        ExprKind::Super => Some("'super'"),
        _ => Some("expression"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DiagnosticKind;
    use crate::frontend::parse_source;
    use crate::sema::hierarchy::ClassHierarchyBuilder;
    use crate::sema::members::SymbolTableBuilder;
    use pretty_assertions::assert_eq;

    fn check(source: &str) -> (ClassTree, Diagnostics) {
        let program = parse_source(source, 0).unwrap();
        let mut diagnostics = Diagnostics::new();
        let mut tree = ClassHierarchyBuilder::new(&mut diagnostics).build(program.classes);
        SymbolTableBuilder::new(&mut diagnostics, 1500).build(&mut tree);
        TypeChecker::check_program(&mut tree, &mut diagnostics);
        (tree, diagnostics)
    }

    /// Check `body` as the body of `void f()` in class `A`
    fn kinds_in(body: &str) -> Vec<DiagnosticKind> {
        let source = format!(
            "class Animal {{ int legs; Animal self() {{ return this; }} }}
             class Dog extends Animal {{ void bark(int times) {{ }} }}
             class A {{ int count; void f() {{ {} }} }}",
            body
        );
        check(&source).1.kinds()
    }

    #[test]
    fn test_clean_program_has_no_diagnostics() {
        let source = r#"
            class Counter {
                int value = 0;
                int next() { value = value + 1; return value; }
            }
            class Main {
                void main() {
                    Counter c = new Counter();
                    int[] xs = new int[10];
                    int i;
                    for (i = 0; i < xs.length; i++) {
                        xs[i] = c.next();
                        if (xs[i] > 5) break;
                    }
                    TextIO io = new TextIO();
                    io.putString("done").putInt(xs.length);
                    String s = c.toString();
                    boolean same = s.equals("x") && !(c == null);
                }
            }
        "#;
        let (_, diags) = check(source);
        assert!(diags.is_empty(), "{:?}", diags.kinds());
    }

    #[test]
    fn test_local_initialisers() {
        assert_eq!(kinds_in("int x = true;"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("Animal a = new Dog();"), vec![]);
        assert_eq!(kinds_in("Dog d = new Animal();"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("Dog d = null; Animal[] a = null;"), vec![]);
        assert_eq!(kinds_in("int x = null;"), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn test_expressions_are_annotated() {
        let (tree, _) = check("class A { int x = 1 + 2; boolean b = x < 3; }");
        let decl = &tree.get("A").unwrap().decl;
        let types: Vec<Option<Type>> = decl.fields().map(|f| f.init.as_ref().unwrap().ty.clone()).collect();
        assert_eq!(types, vec![Some(Type::Int), Some(Type::Boolean)]);
    }

    #[test]
    fn test_undeclared_variable_does_not_cascade() {
        assert_eq!(kinds_in("int x = y + 1; y.foo(); boolean b = !y;"), vec![
            DiagnosticKind::UndeclaredVariable,
            DiagnosticKind::UndeclaredVariable,
            DiagnosticKind::UndeclaredVariable,
        ]);
    }

    #[test]
    fn test_fields_resolve_through_inheritance() {
        assert_eq!(kinds_in("count = count + 1; Dog d = new Dog(); d.legs = 4;"), vec![]);
        assert_eq!(kinds_in("Dog d = new Dog(); d.tail = 1;"), vec![DiagnosticKind::UndefinedField]);
        assert_eq!(kinds_in("int n = 3; int m = n.size;"), vec![DiagnosticKind::UndefinedField]);
    }

    #[test]
    fn test_method_calls() {
        assert_eq!(kinds_in("Dog d = new Dog(); d.bark(2); Animal a = d.self();"), vec![]);
        assert_eq!(kinds_in("Dog d = new Dog(); d.howl();"), vec![DiagnosticKind::UndefinedMethod]);
        assert_eq!(kinds_in("Dog d = new Dog(); d.bark();"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("Dog d = new Dog(); d.bark(true);"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("Dog d = new Dog(); Dog e = d.self();"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("f();"), vec![]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(kinds_in("int x = 1 + true;"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("boolean b = 1 && true;"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("boolean b = 1 == true;"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("boolean b = new Dog() == new Animal();"), vec![]);
        assert_eq!(kinds_in("boolean b = new Dog() != new A();"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("int x = -true;"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("boolean b = true; b++;"), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn test_casts_and_instanceof() {
        assert_eq!(kinds_in("Animal a = new Dog(); Dog d = (Dog)(a); boolean b = a instanceof Dog;"), vec![]);
        assert_eq!(kinds_in("Dog d = (Dog)(new A());"), vec![DiagnosticKind::IllegalCast]);
        assert_eq!(kinds_in("boolean b = new A() instanceof Dog;"), vec![DiagnosticKind::IllegalCast]);
        assert_eq!(kinds_in("Dog d = (Ghost)(null);"), vec![DiagnosticKind::UndefinedType]);
    }

    #[test]
    fn test_arrays() {
        assert_eq!(kinds_in("Dog[] ds = new Dog[2]; Animal[] animals = ds; Object o = ds; int n = ds.length;"), vec![]);
        assert_eq!(kinds_in("int[] xs = new int[true];"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("int x = 4; int y = x[0];"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("int[] xs = new int[1]; xs.length = 3;"), vec![DiagnosticKind::InvalidAssignment]);
        assert_eq!(kinds_in("int[] xs = new int[1]; String s = xs.toString();"), vec![]);
    }

    #[test]
    fn test_instantiation() {
        assert_eq!(kinds_in("String s = new String(); Sys sys = new Sys();"), vec![]);
        assert_eq!(kinds_in("Object o = new Ghost();"), vec![DiagnosticKind::UndefinedType]);
    }

    #[test]
    fn test_conditions_must_be_boolean() {
        assert_eq!(kinds_in("if (1) { }"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("while (count) { }"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("for (; 1; ) { }"), vec![DiagnosticKind::TypeMismatch]);
        assert_eq!(kinds_in("for (;;) { }"), vec![]);
    }

    #[test]
    fn test_break_placement() {
        assert_eq!(kinds_in("break;"), vec![DiagnosticKind::IllegalBreak]);
        assert_eq!(kinds_in("if (true) break;"), vec![DiagnosticKind::IllegalBreak]);
        assert_eq!(kinds_in("while (true) { if (true) { break; } }"), vec![]);
        assert_eq!(kinds_in("for (;;) break; break;"), vec![DiagnosticKind::IllegalBreak]);
    }

    #[test]
    fn test_local_scoping() {
        assert_eq!(kinds_in("int x = 1; boolean x = true;"), vec![DiagnosticKind::DuplicateLocal]);
        assert_eq!(kinds_in("int x = 1; { boolean x = true; }"), vec![]);
        assert_eq!(kinds_in("{ int y = 1; } int z = y;"), vec![DiagnosticKind::UndeclaredVariable]);
        assert_eq!(kinds_in("int count = 2;"), vec![]);
        assert_eq!(kinds_in("int this = 1;"), vec![DiagnosticKind::ReservedName]);
    }

    #[test]
    fn test_formals() {
        let (_, diags) = check("class A { void f(int a, boolean a) { } void g(int super) { } }");
        assert_eq!(diags.kinds(), vec![DiagnosticKind::DuplicateLocal, DiagnosticKind::ReservedName]);
    }

    #[test]
    fn test_returns() {
        let (_, diags) = check(
            r#"
            class A {
                int missing(boolean c) { if (c) { return 1; } }
                int complete(boolean c) { if (c) { return 1; } else { return 2; } }
                int empty() { return; }
                void extra() { return 1; }
                int wrong() { return true; }
                Object upcast() { return new A(); }
            }
            "#,
        );
        assert_eq!(diags.kinds(), vec![
            DiagnosticKind::MissingReturn,
            DiagnosticKind::TypeMismatch,
            DiagnosticKind::TypeMismatch,
            DiagnosticKind::TypeMismatch,
        ]);
        assert_eq!(diags.iter().next().unwrap().line(), 3);
    }

    #[test]
    fn test_missing_return_reported_at_closing_brace() {
        let (_, diags) = check("class A {\n  int f() {\n    int x = 1;\n  }\n}\n");
        assert_eq!(diags.kinds(), vec![DiagnosticKind::MissingReturn]);
        assert_eq!(diags.iter().next().unwrap().line(), 4);
    }

    #[test]
    fn test_assignment_rules() {
        assert_eq!(kinds_in("this = null;"), vec![DiagnosticKind::InvalidAssignment]);
        assert_eq!(kinds_in("int x = 0; x = x = 3;"), vec![]);
        assert_eq!(kinds_in("Animal a = null; a = new Dog();"), vec![]);
        assert_eq!(kinds_in("Dog d = null; d = new Animal();"), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn test_expression_statements() {
        assert_eq!(kinds_in("1 + 2;"), vec![DiagnosticKind::InvalidExpressionStatement]);
        assert_eq!(kinds_in("count;"), vec![DiagnosticKind::InvalidExpressionStatement]);
        assert_eq!(kinds_in("new Dog(); count++; f();"), vec![]);
    }

    #[test]
    fn test_super_and_this() {
        let (_, diags) = check(
            r#"
            class Base { int v; int get() { return v; } }
            class Derived extends Base {
                int get() { return super.get() + this.v + super.v; }
                Base up() { return this; }
            }
            "#,
        );
        assert!(diags.is_empty(), "{:?}", diags.kinds());
    }

    #[test]
    fn test_field_initialiser_mismatch() {
        let (_, diags) = check("class A { int x = true; boolean y = x > 1; }");
        assert_eq!(diags.kinds(), vec![DiagnosticKind::TypeMismatch]);
    }

    #[test]
    fn test_string_builtins() {
        assert_eq!(kinds_in("String s = \"hi\"; int n = s.length() + s.length; s = s.concat(\"!\").substring(0, 1);"), vec![]);
        assert_eq!(kinds_in("String s = \"hi\"; s.substring(1);"), vec![DiagnosticKind::TypeMismatch]);
    }
}
