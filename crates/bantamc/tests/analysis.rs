//! End-to-end semantic analysis of whole Bantam programs

use bantam_compiler::common::{DiagnosticKind, Diagnostics};
use bantam_compiler::frontend::ast::{ExprKind, Member, StmtKind, Type};
use bantam_compiler::frontend::parse_source;
use bantam_compiler::sema::{Analysis, Analyzer, AnalyzerConfig};
use pretty_assertions::assert_eq;

const BUILTIN_COUNT: usize = 4;

fn analyze(source: &str) -> (Analysis, Diagnostics) {
    let program = parse_source(source, 0).expect("test source should parse");
    let mut diagnostics = Diagnostics::new();
    let analysis = Analyzer::new(AnalyzerConfig::default()).analyze(program, &mut diagnostics);
    (analysis, diagnostics)
}

/// Wrap `body` in a program with a valid entry point and a small hierarchy
fn kinds_in_main(body: &str) -> Vec<DiagnosticKind> {
    let source = format!(
        "class Base {{ }}
         class Derived extends Base {{ }}
         class Main {{ void main() {{ {} }} }}",
        body
    );
    analyze(&source).1.kinds()
}

#[test]
fn acyclic_classes_all_join_the_tree() {
    let source = r#"
        class Shape { }
        class Circle extends Shape { }
        class Square extends Shape { }
        class Unit extends Square { }
        class Main { void main() { } }
    "#;
    let (analysis, diags) = analyze(source);

    assert!(diags.is_empty());
    let tree = &analysis.tree;
    assert_eq!(tree.len(), 5 + BUILTIN_COUNT);
    assert_eq!(tree.node(tree.root()).name(), "Object");

    let shape = tree.lookup("Shape").unwrap();
    let unit = tree.lookup("Unit").unwrap();
    assert!(tree.is_ancestor(shape, unit));
    assert_eq!(tree.ancestors(unit).count(), 4);
}

#[test]
fn mutual_parents_are_a_cycle_and_stay_out_of_the_tree() {
    let source = r#"
        class A extends B { }
        class B extends A { }
        class Main { void main() { } }
    "#;
    let (analysis, diags) = analyze(source);

    assert_eq!(diags.kinds(), vec![DiagnosticKind::InheritanceCycle, DiagnosticKind::InheritanceCycle]);
    assert!(analysis.tree.lookup("A").is_none());
    assert!(analysis.tree.lookup("B").is_none());
    assert!(analysis.checked);
}

#[test]
fn override_with_other_arity_or_return_keeps_inherited_signature() {
    let source = r#"
        class Base {
            int area(int scale) { return scale; }
            int size() { return 0; }
        }
        class Wide extends Base {
            int area() { return 1; }
            boolean size() { return true; }
        }
        class Main { void main() { } }
    "#;
    let (analysis, diags) = analyze(source);

    assert_eq!(diags.kinds(), vec![DiagnosticKind::OverrideMismatch, DiagnosticKind::OverrideMismatch]);
    let tree = &analysis.tree;
    let base = tree.lookup("Base").unwrap();
    let wide = tree.get("Wide").unwrap();
    assert_eq!(wide.members.method("area").unwrap().params, vec![Type::Int]);
    assert_eq!(wide.members.method("area").unwrap().owner, base);
    assert_eq!(wide.members.method("size").unwrap().return_type, Type::Int);
}

#[test]
fn identical_override_records_the_subclass_body() {
    let source = r#"
        class Base { int area(int scale) { return scale; } }
        class Wide extends Base { int area(int s) { return s * 2; } }
        class Main { void main() { } }
    "#;
    let (analysis, diags) = analyze(source);

    assert!(diags.is_empty());
    let tree = &analysis.tree;
    let wide = tree.lookup("Wide").unwrap();
    assert_eq!(tree.node(wide).members.method("area").unwrap().owner, wide);
}

#[test]
fn entry_point_gate() {
    let cases = [
        ("class Program { void main() { } }", false),
        ("class Main { }", false),
        ("class Main { void main(int x) { } }", false),
        ("class Main { int main() { return 0; } }", false),
        ("class Main { void main() { } }", true),
        ("class Base { int main() { return 0; } } class Main extends Base { void main() { } }", false),
        ("class Main { void main() { } } class Main { void main() { } }", false),
    ];

    for (source, passes) in cases {
        let (analysis, diags) = analyze(source);
        assert_eq!(analysis.checked, passes, "{}", source);
        assert_eq!(diags.has_fatal(), !passes, "{}", source);
    }
}

#[test]
fn assignability_of_locals() {
    assert_eq!(kinds_in_main("int x = true;"), vec![DiagnosticKind::TypeMismatch]);
    assert_eq!(kinds_in_main("Base b = new Derived();"), vec![]);
    assert_eq!(kinds_in_main("Derived d = new Base();"), vec![DiagnosticKind::TypeMismatch]);
    assert_eq!(kinds_in_main("Base b = null; Derived d = null; String s = null; int[] xs = null;"), vec![]);
}

#[test]
fn if_without_else_never_definitely_returns() {
    let without_else = r#"
        class Main {
            void main() { }
            int pick(boolean c) { if (c) { return 1; } }
        }
    "#;
    let (_, diags) = analyze(without_else);
    assert_eq!(diags.kinds(), vec![DiagnosticKind::MissingReturn]);
    assert_eq!(diags.iter().next().unwrap().line(), 4);

    let with_else = r#"
        class Main {
            void main() { }
            int pick(boolean c) { if (c) { return 1; } else { return 2; } }
        }
    "#;
    let (_, diags) = analyze(with_else);
    assert!(diags.is_empty());
}

#[test]
fn break_only_inside_loops() {
    assert_eq!(kinds_in_main("break;"), vec![DiagnosticKind::IllegalBreak]);
    assert_eq!(kinds_in_main("while (true) { break; }"), vec![]);
    assert_eq!(kinds_in_main("int i; for (i = 0; i < 3; i++) { if (i == 1) break; }"), vec![]);
}

#[test]
fn duplicate_locals_and_shadowing() {
    assert_eq!(kinds_in_main("int x = 1; int x = 2;"), vec![DiagnosticKind::DuplicateLocal]);
    assert_eq!(kinds_in_main("int x = 1; { int x = 2; }"), vec![]);
    assert_eq!(kinds_in_main("int x = 1; while (x < 3) { boolean x = false; break; }"), vec![]);
}

#[test]
fn every_expression_gets_a_type() {
    let source = r#"
        class Main {
            int total;
            void main() {
                int[] xs = new int[3];
                total = xs[0] + xs.length;
            }
        }
    "#;
    let (analysis, diags) = analyze(source);
    assert!(diags.is_empty());

    let main = &analysis.tree.get("Main").unwrap().decl;
    let Some(Member::Method(method)) = main.members.iter().find(|m| m.name() == "main") else {
        panic!("main should be a method");
    };
    let StmtKind::Expr(assign) = &method.body.stmts[1].kind else {
        panic!("expected assignment statement");
    };
    assert_eq!(assign.ty, Some(Type::Int));

    let ExprKind::Assign { value, .. } = &assign.kind else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { left, right, .. } = &value.kind else {
        panic!("expected sum");
    };
    assert_eq!(left.ty, Some(Type::Int));
    assert_eq!(right.ty, Some(Type::Int));
}

#[test]
fn diagnostics_sort_by_line_across_phases() {
    let source = "class Main {\n  void main() { break; }\n  int x;\n  int x;\n}\nclass Bad extends Nowhere { }\n";
    let (_, diags) = analyze(source);

    let lines: Vec<u32> = diags.sorted().iter().map(|d| d.line()).collect();
    assert_eq!(lines, vec![2, 4, 6]);
    assert_eq!(diags.kinds(), vec![
        DiagnosticKind::UndefinedParent,
        DiagnosticKind::DuplicateField,
        DiagnosticKind::IllegalBreak,
    ]);
}
