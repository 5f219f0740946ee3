//! Definite-return analysis

use crate::frontend::ast::{Block, Stmt, StmtKind};

/// A statement sequence definitely returns iff its last statement does
pub fn block_returns(block: &Block) -> bool {
    block.stmts.last().is_some_and(stmt_returns)
}

/// Loops never count: their condition may be false on entry
pub fn stmt_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::Block(block) => block_returns(block),
        StmtKind::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => stmt_returns(then_branch) && stmt_returns(else_branch),
        StmtKind::If { else_branch: None, .. }
        | StmtKind::While { .. }
        | StmtKind::For { .. }
        | StmtKind::Local { .. }
        | StmtKind::Expr(_)
        | StmtKind::Break => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_source;

    fn body_returns(body: &str) -> bool {
        let source = format!("class A {{ int f(boolean c) {{ {} }} }}", body);
        let program = parse_source(&source, 0).unwrap();
        let method = program.classes[0].methods().next().unwrap();
        block_returns(&method.body)
    }

    #[test]
    fn test_plain_return() {
        assert!(body_returns("return 1;"));
        assert!(!body_returns(""));
        assert!(!body_returns("return 1; int x;"));
    }

    #[test]
    fn test_if_needs_both_branches() {
        assert!(body_returns("if (c) return 1; else return 2;"));
        assert!(body_returns("if (c) { return 1; } else { if (c) return 2; else return 3; }"));
        assert!(!body_returns("if (c) return 1;"));
        assert!(!body_returns("if (c) return 1; else { }"));
    }

    #[test]
    fn test_loops_never_definitely_return() {
        assert!(!body_returns("while (true) return 1;"));
        assert!(!body_returns("for (;;) { return 1; }"));
        assert!(body_returns("while (c) { } return 0;"));
    }

    #[test]
    fn test_nested_block() {
        assert!(body_returns("{ { return 1; } }"));
    }
}
