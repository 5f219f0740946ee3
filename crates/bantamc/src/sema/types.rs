//! Type relations over a resolved class hierarchy

use super::builtins::OBJECT;
use super::hierarchy::ClassTree;
use crate::frontend::ast::Type;

/// Whether `sub` names `sup` or one of its descendants
pub fn is_subclass(tree: &ClassTree, sub: &str, sup: &str) -> bool {
    match (tree.lookup(sub), tree.lookup(sup)) {
        (Some(sub), Some(sup)) => tree.is_ancestor(sup, sub),
        _ => false,
    }
}

/// Whether a value of type `source` may be stored where `target` is expected.
///
/// The error type is compatible with everything so one mistake is reported once.
pub fn is_assignable(tree: &ClassTree, target: &Type, source: &Type) -> bool {
    if target.is_error() || source.is_error() || target == source {
        return true;
    }

    match (target, source) {
        (Type::Class(_) | Type::Array(_), Type::Null) => true,
        (Type::Class(to), Type::Class(from)) => is_subclass(tree, from, to),
        (Type::Class(to), Type::Array(_)) => to == OBJECT,
        (Type::Array(to), Type::Array(from)) => {
            if to.is_primitive() || from.is_primitive() {
                to == from
            } else {
                is_assignable(tree, to, from)
            }
        }
        _ => false,
    }
}

/// Operands of `==` and `!=`
pub fn is_comparable(tree: &ClassTree, left: &Type, right: &Type) -> bool {
    if left.is_void() || right.is_void() {
        return false;
    }
    is_assignable(tree, left, right) || is_assignable(tree, right, left)
}

/// Casts and `instanceof` tests need reference types related in either direction
pub fn is_castable(tree: &ClassTree, target: &Type, source: &Type) -> bool {
    if target.is_error() || source.is_error() {
        return true;
    }
    if !target.is_reference() || !source.is_reference() {
        return false;
    }
    is_assignable(tree, target, source) || is_assignable(tree, source, target)
}
