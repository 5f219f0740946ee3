//! Bantam type representation

use std::fmt;

/// A Bantam type, as written in source and as resolved by semantic analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    /// Only valid as a method return type
    Void,
    /// Reference to a class by name
    Class(String),
    Array(Box<Type>),
    /// Type of the `null` literal
    Null,
    /// Recovery placeholder; compatible with everything
    Error,
}

impl Type {
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(name.into())
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Int | Type::Boolean)
    }

    /// Class, array and null types
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Class(_) | Type::Array(_) | Type::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Innermost non-array type
    pub fn base(&self) -> &Type {
        match self {
            Type::Array(element) => element.base(),
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::Void => write!(f, "void"),
            Type::Class(name) => write!(f, "{}", name),
            Type::Array(element) => write!(f, "{}[]", element),
            Type::Null => write!(f, "null"),
            Type::Error => write!(f, "<error>"),
        }
    }
}
