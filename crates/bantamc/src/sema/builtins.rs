//! Built-in classes available to every Bantam program

use crate::common::{Span, BUILTIN_FILE};
use crate::frontend::ast::{Block, ClassDecl, FieldDecl, Member, MethodDecl, Param, Type};

/// The root of every class hierarchy
pub const OBJECT: &str = "Object";
pub const STRING: &str = "String";
pub const SYS: &str = "Sys";
pub const TEXT_IO: &str = "TextIO";

/// Names that may not be declared as fields, formals or locals
pub const RESERVED_NAMES: &[&str] = &["this", "super", "null"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// A built-in class declaration and whether user classes may extend it
#[derive(Debug, Clone)]
pub struct BuiltinClass {
    pub decl: ClassDecl,
    pub extendable: bool,
}

/// The built-in classes, root first
pub fn builtin_classes() -> Vec<BuiltinClass> {
    let object = Type::class(OBJECT);
    let string = Type::class(STRING);

    vec![
        BuiltinClass {
            decl: class(OBJECT, None, vec![
                method("clone", &[], object.clone()),
                method("equals", &[("o", object.clone())], Type::Boolean),
                method("toString", &[], string.clone()),
            ]),
            extendable: true,
        },
        BuiltinClass {
            decl: class(STRING, Some(OBJECT), vec![
                field("length", Type::Int),
                method("length", &[], Type::Int),
                method("equals", &[("o", object.clone())], Type::Boolean),
                method("toString", &[], string.clone()),
                method("substring", &[("begin", Type::Int), ("end", Type::Int)], string.clone()),
                method("concat", &[("s", string.clone())], string.clone()),
            ]),
            extendable: false,
        },
        BuiltinClass {
            decl: class(SYS, Some(OBJECT), vec![
                method("exit", &[("status", Type::Int)], Type::Void),
                method("time", &[], Type::Int),
                method("random", &[], Type::Int),
            ]),
            extendable: false,
        },
        BuiltinClass {
            decl: class(TEXT_IO, Some(OBJECT), vec![
                field("readFD", Type::Int),
                field("writeFD", Type::Int),
                method("readStdin", &[], Type::Void),
                method("readFile", &[("name", string.clone())], Type::Void),
                method("writeStdout", &[], Type::Void),
                method("writeStderr", &[], Type::Void),
                method("writeFile", &[("name", string.clone())], Type::Void),
                method("getString", &[], string.clone()),
                method("getInt", &[], Type::Int),
                method("putString", &[("s", string)], Type::class(TEXT_IO)),
                method("putInt", &[("i", Type::Int)], Type::class(TEXT_IO)),
            ]),
            extendable: false,
        },
    ]
}

fn class(name: &str, parent: Option<&str>, members: Vec<Member>) -> ClassDecl {
    ClassDecl::new(
        name.to_string(),
        parent.map(str::to_string),
        members,
        BUILTIN_FILE,
        Span::default(),
    )
}

fn field(name: &str, ty: Type) -> Member {
    Member::Field(FieldDecl::new(name.to_string(), ty, None, Span::default()))
}

fn method(name: &str, params: &[(&str, Type)], return_type: Type) -> Member {
    let params = params
        .iter()
        .map(|(name, ty)| Param::new((*name).to_string(), ty.clone(), Span::default()))
        .collect();
    Member::Method(MethodDecl::new(
        name.to_string(),
        params,
        return_type,
        Block::empty(Span::default()),
        Span::default(),
        Span::default(),
    ))
}
