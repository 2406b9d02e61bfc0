// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Static type attribution carried by typed trees.
//!
//! Types are attached by an (external) attribution pass; this crate only
//! stores and compares them.

use std::fmt;

/// Primitive and built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Boolean,
    Int,
    Long,
    Double,
    String,
    Null,
}

impl Primitive {
    pub fn keyword(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Double => "double",
            Primitive::String => "String",
            Primitive::Null => "null",
        }
    }
}

/// A static type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JavaType {
    Primitive(Primitive),
    /// A class, by fully qualified name.
    Class(String),
    /// A generic class with type arguments.
    Parameterized {
        base: String,
        arguments: Vec<JavaType>,
    },
    /// A field: its name, the type declaring it, and its own type.
    Variable {
        name: String,
        owner: Option<Box<JavaType>>,
        ty: Box<JavaType>,
    },
    Unknown,
}

impl JavaType {
    pub fn class(fully_qualified_name: impl Into<String>) -> Self {
        JavaType::Class(fully_qualified_name.into())
    }

    pub fn field(name: impl Into<String>, owner: JavaType, ty: JavaType) -> Self {
        JavaType::Variable {
            name: name.into(),
            owner: Some(Box::new(owner)),
            ty: Box::new(ty),
        }
    }

    /// Fully qualified name of a class or parameterized type.
    pub fn fully_qualified_name(&self) -> Option<&str> {
        match self {
            JavaType::Class(fqn) => Some(fqn),
            JavaType::Parameterized { base, .. } => Some(base),
            _ => None,
        }
    }

    /// Returns true if this is the class (or a parameterization of the class)
    /// named `fully_qualified_name`.
    pub fn is_class(&self, fully_qualified_name: &str) -> bool {
        self.fully_qualified_name() == Some(fully_qualified_name)
    }

    /// For field types, the declaring type and the field name.
    pub fn as_field(&self) -> Option<(Option<&JavaType>, &str)> {
        match self {
            JavaType::Variable { name, owner, .. } => Some((owner.as_deref(), name)),
            _ => None,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(p) => f.write_str(p.keyword()),
            JavaType::Class(fqn) => f.write_str(fqn),
            JavaType::Parameterized { base, arguments } => {
                write!(f, "{base}<")?;
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            JavaType::Variable { name, owner, ty } => match owner {
                Some(owner) => write!(f, "{owner}{{name={name},type={ty}}}"),
                None => write!(f, "{{name={name},type={ty}}}"),
            },
            JavaType::Unknown => f.write_str("<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parameterized() {
        let ty = JavaType::Parameterized {
            base: "java.util.List".to_string(),
            arguments: vec![JavaType::class("java.lang.String")],
        };
        assert_eq!(ty.to_string(), "java.util.List<java.lang.String>");
        assert!(ty.is_class("java.util.List"));
    }

    #[test]
    fn field_types_expose_owner_and_name() {
        let field = JavaType::field(
            "QUOTE_FIELD_NAMES",
            JavaType::class("com.fasterxml.jackson.core.json.JsonWriteFeature"),
            JavaType::Primitive(Primitive::Boolean),
        );
        let (owner, name) = field.as_field().unwrap();
        assert_eq!(name, "QUOTE_FIELD_NAMES");
        assert!(owner.unwrap().is_class("com.fasterxml.jackson.core.json.JsonWriteFeature"));
        assert!(field.fully_qualified_name().is_none());
    }
}
