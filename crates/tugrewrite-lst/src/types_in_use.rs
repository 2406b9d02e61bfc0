// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The types-in-use derived view of a compilation unit.
//!
//! Reached through [`CompilationUnit::types_in_use`], which caches the view
//! per unit node. Preconditions use it to decide cheaply whether a file can
//! hold a match at all.

use std::collections::BTreeSet;

use crate::tree::{CompilationUnit, J};
use crate::types::JavaType;
use crate::visitor::{run, Traversal, TreeVisitor};

/// Every distinct type and field referenced in one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypesInUse {
    types: BTreeSet<JavaType>,
    variables: BTreeSet<JavaType>,
}

impl TypesInUse {
    /// Walk `unit` and gather the types attributed to its nodes.
    pub fn collect(unit: &CompilationUnit) -> TypesInUse {
        let mut found = TypesInUse::default();
        for statement in unit.statements() {
            run(&mut TypeCollector, &statement, &mut found);
        }
        found
    }

    /// Types attributed to expressions and declarations.
    pub fn types(&self) -> &BTreeSet<JavaType> {
        &self.types
    }

    /// Field types referenced by identifiers.
    pub fn variables(&self) -> &BTreeSet<JavaType> {
        &self.variables
    }

    /// Returns true if the class (or a parameterization of it) is used.
    pub fn uses_type(&self, fully_qualified_name: &str) -> bool {
        self.types.iter().any(|t| t.is_class(fully_qualified_name))
    }

    /// Returns true if the field `name` declared by `owner` is referenced.
    pub fn uses_field(&self, owner: &str, name: &str) -> bool {
        self.variables.iter().any(|v| match v.as_field() {
            Some((Some(declaring), field)) => field == name && declaring.is_class(owner),
            _ => false,
        })
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.variables.is_empty()
    }
}

struct TypeCollector;

impl TreeVisitor<TypesInUse> for TypeCollector {
    fn pre_visit(&mut self, tree: J, tr: &mut Traversal<'_, TypesInUse>) -> J {
        let found = tr.param_mut();
        if let Some(ty) = tree.java_type().filter(|t| **t != JavaType::Unknown) {
            found.types.insert(ty.clone());
        }
        if let J::Identifier(identifier) = &tree {
            if let Some(field) = identifier.field_type() {
                found.variables.insert(field.clone());
            }
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::padding::{LeftPadded, RightPadded};
    use crate::space::Space;
    use crate::tree::{Dialect, ExpressionStatement, FieldAccess, Identifier, TypedTree};
    use tugrewrite_core::SourceMetadata;

    const FEATURE: &str = "com.fasterxml.jackson.core.json.JsonWriteFeature";

    fn feature_access() -> J {
        let field = JavaType::field(
            "QUOTE_FIELD_NAMES",
            JavaType::class(FEATURE),
            JavaType::class(FEATURE),
        );
        let target = Identifier::build(Space::EMPTY, "JsonWriteFeature")
            .with_java_type(Some(JavaType::class(FEATURE)));
        let name = Identifier::build(Space::EMPTY, "QUOTE_FIELD_NAMES").with_field_type(Some(field));
        J::FieldAccess(FieldAccess::build(
            Space::EMPTY,
            J::Identifier(target),
            LeftPadded::build(name),
        ))
    }

    fn unit(statements: Vec<J>) -> Arc<CompilationUnit> {
        CompilationUnit::builder(Dialect::Groovy, SourceMetadata::new("t.groovy"))
            .statements(statements.into_iter().map(RightPadded::build).collect())
            .build()
            .unwrap()
    }

    #[test]
    fn collects_types_and_fields() {
        let cu = unit(vec![J::ExpressionStatement(ExpressionStatement::new(
            feature_access(),
        ))]);
        let types = TypesInUse::collect(&cu);
        assert!(types.uses_type(FEATURE));
        assert!(types.uses_field(FEATURE, "QUOTE_FIELD_NAMES"));
        assert!(!types.uses_field(FEATURE, "ESCAPE_NON_ASCII"));
        assert!(!types.uses_type("java.lang.String"));
    }

    #[test]
    fn empty_unit_uses_nothing() {
        assert!(TypesInUse::collect(&unit(Vec::new())).is_empty());
    }

    #[test]
    fn view_is_cached_per_unit_node() {
        let cu = unit(vec![J::ExpressionStatement(ExpressionStatement::new(
            feature_access(),
        ))]);
        assert!(!cu.has_cached_types_in_use());
        let first = cu.types_in_use();
        assert!(cu.has_cached_types_in_use());
        assert!(Arc::ptr_eq(&first, &cu.types_in_use()));

        let edited = cu.with_statements(Vec::new());
        assert!(!edited.has_cached_types_in_use());
        assert!(edited.types_in_use().is_empty());
        assert!(Arc::ptr_eq(&first, &cu.types_in_use()));
    }
}
