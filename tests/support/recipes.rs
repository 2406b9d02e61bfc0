//! Client recipes written against the public recipe API.

use std::sync::Arc;

use tugrewrite::search::{find_all, found, SearchResults};
use tugrewrite::tree::{FieldAccess, Identifier, Literal, LiteralValue, MapEntry};
use tugrewrite::types::JavaType;
use tugrewrite::visitor::{walk_identifier, walk_map_entry};
use tugrewrite::{
    ExecutionContext, Precondition, Recipe, RecipeVisitor, Traversal, TreeVisitor, J,
};

fn key_is(entry: &MapEntry, key: &str) -> bool {
    matches!(entry.key(), J::Identifier(id) if id.simple_name() == key)
}

/// Matches map entries whose key is the identifier `key`.
pub fn key_named(key: &str) -> Precondition {
    let key = key.to_string();
    Precondition::matching(format!("map-key({key})"), move |tree, _| {
        matches!(tree, J::MapEntry(entry) if key_is(entry, &key))
    })
}

// ============================================================================
// ChangeMapValue
// ============================================================================

/// Replaces the value of every `key: ...` map entry with an integer.
pub struct ChangeMapValue {
    key: String,
    value: i64,
    precondition: Precondition,
}

impl ChangeMapValue {
    pub fn new(key: &str, value: i64) -> Self {
        ChangeMapValue {
            key: key.to_string(),
            value,
            precondition: key_named(key),
        }
    }

    /// Share an existing precondition instead of building one.
    pub fn with_precondition(key: &str, value: i64, precondition: Precondition) -> Self {
        ChangeMapValue {
            key: key.to_string(),
            value,
            precondition,
        }
    }
}

impl Recipe for ChangeMapValue {
    fn name(&self) -> &str {
        "change-map-value"
    }

    fn description(&self) -> &str {
        "Replace the value of a map entry."
    }

    fn precondition(&self) -> Option<&Precondition> {
        Some(&self.precondition)
    }

    fn visitor(&self) -> RecipeVisitor {
        Box::new(ChangeMapValueVisitor {
            key: self.key.clone(),
            value: self.value,
        })
    }
}

struct ChangeMapValueVisitor {
    key: String,
    value: i64,
}

impl TreeVisitor<ExecutionContext> for ChangeMapValueVisitor {
    fn visit_map_entry(
        &mut self,
        node: &Arc<MapEntry>,
        tr: &mut Traversal<'_, ExecutionContext>,
    ) -> J {
        if !key_is(node, &self.key) {
            return walk_map_entry(self, node, tr);
        }
        if matches!(node.value(), J::Literal(l) if l.value() == &LiteralValue::Int(self.value)) {
            return J::MapEntry(Arc::clone(node));
        }
        let prefix = node.value().prefix().clone();
        let value = J::Literal(Literal::of(prefix, LiteralValue::Int(self.value)));
        J::MapEntry(node.with_value(value))
    }
}

// ============================================================================
// FindFields
// ============================================================================

fn is_field(field_type: Option<&JavaType>, owner: &str, field: &str) -> bool {
    match field_type.and_then(JavaType::as_field) {
        Some((Some(declaring), name)) => name == field && declaring.is_class(owner),
        _ => false,
    }
}

/// Marks uses of the field `field` declared by `owner`.
pub struct FindFields {
    owner: String,
    field: String,
    precondition: Precondition,
}

impl FindFields {
    pub fn new(owner: &str, field: &str) -> Self {
        FindFields {
            owner: owner.to_string(),
            field: field.to_string(),
            precondition: Precondition::uses_field(owner, field),
        }
    }
}

impl Recipe for FindFields {
    fn name(&self) -> &str {
        "find-fields"
    }

    fn description(&self) -> &str {
        "Find uses of a field."
    }

    fn precondition(&self) -> Option<&Precondition> {
        Some(&self.precondition)
    }

    fn visitor(&self) -> RecipeVisitor {
        Box::new(FieldMarker {
            owner: self.owner.clone(),
            field: self.field.clone(),
        })
    }
}

struct FieldMarker {
    owner: String,
    field: String,
}

impl<P> TreeVisitor<P> for FieldMarker {
    fn visit_field_access(&mut self, node: &Arc<FieldAccess>, tr: &mut Traversal<'_, P>) -> J {
        if is_field(node.name().field_type(), &self.owner, &self.field) {
            return found(&J::FieldAccess(Arc::clone(node)), None);
        }
        tugrewrite::visitor::walk_field_access(self, node, tr)
    }

    fn visit_identifier(&mut self, node: &Arc<Identifier>, tr: &mut Traversal<'_, P>) -> J {
        let visited = walk_identifier(self, node, tr);
        if is_field(node.field_type(), &self.owner, &self.field) {
            return found(&visited, None);
        }
        visited
    }
}

/// Every field access or identifier referring to `owner.field`.
pub fn find_fields(tree: &J, owner: &str, field: &str) -> SearchResults {
    find_all(
        tree,
        &mut FieldCollector {
            owner: owner.to_string(),
            field: field.to_string(),
        },
    )
}

struct FieldCollector {
    owner: String,
    field: String,
}

impl TreeVisitor<SearchResults> for FieldCollector {
    fn post_visit(&mut self, tree: J, tr: &mut Traversal<'_, SearchResults>) -> J {
        let field_type = match &tree {
            J::FieldAccess(access) => access.name().field_type(),
            J::Identifier(identifier) => identifier.field_type(),
            _ => None,
        };
        if is_field(field_type, &self.owner, &self.field) {
            tr.param_mut().insert(tree.clone());
        }
        tree
    }
}
