//! Side-channel markers.
//!
//! A [`Markers`] set is an ordered collection of typed, opaque values that can
//! be attached to any tree node (or to a padding container) without touching
//! the node's semantic fields. Search hits, provenance, and diagnostics are all
//! expressed as markers: "is this node a match" is answered by the presence of
//! a [`SearchResult`], never by a flag on the node.
//!
//! Marker sets are values. Every edit returns a new set; an edit that changes
//! nothing returns a set [`identical`](Markers::identical) to the input so tree
//! nodes can keep their reference-identity short-circuit.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::id::TreeId;

/// A typed annotation that can be attached to a tree.
pub trait Marker: Any + Send + Sync + fmt::Debug {
    /// The marker's own id.
    fn id(&self) -> TreeId;

    /// Upcast for typed lookups.
    fn as_any(&self) -> &dyn Any;
}

/// An ordered set of markers with its own id.
#[derive(Debug, Clone)]
pub struct Markers {
    id: TreeId,
    entries: Vec<Arc<dyn Marker>>,
}

impl Default for Markers {
    fn default() -> Self {
        Markers::EMPTY
    }
}

impl Markers {
    /// The empty marker set.
    pub const EMPTY: Markers = Markers {
        id: TreeId::nil(),
        entries: Vec::new(),
    };

    /// Create a marker set with a fresh id.
    pub fn build(entries: impl IntoIterator<Item = Arc<dyn Marker>>) -> Self {
        Markers {
            id: TreeId::random(),
            entries: entries.into_iter().collect(),
        }
    }

    /// The set's id.
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// All markers in insertion order.
    pub fn entries(&self) -> &[Arc<dyn Marker>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true when both sets have the same id and hold the same marker
    /// instances in the same order.
    pub fn identical(&self, other: &Markers) -> bool {
        self.id == other.id
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    pub fn with_id(&self, id: TreeId) -> Markers {
        Markers {
            id,
            entries: self.entries.clone(),
        }
    }

    /// First marker of type `M`.
    pub fn find_first<M: Marker>(&self) -> Option<&M> {
        self.entries
            .iter()
            .find_map(|m| m.as_any().downcast_ref::<M>())
    }

    /// All markers of type `M`, in insertion order.
    pub fn find_all<M: Marker>(&self) -> impl Iterator<Item = &M> + '_ {
        self.entries
            .iter()
            .filter_map(|m| m.as_any().downcast_ref::<M>())
    }

    /// Returns true if a marker of type `M` is present.
    pub fn contains<M: Marker>(&self) -> bool {
        self.find_first::<M>().is_some()
    }

    /// Append a marker.
    pub fn add<M: Marker>(&self, marker: M) -> Markers {
        self.push(Arc::new(marker))
    }

    /// Append a marker unless one with the same id is already present.
    pub fn add_if_absent<M: Marker>(&self, marker: M) -> Markers {
        if self.entries.iter().any(|m| m.id() == marker.id()) {
            return self.clone();
        }
        self.add(marker)
    }

    /// Merge `marker` into the first existing marker of the same type.
    ///
    /// When no marker of type `M` exists, `marker` is appended. Otherwise
    /// `remap(existing, marker)` decides the replacement; returning `None`
    /// keeps the existing marker and the result is identical to `self`.
    pub fn compute_by_type<M, F>(&self, marker: M, remap: F) -> Markers
    where
        M: Marker,
        F: FnOnce(&M, M) -> Option<M>,
    {
        let found = self
            .entries
            .iter()
            .enumerate()
            .find_map(|(i, m)| m.as_any().downcast_ref::<M>().map(|existing| (i, existing)));
        let Some((index, existing)) = found else {
            return self.add(marker);
        };
        match remap(existing, marker) {
            None => self.clone(),
            Some(replacement) => {
                let mut entries = self.entries.clone();
                entries[index] = Arc::new(replacement);
                Markers {
                    id: self.id,
                    entries,
                }
            }
        }
    }

    /// Replace every marker of type `M` with `marker`, keeping the position of
    /// the first one. Appends when none exist.
    pub fn set_by_type<M: Marker>(&self, marker: M) -> Markers {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        let mut pending: Option<Arc<dyn Marker>> = Some(Arc::new(marker));
        for existing in &self.entries {
            if existing.as_any().downcast_ref::<M>().is_some() {
                if let Some(replacement) = pending.take() {
                    entries.push(replacement);
                }
            } else {
                entries.push(Arc::clone(existing));
            }
        }
        if let Some(replacement) = pending {
            entries.push(replacement);
        }
        Markers {
            id: self.id,
            entries,
        }
    }

    /// Remove every marker of type `M`.
    pub fn remove_by_type<M: Marker>(&self) -> Markers {
        if !self.contains::<M>() {
            return self.clone();
        }
        self.retain(|m| m.as_any().downcast_ref::<M>().is_none())
    }

    /// Remove the marker with the given id.
    pub fn remove_by_id(&self, id: TreeId) -> Markers {
        if !self.entries.iter().any(|m| m.id() == id) {
            return self.clone();
        }
        self.retain(|m| m.id() != id)
    }

    fn push(&self, marker: Arc<dyn Marker>) -> Markers {
        let mut entries = self.entries.clone();
        entries.push(marker);
        // The empty set is shared; a populated set needs an id of its own.
        let id = if self.id.is_nil() {
            TreeId::random()
        } else {
            self.id
        };
        Markers { id, entries }
    }

    fn retain(&self, keep: impl Fn(&Arc<dyn Marker>) -> bool) -> Markers {
        Markers {
            id: self.id,
            entries: self.entries.iter().filter(|m| keep(m)).cloned().collect(),
        }
    }
}

// ============================================================================
// Built-in markers
// ============================================================================

/// Sentinel marking a node as a search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    id: TreeId,
    description: Option<String>,
}

impl SearchResult {
    pub fn new(description: Option<String>) -> Self {
        SearchResult {
            id: TreeId::random(),
            description,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Mark `markers` as a search hit.
    ///
    /// Marking an already-marked set returns it unchanged, so repeated finds
    /// never accumulate duplicate results.
    pub fn mark(markers: &Markers, description: Option<&str>) -> Markers {
        markers.compute_by_type(
            SearchResult::new(description.map(str::to_string)),
            |_, _| None,
        )
    }
}

impl Marker for SearchResult {
    fn id(&self) -> TreeId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Severity of a [`Markup`] diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkupLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for MarkupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkupLevel::Debug => "debug",
            MarkupLevel::Info => "info",
            MarkupLevel::Warning => "warning",
            MarkupLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// A diagnostic attached to a node by a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    id: TreeId,
    level: MarkupLevel,
    message: String,
    detail: Option<String>,
}

impl Markup {
    pub fn new(level: MarkupLevel, message: impl Into<String>, detail: Option<String>) -> Self {
        Markup {
            id: TreeId::random(),
            level,
            message: message.into(),
            detail,
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Markup::new(MarkupLevel::Debug, message, None)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Markup::new(MarkupLevel::Info, message, None)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Markup::new(MarkupLevel::Warning, message, None)
    }

    pub fn error(message: impl Into<String>, detail: Option<String>) -> Self {
        Markup::new(MarkupLevel::Error, message, detail)
    }

    pub fn level(&self) -> MarkupLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl Marker for Markup {
    fn id(&self) -> TreeId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provenance: the recipes that changed a source file, in the order they ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipesThatMadeChanges {
    id: TreeId,
    recipes: Vec<String>,
}

impl RecipesThatMadeChanges {
    pub fn new(recipes: Vec<String>) -> Self {
        RecipesThatMadeChanges {
            id: TreeId::random(),
            recipes,
        }
    }

    pub fn recipes(&self) -> &[String] {
        &self.recipes
    }

    /// Record `recipe` on `markers`, appending to an existing provenance marker.
    pub fn record(markers: &Markers, recipe: &str) -> Markers {
        markers.compute_by_type(
            RecipesThatMadeChanges::new(vec![recipe.to_string()]),
            |existing, _| {
                if existing.recipes.iter().any(|r| r == recipe) {
                    return None;
                }
                let mut recipes = existing.recipes.clone();
                recipes.push(recipe.to_string());
                Some(RecipesThatMadeChanges {
                    id: existing.id,
                    recipes,
                })
            },
        )
    }
}

impl Marker for RecipesThatMadeChanges {
    fn id(&self) -> TreeId {
        self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
