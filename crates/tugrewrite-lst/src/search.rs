// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Search helpers.
//!
//! Two flavors of search share this module:
//! - marking: a node is a match when it carries a [`SearchResult`] marker
//!   ([`found`], [`is_found`], [`marked`], [`strip_search_results`]);
//! - collecting: a visitor accumulates matches into a [`SearchResults`]
//!   passed as the traversal parameter, leaving the tree untouched
//!   ([`find_all`], [`find_matching`]).

use std::collections::HashSet;

use tugrewrite_core::{SearchResult, TreeId};

use crate::cursor::Cursor;
use crate::tree::J;
use crate::visitor::{run, Traversal, TreeVisitor};

/// Matches collected by a search, in traversal order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    found: Vec<J>,
    seen: HashSet<TreeId>,
}

impl SearchResults {
    pub fn new() -> Self {
        SearchResults::default()
    }

    /// Record a match. Returns false if a node with the same id was already
    /// recorded.
    pub fn insert(&mut self, tree: J) -> bool {
        if !self.seen.insert(tree.id()) {
            return false;
        }
        self.found.push(tree);
        true
    }

    pub fn contains(&self, id: TreeId) -> bool {
        self.seen.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &J> + '_ {
        self.found.iter()
    }

    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    pub fn into_vec(self) -> Vec<J> {
        self.found
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a J;
    type IntoIter = std::slice::Iter<'a, J>;

    fn into_iter(self) -> Self::IntoIter {
        self.found.iter()
    }
}

/// Run `visitor` over `tree` with a fresh result collection.
///
/// The visitor records matches through [`Traversal::param_mut`]; whatever
/// tree it returns is discarded.
pub fn find_all<V>(tree: &J, visitor: &mut V) -> SearchResults
where
    V: TreeVisitor<SearchResults> + ?Sized,
{
    let mut results = SearchResults::new();
    run(visitor, tree, &mut results);
    results
}

/// Every node for which `predicate` holds, given the node and its cursor.
pub fn find_matching<F>(tree: &J, predicate: F) -> SearchResults
where
    F: FnMut(&J, &Cursor) -> bool,
{
    find_all(tree, &mut PredicateSearch { predicate })
}

struct PredicateSearch<F> {
    predicate: F,
}

impl<F> TreeVisitor<SearchResults> for PredicateSearch<F>
where
    F: FnMut(&J, &Cursor) -> bool,
{
    fn pre_visit(&mut self, tree: J, tr: &mut Traversal<'_, SearchResults>) -> J {
        if (self.predicate)(&tree, tr.cursor()) {
            tr.param_mut().insert(tree.clone());
        }
        tree
    }
}

/// Mark `tree` as a search hit.
///
/// Marking an already-marked node returns it unchanged, so running the same
/// search twice never accumulates duplicate markers.
pub fn found(tree: &J, description: Option<&str>) -> J {
    tree.with_markers(SearchResult::mark(tree.markers(), description))
}

pub fn is_found(tree: &J) -> bool {
    tree.markers().contains::<SearchResult>()
}

/// Every node in `tree` carrying a [`SearchResult`].
///
/// Expression statements share their markers with the wrapped expression;
/// only the expression is reported.
pub fn marked(tree: &J) -> SearchResults {
    find_matching(tree, |node, _| {
        !matches!(node, J::ExpressionStatement(_)) && is_found(node)
    })
}

/// `tree` with every [`SearchResult`] marker removed. Unmarked subtrees come
/// back as the same references.
pub fn strip_search_results(tree: &J) -> J {
    run(&mut StripSearchResults, tree, &mut ())
}

struct StripSearchResults;

impl TreeVisitor<()> for StripSearchResults {
    fn post_visit(&mut self, tree: J, _tr: &mut Traversal<'_, ()>) -> J {
        if !is_found(&tree) {
            return tree;
        }
        tree.with_markers(tree.markers().remove_by_type::<SearchResult>())
    }
}
