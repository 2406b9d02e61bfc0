//! Preconditions: cheap matcher passes that gate a recipe's visitor.
//!
//! A precondition runs a matcher visitor over a compilation unit and turns
//! the nodes it marks with [`SearchResult`] into a [`Gate`]. The recipe's
//! main visitor then only descends into matched subtrees and the paths
//! leading to them.
//!
//! Evaluation has two rules:
//! - the matcher sees a copy of the unit with every pre-existing search
//!   marker removed, so an earlier search cannot leak into gating;
//! - the resulting gate is memoized per unit node, and every recipe holding
//!   a clone of the same [`Precondition`] shares it.
//!
//! Preconditions combine with [`Precondition::all`] (a node must be matched
//! by every member, where a match on an ancestor counts) and
//! [`Precondition::any`].

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tugrewrite_core::{DerivedCache, SearchResult};
use tugrewrite_lst::search::{found, strip_search_results};
use tugrewrite_lst::visitor::{run, Gate, Traversal, TreeVisitor};
use tugrewrite_lst::{CompilationUnit, Cursor, Tree, J};

/// Boxed matcher visitor. Matchers only add search markers.
pub type Matcher = Box<dyn TreeVisitor<()> + Send>;

type MatcherFactory = dyn Fn() -> Matcher + Send + Sync;

/// A shareable, memoizing precondition.
///
/// Cloning is cheap and shares the memoized gate.
#[derive(Clone)]
pub struct Precondition {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    kind: Kind,
    gates: DerivedCache<CompilationUnit, Gate>,
}

enum Kind {
    Check(Box<MatcherFactory>),
    All(Vec<Precondition>),
    Any(Vec<Precondition>),
}

impl Precondition {
    fn from_kind(name: String, kind: Kind) -> Self {
        Precondition {
            inner: Arc::new(Inner {
                name,
                kind,
                gates: DerivedCache::new(),
            }),
        }
    }

    /// A precondition backed by a matcher visitor.
    ///
    /// `make_matcher` is called once per evaluation, so a matcher may keep
    /// per-pass state.
    pub fn check<F, V>(name: impl Into<String>, make_matcher: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: TreeVisitor<()> + Send + 'static,
    {
        let factory: Box<MatcherFactory> = Box::new(move || Box::new(make_matcher()) as Matcher);
        Precondition::from_kind(name.into(), Kind::Check(factory))
    }

    /// Matches every node for which `predicate` holds.
    pub fn matching<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&J, &Cursor) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        Precondition::check(name, move || PredicateMatcher {
            predicate: Arc::clone(&predicate),
        })
    }

    /// Matches units that reference the class `fully_qualified_name`.
    pub fn uses_type(fully_qualified_name: impl Into<String>) -> Self {
        let fqn: Arc<str> = fully_qualified_name.into().into();
        let name = format!("uses-type({fqn})");
        Precondition::check(name, move || {
            let fqn = Arc::clone(&fqn);
            UnitMatcher::new(move |unit: &Arc<CompilationUnit>| {
                unit.types_in_use().uses_type(&fqn)
            })
        })
    }

    /// Matches units that reference the field `field` declared by `owner`.
    pub fn uses_field(owner: impl Into<String>, field: impl Into<String>) -> Self {
        let owner: Arc<str> = owner.into().into();
        let field: Arc<str> = field.into().into();
        let name = format!("uses-field({owner}#{field})");
        Precondition::check(name, move || {
            let (owner, field) = (Arc::clone(&owner), Arc::clone(&field));
            UnitMatcher::new(move |unit: &Arc<CompilationUnit>| {
                unit.types_in_use().uses_field(&owner, &field)
            })
        })
    }

    /// Nodes matched by every member.
    pub fn all(members: impl IntoIterator<Item = Precondition>) -> Self {
        let members: Vec<_> = members.into_iter().collect();
        let name = format!("all({})", joined_names(&members));
        Precondition::from_kind(name, Kind::All(members))
    }

    /// Nodes matched by any member.
    pub fn any(members: impl IntoIterator<Item = Precondition>) -> Self {
        let members: Vec<_> = members.into_iter().collect();
        let name = format!("any({})", joined_names(&members));
        Precondition::from_kind(name, Kind::Any(members))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The gate of matches in `unit`, computed once per unit node.
    pub fn evaluate(&self, unit: &Arc<CompilationUnit>) -> Arc<Gate> {
        self.inner
            .gates
            .get_or_compute(unit, |_| self.compute(unit))
    }

    /// Returns true if the gate for `unit` is already memoized.
    pub fn is_evaluated_for(&self, unit: &Arc<CompilationUnit>) -> bool {
        self.inner.gates.is_cached_for(unit)
    }

    /// `unit` with the matches of this precondition marked.
    ///
    /// Unlike [`Precondition::evaluate`], pre-existing markers are kept.
    /// Only leaf checks mark; combinators mark what their members mark.
    pub fn mark(&self, unit: &Arc<CompilationUnit>) -> J {
        let tree = J::CompilationUnit(Arc::clone(unit));
        match &self.inner.kind {
            Kind::Check(factory) => run(&mut *factory(), &tree, &mut ()),
            Kind::All(_) | Kind::Any(_) => {
                let gate = self.evaluate(unit);
                run(&mut MarkGate { gate: &gate }, &tree, &mut ())
            }
        }
    }

    fn compute(&self, unit: &Arc<CompilationUnit>) -> Gate {
        let gate = match &self.inner.kind {
            Kind::Check(factory) => {
                let clean = strip_search_results(&J::CompilationUnit(Arc::clone(unit)));
                let marked = run(&mut *factory(), &clean, &mut ());
                Gate::from_marked(&marked)
            }
            Kind::All(members) => {
                let mut gates = Vec::with_capacity(members.len());
                for member in members {
                    let gate = member.evaluate(unit);
                    if gate.is_empty() {
                        return Gate::default();
                    }
                    gates.push(gate);
                }
                Gate::intersection(gates.iter().map(|g| &**g))
            }
            Kind::Any(members) => {
                let gates: Vec<_> = members.iter().map(|m| m.evaluate(unit)).collect();
                Gate::union(gates.iter().map(|g| &**g))
            }
        };
        debug!(
            precondition = %self.inner.name,
            path = %unit.source_path().display(),
            matches = gate.len(),
            "precondition evaluated"
        );
        gate
    }
}

impl fmt::Debug for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Precondition").field(&self.inner.name).finish()
    }
}

fn joined_names(members: &[Precondition]) -> String {
    members
        .iter()
        .map(Precondition::name)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Matchers
// ============================================================================

struct PredicateMatcher<F> {
    predicate: Arc<F>,
}

impl<F> TreeVisitor<()> for PredicateMatcher<F>
where
    F: Fn(&J, &Cursor) -> bool,
{
    fn post_visit(&mut self, tree: J, tr: &mut Traversal<'_, ()>) -> J {
        if (self.predicate)(&tree, tr.cursor()) {
            return found(&tree, None);
        }
        tree
    }
}

/// Marks the whole unit when `test` holds. Never descends.
struct UnitMatcher<F> {
    test: F,
}

impl<F> UnitMatcher<F>
where
    F: Fn(&Arc<CompilationUnit>) -> bool,
{
    fn new(test: F) -> Self {
        UnitMatcher { test }
    }
}

impl<F> TreeVisitor<()> for UnitMatcher<F>
where
    F: Fn(&Arc<CompilationUnit>) -> bool,
{
    fn visit_compilation_unit(
        &mut self,
        node: &Arc<CompilationUnit>,
        _tr: &mut Traversal<'_, ()>,
    ) -> J {
        if !(self.test)(node) {
            return J::CompilationUnit(Arc::clone(node));
        }
        J::CompilationUnit(node.with_markers(SearchResult::mark(node.markers(), None)))
    }
}

/// Marks every node a gate matched.
struct MarkGate<'g> {
    gate: &'g Gate,
}

impl TreeVisitor<()> for MarkGate<'_> {
    fn post_visit(&mut self, tree: J, _tr: &mut Traversal<'_, ()>) -> J {
        if self.gate.is_matched(tree.id()) {
            return found(&tree, None);
        }
        tree
    }
}
