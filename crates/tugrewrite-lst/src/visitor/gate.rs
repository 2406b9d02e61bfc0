// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node-level traversal gates.
//!
//! A [`Gate`] is the set of nodes a precondition pass marked as matches,
//! together with the ids of every ancestor on the path to each match. A gated
//! traversal visits a match and its whole subtree, descends through the
//! ancestors of matches, and skips everything else.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tugrewrite_core::{SearchResult, TreeId};

use crate::tree::J;

use super::{run, Traversal, TreeVisitor};

/// What a gated traversal does with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The node is a match: visit it and everything below it.
    Open,
    /// The node is an ancestor of a match: visit it and keep deciding below.
    Descend,
    /// Leave the subtree untouched.
    Skip,
}

/// Matched nodes with their ancestor paths.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    /// Match id to the ids of its ancestors, innermost first.
    matched: HashMap<TreeId, Vec<TreeId>>,
    on_path: HashSet<TreeId>,
}

impl Gate {
    /// The gate of every node in `tree` carrying a [`SearchResult`].
    pub fn from_marked(tree: &J) -> Gate {
        let mut matches = Vec::new();
        run(&mut MatchCollector, tree, &mut matches);
        Gate::from_matches(matches)
    }

    fn from_matches(matches: impl IntoIterator<Item = (TreeId, Vec<TreeId>)>) -> Gate {
        let mut gate = Gate::default();
        for (id, ancestors) in matches {
            gate.on_path.extend(ancestors.iter().copied());
            gate.matched.insert(id, ancestors);
        }
        gate
    }

    /// Matches present in every gate.
    ///
    /// A match counts as present in a gate when the gate matched the node
    /// itself or one of its ancestors. A gate that matched a whole file
    /// therefore narrows to the nodes matched by the others.
    pub fn intersection<'a>(gates: impl IntoIterator<Item = &'a Gate>) -> Gate {
        let gates: Vec<&Gate> = gates.into_iter().collect();
        let matches = gates
            .iter()
            .flat_map(|gate| gate.matched.iter())
            .filter(|(id, ancestors)| gates.iter().all(|gate| gate.covers(**id, ancestors)))
            .map(|(id, ancestors)| (*id, ancestors.clone()))
            .collect::<Vec<_>>();
        Gate::from_matches(matches)
    }

    /// Matches present in any gate.
    pub fn union<'a>(gates: impl IntoIterator<Item = &'a Gate>) -> Gate {
        let matches = gates
            .into_iter()
            .flat_map(|gate| gate.matched.iter())
            .map(|(id, ancestors)| (*id, ancestors.clone()))
            .collect::<Vec<_>>();
        Gate::from_matches(matches)
    }

    fn covers(&self, id: TreeId, ancestors: &[TreeId]) -> bool {
        self.matched.contains_key(&id) || ancestors.iter().any(|a| self.matched.contains_key(a))
    }

    pub fn decide(&self, id: TreeId) -> GateDecision {
        if self.matched.contains_key(&id) {
            GateDecision::Open
        } else if self.on_path.contains(&id) {
            GateDecision::Descend
        } else {
            GateDecision::Skip
        }
    }

    pub fn is_matched(&self, id: TreeId) -> bool {
        self.matched.contains_key(&id)
    }

    /// Number of matched nodes.
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn into_shared(self) -> Arc<Gate> {
        Arc::new(self)
    }
}

struct MatchCollector;

impl TreeVisitor<Vec<(TreeId, Vec<TreeId>)>> for MatchCollector {
    fn pre_visit(&mut self, tree: J, tr: &mut Traversal<'_, Vec<(TreeId, Vec<TreeId>)>>) -> J {
        if tree.markers().contains::<SearchResult>() {
            let ancestors = tr.cursor().path().skip(1).map(J::id).collect();
            tr.param_mut().push((tree.id(), ancestors));
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::{Identical, LeftPadded, RightPadded};
    use crate::space::Space;
    use crate::tree::{
        Binary, BinaryOperator, CompilationUnit, Dialect, ExpressionStatement, Literal,
        LiteralValue,
    };
    use crate::visitor::run_gated;
    use tugrewrite_core::{Markers, SourceMetadata};

    fn int(value: i64) -> J {
        J::Literal(Literal::of(Space::single_space(), LiteralValue::Int(value)))
    }

    fn mark(tree: &J) -> J {
        tree.with_markers(SearchResult::mark(tree.markers(), None))
    }

    struct Fixture {
        unit: J,
        first: J,
        left: J,
        second: J,
    }

    /// `1 + 2` and `3`, with the given nodes marked.
    fn fixture(mark_left: bool, mark_second: bool, mark_unit: bool) -> Fixture {
        let left = if mark_left { mark(&int(1)) } else { int(1) };
        let sum = J::Binary(Binary::build(
            Space::EMPTY,
            left.clone(),
            LeftPadded::new(Space::single_space(), BinaryOperator::Addition, Markers::EMPTY),
            int(2),
            None,
        ));
        let first = J::ExpressionStatement(ExpressionStatement::new(sum));
        let literal = if mark_second { mark(&int(3)) } else { int(3) };
        let second = J::ExpressionStatement(ExpressionStatement::new(literal));
        let unit = J::CompilationUnit(
            CompilationUnit::builder(Dialect::Groovy, SourceMetadata::new("t.groovy"))
                .statements(vec![
                    RightPadded::build(first.clone()),
                    RightPadded::build(second.clone()),
                ])
                .build()
                .unwrap(),
        );
        let unit = if mark_unit { mark(&unit) } else { unit };
        Fixture {
            unit,
            first,
            left,
            second,
        }
    }

    #[test]
    fn decisions_follow_match_paths() {
        let f = fixture(true, false, false);
        let gate = Gate::from_marked(&f.unit);

        assert_eq!(gate.len(), 1);
        assert_eq!(gate.decide(f.left.id()), GateDecision::Open);
        assert_eq!(gate.decide(f.first.id()), GateDecision::Descend);
        assert_eq!(gate.decide(f.unit.id()), GateDecision::Descend);
        assert_eq!(gate.decide(f.second.id()), GateDecision::Skip);
    }

    #[test]
    fn unmarked_tree_gives_empty_gate() {
        let f = fixture(false, false, false);
        let gate = Gate::from_marked(&f.unit);
        assert!(gate.is_empty());
        assert_eq!(gate.decide(f.unit.id()), GateDecision::Skip);
    }

    #[test]
    fn union_keeps_every_match() {
        let f = fixture(true, false, false);
        let g = fixture(false, true, false);
        let left = Gate::from_marked(&f.unit);
        let second = Gate::from_marked(&g.unit);
        let either = Gate::union([&left, &second]);
        assert!(either.is_matched(f.left.id()));
        assert!(either.is_matched(g.second.id()));
        assert_eq!(either.decide(f.unit.id()), GateDecision::Descend);
    }

    #[test]
    fn intersection_narrows_file_match_to_node_match() {
        let f = fixture(true, false, true);
        let both = Gate::from_marked(&f.unit);
        assert_eq!(both.len(), 2);

        // Split the marks into a file-level gate and a node-level gate.
        let file_only = Gate::from_matches([(f.unit.id(), Vec::new())]);
        let node_only = Gate::from_matches([(f.left.id(), both.matched[&f.left.id()].clone())]);

        let and = Gate::intersection([&file_only, &node_only]);
        assert_eq!(and.len(), 1);
        assert!(and.is_matched(f.left.id()));
        assert_eq!(and.decide(f.second.id()), GateDecision::Skip);
    }

    #[test]
    fn intersection_of_disjoint_matches_is_empty() {
        let f = fixture(true, true, false);
        let all = Gate::from_marked(&f.unit);
        let second_id = f.second.id();
        let literal_id = f.second.downcast::<ExpressionStatement>().unwrap().expression().id();
        let left = Gate::from_matches([(f.left.id(), all.matched[&f.left.id()].clone())]);
        let right = Gate::from_matches([(literal_id, all.matched[&literal_id].clone())]);

        assert!(Gate::intersection([&left, &right]).is_empty());
        // The wrapper shares the markers of its expression.
        assert_eq!(all.decide(second_id), GateDecision::Open);
    }

    struct BumpLiterals;
    impl TreeVisitor<usize> for BumpLiterals {
        fn visit_literal(&mut self, node: &Arc<Literal>, tr: &mut Traversal<'_, usize>) -> J {
            *tr.param_mut() += 1;
            let LiteralValue::Int(value) = node.value() else {
                return J::Literal(Arc::clone(node));
            };
            J::Literal(node.with_value(LiteralValue::Int(value + 10)))
        }
    }

    #[test]
    fn gated_run_skips_unmatched_subtrees() {
        let f = fixture(false, true, false);
        let gate = Gate::from_marked(&f.unit).into_shared();
        let mut visited = 0;
        let result = run_gated(&mut BumpLiterals, &f.unit, &mut visited, gate);

        assert_eq!(visited, 1);
        let unit = result.downcast::<CompilationUnit>().unwrap();
        let statements = unit.statements();
        assert!(statements[0].identical(&f.first));
        assert!(!statements[1].identical(&f.second));
    }

    #[test]
    fn open_match_visits_whole_subtree() {
        let f = fixture(false, false, true);
        let gate = Gate::from_marked(&f.unit).into_shared();
        let mut visited = 0;
        run_gated(&mut BumpLiterals, &f.unit, &mut visited, gate);
        assert_eq!(visited, 3);
    }
}
