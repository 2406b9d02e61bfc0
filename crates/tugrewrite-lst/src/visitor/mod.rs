// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for LST traversal and rewriting.
//!
//! A [`TreeVisitor`] has one `visit_*` method per node kind. Each returns the
//! node to put in place of the one visited. The defaults call the matching
//! `walk_*` function in [`dispatch`], which visits every child and rebuilds
//! the node only when a child came back as a different reference. A visitor
//! that edits nothing therefore returns its input, at every level.
//!
//! # Traversal Order
//!
//! For every node the driver ([`dispatch::visit`]):
//! 1. pushes a cursor frame for the node,
//! 2. calls [`TreeVisitor::pre_visit`],
//! 3. calls the kind-specific `visit_*` method on the pre-visit result,
//! 4. calls [`TreeVisitor::post_visit`],
//! 5. pops the frame.
//!
//! # Dialects
//!
//! A visitor declares the dialect it is written against. The driver checks
//! it once, at the root of the pass: a dialect visitor handed a tree of
//! another dialect returns the tree unchanged. Base visitors accept every
//! dialect.
//!
//! # Gating
//!
//! A traversal can carry a [`Gate`] computed by a precondition pass. Gated
//! traversals skip subtrees that hold no match and are not on the path to
//! one; the skipped subtrees come back as the same references.
//!
//! ```ignore
//! use tugrewrite_lst::visitor::{run, walk_map_entry, Traversal, TreeVisitor};
//!
//! struct ChangeValues;
//!
//! impl TreeVisitor<()> for ChangeValues {
//!     fn visit_map_entry(&mut self, node: &Arc<MapEntry>, tr: &mut Traversal<'_, ()>) -> J {
//!         let visited = walk_map_entry(self, node, tr);
//!         // edit `visited` ...
//!         visited
//!     }
//! }
//!
//! let rewritten = run(&mut ChangeValues, &tree, &mut ());
//! ```

pub mod dispatch;
mod gate;
mod traits;

use std::sync::Arc;

pub use dispatch::*;
pub use gate::{Gate, GateDecision};
pub use traits::TreeVisitor;

use crate::cursor::Cursor;
use crate::tree::J;

/// Per-pass traversal state: the cursor, an optional gate, and the caller's
/// parameter.
pub struct Traversal<'p, P> {
    cursor: Cursor,
    gate: Option<Arc<Gate>>,
    open_depth: usize,
    stop_after_pre_visit: bool,
    param: &'p mut P,
}

impl<'p, P> Traversal<'p, P> {
    pub fn new(param: &'p mut P) -> Self {
        Traversal {
            cursor: Cursor::root(),
            gate: None,
            open_depth: 0,
            stop_after_pre_visit: false,
            param,
        }
    }

    /// A traversal restricted by `gate`.
    pub fn gated(param: &'p mut P, gate: Arc<Gate>) -> Self {
        Traversal {
            gate: Some(gate),
            ..Traversal::new(param)
        }
    }

    /// Cursor for the node being visited.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn param(&self) -> &P {
        &*self.param
    }

    pub fn param_mut(&mut self) -> &mut P {
        &mut *self.param
    }

    pub fn gate(&self) -> Option<&Arc<Gate>> {
        self.gate.as_ref()
    }

    /// Skip the kind-specific visit and post-visit of the current node. Call
    /// from [`TreeVisitor::pre_visit`].
    pub fn stop_after_pre_visit(&mut self) {
        self.stop_after_pre_visit = true;
    }

    fn push(&mut self, tree: &J) {
        self.cursor = self.cursor.child(tree.clone());
    }

    fn pop(&mut self) {
        if let Some(parent) = self.cursor.parent() {
            self.cursor = parent.clone();
        }
    }

    fn gate_decision(&self, tree: &J) -> Option<GateDecision> {
        if self.open_depth > 0 {
            return None;
        }
        self.gate.as_ref().map(|gate| gate.decide(tree.id()))
    }
}

/// Visit `tree` from a fresh root cursor.
pub fn run<V, P>(visitor: &mut V, tree: &J, param: &mut P) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let mut tr = Traversal::new(param);
    dispatch::visit(visitor, tree, &mut tr)
}

/// Visit `tree` from a fresh root cursor, restricted by `gate`.
pub fn run_gated<V, P>(visitor: &mut V, tree: &J, param: &mut P, gate: Arc<Gate>) -> J
where
    V: TreeVisitor<P> + ?Sized,
{
    let mut tr = Traversal::gated(param, gate);
    dispatch::visit(visitor, tree, &mut tr)
}
