// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Traversal cursor.
//!
//! A [`Cursor`] is an immutable linked path from the root sentinel to the node
//! currently being visited. Every traversal step pushes a fresh frame, so
//! sibling subtrees never share a frame; only ancestors are shared.
//!
//! Each frame carries a message map for data scoped to one subtree traversal
//! (for example "loop depth", or a flag set by a child for its parent to read
//! in post-visit). The map is interior-mutable so a visitor can write to an
//! ancestor frame; the path itself never changes.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::tree::{Tree, J};

type Messages = HashMap<String, Arc<dyn Any + Send + Sync>>;

struct Frame {
    parent: Option<Cursor>,
    value: Option<J>,
    messages: Mutex<Messages>,
    scope: OnceLock<Option<Cursor>>,
}

/// Immutable root-to-node path with per-frame messages.
#[derive(Clone)]
pub struct Cursor(Arc<Frame>);

impl Cursor {
    /// The root sentinel. It holds no tree.
    pub fn root() -> Self {
        Cursor::frame(None, None)
    }

    fn frame(parent: Option<Cursor>, value: Option<J>) -> Self {
        Cursor(Arc::new(Frame {
            parent,
            value,
            messages: Mutex::new(HashMap::new()),
            scope: OnceLock::new(),
        }))
    }

    /// A new frame for `tree` below this one.
    pub fn child(&self, tree: J) -> Cursor {
        Cursor::frame(Some(self.clone()), Some(tree))
    }

    pub fn parent(&self) -> Option<&Cursor> {
        self.0.parent.as_ref()
    }

    /// The nearest ancestor frame that holds a tree.
    pub fn parent_tree_cursor(&self) -> Option<&Cursor> {
        let mut current = self.parent();
        while let Some(cursor) = current {
            if cursor.value().is_some() {
                return Some(cursor);
            }
            current = cursor.parent();
        }
        None
    }

    /// The tree at this frame; `None` for the root sentinel.
    pub fn value(&self) -> Option<&J> {
        self.0.value.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    /// Number of frames above this one.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// This frame and its ancestors, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Cursor> + '_ {
        std::iter::successors(Some(self), |c| c.parent())
    }

    /// Trees on the path, innermost first.
    pub fn path(&self) -> impl Iterator<Item = &J> + '_ {
        self.ancestors().filter_map(Cursor::value)
    }

    /// Nearest tree on the path (this frame included) matching `predicate`.
    pub fn first_enclosing(&self, predicate: impl Fn(&J) -> bool) -> Option<&J> {
        self.path().find(|tree| predicate(tree))
    }

    /// Nearest node of type `T` on the path (this frame included).
    pub fn first_enclosing_of<T: Tree>(&self) -> Option<&Arc<T>> {
        self.path().find_map(T::cast)
    }

    /// The frame holding the nearest tree matching `predicate`.
    pub fn first_enclosing_cursor(&self, predicate: impl Fn(&J) -> bool) -> Option<&Cursor> {
        self.ancestors()
            .find(|c| c.value().is_some_and(|tree| predicate(tree)))
    }

    /// The frame of the nearest enclosing block, class, or compilation unit.
    ///
    /// The lookup runs once per frame.
    pub fn enclosing_scope(&self) -> Option<&Cursor> {
        self.0
            .scope
            .get_or_init(|| {
                self.first_enclosing_cursor(|tree| {
                    matches!(
                        tree,
                        J::Block(_) | J::ClassDeclaration(_) | J::CompilationUnit(_)
                    )
                })
                .cloned()
            })
            .as_ref()
    }

    /// Dotted path of the enclosing class and variable declarations,
    /// outermost first (e.g. `Outer.Inner.field`).
    pub fn qualified_path(&self) -> String {
        let mut names: Vec<&str> = self
            .path()
            .filter_map(|tree| match tree {
                J::ClassDeclaration(c) => Some(c.simple_name()),
                J::VariableDeclaration(v) => Some(v.simple_name()),
                _ => None,
            })
            .collect();
        names.reverse();
        names.join(".")
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    fn messages(&self) -> MutexGuard<'_, Messages> {
        self.0.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key` on this frame.
    pub fn put_message<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.messages().insert(key.into(), Arc::new(value));
    }

    /// The message stored under `key` on this frame, if it has type `T`.
    pub fn get_message<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let value = self.messages().get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// The message under `key` on the nearest frame (this one included) that
    /// has it.
    pub fn get_nearest_message<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.ancestors().find_map(|c| c.get_message::<T>(key))
    }

    /// Remove and return the message under `key` on this frame.
    pub fn poll_message<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let mut messages = self.messages();
        match messages.get(key).cloned()?.downcast::<T>() {
            Ok(value) => {
                messages.remove(key);
                Some(value)
            }
            Err(_) => None,
        }
    }

    /// The message under `key` on this frame, storing `compute()` first when
    /// absent (or of another type).
    pub fn compute_message_if_absent<T, F>(&self, key: &str, compute: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let mut messages = self.messages();
        if let Some(existing) = messages.get(key).cloned() {
            if let Ok(value) = existing.downcast::<T>() {
                return value;
            }
        }
        let value = Arc::new(compute());
        messages.insert(key.to_string(), value.clone());
        value
    }

    /// Store a message on the nearest frame whose tree matches `predicate`.
    /// Returns false when no frame matches.
    pub fn put_message_on_first_enclosing<T: Any + Send + Sync>(
        &self,
        predicate: impl Fn(&J) -> bool,
        key: impl Into<String>,
        value: T,
    ) -> bool {
        match self.first_enclosing_cursor(predicate) {
            Some(cursor) => {
                cursor.put_message(key, value);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.path().map(|tree| tree.kind().name()).collect();
        f.debug_struct("Cursor").field("path", &kinds).finish()
    }
}
