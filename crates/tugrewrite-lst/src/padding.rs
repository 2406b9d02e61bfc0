// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Padding containers.
//!
//! Padding attaches the exact inter-token text around a child element:
//!
//! - [`RightPadded`]: element, then the space before the next token (e.g.
//!   the space before a comma or a colon).
//! - [`LeftPadded`]: the space before a token, then the element (e.g. the
//!   space before a binary operator).
//! - [`Container`]: the space before an open delimiter, then a sequence of
//!   right-padded elements.
//!
//! Every container carries its own [`Markers`], distinct from the markers of
//! the element it wraps. Containers are values; "editing" one produces a new
//! one, and an edit that changes nothing produces one that is
//! [`Identical`] to the input.

use std::collections::HashMap;
use std::sync::Arc;

use tugrewrite_core::{Markers, ShapeError, TreeId};

use crate::space::Space;

/// Reference-identity comparison.
///
/// Tree nodes are identical when they are the same allocation; plain values
/// such as [`Space`] are identical when they are equal.
pub trait Identical {
    fn identical(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identical for Arc<T> {
    fn identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: Identical> Identical for Option<T> {
    fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.identical(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Identical for Markers {
    fn identical(&self, other: &Self) -> bool {
        Markers::identical(self, other)
    }
}

macro_rules! identical_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identical for $ty {
                fn identical(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

identical_by_value!(bool, String, Space);

/// Elements that padded sequences can reconcile by id.
pub trait Keyed {
    fn key(&self) -> TreeId;
}

// ============================================================================
// RightPadded
// ============================================================================

/// An element followed by the space before the next token.
#[derive(Debug, Clone)]
pub struct RightPadded<T> {
    element: T,
    after: Space,
    markers: Markers,
}

impl<T> RightPadded<T> {
    pub fn new(element: T, after: Space, markers: Markers) -> Self {
        RightPadded {
            element,
            after,
            markers,
        }
    }

    /// Wrap `element` with empty padding.
    pub fn build(element: T) -> Self {
        RightPadded::new(element, Space::EMPTY, Markers::EMPTY)
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn after(&self) -> &Space {
        &self.after
    }

    /// Markers on the padding itself, not on the element.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn into_element(self) -> T {
        self.element
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RightPadded<U> {
        RightPadded {
            element: f(self.element),
            after: self.after,
            markers: self.markers,
        }
    }
}

impl<T: Clone> RightPadded<T> {
    pub fn with_element(&self, element: T) -> Self {
        RightPadded {
            element,
            after: self.after.clone(),
            markers: self.markers.clone(),
        }
    }

    pub fn with_after(&self, after: Space) -> Self {
        RightPadded {
            element: self.element.clone(),
            after,
            markers: self.markers.clone(),
        }
    }

    pub fn with_markers(&self, markers: Markers) -> Self {
        RightPadded {
            element: self.element.clone(),
            after: self.after.clone(),
            markers,
        }
    }

    /// Project the elements out of a padded sequence.
    pub fn elements(padded: &[RightPadded<T>]) -> Vec<T> {
        padded.iter().map(|p| p.element.clone()).collect()
    }
}

impl<T: Clone + Keyed + Identical> RightPadded<T> {
    /// Rebuild a padded sequence around a new list of elements.
    ///
    /// Elements already present in `before` (matched by id) keep their
    /// padding; new elements get empty padding. When `elements` is the same
    /// list of identical elements, the result is identical to `before`.
    pub fn with_elements(before: &[RightPadded<T>], elements: Vec<T>) -> Vec<RightPadded<T>> {
        if elements.len() == before.len()
            && before
                .iter()
                .zip(&elements)
                .all(|(p, e)| p.element.identical(e))
        {
            return before.to_vec();
        }

        let by_id: HashMap<TreeId, &RightPadded<T>> =
            before.iter().map(|p| (p.element.key(), p)).collect();
        elements
            .into_iter()
            .map(|element| match by_id.get(&element.key()) {
                Some(existing) => existing.with_element(element),
                None => RightPadded::build(element),
            })
            .collect()
    }
}

impl<T: Identical> Identical for RightPadded<T> {
    fn identical(&self, other: &Self) -> bool {
        self.element.identical(&other.element)
            && self.after == other.after
            && self.markers.identical(&other.markers)
    }
}

/// Elementwise identity of two padded sequences.
pub fn all_identical<T: Identical>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
}

// ============================================================================
// LeftPadded
// ============================================================================

/// The space before a token, then the element.
#[derive(Debug, Clone)]
pub struct LeftPadded<T> {
    before: Space,
    element: T,
    markers: Markers,
}

impl<T> LeftPadded<T> {
    pub fn new(before: Space, element: T, markers: Markers) -> Self {
        LeftPadded {
            before,
            element,
            markers,
        }
    }

    pub fn build(element: T) -> Self {
        LeftPadded::new(Space::EMPTY, element, Markers::EMPTY)
    }

    pub fn before(&self) -> &Space {
        &self.before
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    /// Markers on the padding itself, not on the element.
    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn into_element(self) -> T {
        self.element
    }
}

impl<T: Clone> LeftPadded<T> {
    pub fn with_element(&self, element: T) -> Self {
        LeftPadded {
            before: self.before.clone(),
            element,
            markers: self.markers.clone(),
        }
    }

    pub fn with_before(&self, before: Space) -> Self {
        LeftPadded {
            before,
            element: self.element.clone(),
            markers: self.markers.clone(),
        }
    }

    pub fn with_markers(&self, markers: Markers) -> Self {
        LeftPadded {
            before: self.before.clone(),
            element: self.element.clone(),
            markers,
        }
    }
}

impl<T: Identical> Identical for LeftPadded<T> {
    fn identical(&self, other: &Self) -> bool {
        self.element.identical(&other.element)
            && self.before == other.before
            && self.markers.identical(&other.markers)
    }
}

// ============================================================================
// Container
// ============================================================================

/// A delimited, separated sequence: the space before the open delimiter, then
/// right-padded elements. The last element's padding holds the space before
/// the close delimiter.
#[derive(Debug, Clone)]
pub struct Container<T> {
    before: Space,
    elements: Vec<RightPadded<T>>,
    markers: Markers,
}

impl<T> Container<T> {
    pub fn new(before: Space, elements: Vec<RightPadded<T>>, markers: Markers) -> Self {
        Container {
            before,
            elements,
            markers,
        }
    }

    pub fn empty() -> Self {
        Container::new(Space::EMPTY, Vec::new(), Markers::EMPTY)
    }

    pub fn before(&self) -> &Space {
        &self.before
    }

    /// The padded elements.
    pub fn padding(&self) -> &[RightPadded<T>] {
        &self.elements
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements without their padding.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter().map(RightPadded::element)
    }
}

impl<T: Clone> Container<T> {
    pub fn elements(&self) -> Vec<T> {
        RightPadded::elements(&self.elements)
    }

    pub fn with_before(&self, before: Space) -> Self {
        Container {
            before,
            elements: self.elements.clone(),
            markers: self.markers.clone(),
        }
    }

    pub fn with_markers(&self, markers: Markers) -> Self {
        Container {
            before: self.before.clone(),
            elements: self.elements.clone(),
            markers,
        }
    }

    pub fn with_padding(&self, elements: Vec<RightPadded<T>>) -> Self {
        Container {
            before: self.before.clone(),
            elements,
            markers: self.markers.clone(),
        }
    }

    /// Remove the element at `index`, keeping the padding of the others.
    ///
    /// The padding after the last element closes the container (the space
    /// before `]` and any trailing comma), so removing the last element hands
    /// that padding to the element before it.
    pub fn remove(&self, index: usize) -> Result<Self, ShapeError> {
        if index >= self.elements.len() {
            return Err(ShapeError::IndexOutOfBounds {
                index,
                len: self.elements.len(),
            });
        }
        let mut elements = self.elements.clone();
        let removed = elements.remove(index);
        if index == elements.len() {
            if let Some(last) = elements.last_mut() {
                *last = RightPadded::new(last.element.clone(), removed.after, removed.markers);
            }
        }
        Ok(self.with_padding(elements))
    }
}

impl<T: Clone + Keyed + Identical> Container<T> {
    /// Rebuild around a new element list, reusing padding by element id.
    pub fn with_elements(&self, elements: Vec<T>) -> Self {
        self.with_padding(RightPadded::with_elements(&self.elements, elements))
    }

    /// Insert `element` at `index` through [`RightPadded::with_elements`].
    ///
    /// A new element appended after the last one takes over the closing
    /// padding, mirroring [`Container::remove`].
    pub fn try_insert(&self, index: usize, element: T) -> Result<Self, ShapeError> {
        let len = self.elements.len();
        if index > len {
            return Err(ShapeError::IndexOutOfBounds { index, len });
        }
        let appended = index == len
            && len > 0
            && !self.elements.iter().any(|p| p.element.key() == element.key());
        let mut elements = self.elements();
        elements.insert(index, element);
        let mut padded = RightPadded::with_elements(&self.elements, elements);
        if appended {
            let closing = std::mem::replace(&mut padded[len - 1].after, Space::EMPTY);
            let markers = std::mem::replace(&mut padded[len - 1].markers, Markers::EMPTY);
            padded[len].after = closing;
            padded[len].markers = markers;
        }
        Ok(self.with_padding(padded))
    }
}

impl<T: Identical> Identical for Container<T> {
    fn identical(&self, other: &Self) -> bool {
        self.before == other.before
            && self.markers.identical(&other.markers)
            && all_identical(&self.elements, &other.elements)
    }
}
