#![forbid(unsafe_code)]

//! Coin items and shared, identity-tracked collections.
//!
//! A [`Collection`] is the unit the windowing layer recomputes against. It
//! is immutable once built; any change to the visible set of coins produces
//! a *new* collection. Consumers compare collections by identity
//! ([`Collection::same_identity`]) to decide whether a recompute is due, and
//! by content (`PartialEq`) only in tests and diagnostics.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// A single named coin row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    /// Display name; also the stable identity key.
    pub name: String,
    /// Whether the user starred this coin.
    pub is_favorite: bool,
}

impl Item {
    /// Create a non-favorite item.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_favorite: false,
        }
    }

    /// Mark the item as favorite (builder style).
    #[must_use]
    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    /// Identity key, stable across re-filtering.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.name
    }
}

/// Immutable ordered sequence of [`Item`]s with reference identity.
///
/// Cloning a `Collection` creates a new handle to the **same** allocation,
/// so clones keep the same identity.
#[derive(Clone)]
pub struct Collection {
    items: Rc<[Item]>,
}

impl Collection {
    /// The empty collection.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Rc::from(Vec::new()),
        }
    }

    /// True when both handles point at the same allocation.
    ///
    /// Two separately built collections with equal contents are *not* the
    /// same identity.
    #[inline]
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }

    /// Borrow the items as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Collection {
    type Target = [Item];

    fn deref(&self) -> &[Item] {
        &self.items
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.items[..] == other.items[..]
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("len", &self.items.len())
            .field("items", &&self.items[..])
            .finish()
    }
}

impl From<Vec<Item>> for Collection {
    fn from(items: Vec<Item>) -> Self {
        Self {
            items: Rc::from(items),
        }
    }
}

impl FromIterator<Item> for Collection {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}
