//! Insertion-ordered map with optional case folding.
//!
//! [`NameMap`] backs both the section table of a [`Document`](crate::Document)
//! and the entry table of each [`Section`](crate::Section). It wraps an
//! [`IndexMap`] so iteration follows insertion order, which is what INI
//! rendering needs to stay deterministic.
//!
//! When the map is case-insensitive, lookups fold the name to lowercase; the
//! stored values keep whatever spelling they were created with.
//!
//! ## Examples
//!
//! ```rust
//! use inidoc::map::NameMap;
//!
//! let mut map = NameMap::new(false);
//! map.insert("Server", 1);
//! map.insert("client", 2);
//!
//! assert_eq!(map.get("SERVER"), Some(&1));
//! let values: Vec<_> = map.values().copied().collect();
//! assert_eq!(values, vec![1, 2]);
//! ```

use indexmap::IndexMap;
use std::borrow::Cow;

/// An ordered map keyed by names that may be compared case-insensitively.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMap<V> {
    inner: IndexMap<String, V>,
    case_sensitive: bool,
}

impl<V> NameMap<V> {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inidoc::map::NameMap;
    ///
    /// let map: NameMap<u32> = NameMap::new(true);
    /// assert!(map.is_empty());
    /// assert!(map.is_case_sensitive());
    /// ```
    #[must_use]
    pub fn new(case_sensitive: bool) -> Self {
        NameMap {
            inner: IndexMap::new(),
            case_sensitive,
        }
    }

    #[must_use]
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn fold<'k>(&self, name: &'k str) -> Cow<'k, str> {
        if self.case_sensitive {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_lowercase())
        }
    }

    /// Inserts a value, returning the previous one for this name.
    ///
    /// A replaced value keeps its position in iteration order.
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        let key = self.fold(name).into_owned();
        self.inner.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&V> {
        self.inner.get(self.fold(name).as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        let key = self.fold(name);
        self.inner.get_mut(key.as_ref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(self.fold(name).as_ref())
    }

    /// Removes a value, shifting later values up so order is preserved.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        let key = self.fold(name);
        self.inner.shift_remove(key.as_ref())
    }

    /// Returns the value for `name`, inserting `make()` at the end if absent.
    pub fn get_or_insert_with<F>(&mut self, name: &str, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let key = self.fold(name).into_owned();
        self.inner.entry(key).or_insert_with(make)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, V> {
        self.inner.values()
    }

    /// Returns a mutable iterator over the values, in insertion order.
    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, V> {
        self.inner.values_mut()
    }
}

impl<V> IntoIterator for NameMap<V> {
    type Item = V;
    type IntoIter = indexmap::map::IntoValues<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_values()
    }
}
