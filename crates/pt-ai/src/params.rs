//! Per-agent parameter store.
//!
//! # Design
//!
//! Values of any type live behind `Box<dyn Any + Send>` keyed by string.
//! Reads are typed: asking for the wrong type behaves like asking for an
//! absent key.  Clearing a key is how rule code expresses "set to null".
//!
//! Keys written by the core library itself start with [`CORE_PREFIX`];
//! application rule content should pick its own prefix.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Prefix reserved for keys written by the core library.
pub const CORE_PREFIX: &str = "core_";

/// Where [`ParameterStore::select_first`] stores its match.
pub const SELECTED_KEY: &str = "core_selected";

#[derive(Default)]
pub struct ParameterStore {
    map: HashMap<String, Box<dyn Any + Send>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value of any type.
    pub fn set<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.map.insert(key.into(), Box::new(value));
    }

    /// `Some` stores, `None` clears.
    pub fn set_opt<T: Any + Send>(&mut self, key: impl Into<String>, value: Option<T>) {
        let key = key.into();
        match value {
            Some(v) => self.set(key, v),
            None    => {
                self.map.remove(&key);
            }
        }
    }

    /// The value under `key` if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.map.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.map.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Remove and return the value under `key`.  A value of another type
    /// is left in place.
    pub fn take<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.map.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.map
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|b| *b)
    }

    /// Remove `key`.  Returns whether it was present.
    pub fn clear(&mut self, key: &str) -> bool {
        self.map.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Scan the `Vec<T>` stored under `list_key` and store a clone of the
    /// first element matching `predicate` under [`SELECTED_KEY`].
    ///
    /// Returns `false` if the list is absent, of another type, or has no
    /// match; the previous selection is then left untouched.
    pub fn select_first<T, P>(&mut self, list_key: &str, predicate: P) -> bool
    where
        T: Any + Send + Clone,
        P: Fn(&T) -> bool,
    {
        let found = self
            .get::<Vec<T>>(list_key)
            .and_then(|items| items.iter().find(|item| predicate(item)).cloned());
        match found {
            Some(item) => {
                self.set(SELECTED_KEY, item);
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ParameterStore").field("keys", &keys).finish()
    }
}
