//! Communication templates keyed by purpose.

use std::collections::HashMap;

/// Token replaced by the substitution argument of `communicate`.
pub const SUBSTITUTION_TOKEN: &str = "[p1]";

/// Message templates registered at setup time.
///
/// Not every agent registers every key; rendering an unknown key yields
/// `None` and the caller stays silent.
#[derive(Clone, Debug, Default)]
pub struct CommunicationRegistry {
    templates: HashMap<String, String>,
}

impl CommunicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// The template for `key` with every [`SUBSTITUTION_TOKEN`] replaced.
    pub fn render(&self, key: &str, substitution: &str) -> Option<String> {
        self.template(key)
            .map(|t| t.replace(SUBSTITUTION_TOKEN, substitution))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
