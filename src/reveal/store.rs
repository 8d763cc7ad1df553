use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Stable identifier for one scrollable page region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionKey(String);

impl SectionKey {
    pub const HERO: &'static str = "hero";
    pub const MAIN: &'static str = "main";
    pub const SERVICES: &'static str = "services";
    pub const TECHNICAL: &'static str = "technical";
    pub const RESEARCH: &'static str = "research";
    pub const EDUCATION: &'static str = "education";
    pub const PROJECTS: &'static str = "projects";
    pub const CERTIFICATES: &'static str = "certificates";
    pub const CONTACT: &'static str = "contact";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SectionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for SectionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Per-section reveal flags.
///
/// Flags only ever move from `false` to `true`; there is no way to hide a
/// section again once it has been revealed.
#[derive(Debug, Clone, Default)]
pub struct RevealStore {
    flags: HashMap<SectionKey, bool>,
}

impl RevealStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with every key hidden.
    pub fn with_sections<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<SectionKey>,
    {
        Self {
            flags: keys.into_iter().map(|key| (key.into(), false)).collect(),
        }
    }

    /// Adds a hidden entry for `key` unless it is already tracked.
    pub fn track(&mut self, key: impl Into<SectionKey>) {
        self.flags.entry(key.into()).or_insert(false);
    }

    /// Marks `key` visible. Returns `true` only for the call that flipped it.
    pub fn mark_visible(&mut self, key: impl Into<SectionKey>) -> bool {
        let flag = self.flags.entry(key.into()).or_insert(false);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    /// Unknown keys read as hidden.
    pub fn is_visible(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn visible_sections(&self) -> Vec<&SectionKey> {
        let mut keys: Vec<&SectionKey> = self
            .flags
            .iter()
            .filter_map(|(key, visible)| visible.then_some(key))
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
