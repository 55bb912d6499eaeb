use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::model::catalog::Topic;

/// Key naming the illustration a topic would like to show.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKey({})", self.0)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of looking up a topic's illustration.
///
/// `NotFound` covers both "topic declares no key" and "key is not registered";
/// the caller shows its generic fallback in either case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentLookup {
    Found(ComponentKey),
    NotFound,
}

impl ComponentLookup {
    #[must_use]
    pub fn found(&self) -> Option<&ComponentKey> {
        match self {
            ComponentLookup::Found(key) => Some(key),
            ComponentLookup::NotFound => None,
        }
    }
}

/// Keys the presentation layer knows how to illustrate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    keys: BTreeSet<ComponentKey>,
}

/// Illustrations available for the built-in course.
const BUILTIN_COMPONENTS: &[&str] = &[
    "variables-demo",
    "control-flow-demo",
    "stack-heap",
    "ownership-move",
    "borrow-checker",
    "lifetimes-timeline",
    "struct-layout",
    "enum-match",
    "trait-dispatch",
    "result-flow",
    "thread-spawn",
    "channel-pipeline",
    "mutex-lock",
    "async-executor",
];

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN_COMPONENTS
            .iter()
            .map(|key| ComponentKey::new(*key))
            .collect()
    }

    /// Registers a key. Returns `false` if it was already known.
    pub fn register(&mut self, key: ComponentKey) -> bool {
        self.keys.insert(key)
    }

    #[must_use]
    pub fn contains(&self, key: &ComponentKey) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, topic: &Topic) -> ComponentLookup {
        match topic.component_id() {
            Some(key) if self.contains(key) => ComponentLookup::Found(key.clone()),
            _ => ComponentLookup::NotFound,
        }
    }
}

impl FromIterator<ComponentKey> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = ComponentKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
