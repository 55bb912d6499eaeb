//! The learning path laid out as one ordered list.
//!
//! A topic's index in this list plus one is the step number shown to the
//! learner. The list is derived from the catalog on demand and never stored.

use crate::model::catalog::{Catalog, Phase, Topic};
use crate::model::ids::{TopicAddress, TopicId};

/// A topic together with the phase that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatTopic<'a> {
    phase: &'a Phase,
    topic: &'a Topic,
}

impl<'a> FlatTopic<'a> {
    #[must_use]
    pub fn phase(&self) -> &'a Phase {
        self.phase
    }

    #[must_use]
    pub fn topic(&self) -> &'a Topic {
        self.topic
    }

    #[must_use]
    pub fn address(&self) -> TopicAddress {
        TopicAddress::new(self.phase.id().clone(), self.topic.id().clone())
    }

    #[must_use]
    pub fn matches(&self, address: &TopicAddress) -> bool {
        self.phase.id() == address.phase() && self.topic.id() == address.topic()
    }
}

/// Result of locating an address in the flattened sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 0-based index of the first matching topic.
    Found(usize),
    NotFound,
}

impl Resolution {
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Resolution::Found(index) => Some(index),
            Resolution::NotFound => None,
        }
    }
}

/// Every topic of the catalog in phase order, then topic order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlatSequence<'a> {
    entries: Vec<FlatTopic<'a>>,
}

/// Concatenate each phase's topics in catalog order.
#[must_use]
pub fn flatten(catalog: &Catalog) -> FlatSequence<'_> {
    let entries = catalog
        .phases()
        .iter()
        .flat_map(|phase| phase.topics().iter().map(move |topic| FlatTopic { phase, topic }))
        .collect();
    FlatSequence { entries }
}

impl<'a> FlatSequence<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<FlatTopic<'a>> {
        self.entries.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = FlatTopic<'a>> + '_ {
        self.entries.iter().copied()
    }

    /// Locate a topic by its `(phase, topic)` address.
    #[must_use]
    pub fn resolve(&self, address: &TopicAddress) -> Resolution {
        self.entries
            .iter()
            .position(|entry| entry.matches(address))
            .map_or(Resolution::NotFound, Resolution::Found)
    }

    /// Locate a topic by id alone.
    #[must_use]
    pub fn resolve_topic(&self, topic: &TopicId) -> Resolution {
        self.entries
            .iter()
            .position(|entry| entry.topic().id() == topic)
            .map_or(Resolution::NotFound, Resolution::Found)
    }

    /// Topic shown at a 1-based step, if the step is in range.
    #[must_use]
    pub fn index_of_step(&self, step: u32) -> Option<usize> {
        let index = usize::try_from(step).ok()?.checked_sub(1)?;
        (index < self.entries.len()).then_some(index)
    }
}

/// 1-based step number for a 0-based index.
#[must_use]
pub fn step_of(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |index| index.saturating_add(1))
}
