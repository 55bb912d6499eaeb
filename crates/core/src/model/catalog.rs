use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::model::component::ComponentKey;
use crate::model::ids::{PhaseId, TopicId};
use crate::model::sequence::FlatSequence;

/// Course shipped with the binary.
const BUILTIN_CATALOG: &str = include_str!("../../catalog/course.toml");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog document is malformed: {0}")]
    Parse(String),

    #[error("phase `{0}` is defined more than once")]
    DuplicatePhase(PhaseId),

    #[error("topic `{topic}` in phase `{phase}` was already defined in phase `{first_phase}`")]
    DuplicateTopic {
        topic: TopicId,
        phase: PhaseId,
        first_phase: PhaseId,
    },

    #[error("phase `{0}` has an empty title")]
    EmptyPhaseTitle(PhaseId),

    #[error("phase `{0}` has no display color")]
    EmptyPhaseColor(PhaseId),

    #[error("topic `{0}` has an empty title")]
    EmptyTopicTitle(TopicId),
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// One unit of course content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    id: TopicId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "component", skip_serializing_if = "Option::is_none")]
    component_id: Option<ComponentKey>,
}

impl Topic {
    #[must_use]
    pub fn new(id: TopicId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            component_id: None,
        }
    }

    #[must_use]
    pub fn with_component(mut self, key: ComponentKey) -> Self {
        self.component_id = Some(key);
        self
    }

    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Illustration key, if the topic asks for one.
    #[must_use]
    pub fn component_id(&self) -> Option<&ComponentKey> {
        self.component_id.as_ref()
    }
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Ordered group of topics. Topic order is definition order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    title: String,
    color: String,
    #[serde(default)]
    topics: Vec<Topic>,
}

impl Phase {
    #[must_use]
    pub fn new(
        id: PhaseId,
        title: impl Into<String>,
        color: impl Into<String>,
        topics: Vec<Topic>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            color: color.into(),
            topics,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PhaseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    phases: Vec<Phase>,
}

/// The full, immutable course definition.
///
/// Topic ids are unique across the whole catalog, not just within a phase,
/// so a bare `TopicId` is enough to find a topic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    phases: Vec<Phase>,
}

impl Catalog {
    /// Validate phases and build the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate phase ids, topic ids reused anywhere
    /// in the catalog, empty titles or a missing phase color.
    pub fn new(phases: Vec<Phase>) -> Result<Self, CatalogError> {
        validate(&phases)?;
        Ok(Self { phases })
    }

    /// Parse a catalog document (`[[phases]]` with nested `[[phases.topics]]`).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed TOML or invalid ids, and any
    /// validation error from [`Catalog::new`].
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument =
            toml::from_str(source).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::new(document.phases)
    }

    /// The course catalog embedded at build time.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded document fails validation.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    #[must_use]
    pub fn phase(&self, id: &PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.id() == id)
    }

    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.phases.iter().map(|phase| phase.topics().len()).sum()
    }

    #[must_use]
    pub fn flatten(&self) -> FlatSequence<'_> {
        crate::model::sequence::flatten(self)
    }
}

fn validate(phases: &[Phase]) -> Result<(), CatalogError> {
    let mut phase_ids = HashSet::with_capacity(phases.len());
    let mut topic_owner: HashMap<&TopicId, &PhaseId> = HashMap::new();

    for phase in phases {
        if !phase_ids.insert(phase.id()) {
            return Err(CatalogError::DuplicatePhase(phase.id().clone()));
        }
        if phase.title().trim().is_empty() {
            return Err(CatalogError::EmptyPhaseTitle(phase.id().clone()));
        }
        if phase.color().trim().is_empty() {
            return Err(CatalogError::EmptyPhaseColor(phase.id().clone()));
        }
        for topic in phase.topics() {
            if topic.title().trim().is_empty() {
                return Err(CatalogError::EmptyTopicTitle(topic.id().clone()));
            }
            if let Some(first_phase) = topic_owner.insert(topic.id(), phase.id()) {
                return Err(CatalogError::DuplicateTopic {
                    topic: topic.id().clone(),
                    phase: phase.id().clone(),
                    first_phase: first_phase.clone(),
                });
            }
        }
    }
    Ok(())
}
