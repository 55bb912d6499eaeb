use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a phase in the learning path (a lowercase slug such as `foundations`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhaseId(String);

impl PhaseId {
    /// Creates a new `PhaseId` after validating the slug.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the value is empty or contains characters
    /// outside `[a-z0-9-_]`.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        validate_slug(id.into(), "PhaseId").map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a topic. Unique across the whole catalog.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicId(String);

impl TopicId {
    /// Creates a new `TopicId` after validating the slug.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the value is empty or contains characters
    /// outside `[a-z0-9-_]`.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        validate_slug(id.into(), "TopicId").map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// External address of a topic: the two-segment path `phase/topic`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicAddress {
    phase: PhaseId,
    topic: TopicId,
}

impl TopicAddress {
    #[must_use]
    pub fn new(phase: PhaseId, topic: TopicId) -> Self {
        Self { phase, topic }
    }

    #[must_use]
    pub fn phase(&self) -> &PhaseId {
        &self.phase
    }

    #[must_use]
    pub fn topic(&self) -> &TopicId {
        &self.topic
    }
}

fn validate_slug(raw: String, kind: &'static str) -> Result<String, ParseIdError> {
    let valid = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(raw)
    } else {
        Err(ParseIdError { kind, raw })
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhaseId({})", self.0)
    }
}

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.0)
    }
}

impl fmt::Debug for TopicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicAddress({}/{})", self.phase.0, self.topic.0)
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TopicAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.phase, self.topic)
    }
}

// ─── Parsing ───────────────────────────────────────────────────────────────────

/// Error type for parsing an id or address from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl ParseIdError {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from {:?}", self.kind, self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for PhaseId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for TopicId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for TopicAddress {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseIdError {
            kind: "TopicAddress",
            raw: s.to_owned(),
        };
        let (phase, topic) = s.trim_matches('/').split_once('/').ok_or_else(invalid)?;
        let phase = PhaseId::new(phase).map_err(|_| invalid())?;
        let topic = TopicId::new(topic).map_err(|_| invalid())?;
        Ok(Self::new(phase, topic))
    }
}

impl TryFrom<String> for PhaseId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for TopicId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhaseId> for String {
    fn from(id: PhaseId) -> Self {
        id.0
    }
}

impl From<TopicId> for String {
    fn from(id: TopicId) -> Self {
        id.0
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
