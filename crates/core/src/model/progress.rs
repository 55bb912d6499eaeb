use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::TopicId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("current step must be >= 1, got {0}")]
    InvalidStep(u32),
}

/// Display preference stored next to learning progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Where the learner is and what they have finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    current_step: u32,
    completed_modules: BTreeSet<TopicId>,
    theme: Theme,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            current_step: 1,
            completed_modules: BTreeSet::new(),
            theme: Theme::default(),
        }
    }
}

impl ProgressState {
    /// Rebuild state from a persisted record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidStep` if `current_step` is zero.
    pub fn from_persisted(
        current_step: u32,
        completed_modules: impl IntoIterator<Item = TopicId>,
        theme: Theme,
    ) -> Result<Self, ProgressError> {
        if current_step == 0 {
            return Err(ProgressError::InvalidStep(current_step));
        }
        Ok(Self {
            current_step,
            completed_modules: completed_modules.into_iter().collect(),
            theme,
        })
    }

    #[must_use]
    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    #[must_use]
    pub fn completed_modules(&self) -> &BTreeSet<TopicId> {
        &self.completed_modules
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn is_completed(&self, topic: &TopicId) -> bool {
        self.completed_modules.contains(topic)
    }

    /// Set the step as given. Range checks belong to the caller.
    pub fn set_current_step(&mut self, step: u32) {
        self.current_step = step;
    }

    /// Mark a topic finished. Returns `false` if it already was.
    pub fn complete_module(&mut self, topic: TopicId) -> bool {
        self.completed_modules.insert(topic)
    }

    /// Flip the theme and return the new value.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Pull the step back into `[1, len]`. Returns `true` if it changed.
    ///
    /// An empty path pins the step to 1.
    pub fn clamp_step(&mut self, len: usize) -> bool {
        let upper = u32::try_from(len).unwrap_or(u32::MAX).max(1);
        let clamped = self.current_step.clamp(1, upper);
        let changed = clamped != self.current_step;
        self.current_step = clamped;
        changed
    }

    /// Forget position and completions. The theme is kept.
    pub fn reset(&mut self) {
        self.current_step = 1;
        self.completed_modules.clear();
    }
}
