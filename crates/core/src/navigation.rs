//! Stepping through the flattened learning path.
//!
//! Stepping past either end is a terminal transition out of the topic view:
//! forward from the last topic leads to the roadmap, backward from the first
//! topic leads home. There is no wraparound.

/// Where the learner lands when stepping off the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The learning-path overview.
    Roadmap,
    /// The application's home view.
    Home,
}

/// Outcome of a relative move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Topic(usize),
    Exit(Exit),
}

/// What the navigator is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    /// No topic selected (overview or home).
    #[default]
    Idle,
    /// A topic at this 0-based index is on screen.
    Viewing(usize),
}

impl NavState {
    #[must_use]
    pub fn viewing(self) -> Option<usize> {
        match self {
            NavState::Viewing(index) => Some(index),
            NavState::Idle => None,
        }
    }
}

/// `min(current + 1, len - 1)`. Yields `-1` for an empty path.
#[must_use]
pub fn next_index(current: i64, len: usize) -> i64 {
    let last = i64::try_from(len).unwrap_or(i64::MAX) - 1;
    current.saturating_add(1).min(last)
}

/// `max(current - 1, -1)`.
#[must_use]
pub fn previous_index(current: i64) -> i64 {
    current.saturating_sub(1).max(-1)
}

/// Move forward from `current`. Never yields an index `>= len`.
#[must_use]
pub fn go_to_next(current: usize, len: usize) -> Step {
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    let next = next_index(current, len);
    if next <= current {
        return Step::Exit(Exit::Roadmap);
    }
    usize::try_from(next).map_or(Step::Exit(Exit::Roadmap), Step::Topic)
}

/// Move back from `current`. Never yields a negative index.
#[must_use]
pub fn go_to_previous(current: usize) -> Step {
    let previous = previous_index(i64::try_from(current).unwrap_or(i64::MAX));
    usize::try_from(previous).map_or(Step::Exit(Exit::Home), Step::Topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_index_math() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(2, 3), 2);
        assert_eq!(next_index(0, 0), -1);
        assert_eq!(previous_index(2), 1);
        assert_eq!(previous_index(0), -1);
        assert_eq!(previous_index(-1), -1);
    }

    #[test]
    fn next_within_bounds() {
        assert_eq!(go_to_next(0, 3), Step::Topic(1));
        assert_eq!(go_to_next(1, 3), Step::Topic(2));
    }

    #[test]
    fn next_from_last_exits_to_roadmap() {
        assert_eq!(go_to_next(2, 3), Step::Exit(Exit::Roadmap));
    }

    #[test]
    fn next_never_reaches_len() {
        for len in 0..6 {
            for current in 0..8 {
                if let Step::Topic(index) = go_to_next(current, len) {
                    assert!(index < len, "index {index} out of range for len {len}");
                }
            }
        }
    }

    #[test]
    fn previous_from_first_exits_home() {
        assert_eq!(go_to_previous(0), Step::Exit(Exit::Home));
        assert_eq!(go_to_previous(1), Step::Topic(0));
    }

    #[test]
    fn nav_state_default_is_idle() {
        assert_eq!(NavState::default(), NavState::Idle);
        assert_eq!(NavState::Viewing(4).viewing(), Some(4));
        assert_eq!(NavState::Idle.viewing(), None);
    }
}
