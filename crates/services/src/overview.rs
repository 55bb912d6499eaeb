//! Roadmap view of the learning path: every phase, its topics, and how far
//! the learner has come.

use learn_core::model::{Catalog, ProgressState, TopicAddress, step_of};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub address: TopicAddress,
    pub title: String,
    pub step: u32,
    pub completed: bool,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseOverview {
    pub title: String,
    pub color: String,
    pub topics: Vec<TopicEntry>,
}

impl PhaseOverview {
    #[must_use]
    pub fn completed(&self) -> usize {
        self.topics.iter().filter(|t| t.completed).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOverview {
    pub phases: Vec<PhaseOverview>,
    pub current_step: u32,
}

impl PathOverview {
    /// Completed topics that still exist in the catalog.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.phases.iter().map(PhaseOverview::completed).sum()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.phases.iter().map(|p| p.topics.len()).sum()
    }

    /// Whole-number percentage, rounded down. An empty path is 0%.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        u8::try_from(self.completed() * 100 / total).unwrap_or(100)
    }
}

/// Lay the catalog out with step numbers and completion flags.
#[must_use]
pub fn build_overview(catalog: &Catalog, progress: &ProgressState) -> PathOverview {
    let mut index = 0;
    let phases = catalog
        .phases()
        .iter()
        .map(|phase| {
            let topics = phase
                .topics()
                .iter()
                .map(|topic| {
                    let step = step_of(index);
                    index += 1;
                    TopicEntry {
                        address: TopicAddress::new(phase.id().clone(), topic.id().clone()),
                        title: topic.title().to_owned(),
                        step,
                        completed: progress.is_completed(topic.id()),
                        is_current: step == progress.current_step(),
                    }
                })
                .collect();
            PhaseOverview {
                title: phase.title().to_owned(),
                color: phase.color().to_owned(),
                topics,
            }
        })
        .collect();

    PathOverview {
        phases,
        current_step: progress.current_step(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{Phase, PhaseId, Theme, Topic, TopicId};

    fn catalog() -> Catalog {
        let topic = |id: &str| Topic::new(TopicId::new(id).unwrap(), id.to_uppercase(), "");
        Catalog::new(vec![
            Phase::new(
                PhaseId::new("a").unwrap(),
                "A",
                "#111111",
                vec![topic("a1"), topic("a2")],
            ),
            Phase::new(PhaseId::new("b").unwrap(), "B", "#222222", vec![topic("b1")]),
        ])
        .unwrap()
    }

    #[test]
    fn steps_follow_flattened_order() {
        let overview = build_overview(&catalog(), &ProgressState::default());
        let steps: Vec<_> = overview
            .phases
            .iter()
            .flat_map(|p| p.topics.iter().map(|t| (t.address.to_string(), t.step)))
            .collect();
        assert_eq!(
            steps,
            vec![
                ("a/a1".to_string(), 1),
                ("a/a2".to_string(), 2),
                ("b/b1".to_string(), 3)
            ]
        );
        assert!(overview.phases[0].topics[0].is_current);
    }

    #[test]
    fn counts_only_known_completions() {
        let progress = ProgressState::from_persisted(
            3,
            vec![
                TopicId::new("a2").unwrap(),
                TopicId::new("b1").unwrap(),
                TopicId::new("removed-topic").unwrap(),
            ],
            Theme::Dark,
        )
        .unwrap();
        let overview = build_overview(&catalog(), &progress);
        assert_eq!(overview.completed(), 2);
        assert_eq!(overview.total(), 3);
        assert_eq!(overview.percent_complete(), 66);
        assert_eq!(overview.phases[0].completed(), 1);
        assert!(overview.phases[1].topics[0].is_current);
    }

    #[test]
    fn empty_catalog_is_zero_percent() {
        let overview = build_overview(&Catalog::default(), &ProgressState::default());
        assert_eq!(overview.total(), 0);
        assert_eq!(overview.percent_complete(), 0);
    }
}
