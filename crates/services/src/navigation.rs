use std::sync::Arc;

use learn_core::model::{
    Catalog, ComponentLookup, ComponentRegistry, FlatTopic, PhaseId, Resolution, TopicAddress,
    step_of,
};
use learn_core::navigation::{Exit, NavState, Step, go_to_next, go_to_previous};
use tracing::debug;

use crate::progress_store::ProgressStore;

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// A topic is now on screen.
    Viewing { index: usize, step: u32 },
    /// The learner stepped off the path.
    Exited(Exit),
    /// The address did not resolve; the learner was sent to the roadmap.
    Redirected(TopicAddress),
    /// No phase with this id; the learner was sent to the roadmap.
    UnknownPhase(PhaseId),
}

/// Everything a presentation layer needs to show the current topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView {
    pub address: TopicAddress,
    pub phase_title: String,
    pub phase_color: String,
    pub title: String,
    pub description: String,
    pub step: u32,
    pub total: usize,
    pub completed: bool,
    pub component: ComponentLookup,
}

/// Drives next/previous/deep-link navigation and keeps the stored step in
/// sync with the topic on screen.
///
/// Whenever the navigator enters `Viewing(i)`, the store's current step is
/// set to `i + 1` before the call returns.
pub struct NavigationController {
    catalog: Arc<Catalog>,
    registry: Arc<ComponentRegistry>,
    store: ProgressStore,
    state: NavState,
}

impl NavigationController {
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        registry: Arc<ComponentRegistry>,
        store: ProgressStore,
    ) -> Self {
        Self {
            catalog,
            registry,
            store,
            state: NavState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        self.state
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Deep-link to a topic by address.
    pub fn open(&mut self, address: &TopicAddress) -> NavOutcome {
        let resolution = self.catalog.flatten().resolve(address);
        match resolution {
            Resolution::Found(index) => self.view(index),
            Resolution::NotFound => {
                debug!(%address, "unknown topic address, redirecting to roadmap");
                self.state = NavState::Idle;
                NavOutcome::Redirected(address.clone())
            }
        }
    }

    /// Open the topic at the stored step, or the nearest valid one.
    pub fn resume(&mut self) -> NavOutcome {
        let len = self.catalog.topic_count();
        if len == 0 {
            self.state = NavState::Idle;
            return NavOutcome::Exited(Exit::Roadmap);
        }
        let step = self.store.current_step();
        let index = self
            .catalog
            .flatten()
            .index_of_step(step)
            .unwrap_or(if step == 0 { 0 } else { len - 1 });
        self.view(index)
    }

    /// Open the first topic of a phase. An unknown phase redirects; an empty
    /// one exits to the roadmap.
    pub fn open_phase(&mut self, phase: &PhaseId) -> NavOutcome {
        let Some(found) = self.catalog.phase(phase) else {
            debug!(%phase, "phase not found, redirecting to roadmap");
            self.state = NavState::Idle;
            return NavOutcome::UnknownPhase(phase.clone());
        };
        let first = found
            .topics()
            .first()
            .map(|t| TopicAddress::new(found.id().clone(), t.id().clone()));
        match first {
            Some(address) => self.open(&address),
            None => {
                debug!(%phase, "phase has no topics, staying on roadmap");
                self.state = NavState::Idle;
                NavOutcome::Exited(Exit::Roadmap)
            }
        }
    }

    /// Step forward. From `Idle` this resumes at the stored step.
    pub fn next(&mut self) -> NavOutcome {
        let Some(current) = self.state.viewing() else {
            return self.resume();
        };
        let len = self.catalog.topic_count();
        self.apply(go_to_next(current, len))
    }

    /// Step back. From `Idle` there is nothing before home.
    pub fn previous(&mut self) -> NavOutcome {
        let Some(current) = self.state.viewing() else {
            return NavOutcome::Exited(Exit::Home);
        };
        self.apply(go_to_previous(current))
    }

    pub fn back_to_roadmap(&mut self) -> NavOutcome {
        self.state = NavState::Idle;
        NavOutcome::Exited(Exit::Roadmap)
    }

    /// The topic on screen, if any.
    #[must_use]
    pub fn current(&self) -> Option<TopicView> {
        let index = self.state.viewing()?;
        let sequence = self.catalog.flatten();
        let entry = sequence.get(index)?;
        Some(self.topic_view(entry, index, sequence.len()))
    }

    /// Mark the topic on screen as finished. Returns `None` when idle.
    pub fn complete_current(&self) -> Option<bool> {
        let index = self.state.viewing()?;
        let sequence = self.catalog.flatten();
        let entry = sequence.get(index)?;
        Some(self.store.complete_module(entry.topic().id().clone()))
    }

    fn apply(&mut self, step: Step) -> NavOutcome {
        match step {
            Step::Topic(index) => self.view(index),
            Step::Exit(exit) => {
                debug!(?exit, "stepped off the learning path");
                self.state = NavState::Idle;
                NavOutcome::Exited(exit)
            }
        }
    }

    fn view(&mut self, index: usize) -> NavOutcome {
        let step = step_of(index);
        self.state = NavState::Viewing(index);
        self.store.set_current_step(step);
        debug!(index, step, "viewing topic");
        NavOutcome::Viewing { index, step }
    }

    fn topic_view(&self, entry: FlatTopic<'_>, index: usize, total: usize) -> TopicView {
        let topic = entry.topic();
        TopicView {
            address: entry.address(),
            phase_title: entry.phase().title().to_owned(),
            phase_color: entry.phase().color().to_owned(),
            title: topic.title().to_owned(),
            description: topic.description().to_owned(),
            step: step_of(index),
            total,
            completed: self.store.is_completed(topic.id()),
            component: self.registry.lookup(topic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use learn_core::model::{ComponentKey, Phase, Topic, TopicId};
    use storage::repository::InMemoryRepository;

    fn scenario_catalog() -> Catalog {
        let topic = |id: &str| Topic::new(TopicId::new(id).unwrap(), id.to_uppercase(), "");
        Catalog::new(vec![
            Phase::new(
                PhaseId::new("a").unwrap(),
                "Phase A",
                "#111111",
                vec![
                    topic("a1").with_component(ComponentKey::new("stack-heap")),
                    topic("a2"),
                ],
            ),
            Phase::new(PhaseId::new("empty").unwrap(), "Empty", "#222222", vec![]),
            Phase::new(PhaseId::new("b").unwrap(), "Phase B", "#333333", vec![topic("b1")]),
        ])
        .unwrap()
    }

    async fn controller() -> NavigationController {
        let store = ProgressStore::load(Arc::new(InMemoryRepository::new())).await;
        NavigationController::new(
            Arc::new(scenario_catalog()),
            Arc::new(ComponentRegistry::builtin()),
            store,
        )
    }

    fn addr(raw: &str) -> TopicAddress {
        raw.parse().unwrap()
    }

    #[tokio::test]
    async fn open_syncs_step() {
        let mut nav = controller().await;
        assert_eq!(nav.open(&addr("a/a2")), NavOutcome::Viewing { index: 1, step: 2 });
        assert_eq!(nav.state(), NavState::Viewing(1));
        assert_eq!(nav.store().current_step(), 2);
    }

    #[tokio::test]
    async fn unknown_address_redirects_without_touching_step() {
        let mut nav = controller().await;
        nav.open(&addr("b/b1"));
        let outcome = nav.open(&addr("b/nope"));
        assert_eq!(outcome, NavOutcome::Redirected(addr("b/nope")));
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.store().current_step(), 3);
    }

    #[tokio::test]
    async fn previous_from_first_goes_home() {
        let mut nav = controller().await;
        nav.open(&addr("a/a1"));
        assert_eq!(nav.previous(), NavOutcome::Exited(Exit::Home));
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.store().current_step(), 1);
    }

    #[tokio::test]
    async fn next_from_idle_resumes_stored_step() {
        let mut nav = controller().await;
        nav.store().set_current_step(2);
        assert_eq!(nav.next(), NavOutcome::Viewing { index: 1, step: 2 });
    }

    #[tokio::test]
    async fn resume_clamps_out_of_range_step() {
        let mut nav = controller().await;
        nav.store().set_current_step(50);
        assert_eq!(nav.resume(), NavOutcome::Viewing { index: 2, step: 3 });
        assert_eq!(nav.store().current_step(), 3);
    }

    #[tokio::test]
    async fn open_phase_skips_empty_phase() {
        let mut nav = controller().await;
        assert_eq!(
            nav.open_phase(&PhaseId::new("empty").unwrap()),
            NavOutcome::Exited(Exit::Roadmap)
        );
        assert_eq!(
            nav.open_phase(&PhaseId::new("b").unwrap()),
            NavOutcome::Viewing { index: 2, step: 3 }
        );
    }

    #[tokio::test]
    async fn open_phase_with_unknown_id_redirects() {
        let mut nav = controller().await;
        nav.open(&addr("a/a2"));
        let missing = PhaseId::new("no-such-thing").unwrap();
        assert_eq!(nav.open_phase(&missing), NavOutcome::UnknownPhase(missing));
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.store().current_step(), 2);
    }

    #[tokio::test]
    async fn current_view_reports_component_lookup() {
        let mut nav = controller().await;
        assert!(nav.current().is_none());

        nav.open(&addr("a/a1"));
        let view = nav.current().unwrap();
        assert_eq!(view.step, 1);
        assert_eq!(view.total, 3);
        assert_eq!(view.phase_title, "Phase A");
        assert_eq!(
            view.component,
            ComponentLookup::Found(ComponentKey::new("stack-heap"))
        );

        nav.next();
        assert_eq!(nav.current().unwrap().component, ComponentLookup::NotFound);
    }

    #[tokio::test]
    async fn complete_current_marks_viewed_topic() {
        let mut nav = controller().await;
        assert_eq!(nav.complete_current(), None);
        nav.open(&addr("a/a2"));
        assert_eq!(nav.complete_current(), Some(true));
        assert_eq!(nav.complete_current(), Some(false));
        assert!(nav.current().unwrap().completed);
    }

    #[tokio::test]
    async fn back_to_roadmap_leaves_step_alone() {
        let mut nav = controller().await;
        nav.open(&addr("b/b1"));
        assert_eq!(nav.back_to_roadmap(), NavOutcome::Exited(Exit::Roadmap));
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.store().current_step(), 3);
    }
}
