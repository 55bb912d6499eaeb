use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use learn_core::model::{ProgressState, Theme, TopicId};
use storage::repository::{ProgressRecord, ProgressRepository};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

//
// ─── WRITER ────────────────────────────────────────────────────────────────────
//

enum WriteCommand {
    Save(ProgressRecord),
    Flush(oneshot::Sender<()>),
}

/// Drains queued writes in order. Failures are logged and dropped; the
/// in-memory state stays authoritative for the session.
async fn run_writer(
    repo: Arc<dyn ProgressRepository>,
    mut commands: mpsc::UnboundedReceiver<WriteCommand>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            WriteCommand::Save(record) => {
                if let Err(err) = repo.save_progress(&record).await {
                    warn!(error = %err, step = record.current_step, "failed to persist progress");
                }
            }
            WriteCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// Process-wide learning progress with write-through persistence.
///
/// Every mutation updates memory synchronously, so the next read sees it, and
/// then queues a write of the full snapshot. Writes are applied one at a time
/// in mutation order by a background task; callers never wait on them.
#[derive(Clone)]
pub struct ProgressStore {
    state: Arc<Mutex<ProgressState>>,
    writes: mpsc::UnboundedSender<WriteCommand>,
}

impl ProgressStore {
    /// Load the persisted record (or defaults) and start the writer task.
    ///
    /// Must be called from within a Tokio runtime. A missing, unreadable or
    /// invalid record is not an error: the store starts from defaults.
    pub async fn load(repo: Arc<dyn ProgressRepository>) -> Self {
        let state = match repo.load_progress().await {
            Ok(Some(record)) => record.into_state().unwrap_or_else(|err| {
                warn!(error = %err, "discarding invalid persisted progress");
                ProgressState::default()
            }),
            Ok(None) => {
                debug!("no persisted progress, starting fresh");
                ProgressState::default()
            }
            Err(err) => {
                warn!(error = %err, "failed to load progress, starting fresh");
                ProgressState::default()
            }
        };

        let (writes, commands) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(repo, commands));

        Self {
            state: Arc::new(Mutex::new(state)),
            writes,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        self.lock().clone()
    }

    #[must_use]
    pub fn current_step(&self) -> u32 {
        self.lock().current_step()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.lock().theme()
    }

    #[must_use]
    pub fn is_completed(&self, topic: &TopicId) -> bool {
        self.lock().is_completed(topic)
    }

    /// Set the step as given. The navigator is responsible for passing a valid step.
    pub fn set_current_step(&self, step: u32) {
        self.mutate(|state| state.set_current_step(step));
    }

    /// Mark a topic finished. Returns `false` if it already was.
    pub fn complete_module(&self, topic: TopicId) -> bool {
        self.mutate(|state| state.complete_module(topic))
    }

    /// Flip the theme and return the new value.
    pub fn toggle_theme(&self) -> Theme {
        self.mutate(ProgressState::toggle_theme)
    }

    /// Clear position and completions.
    pub fn reset(&self) {
        self.mutate(ProgressState::reset);
    }

    /// Bring a stale step back into `[1, len]`. Only writes if it changed.
    pub fn clamp_step(&self, len: usize) -> bool {
        let mut state = self.lock();
        let changed = state.clamp_step(len);
        if changed {
            debug!(step = state.current_step(), len, "clamped stale current step");
            self.queue_write(&state);
        }
        changed
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.writes.send(WriteCommand::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    fn mutate<R>(&self, apply: impl FnOnce(&mut ProgressState) -> R) -> R {
        let mut state = self.lock();
        let out = apply(&mut *state);
        // Queued while still holding the lock so writes land in mutation order.
        self.queue_write(&state);
        out
    }

    fn queue_write(&self, state: &ProgressState) {
        let record = ProgressRecord::from_state(state);
        if self.writes.send(WriteCommand::Save(record)).is_err() {
            warn!("progress writer stopped, change kept in memory only");
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
