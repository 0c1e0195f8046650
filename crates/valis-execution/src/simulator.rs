//! Timer-driven task simulation.
//!
//! `TaskSimulator` owns a single live-task slot. `start` replaces whatever is
//! live, and a spawned tick loop advances the new task until it completes.
//! Renderers follow the task through a `watch` channel; the message log
//! listens on a `broadcast` channel of `TaskEvent`s.
//!
//! Every write to the slot, the live view, or the event stream happens while
//! holding the slot lock and after checking the task's cancellation token.
//! A task discarded before reaching 100% never publishes another tick and
//! never emits `Completed`. A task that already reached 100% and is only
//! waiting out the completion pause is finished on the spot instead, so it
//! reports `Completed` whatever the pause length.
//!
//! Tasks leaving the slot are kept in a bounded history of `TaskRecord`s.
//! Lock order is slot, then history.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use valis_core::task::{CancelReason, Task, TaskEvent, TaskRecord, TaskSnapshot};
use valis_core::{Result, SimulatorConfig, ValisError};

use crate::increment::{ProgressSource, RandomIncrement};

/// Buffered events per subscriber before slow receivers start lagging.
const EVENT_CAPACITY: usize = 64;

type SharedSource = Arc<Mutex<Box<dyn ProgressSource>>>;

/// Handle to the task currently occupying the slot.
struct LiveTask {
    /// Last published state, kept in step with the live view.
    latest: TaskSnapshot,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl LiveTask {
    /// True once the task hit 100% and only the completion pause remains.
    fn reached_max(&self) -> bool {
        self.latest.status.is_terminal()
    }
}

struct Shared {
    slot: Mutex<Option<LiveTask>>,
    view: watch::Sender<Option<TaskSnapshot>>,
    events: broadcast::Sender<TaskEvent>,
    history: Mutex<VecDeque<TaskRecord>>,
    history_limit: usize,
}

impl Shared {
    fn lock_slot(&self) -> MutexGuard<'_, Option<LiveTask>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, VecDeque<TaskRecord>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: TaskEvent) {
        // Having no subscribers is fine
        let _ = self.events.send(event);
    }

    fn remember(&self, record: TaskRecord) {
        if self.history_limit == 0 {
            return;
        }
        let mut history = self.lock_history();
        while history.len() >= self.history_limit {
            history.pop_front();
        }
        history.push_back(record);
    }

    /// Emits `Completed` for a task that left the slot at 100%. Must be
    /// called with the slot locked.
    fn complete(&self, snapshot: TaskSnapshot) {
        info!(
            task_id = %snapshot.id,
            task_type = %snapshot.task_type,
            "[Simulator] Task completed"
        );
        self.emit(TaskEvent::completed(snapshot.id.clone(), snapshot.task_type));
        self.remember(TaskRecord::completed(snapshot));
    }

    /// Stops and removes the live task. Must be called with the slot locked.
    ///
    /// A task that already reached 100% is completed rather than cancelled.
    fn discard(&self, slot: &mut Option<LiveTask>, reason: CancelReason) -> Option<TaskEvent> {
        let live = slot.take()?;
        live.cancel.cancel();
        live.handle.abort();
        self.view.send_replace(None);

        let task_id = live.latest.id.clone();
        if live.reached_max() {
            debug!(task_id = %task_id, ?reason, "[Simulator] Completion pause cut short");
            let task_type = live.latest.task_type;
            self.complete(live.latest);
            return Some(TaskEvent::completed(task_id, task_type));
        }

        info!(task_id = %task_id, ?reason, "[Simulator] Task discarded");
        let event = TaskEvent::Cancelled { task_id, reason };
        self.emit(event.clone());
        self.remember(TaskRecord::cancelled(live.latest, reason));
        Some(event)
    }
}

/// Runs at most one simulated task at a time.
pub struct TaskSimulator {
    config: SimulatorConfig,
    source: SharedSource,
    shared: Arc<Shared>,
}

impl TaskSimulator {
    /// Creates a simulator drawing random increments as configured.
    ///
    /// # Errors
    ///
    /// Returns `ValisError::Config` if the configuration is invalid.
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        let source = RandomIncrement::from_config(&config);
        Self::with_source(config, source)
    }

    /// Creates a simulator with a caller-supplied increment source.
    ///
    /// Increments below `config.min_increment` are raised to it, so any
    /// source still drives tasks to completion.
    ///
    /// # Errors
    ///
    /// Returns `ValisError::Config` if the configuration is invalid.
    pub fn with_source(config: SimulatorConfig, source: impl ProgressSource + 'static) -> Result<Self> {
        config.validate()?;
        let (view, _) = watch::channel(None);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            source: Arc::new(Mutex::new(Box::new(source))),
            shared: Arc::new(Shared {
                slot: Mutex::new(None),
                view,
                events,
                history: Mutex::new(VecDeque::new()),
                history_limit: config.history_limit,
            }),
            config,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Starts simulating `text`, discarding any live task first.
    ///
    /// The returned snapshot is the new task at progress 0. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `ValisError::InvalidRequest` if `text` is empty or whitespace
    /// - `ValisError::Runtime` if no tokio runtime is available
    pub fn start(&self, text: &str) -> Result<TaskSnapshot> {
        if text.trim().is_empty() {
            return Err(ValisError::invalid_request("task text must not be empty"));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ValisError::runtime(format!("task simulator needs a tokio runtime: {}", e)))?;

        let task = Task::new(text);
        let snapshot = task.snapshot();
        let cancel = CancellationToken::new();

        let mut slot = self.shared.lock_slot();
        self.shared.discard(&mut slot, CancelReason::Superseded);

        self.shared.view.send_replace(Some(snapshot.clone()));
        self.shared.emit(TaskEvent::Started {
            task_id: task.id().to_string(),
            task_type: task.task_type(),
        });
        info!(
            task_id = %task.id(),
            task_type = %task.task_type(),
            "[Simulator] Task started"
        );

        let handle = runtime.spawn(drive(
            Arc::clone(&self.shared),
            Arc::clone(&self.source),
            task,
            cancel.clone(),
            self.config.clone(),
        ));
        *slot = Some(LiveTask {
            latest: snapshot.clone(),
            cancel,
            handle,
        });

        Ok(snapshot)
    }

    /// Stops the live task.
    ///
    /// A task still short of 100% is cancelled; one already at 100% and
    /// waiting out the completion pause is completed immediately. Returns
    /// the event emitted, or `None` when nothing was live.
    pub fn cancel(&self) -> Option<TaskEvent> {
        let mut slot = self.shared.lock_slot();
        self.shared.discard(&mut slot, CancelReason::Requested)
    }

    /// Latest snapshot of the live task.
    pub fn current(&self) -> Option<TaskSnapshot> {
        self.shared.view.borrow().clone()
    }

    pub fn is_idle(&self) -> bool {
        self.shared.lock_slot().is_none()
    }

    /// Live view of the current task; `None` while idle.
    pub fn watch(&self) -> watch::Receiver<Option<TaskSnapshot>> {
        self.shared.view.subscribe()
    }

    /// Lifecycle events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.shared.events.subscribe()
    }

    /// Finished tasks, oldest first, up to `history_limit` entries.
    pub fn history(&self) -> Vec<TaskRecord> {
        self.shared.lock_history().iter().cloned().collect()
    }

    /// Looks up a finished task by id.
    pub fn find(&self, task_id: &str) -> Option<TaskRecord> {
        self.shared
            .lock_history()
            .iter()
            .rev()
            .find(|record| record.id == task_id)
            .cloned()
    }
}

impl Drop for TaskSimulator {
    fn drop(&mut self) {
        let mut slot = self.shared.lock_slot();
        if let Some(live) = slot.take() {
            live.cancel.cancel();
            live.handle.abort();
        }
    }
}

async fn drive(
    shared: Arc<Shared>,
    source: SharedSource,
    mut task: Task,
    cancel: CancellationToken,
    config: SimulatorConfig,
) {
    let period = config.tick_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let drawn = source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_increment();
        // f64::max also replaces NaN with the minimum
        let increment = drawn.max(config.min_increment);

        if !apply_tick(&shared, &cancel, &mut task, increment) {
            return;
        }
        if task.is_complete() {
            break;
        }
    }

    let delay = config.completion_delay();
    if !delay.is_zero() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = time::sleep(delay) => {}
        }
    }

    finish(&shared, &cancel, &task);
}

/// Advances `task` and publishes the new snapshot unless it was cancelled.
fn apply_tick(shared: &Shared, cancel: &CancellationToken, task: &mut Task, increment: f64) -> bool {
    let mut slot = shared.lock_slot();
    if cancel.is_cancelled() {
        return false;
    }

    let previous = task.status();
    task.advance(increment);
    let snapshot = task.snapshot();
    // Not cancelled, so the slot still holds this task
    if let Some(live) = slot.as_mut() {
        live.latest = snapshot.clone();
    }
    shared.view.send_replace(Some(snapshot));

    debug!(
        task_id = %task.id(),
        increment,
        progress = task.progress(),
        step = task.current_step_index(),
        "[Simulator] Tick"
    );
    if task.status() != previous {
        info!(
            task_id = %task.id(),
            from = %previous,
            to = %task.status(),
            "[Simulator] Status changed"
        );
    }
    true
}

fn finish(shared: &Shared, cancel: &CancellationToken, task: &Task) {
    let mut slot = shared.lock_slot();
    if cancel.is_cancelled() {
        return;
    }

    // Not cancelled, so the slot still holds this task
    *slot = None;
    shared.view.send_replace(None);
    shared.complete(task.snapshot());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::increment::SequenceIncrement;

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SimulatorConfig {
            tick_interval_ms: 0,
            ..SimulatorConfig::default()
        };
        let result = TaskSimulator::new(config);
        assert!(matches!(result, Err(ValisError::Config(_))));
    }

    #[test]
    fn test_start_outside_runtime_is_a_runtime_error() {
        let simulator = TaskSimulator::new(SimulatorConfig::default()).unwrap();
        let err = simulator.start("Build me a website").unwrap_err();
        assert!(matches!(err, ValisError::Runtime(_)));
        assert!(simulator.is_idle());
    }

    #[tokio::test]
    async fn test_start_rejects_blank_text() {
        let simulator =
            TaskSimulator::with_source(SimulatorConfig::default(), SequenceIncrement::new(vec![10.0]))
                .unwrap();

        let err = simulator.start("   \n\t").unwrap_err();
        assert!(err.is_invalid_request());
        assert!(simulator.is_idle());
        assert!(simulator.current().is_none());
    }

    #[tokio::test]
    async fn test_cancel_when_idle_is_a_noop() {
        let simulator = TaskSimulator::new(SimulatorConfig::default()).unwrap();
        let mut events = simulator.subscribe();

        assert!(simulator.cancel().is_none());
        assert!(simulator.cancel().is_none());
        assert!(events.try_recv().is_err());
        assert!(simulator.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_live_task() {
        let simulator = TaskSimulator::new(SimulatorConfig::default()).unwrap();
        let mut view = simulator.watch();
        simulator.start("Build me a website").unwrap();
        drop(simulator);

        // The sender is gone once the aborted tick loop releases its Arc
        time::sleep(std::time::Duration::from_secs(5)).await;
        view.borrow_and_update();
        assert!(view.changed().await.is_err());
    }
}
