use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use valis_core::task::{
    MAX_PROGRESS, TASK_STEPS, TaskEvent, TaskSnapshot, TaskStatus, step_index_for,
};
use valis_execution::TaskSimulator;

const BAR_WIDTH: usize = 20;

pub async fn run(text: &str, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = super::load_config(config_path)?;
    info!(
        tick_interval_ms = config.tick_interval_ms,
        completion_delay_ms = config.completion_delay_ms,
        "[Simulate] Configuration loaded"
    );

    let simulator = TaskSimulator::new(config).context("Failed to create task simulator")?;
    let mut events = simulator.subscribe();
    let mut view = simulator.watch();

    let mut last = simulator.start(text).context("Failed to start task")?;

    loop {
        tokio::select! {
            changed = view.changed() => {
                changed.context("Simulator stopped unexpectedly")?;
                let snapshot = view.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    print_snapshot(&snapshot, json)?;
                    last = snapshot;
                }
            }
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "[Simulate] Event stream lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => bail!("Simulator event stream closed"),
                };
                // The view only keeps its latest value, so the 100% state can be
                // replaced by the idle `None` before this loop sees it
                if event.is_completed() && last.status != TaskStatus::Completed {
                    print_snapshot(&finished(&last), json)?;
                }
                print_event(&event, json)?;
                if !matches!(event, TaskEvent::Started { .. }) {
                    return Ok(());
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("[Simulate] Interrupted, cancelling task");
                simulator.cancel();
            }
        }
    }
}

fn print_snapshot(snapshot: &TaskSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(snapshot)?);
    } else {
        println!(
            "{} {:>5.1}% {:<9} step {}/{}: {}",
            progress_bar(snapshot.progress),
            snapshot.progress,
            snapshot.status,
            snapshot.current_step_index + 1,
            snapshot.steps.len(),
            snapshot.current_step
        );
    }
    Ok(())
}

fn print_event(event: &TaskEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        let icon = match event {
            TaskEvent::Started { .. } => "🤖",
            TaskEvent::Completed { .. } => "✅",
            TaskEvent::Cancelled { .. } => "⛔",
        };
        println!("{} {}", icon, event.message());
    }
    Ok(())
}

/// Copy of `last` advanced to 100%, used when the view skipped that state.
fn finished(last: &TaskSnapshot) -> TaskSnapshot {
    let index = step_index_for(MAX_PROGRESS);
    TaskSnapshot {
        progress: MAX_PROGRESS,
        status: TaskStatus::from_progress(MAX_PROGRESS),
        current_step_index: index,
        current_step: TASK_STEPS[index].to_string(),
        ..last.clone()
    }
}

fn progress_bar(progress: f64) -> String {
    let filled = ((progress / MAX_PROGRESS) * BAR_WIDTH as f64).floor() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use valis_core::task::Task;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(20)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(52.0), format!("[{}{}]", "#".repeat(10), ".".repeat(10)));
    }

    #[test]
    fn test_finished_fills_in_final_step() {
        let mut task = Task::new("Build me a website");
        task.advance(40.0);

        let last = task.snapshot();
        let done = finished(&last);
        assert_eq!(done.id, last.id);
        assert_eq!(done.progress, 100.0);
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.current_step_index, 3);
        assert_eq!(done.current_step, "Testing and deployment");

        task.advance(60.0);
        assert_eq!(done, TaskSnapshot { updated_at: done.updated_at.clone(), ..task.snapshot() });
    }
}
