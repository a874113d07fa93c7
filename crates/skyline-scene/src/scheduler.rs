//! Periodic tick sources with scoped cancellation.
//!
//! The host polls the scheduler with wall-clock timestamps; every running
//! task whose interval has elapsed is reported once per poll. Starting a
//! task hands back a [`TaskGuard`], and the task lives exactly as long as
//! that guard.

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

/// The periodic jobs the scene runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Star opacity update (dark theme).
    Twinkle,
    /// Bird position update (light theme).
    Flight,
}

#[derive(Debug, Clone, Default)]
struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    fn cancel(&self) {
        self.0.set(true);
    }

    fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Keeps a periodic task alive. Dropping the guard cancels the task.
#[derive(Debug)]
#[must_use = "dropping the guard cancels the task immediately"]
pub struct TaskGuard {
    kind: TaskKind,
    token: CancelToken,
}

impl TaskGuard {
    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Debug)]
struct PeriodicTask {
    kind: TaskKind,
    interval_ms: u64,
    next_due_ms: u64,
    token: CancelToken,
}

/// Timer-style scheduler for the scene's periodic tasks.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: Vec<PeriodicTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a task that first fires one interval after `now_ms`.
    pub fn start(&mut self, kind: TaskKind, interval_ms: u64, now_ms: u64) -> TaskGuard {
        let interval_ms = interval_ms.max(1);
        let token = CancelToken::default();
        self.tasks.push(PeriodicTask {
            kind,
            interval_ms,
            next_due_ms: now_ms.saturating_add(interval_ms),
            token: token.clone(),
        });
        TaskGuard { kind, token }
    }

    /// Report every live task that is due at `now_ms`.
    ///
    /// A task fires at most once per poll. When the host falls behind (a
    /// suspended terminal, a slow frame) missed ticks are dropped rather
    /// than replayed.
    pub fn poll(&mut self, now_ms: u64) -> Vec<TaskKind> {
        self.tasks.retain(|task| !task.token.is_cancelled());

        let mut due = Vec::new();
        for task in &mut self.tasks {
            // Clock moved backwards; restart the period from here
            if task.next_due_ms > now_ms.saturating_add(task.interval_ms) {
                task.next_due_ms = now_ms.saturating_add(task.interval_ms);
                continue;
            }
            if now_ms < task.next_due_ms {
                continue;
            }

            task.next_due_ms = task.next_due_ms.saturating_add(task.interval_ms);
            if task.next_due_ms <= now_ms {
                task.next_due_ms = now_ms.saturating_add(task.interval_ms);
            }
            trace!(kind = ?task.kind, now_ms, "task due");
            due.push(task.kind);
        }
        due
    }

    /// Whether a live task of this kind exists.
    pub fn is_running(&self, kind: TaskKind) -> bool {
        self.tasks
            .iter()
            .any(|task| task.kind == kind && !task.token.is_cancelled())
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| !task.token.is_cancelled())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fires_each_interval() {
        let mut scheduler = Scheduler::new();
        let _guard = scheduler.start(TaskKind::Flight, 60, 1_000);

        assert!(scheduler.poll(1_000).is_empty());
        assert!(scheduler.poll(1_059).is_empty());
        assert_eq!(scheduler.poll(1_060), vec![TaskKind::Flight]);
        assert!(scheduler.poll(1_060).is_empty());
        assert_eq!(scheduler.poll(1_120), vec![TaskKind::Flight]);
    }

    #[test]
    fn test_dropping_guard_cancels() {
        let mut scheduler = Scheduler::new();
        let guard = scheduler.start(TaskKind::Twinkle, 50, 0);
        assert!(scheduler.is_running(TaskKind::Twinkle));

        drop(guard);
        assert!(!scheduler.is_running(TaskKind::Twinkle));
        assert!(scheduler.poll(1_000).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_independent_intervals() {
        let mut scheduler = Scheduler::new();
        let _twinkle = scheduler.start(TaskKind::Twinkle, 50, 0);
        let _flight = scheduler.start(TaskKind::Flight, 60, 0);

        assert_eq!(scheduler.poll(50), vec![TaskKind::Twinkle]);
        assert_eq!(scheduler.poll(60), vec![TaskKind::Flight]);
        assert_eq!(scheduler.poll(100), vec![TaskKind::Twinkle]);
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_missed_ticks_are_not_replayed() {
        let mut scheduler = Scheduler::new();
        let _guard = scheduler.start(TaskKind::Flight, 60, 0);

        // Host was suspended for ten seconds
        assert_eq!(scheduler.poll(10_000), vec![TaskKind::Flight]);
        assert!(scheduler.poll(10_030).is_empty());
        assert_eq!(scheduler.poll(10_060), vec![TaskKind::Flight]);
    }

    #[test]
    fn test_clock_moving_backwards_restarts_period() {
        let mut scheduler = Scheduler::new();
        let _guard = scheduler.start(TaskKind::Twinkle, 50, 10_000);

        assert!(scheduler.poll(5_000).is_empty());
        assert_eq!(scheduler.poll(5_050), vec![TaskKind::Twinkle]);
    }

    #[test]
    fn test_zero_interval_is_raised() {
        let mut scheduler = Scheduler::new();
        let _guard = scheduler.start(TaskKind::Twinkle, 0, 0);
        assert!(scheduler.poll(0).is_empty());
        assert_eq!(scheduler.poll(1), vec![TaskKind::Twinkle]);
    }
}
