//! Delayed one-shot effects owned by a controller.
//!
//! Countdown timers instead of suspended coroutines: every tick the owner
//! calls `advance(delta)` and runs whatever came due. Nothing here sleeps.

/// What to do when a task comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Lower the shield and pick the follow-up state
    BlockRelease,
    /// Enter Block after the reaction delay
    BlockEntry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask {
    pub kind: TaskKind,
    /// Seconds until due (≤ 0 means due)
    pub remaining: f32,
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<ScheduledTask>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task due after `delay` seconds (negative delays count as 0).
    pub fn schedule(&mut self, kind: TaskKind, delay: f32) {
        self.tasks.push(ScheduledTask {
            kind,
            remaining: delay.max(0.0),
        });
    }

    /// Like `schedule`, but drops every pending task of the same kind first.
    pub fn replace(&mut self, kind: TaskKind, delay: f32) {
        self.tasks.retain(|task| task.kind != kind);
        self.schedule(kind, delay);
    }

    /// Advances all countdowns and returns the tasks that came due, earliest
    /// first. Due tasks are removed from the queue.
    pub fn advance(&mut self, delta: f32) -> Vec<TaskKind> {
        let mut due = Vec::new();
        self.tasks.retain_mut(|task| {
            task.remaining -= delta;
            if task.remaining <= 0.0 {
                due.push(*task);
                false
            } else {
                true
            }
        });
        // Most negative remaining = became due first; stable for ties.
        due.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        due.into_iter().map(|task| task.kind).collect()
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|task| task.kind == kind)
    }

    /// Seconds until the first pending task of `kind`.
    pub fn remaining(&self, kind: TaskKind) -> Option<f32> {
        self.tasks
            .iter()
            .filter(|task| task.kind == kind)
            .map(|task| task.remaining)
            .reduce(f32::min)
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fires_once_when_due() {
        let mut queue = TaskQueue::new();
        queue.schedule(TaskKind::BlockEntry, 0.5);

        assert!(queue.advance(0.25).is_empty());
        assert_eq!(queue.advance(0.25), vec![TaskKind::BlockEntry]);
        assert!(queue.is_empty());
        assert!(queue.advance(1.0).is_empty());
    }

    #[test]
    fn test_replace_supersedes_previous_release() {
        let mut queue = TaskQueue::new();
        queue.schedule(TaskKind::BlockRelease, 0.25);
        queue.schedule(TaskKind::BlockEntry, 1.0);
        queue.replace(TaskKind::BlockRelease, 0.75);

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.remaining(TaskKind::BlockRelease), Some(0.75));
        assert!(queue.advance(0.5).is_empty());
        assert_eq!(queue.advance(0.25), vec![TaskKind::BlockRelease]);
    }

    #[test]
    fn test_due_tasks_come_out_earliest_first() {
        let mut queue = TaskQueue::new();
        queue.schedule(TaskKind::BlockRelease, 0.5);
        queue.schedule(TaskKind::BlockEntry, 0.25);

        assert_eq!(
            queue.advance(1.0),
            vec![TaskKind::BlockEntry, TaskKind::BlockRelease]
        );
    }

    #[test]
    fn test_cancel_all_discards_pending() {
        let mut queue = TaskQueue::new();
        queue.schedule(TaskKind::BlockEntry, 0.1);
        queue.schedule(TaskKind::BlockRelease, 0.4);
        queue.cancel_all();

        assert!(!queue.is_pending(TaskKind::BlockRelease));
        assert!(queue.advance(10.0).is_empty());
    }
}
