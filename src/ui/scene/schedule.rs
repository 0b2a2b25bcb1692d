use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::models::BoxId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTask {
    CreateEditor,
    Relayout,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    task: LayoutTask,
    due: Instant,
}

/// Deferred per-box editor work, fired once layout has had time to settle.
///
/// Each box holds at most one pending task. Scheduling the same task again
/// keeps the original deadline; a different task replaces it.
#[derive(Debug)]
pub struct LayoutScheduler {
    settle: Duration,
    tasks: FxHashMap<BoxId, Scheduled>,
}

impl LayoutScheduler {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            tasks: FxHashMap::default(),
        }
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }

    pub fn schedule(&mut self, id: BoxId, task: LayoutTask, now: Instant) -> bool {
        if let Some(existing) = self.tasks.get(&id) {
            if existing.task == task {
                return false;
            }
        }
        self.tasks.insert(
            id,
            Scheduled {
                task,
                due: now + self.settle,
            },
        );
        true
    }

    pub fn cancel(&mut self, id: BoxId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn pending(&self, id: BoxId) -> Option<LayoutTask> {
        self.tasks.get(&id).map(|s| s.task)
    }

    /// Removes and returns every task whose deadline has passed, by box id.
    pub fn take_due(&mut self, now: Instant) -> Vec<(BoxId, LayoutTask)> {
        let mut due: Vec<(BoxId, LayoutTask)> = self
            .tasks
            .iter()
            .filter(|(_, s)| s.due <= now)
            .map(|(id, s)| (*id, s.task))
            .collect();
        due.sort_by_key(|(id, _)| *id);
        for (id, _) in &due {
            self.tasks.remove(id);
        }
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.values().map(|s| s.due).min()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/scene/schedule.rs"]
mod tests;
