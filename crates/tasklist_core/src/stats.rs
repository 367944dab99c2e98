use crate::model::Task;
use serde::Serialize;

/// Aggregate completion statistics derived from the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Percent of tasks completed; 0 for an empty collection.
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn for_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let pending = total - completed;
        let completion_rate = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            pending,
            completion_rate,
        }
    }
}
