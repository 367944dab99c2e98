use crate::error::AppError;
use crate::model::Task;
use crate::stats::TaskStats;
use crate::storage::{StoreAdapter, json_store};
use std::sync::Arc;
use std::thread::JoinHandle;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;
use uuid::Uuid;

/// Lifecycle of the initial bulk-load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

type WriteObserver = Arc<dyn Fn(&AppError) + Send + Sync>;

/// The authoritative in-memory task collection.
///
/// Mutations are synchronous and complete fully before the next one is
/// observed. Each successful mutation encodes a snapshot of the collection
/// and hands it to the adapter on a spawned thread; the caller never waits on
/// that write and its failure never rolls back memory. Overlapping writes are
/// tolerated, last write wins.
pub struct TaskStore {
    adapter: Arc<dyn StoreAdapter>,
    tasks: Vec<Task>,
    status: LoadStatus,
    load_error: Option<String>,
    write_observer: Option<WriteObserver>,
    in_flight: Vec<JoinHandle<()>>,
}

impl TaskStore {
    pub fn new(adapter: Arc<dyn StoreAdapter>) -> Self {
        Self {
            adapter,
            tasks: Vec::new(),
            status: LoadStatus::Idle,
            load_error: None,
            write_observer: None,
            in_flight: Vec::new(),
        }
    }

    /// Replace the in-memory collection with the persisted one. Runs once at
    /// startup, before any mutation. An absent payload is an empty
    /// collection, not a failure; on failure the prior collection is kept and
    /// the reason is recorded.
    pub fn load(&mut self) {
        self.status = LoadStatus::Loading;
        self.load_error = None;

        match self.adapter.read() {
            Ok(Some(payload)) => match json_store::decode_tasks(&payload) {
                Ok(tasks) => {
                    self.tasks = tasks;
                    self.status = LoadStatus::Succeeded;
                }
                Err(err) => {
                    self.status = LoadStatus::Failed;
                    self.load_error = Some(err.to_string());
                }
            },
            Ok(None) => {
                self.tasks = Vec::new();
                self.status = LoadStatus::Succeeded;
            }
            Err(err) => {
                self.status = LoadStatus::Failed;
                self.load_error = Some(err.to_string());
            }
        }
    }

    pub fn add(&mut self, title: &str, description: &str) -> Result<Task, AppError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: trimmed.to_string(),
            description: description.trim().to_string(),
            completed: false,
            created_at,
        };

        self.tasks.push(task.clone());
        self.write_through();

        Ok(task)
    }

    /// Flip `completed` on the matching record. A missing id is a silent
    /// no-op: nothing changes and nothing is written.
    pub fn toggle(&mut self, id: &str) -> Option<Task> {
        let updated = {
            let task = self.tasks.iter_mut().find(|task| task.id == id)?;
            task.completed = !task.completed;
            task.clone()
        };

        self.write_through();
        Some(updated)
    }

    /// Remove the matching record, preserving the order of the remainder.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(index);

        self.write_through();
        Some(removed)
    }

    /// Replace title and description on the matching record. `id`,
    /// `completed`, and `createdAt` are never touched. `Ok(None)` when the id
    /// is unknown.
    pub fn edit(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<Option<Task>, AppError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let updated = match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.title = trimmed.to_string();
                task.description = description.trim().to_string();
                task.clone()
            }
            None => return Ok(None),
        };

        self.write_through();
        Ok(Some(updated))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::for_tasks(&self.tasks)
    }

    /// Observe write-through failures without blocking the mutation path.
    pub fn set_write_observer<F>(&mut self, observer: F)
    where
        F: Fn(&AppError) + Send + Sync + 'static,
    {
        self.write_observer = Some(Arc::new(observer));
    }

    /// Wait for every in-flight write-through. Mutations never wait on their
    /// own write; teardown must, or a short-lived process could exit before
    /// its last write lands.
    pub fn flush(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.join().ok();
        }
    }

    fn write_through(&mut self) {
        let payload = match json_store::encode_tasks(&self.tasks) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "write-through failed to encode collection");
                if let Some(observer) = self.write_observer.as_ref() {
                    observer(&err);
                }
                return;
            }
        };

        let adapter = Arc::clone(&self.adapter);
        let observer = self.write_observer.clone();
        let handle = std::thread::spawn(move || {
            if let Err(err) = adapter.write(&payload) {
                warn!(error = %err, "write-through failed");
                if let Some(observer) = observer.as_ref() {
                    observer(&err);
                }
            }
        });

        self.in_flight.push(handle);
    }
}

impl Drop for TaskStore {
    fn drop(&mut self) {
        self.flush();
    }
}
