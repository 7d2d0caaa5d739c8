//! Schema-aware layer between the HTTP handler and the record store.

use futures::future;
use tracing::warn;
use uuid::Uuid;

use crate::error::{PutError, RepositoryError, StoreError};
use crate::store::RecordStore;
use crate::task::{now_millis, NewTask, Task, KEY_ATTRIBUTE};

pub struct TaskRepository<S> {
    store: S,
}

impl<S> TaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RecordStore> TaskRepository<S> {
    /// Returns every task in store iteration order. The order is not stable
    /// across calls; callers may use it for display only. Records that do not
    /// decode as tasks are logged and skipped.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let records = self.store.scan_all().await?;
        let mut tasks = Vec::with_capacity(records.len());

        for record in &records {
            match Task::from_record(record) {
                Some(task) => tasks.push(task),
                None => {
                    let key = record.get(KEY_ATTRIBUTE).and_then(|v| v.as_s().ok());
                    warn!(?key, "skipping record that does not decode as a task");
                }
            }
        }

        Ok(tasks)
    }

    /// Validates and persists a new task. A client-supplied id is accepted as
    /// given; otherwise a random UUID v4 is assigned, so concurrent creations
    /// cannot collide on clock granularity. Creation never overwrites: an
    /// existing id surfaces as a conflict.
    pub async fn create_task(&self, candidate: NewTask) -> Result<Task, RepositoryError> {
        if candidate.title.trim().is_empty() {
            return Err(RepositoryError::Validation(
                "title must be a non-empty string".to_string(),
            ));
        }

        let task_id = match candidate.task_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        let now = now_millis();
        let task = Task {
            task_id,
            title: candidate.title,
            completed: candidate.completed.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        match self.store.put_if_absent(&task.task_id, task.to_record()).await {
            Ok(()) => Ok(task),
            Err(PutError::AlreadyExists) => Err(RepositoryError::Conflict(task.task_id)),
            Err(PutError::Store(err)) => Err(RepositoryError::Store(err)),
        }
    }

    /// Best-effort bulk delete: scans, then issues one deletion per record
    /// concurrently and joins them all. A single failed deletion does not
    /// abort the others; the returned count is actual successes only.
    pub async fn delete_all_tasks(&self) -> Result<usize, StoreError> {
        let records = self.store.scan_all().await?;

        let deletions = records
            .iter()
            .filter_map(|record| record.get(KEY_ATTRIBUTE).and_then(|v| v.as_s().ok()))
            .map(|key| async move {
                self.store
                    .delete_by_key(key)
                    .await
                    .map_err(|err| (key.clone(), err))
            });

        let mut deleted = 0;
        for result in future::join_all(deletions).await {
            match result {
                Ok(()) => deleted += 1,
                Err((key, err)) => warn!(key = %key, error = %err, "task deletion failed"),
            }
        }

        Ok(deleted)
    }
}
