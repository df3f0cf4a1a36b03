//! Pass-through service for creatures and explorers.

use std::sync::Arc;

use cryptid_db::Repository;
use cryptid_types::Record;

use crate::error::ServiceError;

/// Forwards each operation to the injected repository.
pub struct RecordService<R: Record> {
    repo: Arc<dyn Repository<R>>,
}

impl<R: Record> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: Record> std::fmt::Debug for RecordService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordService")
            .field("kind", &R::KIND)
            .finish_non_exhaustive()
    }
}

impl<R: Record> RecordService<R> {
    /// Create a service over `repo`.
    pub fn new(repo: Arc<dyn Repository<R>>) -> Self {
        Self { repo }
    }

    /// Every record.
    pub async fn get_all(&self) -> Result<Vec<R>, ServiceError> {
        Ok(self.repo.get_all().await?)
    }

    /// The record keyed by `name`.
    pub async fn get_one(&self, name: &str) -> Result<R, ServiceError> {
        Ok(self.repo.get_one(name).await?)
    }

    /// Store a new record.
    pub async fn create(&self, record: &R) -> Result<R, ServiceError> {
        let created = self.repo.create(record).await?;
        tracing::info!(kind = R::KIND, name = %created.name(), "Record created");
        Ok(created)
    }

    /// Replace the record keyed by `name`.
    pub async fn modify(&self, name: &str, record: &R) -> Result<R, ServiceError> {
        let modified = self.repo.modify(name, record).await?;
        tracing::info!(kind = R::KIND, from = name, to = %modified.name(), "Record modified");
        Ok(modified)
    }

    /// Remove the record keyed by `name`.
    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        self.repo.delete(name).await?;
        tracing::info!(kind = R::KIND, name, "Record deleted");
        Ok(())
    }

    /// One key picked at random, if any records exist.
    pub async fn random_name(&self) -> Result<Option<String>, ServiceError> {
        Ok(self.repo.random_name().await?)
    }
}
