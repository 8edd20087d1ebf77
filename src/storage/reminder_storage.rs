use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::reminder::{Reminder, ReminderId};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Reminder does not exist [id = {0}]")]
    NotFound(ReminderId),

    #[error("Reminder already exists [id = {0}]")]
    AlreadyExists(ReminderId),

    /// Backend could not be reached. The in-memory storage never fails this
    /// way; persistent implementations report connection loss with it.
    #[error("Reminder storage is unavailable: {0}")]
    Unavailable(String),
}

/// Persistence for reminder records.
///
/// Storage does not enforce the reminder cap; callers do.
#[async_trait]
pub trait ReminderService: Send + Sync {
    async fn get_reminders(&self) -> Result<Vec<Reminder>, StorageError>;
    async fn create_reminder(&self, reminder: Reminder) -> Result<(), StorageError>;
    async fn update_reminder(&self, reminder: Reminder) -> Result<(), StorageError>;
    async fn delete_reminder(&self, reminder: Reminder) -> Result<(), StorageError>;
}

/// Keeps reminders in insertion order.
#[derive(Default)]
pub struct InMemoryReminderStorage {
    store: RwLock<Vec<Reminder>>,
}

impl InMemoryReminderStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderService for InMemoryReminderStorage {
    async fn get_reminders(&self) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        Ok(store.clone())
    }

    async fn create_reminder(&self, reminder: Reminder) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        if store.iter().any(|existing| existing.id == reminder.id) {
            return Err(StorageError::AlreadyExists(reminder.id));
        }

        log::info!("Storing reminder [id = {}]", reminder.id);
        store.push(reminder);
        Ok(())
    }

    async fn update_reminder(&self, reminder: Reminder) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        match store.iter_mut().find(|existing| existing.id == reminder.id) {
            Some(existing) => {
                *existing = reminder;
                Ok(())
            }
            None => Err(StorageError::NotFound(reminder.id)),
        }
    }

    async fn delete_reminder(&self, reminder: Reminder) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        let len_before = store.len();
        store.retain(|existing| existing.id != reminder.id);

        if store.len() == len_before {
            return Err(StorageError::NotFound(reminder.id));
        }

        log::info!("Deleted reminder [id = {}]", reminder.id);
        Ok(())
    }
}
