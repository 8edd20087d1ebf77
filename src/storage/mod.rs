mod reminder_storage;

pub use reminder_storage::{InMemoryReminderStorage, ReminderService, StorageError};
