pub mod alarm;
pub mod appsettings;
pub mod presenter;
pub mod reminder;
pub mod scheduler_provider;
pub mod storage;
