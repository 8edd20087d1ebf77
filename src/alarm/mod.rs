mod delivery;
mod tokio_alarm_service;

pub use delivery::{AlarmDeliveryChannel, AlarmMessageType};
pub use tokio_alarm_service::TokioAlarmService;

use async_trait::async_trait;
use thiserror::Error;

use crate::reminder::{Reminder, ReminderId};

#[derive(Debug, Error)]
pub enum AlarmError {
    /// No runtime to run the alarm on.
    #[error("Alarm service is unavailable: {0}")]
    Unavailable(String),

    #[error("Unable to compute next fire time for reminder [id = {0}]")]
    InvalidFireTime(ReminderId),
}

/// Arms the alarm of an active reminder and disarms the alarm of an inactive one.
#[async_trait]
pub trait AlarmService: Send + Sync {
    async fn set_alarm(&self, reminder: Reminder) -> Result<(), AlarmError>;
}
