use async_trait::async_trait;

use crate::reminder::Reminder;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AlarmMessageType {
    Fired,
    Stopped,
}

#[async_trait]
pub trait AlarmDeliveryChannel: Send + Sync + 'static {
    async fn send_alarm_notification(&self, reminder: &Reminder, message: AlarmMessageType);
}
