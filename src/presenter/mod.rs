mod reminder_list;
mod settings;

pub use reminder_list::{ReminderListPresenter, ReminderListView};
pub use settings::{SettingsPresenter, SettingsView};

use std::fmt;

/// Fixed identifiers of user facing toast messages.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MessageKey {
    ErrorDatabaseConnectionFailure,
    ErrorDatabaseWriteFailure,
    MsgAlarmActivated,
    MsgAlarmDeactivated,
    MsgAlarmDeleted,
    MsgReminderLimitReached,
}

impl MessageKey {
    pub fn key(&self) -> &'static str {
        match self {
            MessageKey::ErrorDatabaseConnectionFailure => "error_database_connection_failure",
            MessageKey::ErrorDatabaseWriteFailure => "error_database_write_failure",
            MessageKey::MsgAlarmActivated => "msg_alarm_activated",
            MessageKey::MsgAlarmDeactivated => "msg_alarm_deactivated",
            MessageKey::MsgAlarmDeleted => "msg_alarm_deleted",
            MessageKey::MsgReminderLimitReached => "msg_reminder_limit_reached",
        }
    }

    /// English text shown for the message.
    pub fn text(&self) -> &'static str {
        match self {
            MessageKey::ErrorDatabaseConnectionFailure => "Unable to reach the reminder database.",
            MessageKey::ErrorDatabaseWriteFailure => "Unable to save the reminder.",
            MessageKey::MsgAlarmActivated => "Alarm activated.",
            MessageKey::MsgAlarmDeactivated => "Alarm deactivated.",
            MessageKey::MsgAlarmDeleted => "Alarm deleted.",
            MessageKey::MsgReminderLimitReached => "You can keep at most five reminders.",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
