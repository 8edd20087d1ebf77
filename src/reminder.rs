use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Hard cap on the number of reminders a user may keep at once.
pub const MAX_REMINDERS: usize = 5;

pub const DEFAULT_FIRE_HOUR: u32 = 12;
pub const DEFAULT_FIRE_MINUTE: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderId(String);

impl ReminderId {
    pub fn new(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReminderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderFireTime(NaiveTime);

impl ReminderFireTime {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_nanosecond(0)
            .and_then(|time| time.with_second(0))
            .expect("Zero is always a valid second and nanosecond.");
        Self(normalized_time)
    }

    /// Returns `None` when `hour` or `minute` is out of range.
    pub fn from_hour_minute(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> &NaiveTime {
        &self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl Default for ReminderFireTime {
    fn default() -> Self {
        Self::from_hour_minute(DEFAULT_FIRE_HOUR, DEFAULT_FIRE_MINUTE)
            .expect("Default fire time is in range.")
    }
}

impl fmt::Display for ReminderFireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Two flags carried alongside every reminder. They are stored and handed back
/// untouched; nothing in this crate reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpaqueFlags(pub bool, pub bool);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    pub is_active: bool,
    pub flags: OpaqueFlags,
    pub fire_at: ReminderFireTime,
}

impl Reminder {
    /// A freshly created reminder: inactive, default flags, firing at noon.
    pub fn new(id: ReminderId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_active: false,
            flags: OpaqueFlags::default(),
            fire_at: ReminderFireTime::default(),
        }
    }

    pub fn with_active(&self, is_active: bool) -> Self {
        Self {
            is_active,
            ..self.clone()
        }
    }

    pub fn hour(&self) -> u32 {
        self.fire_at.hour()
    }

    pub fn minute(&self) -> u32 {
        self.fire_at.minute()
    }
}
