
use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::{runtime::Handle, sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::reminder::{Reminder, ReminderId};

use super::{AlarmDeliveryChannel, AlarmError, AlarmMessageType, AlarmService};

struct ArmedAlarm {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ArmedAlarm {
    async fn disarm(self) {
        self.cancellation_token.cancel();
        if let Err(e) = self.task.await {
            log::warn!("Alarm task did not shut down cleanly [error = {}]", e);
        }
    }
}

/// Runs one tokio task per armed reminder. Each task fires the reminder daily at
/// its fire time in the configured time zone until it is disarmed.
pub struct TokioAlarmService {
    timezone: Tz,
    delivery_channel: Arc<dyn AlarmDeliveryChannel>,
    alarms: Mutex<HashMap<ReminderId, ArmedAlarm>>,
}

impl TokioAlarmService {
    pub fn new(timezone: Tz, delivery_channel: Arc<dyn AlarmDeliveryChannel>) -> Self {
        Self {
            timezone,
            delivery_channel,
            alarms: Mutex::new(HashMap::new()),
        }
    }

    pub async fn is_armed(&self, id: &ReminderId) -> bool {
        self.alarms.lock().await.contains_key(id)
    }

    /// The `alarms` lock is held for the whole replace so a concurrent
    /// disarm of the same reminder is ordered before or after it, never inside.
    async fn arm(&self, reminder: Reminder) -> Result<(), AlarmError> {
        let now = Utc::now();
        if next_fire_delay(reminder.fire_at.time(), now, &self.timezone).is_none() {
            return Err(AlarmError::InvalidFireTime(reminder.id));
        }
        let runtime = Handle::try_current().map_err(|e| AlarmError::Unavailable(e.to_string()))?;

        let mut alarms = self.alarms.lock().await;
        if let Some(previous) = alarms.remove(&reminder.id) {
            log::info!("Replacing armed alarm [id = {}]", reminder.id);
            previous.disarm().await;
        }

        let id = reminder.id.clone();
        let cancellation_token = CancellationToken::new();
        let task = runtime.spawn(run_alarm(
            reminder,
            now,
            self.timezone,
            Arc::clone(&self.delivery_channel),
            cancellation_token.child_token(),
        ));

        log::info!("Armed alarm [id = {}]", id);
        let armed = ArmedAlarm {
            task,
            cancellation_token,
        };
        if let Some(replaced) = alarms.insert(id, armed) {
            replaced.disarm().await;
        }

        Ok(())
    }

    async fn disarm(&self, reminder: Reminder) {
        let was_armed = {
            let mut alarms = self.alarms.lock().await;
            match alarms.remove(&reminder.id) {
                Some(armed) => {
                    armed.disarm().await;
                    true
                }
                None => false,
            }
        };

        if was_armed {
            log::info!("Disarmed alarm [id = {}]", reminder.id);
            self.delivery_channel
                .send_alarm_notification(&reminder, AlarmMessageType::Stopped)
                .await;
        } else {
            log::debug!("Alarm was not armed [id = {}]", reminder.id);
        }
    }
}

#[async_trait]
impl AlarmService for TokioAlarmService {
    async fn set_alarm(&self, reminder: Reminder) -> Result<(), AlarmError> {
        if reminder.is_active {
            self.arm(reminder).await
        } else {
            self.disarm(reminder).await;
            Ok(())
        }
    }
}

async fn run_alarm(
    reminder: Reminder,
    armed_at: DateTime<Utc>,
    timezone: Tz,
    delivery_channel: Arc<dyn AlarmDeliveryChannel>,
    cancellation_token: CancellationToken,
) {
    let mut now = armed_at;
    loop {
        let Some(delay) = next_fire_delay(reminder.fire_at.time(), now, &timezone) else {
            log::warn!("No next fire time for alarm [id = {}]", reminder.id);
            break;
        };
        let Ok(sleep_for) = delay.to_std() else {
            log::warn!("Next fire time is in the past [id = {}]", reminder.id);
            break;
        };

        tokio::select! {
            _ = cancellation_token.cancelled() => {
                log::debug!("Alarm task cancelled [id = {}]", reminder.id);
                break;
            }
            _ = tokio::time::sleep(sleep_for) => {
                log::info!("Firing alarm [id = {}, title = {}]", reminder.id, reminder.title);
                delivery_channel
                    .send_alarm_notification(&reminder, AlarmMessageType::Fired)
                    .await;
            }
        }

        now += delay;
    }
}

/// Time from `now` until the next moment the wall clock in `timezone` shows
/// `fire_at`. Always strictly positive and at most 25 hours. A local time
/// skipped by a DST jump fires shifted forward by the length of the gap
/// (02:30 becomes 03:30); an ambiguous one uses the earlier instant.
pub(crate) fn next_fire_delay(
    fire_at: &NaiveTime,
    now: DateTime<Utc>,
    timezone: &Tz,
) -> Option<TimeDelta> {
    let today = now.with_timezone(timezone).date_naive();

    (0..=2)
        .filter_map(|days| today.checked_add_signed(TimeDelta::days(days)))
        .filter_map(|date| resolve_local(timezone, date.and_time(*fire_at)))
        .find(|target| *target > now)
        .map(|target| target - now)
}

fn resolve_local(timezone: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match timezone.from_local_datetime(&local) {
        LocalResult::Single(target) | LocalResult::Ambiguous(target, _) => {
            Some(target.with_timezone(&Utc))
        }
        LocalResult::None => {
            // Read the skipped wall time with the offset in force before the jump.
            let day_before = local.checked_sub_signed(TimeDelta::days(1))?;
            let offset_before = timezone.offset_from_utc_datetime(&day_before).fix();
            let utc = local.checked_sub_signed(TimeDelta::seconds(
                offset_before.local_minus_utc().into(),
            ))?;
            Some(utc.and_utc())
        }
    }
}
