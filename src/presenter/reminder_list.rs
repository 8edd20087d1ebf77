
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::{
    alarm::{AlarmError, AlarmService},
    reminder::{MAX_REMINDERS, Reminder, ReminderId},
    scheduler_provider::SchedulerProvider,
    storage::{ReminderService, StorageError},
};

use super::MessageKey;

/// Passive display surface of the reminder list screen.
pub trait ReminderListView: Send + Sync {
    fn set_reminder_list_data(&self, reminders: Vec<Reminder>);
    fn set_no_reminder_list_data_found(&self);
    fn make_toast(&self, message: MessageKey);
    fn add_new_reminder_to_list_view(&self, reminder: Reminder);
    fn undo_delete_reminder_at(&self, position: usize, reminder: Reminder);
    fn start_settings_activity(&self);
    fn start_reminder_detail_activity(&self, id: &ReminderId);
}

#[derive(Debug, Error)]
enum PresenterError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Alarm(#[from] AlarmError),

    #[error("Background task failed: {0}")]
    Task(#[from] JoinError),
}

/// Mediates between the reminder list view and the reminder and alarm services.
///
/// Every service failure ends here as a toast. After
/// [`unsubscribe`](Self::unsubscribe) view events are ignored and results still
/// in flight are dropped without touching the view, until the next `subscribe`.
pub struct ReminderListPresenter<V: ReminderListView> {
    view: V,
    reminder_service: Arc<dyn ReminderService>,
    alarm_service: Arc<dyn AlarmService>,
    schedulers: SchedulerProvider,
    lifecycle: Mutex<CancellationToken>,
}

impl<V: ReminderListView> ReminderListPresenter<V> {
    pub fn new(
        view: V,
        reminder_service: Arc<dyn ReminderService>,
        alarm_service: Arc<dyn AlarmService>,
        schedulers: SchedulerProvider,
    ) -> Self {
        Self {
            view,
            reminder_service,
            alarm_service,
            schedulers,
            lifecycle: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub async fn subscribe(&self) {
        {
            let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
            if lifecycle.is_cancelled() {
                *lifecycle = CancellationToken::new();
            }
        }

        let reminder_service = Arc::clone(&self.reminder_service);
        let Some(result) = self
            .run_in_background(async move { reminder_service.get_reminders().await })
            .await
        else {
            return;
        };

        match result {
            Ok(reminders) if reminders.is_empty() => self.view.set_no_reminder_list_data_found(),
            Ok(reminders) => {
                log::debug!("Loaded reminders [count = {}]", reminders.len());
                self.view.set_reminder_list_data(reminders)
            }
            Err(e) => {
                log::warn!("Unable to load reminders [error = {}]", e);
                self.view
                    .make_toast(MessageKey::ErrorDatabaseConnectionFailure)
            }
        }
    }

    pub fn unsubscribe(&self) {
        self.current_lifecycle().cancel();
    }

    pub async fn on_reminder_toggled(&self, requested_state: bool, reminder: Reminder) {
        if self.is_unsubscribed() {
            return;
        }

        let message = if requested_state {
            MessageKey::MsgAlarmActivated
        } else {
            MessageKey::MsgAlarmDeactivated
        };

        if requested_state == reminder.is_active {
            self.view.make_toast(message);
            return;
        }

        let updated = reminder.with_active(requested_state);
        let previous = reminder.clone();
        let reminder_service = Arc::clone(&self.reminder_service);
        let alarm_service = Arc::clone(&self.alarm_service);
        let Some(result) = self
            .run_in_background(async move {
                reminder_service.update_reminder(updated.clone()).await?;
                if let Err(e) = alarm_service.set_alarm(updated).await {
                    // Stored state must keep matching the alarm.
                    if let Err(rollback) = reminder_service.update_reminder(previous.clone()).await {
                        log::warn!(
                            "Unable to roll back reminder after alarm failure [id = {}, error = {}]",
                            previous.id,
                            rollback
                        );
                    }
                    return Err(PresenterError::from(e));
                }
                Ok::<_, PresenterError>(())
            })
            .await
        else {
            return;
        };

        match result {
            Ok(()) => self.view.make_toast(message),
            Err(e) => {
                log::warn!(
                    "Unable to toggle reminder [id = {}, requested_state = {}, error = {}]",
                    reminder.id,
                    requested_state,
                    e
                );
                self.view.make_toast(MessageKey::ErrorDatabaseWriteFailure)
            }
        }
    }

    /// The row at `position` is already gone from the view; it is put back if
    /// the delete fails.
    pub async fn on_reminder_swiped(&self, position: usize, reminder: Reminder) {
        let reminder_service = Arc::clone(&self.reminder_service);
        let alarm_service = Arc::clone(&self.alarm_service);
        let to_delete = reminder.clone();
        let Some(result) = self
            .run_in_background(async move {
                reminder_service.delete_reminder(to_delete.clone()).await?;
                if to_delete.is_active {
                    let id = to_delete.id.clone();
                    if let Err(e) = alarm_service.set_alarm(to_delete.with_active(false)).await {
                        log::warn!(
                            "Unable to disarm alarm of deleted reminder [id = {}, error = {}]",
                            id,
                            e
                        );
                    }
                }
                Ok::<_, PresenterError>(())
            })
            .await
        else {
            return;
        };

        match result {
            Ok(()) => self.view.make_toast(MessageKey::MsgAlarmDeleted),
            Err(e) => {
                log::warn!(
                    "Unable to delete reminder [id = {}, error = {}]",
                    reminder.id,
                    e
                );
                self.view
                    .make_toast(MessageKey::ErrorDatabaseConnectionFailure);
                self.view.undo_delete_reminder_at(position, reminder);
            }
        }
    }

    pub async fn on_create_reminder_button_click(
        &self,
        current_count: usize,
        name: &str,
        id: ReminderId,
    ) {
        if self.is_unsubscribed() {
            return;
        }

        if current_count >= MAX_REMINDERS {
            log::info!("Reminder limit reached [count = {}]", current_count);
            self.view.make_toast(MessageKey::MsgReminderLimitReached);
            return;
        }

        let reminder = Reminder::new(id, name);
        let reminder_service = Arc::clone(&self.reminder_service);
        let to_create = reminder.clone();
        let Some(result) = self
            .run_in_background(async move { reminder_service.create_reminder(to_create).await })
            .await
        else {
            return;
        };

        match result {
            Ok(()) => self.view.add_new_reminder_to_list_view(reminder),
            Err(e) => {
                log::warn!(
                    "Unable to create reminder [id = {}, error = {}]",
                    reminder.id,
                    e
                );
                self.view.make_toast(MessageKey::ErrorDatabaseWriteFailure)
            }
        }
    }

    pub fn on_reminder_icon_click(&self, reminder: &Reminder) {
        if self.is_unsubscribed() {
            return;
        }
        self.view.start_reminder_detail_activity(&reminder.id);
    }

    pub fn on_settings_icon_click(&self) {
        if self.is_unsubscribed() {
            return;
        }
        self.view.start_settings_activity();
    }

    fn is_unsubscribed(&self) -> bool {
        let unsubscribed = self.current_lifecycle().is_cancelled();
        if unsubscribed {
            log::debug!("Ignoring view event after unsubscribe");
        }
        unsubscribed
    }

    fn current_lifecycle(&self) -> CancellationToken {
        self.lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Runs `work` on the background context and hands its single outcome back,
    /// or `None` when the screen was unsubscribed in the meantime.
    async fn run_in_background<F, T, E>(&self, work: F) -> Option<Result<T, PresenterError>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<PresenterError> + Send + 'static,
    {
        let lifecycle = self.current_lifecycle();
        if lifecycle.is_cancelled() {
            return None;
        }

        let handle = self.schedulers.spawn_io(work);
        tokio::select! {
            _ = lifecycle.cancelled() => {
                log::debug!("Dropping result of background work after unsubscribe");
                None
            }
            joined = handle => Some(match joined {
                Ok(result) => result.map_err(Into::into),
                Err(e) => Err(PresenterError::Task(e)),
            }),
        }
    }
}
