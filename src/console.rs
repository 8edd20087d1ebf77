use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, bail};
use async_trait::async_trait;

use postrainer::{
    alarm::{AlarmDeliveryChannel, AlarmMessageType},
    presenter::{MessageKey, ReminderListView, SettingsView},
    reminder::{Reminder, ReminderId},
};

pub const HELP: &str = "\
Commands:
  list            show all reminders
  add [title]     create a reminder (default title: New Alarm)
  on <n>          activate reminder n
  off <n>         deactivate reminder n
  delete <n>      delete reminder n
  open <n>        show details of reminder n
  settings        open settings
  contact         contact the developers
  help            show this help
  quit            exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Add(Option<String>),
    Toggle { row: usize, active: bool },
    Delete(usize),
    Open(usize),
    Settings,
    Contact,
    Help,
    Quit,
}

impl std::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match name {
            "list" | "ls" => Command::List,
            "add" => Command::Add((!rest.is_empty()).then(|| rest.to_string())),
            "on" => Command::Toggle {
                row: parse_row(rest)?,
                active: true,
            },
            "off" => Command::Toggle {
                row: parse_row(rest)?,
                active: false,
            },
            "delete" | "rm" => Command::Delete(parse_row(rest)?),
            "open" => Command::Open(parse_row(rest)?),
            "settings" => Command::Settings,
            "contact" => Command::Contact,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("Unknown command `{other}`. Type `help` for a list of commands."),
        };

        Ok(command)
    }
}

/// Rows are numbered from 1 on screen and from 0 internally.
fn parse_row(arg: &str) -> anyhow::Result<usize> {
    let row: usize = arg
        .parse()
        .with_context(|| format!("`{arg}` is not a reminder number"))?;
    if row == 0 {
        bail!("Reminder numbers start at 1");
    }
    Ok(row - 1)
}

/// Terminal rendition of the reminder list screen. Keeps its own copy of the
/// rows the way a list widget would.
#[derive(Default)]
pub struct ConsoleListView {
    rows: Mutex<Vec<Reminder>>,
    pending_toggle: Mutex<Option<PendingToggle>>,
}

struct PendingToggle {
    index: usize,
    was_active: bool,
}

impl ConsoleListView {
    fn rows(&self) -> MutexGuard<'_, Vec<Reminder>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    pub fn row(&self, index: usize) -> Option<Reminder> {
        self.rows().get(index).cloned()
    }

    /// Flips the switch of a row before the presenter is told about it. The
    /// switch snaps back if the presenter reports a write failure before
    /// [`end_toggle`](Self::end_toggle).
    pub fn begin_toggle(&self, index: usize, is_active: bool) {
        if let Some(row) = self.rows().get_mut(index) {
            *self
                .pending_toggle
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(PendingToggle {
                index,
                was_active: row.is_active,
            });
            row.is_active = is_active;
        }
    }

    pub fn end_toggle(&self) {
        self.pending_toggle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn revert_pending_toggle(&self) {
        let pending = self
            .pending_toggle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(PendingToggle { index, was_active }) = pending {
            if let Some(row) = self.rows().get_mut(index) {
                row.is_active = was_active;
            }
        }
    }

    /// Swipes a row away before the presenter is told about it.
    pub fn remove_row(&self, index: usize) -> Option<Reminder> {
        let mut rows = self.rows();
        (index < rows.len()).then(|| rows.remove(index))
    }

    fn print_rows(rows: &[Reminder]) {
        for (i, reminder) in rows.iter().enumerate() {
            println!("{}", display_row(i + 1, reminder));
        }
    }
}

fn display_row(number: usize, reminder: &Reminder) -> String {
    let switch = if reminder.is_active { "[on] " } else { "[off]" };
    format!(
        "{number}. {switch} {} {}",
        reminder.fire_at, reminder.title
    )
}

impl ReminderListView for ConsoleListView {
    fn set_reminder_list_data(&self, reminders: Vec<Reminder>) {
        let mut rows = self.rows();
        *rows = reminders;
        Self::print_rows(&rows);
    }

    fn set_no_reminder_list_data_found(&self) {
        self.rows().clear();
        println!("No reminders yet. Use `add` to create one.");
    }

    fn make_toast(&self, message: MessageKey) {
        if message == MessageKey::ErrorDatabaseWriteFailure {
            self.revert_pending_toggle();
        }
        println!("» {}", message.text());
    }

    fn add_new_reminder_to_list_view(&self, reminder: Reminder) {
        let mut rows = self.rows();
        println!("{}", display_row(rows.len() + 1, &reminder));
        rows.push(reminder);
    }

    fn undo_delete_reminder_at(&self, position: usize, reminder: Reminder) {
        let mut rows = self.rows();
        let position = position.min(rows.len());
        rows.insert(position, reminder);
        println!("Restored reminder {}.", position + 1);
    }

    fn start_settings_activity(&self) {
        println!("Settings: type `contact` to get in touch with the developers.");
    }

    fn start_reminder_detail_activity(&self, id: &ReminderId) {
        let rows = self.rows();
        match rows.iter().find(|reminder| &reminder.id == id) {
            Some(reminder) => println!(
                "Reminder {}\n  title:  {}\n  time:   {}\n  active: {}",
                reminder.id, reminder.title, reminder.fire_at, reminder.is_active
            ),
            None => println!("Reminder {id} is no longer listed."),
        }
    }
}

pub struct ConsoleSettingsView;

impl SettingsView for ConsoleSettingsView {
    fn start_contact_activity(&self, email: &str) {
        println!("Write to us at mailto:{email}");
    }
}

pub struct ConsoleAlarmChannel;

#[async_trait]
impl AlarmDeliveryChannel for ConsoleAlarmChannel {
    async fn send_alarm_notification(&self, reminder: &Reminder, message: AlarmMessageType) {
        match message {
            AlarmMessageType::Fired => println!("⏰ {} ({})", reminder.title, reminder.fire_at),
            AlarmMessageType::Stopped => println!("Alarm for `{}` switched off.", reminder.title),
        }
    }
}
