mod console;

use std::sync::Arc;

use console::{Command, ConsoleAlarmChannel, ConsoleListView, ConsoleSettingsView, HELP};
use postrainer::{
    alarm::TokioAlarmService,
    appsettings::AppSettings,
    presenter::{ReminderListPresenter, SettingsPresenter},
    reminder::ReminderId,
    scheduler_provider::SchedulerProvider,
    storage::InMemoryReminderStorage,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_REMINDER_NAME: &str = "New Alarm";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let settings = AppSettings::load()?;
    log::info!(
        "Starting postrainer [timezone = {}]",
        settings.alarm.timezone
    );

    let reminder_storage = Arc::new(InMemoryReminderStorage::new());
    let alarm_service = Arc::new(TokioAlarmService::new(
        settings.alarm.timezone,
        Arc::new(ConsoleAlarmChannel),
    ));

    let list_presenter = ReminderListPresenter::new(
        ConsoleListView::default(),
        reminder_storage,
        alarm_service,
        SchedulerProvider::current(),
    );
    let settings_presenter = SettingsPresenter::new(ConsoleSettingsView, settings.contact);

    println!("{HELP}");
    list_presenter.subscribe().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e:#}");
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        handle_command(command, &list_presenter, &settings_presenter).await;
    }

    list_presenter.unsubscribe();
    log::info!("Shutting down");
    Ok(())
}

async fn handle_command(
    command: Command,
    list_presenter: &ReminderListPresenter<ConsoleListView>,
    settings_presenter: &SettingsPresenter<ConsoleSettingsView>,
) {
    let view = list_presenter.view();
    match command {
        Command::List => list_presenter.subscribe().await,
        Command::Add(title) => {
            let id = ReminderId::new(uuid::Uuid::new_v4().to_string());
            let title = title.as_deref().unwrap_or(DEFAULT_REMINDER_NAME);
            list_presenter
                .on_create_reminder_button_click(view.row_count(), title, id)
                .await
        }
        Command::Toggle { row, active } => match view.row(row) {
            Some(reminder) => {
                view.begin_toggle(row, active);
                list_presenter.on_reminder_toggled(active, reminder).await;
                view.end_toggle();
            }
            None => println!("There is no reminder {}.", row + 1),
        },
        Command::Delete(row) => match view.remove_row(row) {
            Some(reminder) => list_presenter.on_reminder_swiped(row, reminder).await,
            None => println!("There is no reminder {}.", row + 1),
        },
        Command::Open(row) => match view.row(row) {
            Some(reminder) => list_presenter.on_reminder_icon_click(&reminder),
            None => println!("There is no reminder {}.", row + 1),
        },
        Command::Settings => list_presenter.on_settings_icon_click(),
        Command::Contact => settings_presenter.on_contact_button_click(),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

fn init_logging() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();
}
