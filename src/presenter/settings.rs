use crate::appsettings::ContactSettings;

pub trait SettingsView: Send + Sync {
    /// Opens a message composer addressed to `email`.
    fn start_contact_activity(&self, email: &str);
}

pub struct SettingsPresenter<V: SettingsView> {
    view: V,
    contact: ContactSettings,
}

impl<V: SettingsView> SettingsPresenter<V> {
    pub fn new(view: V, contact: ContactSettings) -> Self {
        Self { view, contact }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn on_contact_button_click(&self) {
        log::info!("Opening contact message [email = {}]", self.contact.email);
        self.view.start_contact_activity(&self.contact.email);
    }
}
