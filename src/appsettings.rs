use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ContactSettings {
    pub email: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AlarmSettings {
    /// Zone in which reminder fire times are read.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

impl Default for AlarmSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> Tz {
    Tz::UTC
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub contact: ContactSettings,
    #[serde(default)]
    pub alarm: AlarmSettings,
}

impl AppSettings {
    /// Reads `appsettings`, then the optional `appsettings.local`, then
    /// `APP__`-prefixed environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("appsettings")
    }

    pub fn load_from(base_name: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(base_name).required(true))
            .add_source(File::with_name(&format!("{base_name}.local")).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
