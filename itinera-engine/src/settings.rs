use std::env;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    /// Upper bound on every collaborator call; a slower collaborator
    /// surfaces as unavailable rather than hanging the turn.
    #[serde(default = "default_timeout_ms")]
    pub collaborator_timeout_ms: u64,

    /// Passenger name used when the booking slot is absent
    #[serde(default = "default_passenger")]
    pub default_passenger: String,

    /// Fixed reference date for relative-date resolution; today when unset
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_passenger() -> String {
    "Guest".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            collaborator_timeout_ms: default_timeout_ms(),
            default_passenger: default_passenger(),
            reference_date: None,
        }
    }
}

impl EngineSettings {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Eg. `ITINERA_COLLABORATOR_TIMEOUT_MS=250`
            .add_source(config::Environment::with_prefix("ITINERA").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }
}
