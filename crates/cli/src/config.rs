use std::env;

use chrono_tz::Tz;
use zonecal_core::CalendarRegistry;

use crate::error::{CommandError, Result};

const DEFAULT_CALENDAR: &str = "default";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Name of the calendar created and used at start-up (default: "default")
    pub default_calendar: String,
    /// Zone of that calendar (default: UTC)
    pub default_timezone: Tz,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ZONECAL_DEFAULT_CALENDAR` - Start-up calendar name (default: "default")
    /// - `ZONECAL_DEFAULT_TIMEZONE` - Start-up calendar zone (default: "UTC")
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("ZONECAL_DEFAULT_CALENDAR").ok(),
            env::var("ZONECAL_DEFAULT_TIMEZONE").ok(),
        )
    }

    /// Builds a configuration from raw values. A blank name falls back to the
    /// default and an unknown zone falls back to UTC with a warning.
    pub fn from_values(calendar: Option<String>, timezone: Option<String>) -> Self {
        let default_calendar = calendar
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_CALENDAR.to_string());

        let default_timezone = match timezone {
            Some(value) => value.trim().parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = %value, "Unknown timezone, falling back to UTC");
                Tz::UTC
            }),
            None => Tz::UTC,
        };

        Self {
            default_calendar,
            default_timezone,
        }
    }

    /// Applies command-line overrides. Unlike the environment, an explicit zone
    /// that does not exist is an error.
    pub fn with_overrides(
        mut self,
        calendar: Option<String>,
        timezone: Option<String>,
    ) -> Result<Self> {
        if let Some(name) = calendar.filter(|name| !name.trim().is_empty()) {
            self.default_calendar = name.trim().to_string();
        }
        if let Some(value) = timezone {
            self.default_timezone = value
                .parse::<Tz>()
                .map_err(|_| CommandError::UnknownZone(value.clone()))?;
        }
        Ok(self)
    }

    /// Creates the registry a session starts with.
    pub fn registry(&self) -> CalendarRegistry {
        CalendarRegistry::with_default(self.default_calendar.as_str(), self.default_timezone)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
