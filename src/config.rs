use std::env;
use std::fmt;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::{Result, SyncError};

pub const DEFAULT_FOOTBALL_API_URL: &str = "https://api.football-data.org/v4";
pub const DEFAULT_TEAM_ID: &str = "62";
pub const DEFAULT_TEAM_NAME: &str = "Everton";
pub const DEFAULT_ACUITY_API_URL: &str = "https://acuityscheduling.com/api/v1";
pub const DEFAULT_CALENDAR_ID: &str = "1802799";

/// League home nation civil time, used for every block window.
pub const HOME_TIMEZONE: Tz = chrono_tz::Europe::London;

/// Everything a run needs, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub football_api_url: String,
    pub football_key: String,
    pub team_id: String,
    pub team_name: String,
    pub acuity_api_url: String,
    pub acuity_user: String,
    pub acuity_key: String,
    pub calendar_id: String,
    /// Must sit on durable storage (an EFS mount under Lambda); the deployment
    /// directory and /tmp do not survive between runs.
    pub mapping_path: PathBuf,
    pub timezone: Tz,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; lets tests avoid touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| SyncError::Config(format!("{} must be set", key)))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            football_key: required("FOOTBALL_KEY")?,
            acuity_user: required("USER_NAME")?,
            acuity_key: required("ACUITY_KEY")?,
            mapping_path: PathBuf::from(required("MAPPING_PATH")?),
            football_api_url: optional("FOOTBALL_API_URL", DEFAULT_FOOTBALL_API_URL),
            team_id: optional("TEAM_ID", DEFAULT_TEAM_ID),
            team_name: optional("TEAM_NAME", DEFAULT_TEAM_NAME),
            acuity_api_url: optional("ACUITY_API_URL", DEFAULT_ACUITY_API_URL),
            calendar_id: optional("CALENDAR_ID", DEFAULT_CALENDAR_ID),
            timezone: HOME_TIMEZONE,
        })
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("football_api_url", &self.football_api_url)
            .field("football_key", &"<redacted>")
            .field("team_id", &self.team_id)
            .field("team_name", &self.team_name)
            .field("acuity_api_url", &self.acuity_api_url)
            .field("acuity_user", &self.acuity_user)
            .field("acuity_key", &"<redacted>")
            .field("calendar_id", &self.calendar_id)
            .field("mapping_path", &self.mapping_path)
            .field("timezone", &self.timezone)
            .finish()
    }
}
