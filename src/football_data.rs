use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, instrument};

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::model::fixture::{Fixture, MatchesDocument};
use crate::model::id_to_string;

/// Read-only supplier of the tracked team's upcoming home fixtures.
pub trait FixtureSource {
    fn fetch(&self) -> Result<Vec<Fixture>>;
}

/// Client for the football-data.org v4 team matches endpoint.
#[derive(Clone)]
pub struct FootballData {
    base_url: String,
    team_id: String,
    token: String,
    agent: ureq::Agent,
}

impl FootballData {
    pub fn new(base_url: &str, team_id: &str, token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            team_id: team_id.to_string(),
            token: token.to_string(),
            agent: http_agent(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.football_api_url, &config.team_id, &config.football_key)
    }

    fn matches_url(&self) -> String {
        format!("{}/teams/{}/matches", self.base_url, self.team_id)
    }

    /// Map a raw matches document to fixtures, preserving upstream order (no network).
    #[instrument(level = "debug", skip(body), fields(bytes = body.len()))]
    pub fn parse_matches(body: &str) -> Result<Vec<Fixture>> {
        let doc: MatchesDocument = serde_json::from_str(body)
            .map_err(|e| SyncError::MalformedResponse(format!("matches document: {}", e)))?;
        let matches = doc
            .matches
            .ok_or_else(|| SyncError::MalformedResponse("missing `matches`".to_string()))?;

        matches
            .into_iter()
            .enumerate()
            .map(|(idx, m)| {
                let missing = |field: &str| SyncError::MalformedResponse(format!("match #{} missing `{}`", idx, field));
                let id = m.id.as_ref().and_then(id_to_string).ok_or_else(|| missing("id"))?;
                let opponent = m
                    .away_team
                    .as_ref()
                    .and_then(|t| t.label())
                    .ok_or_else(|| missing("awayTeam.tla"))?
                    .to_string();
                let kickoff = parse_utc(m.utc_date.as_deref().ok_or_else(|| missing("utcDate"))?)?;
                let last_updated = parse_utc(m.last_updated.as_deref().ok_or_else(|| missing("lastUpdated"))?)?;
                Ok(Fixture { id, opponent, kickoff, last_updated })
            })
            .collect()
    }
}

impl FixtureSource for FootballData {
    #[instrument(level = "info", skip(self), fields(team_id = %self.team_id))]
    fn fetch(&self) -> Result<Vec<Fixture>> {
        let url = self.matches_url();
        let response = {
            let _span = info_span!("football_data_fetch", url = %url).entered();
            self.agent
                .get(&url)
                .header("X-Auth-Token", self.token.as_str())
                .query("status", "SCHEDULED")
                .query("venue", "HOME")
                .call()
        };
        let response = response.map_err(|e| {
            error!(error = %e, url = %url, "Fixture request failed");
            SyncError::Fetch(format!("request failed: {}", e))
        })?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();
        let body = body_reader
            .read_to_string()
            .map_err(|e| SyncError::Fetch(format!("failed to read response body: {}", e)))?;
        if !(200..300).contains(&status) {
            error!(status, "Fixture source returned non-success status");
            return Err(SyncError::Fetch(format!("status {}: {}", status, body)));
        }

        let fixtures = Self::parse_matches(&body)?;
        info!(count = fixtures.len(), "Fetched home fixtures");
        Ok(fixtures)
    }
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SyncError::MalformedResponse(format!("bad timestamp {:?}: {}", value, e)))
}

/// Blocking HTTP agent that hands non-2xx responses back to the caller instead of erroring.
pub(crate) fn http_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(std::time::Duration::from_secs(30)))
        .build()
        .into()
}
