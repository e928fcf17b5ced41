use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An upcoming home match for the tracked team, as seen on this run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture {
    /// Upstream match id; stable across runs and used as the mapping key.
    pub id: String,
    /// Three-letter code of the visiting team.
    pub opponent: String,
    pub kickoff: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Top level of the football-data `/teams/{id}/matches` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchesDocument {
    pub matches: Option<Vec<Match>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Option<serde_json::Value>,
    pub utc_date: Option<String>,
    pub last_updated: Option<String>,
    pub away_team: Option<MatchTeam>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTeam {
    pub tla: Option<String>,
    pub short_name: Option<String>,
    pub name: Option<String>,
}

impl MatchTeam {
    /// Best short label available: TLA, then short name, then full name.
    pub fn label(&self) -> Option<&str> {
        [&self.tla, &self.short_name, &self.name]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}
