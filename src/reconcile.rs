//! One pass of fixture -> calendar block reconciliation.
//!
//! For each fixture: no recorded block means create one; a recorded block for a
//! fixture that changed upstream in the last 24 hours is deleted and recreated;
//! anything else is left alone. Per-fixture failures are reported in the
//! summary and never stop the pass. Mapping I/O failures do.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use crate::acuity::BlockStore;
use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::football_data::FixtureSource;
use crate::mapping::Mapping;
use crate::model::block::NewBlock;
use crate::model::fixture::Fixture;
use crate::window::block_window;

/// A fixture updated at or after `now - STALE_AFTER` has its block rebuilt.
pub const STALE_AFTER: Duration = Duration::hours(24);

/// What to do with one fixture, decided from the mapping alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
    Create,
    Replace { block_id: String },
    Skip,
}

/// How one fixture ended up after the pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FixtureOutcome {
    Created { block_id: String },
    Replaced { old_block_id: String, block_id: String },
    Skipped,
    /// The store refused to delete the stale block; mapping untouched, nothing created.
    DeleteFailed { block_id: String },
    /// No block existed and creating one failed.
    CreateFailed { error: String },
    /// Stale block deleted but the replacement failed: the fixture has no block.
    Unblocked { deleted_block_id: String, error: String },
    /// Dry run: the action that would have been taken.
    Planned { plan: PlannedAction, start: String, end: String },
}

impl FixtureOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FixtureOutcome::DeleteFailed { .. } | FixtureOutcome::CreateFailed { .. } | FixtureOutcome::Unblocked { .. }
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FixtureReport {
    pub fixture_id: String,
    pub opponent: String,
    #[serde(flatten)]
    pub outcome: FixtureOutcome,
}

/// Aggregate of a pass, returned to the caller and logged.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub created: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Fixtures that lost their block this run; needs attention.
    pub unblocked: usize,
    pub fixtures: Vec<FixtureReport>,
}

impl RunSummary {
    fn record(&mut self, fixture: &Fixture, outcome: FixtureOutcome) {
        match &outcome {
            FixtureOutcome::Created { .. } => self.created += 1,
            FixtureOutcome::Replaced { .. } => self.replaced += 1,
            FixtureOutcome::Skipped => self.skipped += 1,
            FixtureOutcome::Unblocked { .. } => {
                self.failed += 1;
                self.unblocked += 1;
            }
            FixtureOutcome::DeleteFailed { .. } | FixtureOutcome::CreateFailed { .. } => self.failed += 1,
            FixtureOutcome::Planned { .. } => {}
        }
        self.fixtures.push(FixtureReport {
            fixture_id: fixture.id.clone(),
            opponent: fixture.opponent.clone(),
            outcome,
        });
    }

    pub fn failures(&self) -> impl Iterator<Item = &FixtureReport> {
        self.fixtures.iter().filter(|r| r.outcome.is_failure())
    }

    /// One-line description for logs and the Lambda response.
    pub fn message(&self) -> String {
        if self.dry_run {
            return format!("Dry run: {} fixtures planned, no changes made.", self.fixtures.len());
        }
        let mut msg = format!(
            "{} fixtures: {} created, {} replaced, {} unchanged, {} failed.",
            self.fixtures.len(),
            self.created,
            self.replaced,
            self.skipped,
            self.failed
        );
        if self.unblocked > 0 {
            msg.push_str(&format!(" {} fixture(s) left without a block.", self.unblocked));
        }
        msg
    }
}

/// Fixed details stamped on every block.
#[derive(Clone, Debug)]
pub struct BlockSettings {
    pub team_name: String,
    pub calendar_id: String,
    pub timezone: Tz,
}

impl BlockSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            team_name: config.team_name.clone(),
            calendar_id: config.calendar_id.clone(),
            timezone: config.timezone,
        }
    }
}

/// Drives one pass. Owns the mapping for the duration of the run.
pub struct Reconciler<S, B> {
    source: S,
    store: B,
    mapping: Mapping,
    settings: BlockSettings,
}

impl<S: FixtureSource, B: BlockStore> Reconciler<S, B> {
    pub fn new(source: S, store: B, mapping: Mapping, settings: BlockSettings) -> Self {
        Self { source, store, mapping, settings }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Fetch fixtures and reconcile all of them. Fails only on fatal errors.
    /// The mapping file must be writable before the store is touched.
    pub fn run(&mut self, now: DateTime<Utc>) -> Result<RunSummary> {
        self.mapping.check_writable()?;
        let fixtures = self.source.fetch()?;
        self.reconcile(&fixtures, now)
    }

    /// Fetch fixtures and report what `run` would do, without touching the store or the mapping file.
    pub fn preview(&self, now: DateTime<Utc>) -> Result<RunSummary> {
        let fixtures = self.source.fetch()?;
        let mut summary = RunSummary { dry_run: true, ..RunSummary::default() };
        for (fixture, plan) in fixtures.iter().zip(self.plan(&fixtures, now)) {
            let window = block_window(fixture.kickoff, self.settings.timezone);
            info!(fixture_id = %fixture.id, opponent = %fixture.opponent, plan = ?plan, fallback = window.fallback, "Planned");
            summary.record(
                fixture,
                FixtureOutcome::Planned { plan, start: window.start_rfc3339(), end: window.end_rfc3339() },
            );
        }
        Ok(summary)
    }

    /// Decide every fixture against the mapping as currently loaded.
    pub fn plan(&self, fixtures: &[Fixture], now: DateTime<Utc>) -> Vec<PlannedAction> {
        fixtures.iter().map(|f| decide(&self.mapping, f, now)).collect()
    }

    /// Plan every fixture against the loaded mapping, then apply the plan.
    pub fn reconcile(&mut self, fixtures: &[Fixture], now: DateTime<Utc>) -> Result<RunSummary> {
        let plan = self.plan(fixtures, now);
        self.apply(fixtures, plan, now)
    }

    /// Execute a plan fixture by fixture, in order. A fixture id seen earlier
    /// in this pass, or one without a plan entry, is decided again against the
    /// mapping as it stands at that point.
    pub fn apply(&mut self, fixtures: &[Fixture], plan: Vec<PlannedAction>, now: DateTime<Utc>) -> Result<RunSummary> {
        if plan.len() != fixtures.len() {
            warn!(fixtures = fixtures.len(), planned = plan.len(), "Plan does not cover the fixture list");
        }
        let mut planned = plan.into_iter();
        let mut seen = HashSet::new();
        let mut summary = RunSummary::default();
        for fixture in fixtures {
            let _span = info_span!("fixture", fixture_id = %fixture.id, opponent = %fixture.opponent).entered();
            let action = match planned.next() {
                Some(action) if seen.insert(fixture.id.as_str()) => action,
                _ => decide(&self.mapping, fixture, now),
            };
            let outcome = self.process(fixture, action)?;
            summary.record(fixture, outcome);
        }
        info!(
            created = summary.created,
            replaced = summary.replaced,
            skipped = summary.skipped,
            failed = summary.failed,
            unblocked = summary.unblocked,
            "Reconciliation finished"
        );
        Ok(summary)
    }

    /// The block a fixture should have right now.
    pub fn block_for(&self, fixture: &Fixture) -> NewBlock {
        let window = block_window(fixture.kickoff, self.settings.timezone);
        if window.fallback {
            info!(kickoff = %fixture.kickoff, "Kickoff time looks provisional; blocking the afternoon");
        }
        NewBlock {
            start: window.start_rfc3339(),
            end: window.end_rfc3339(),
            calendar_id: self.settings.calendar_id.clone(),
            notes: format!("{} v {}", self.settings.team_name, fixture.opponent),
        }
    }

    // Err only for mapping I/O; everything else becomes an outcome.
    fn process(&mut self, fixture: &Fixture, action: PlannedAction) -> Result<FixtureOutcome> {
        match action {
            PlannedAction::Skip => Ok(FixtureOutcome::Skipped),
            PlannedAction::Create => match self.create(fixture)? {
                Ok(block_id) => Ok(FixtureOutcome::Created { block_id }),
                Err(e) => {
                    error!(error = %e, "Failed to create block");
                    Ok(FixtureOutcome::CreateFailed { error: e.to_string() })
                }
            },
            PlannedAction::Replace { block_id: old_block_id } => {
                if !self.store.delete(&old_block_id) {
                    error!(block_id = %old_block_id, "Failed to delete stale block; leaving it in place");
                    return Ok(FixtureOutcome::DeleteFailed { block_id: old_block_id });
                }
                match self.create(fixture)? {
                    Ok(block_id) => Ok(FixtureOutcome::Replaced { old_block_id, block_id }),
                    Err(e) => {
                        let err = SyncError::ReplaceIncomplete {
                            fixture_id: fixture.id.clone(),
                            deleted_block_id: old_block_id.clone(),
                            source: Box::new(e),
                        };
                        error!(alert = true, error = %err, "Fixture left without a calendar block");
                        // The recorded block is gone. Drop the entry so the next run creates afresh.
                        self.mapping.remove(&fixture.id);
                        self.mapping.flush()?;
                        Ok(FixtureOutcome::Unblocked { deleted_block_id: old_block_id, error: err.to_string() })
                    }
                }
            }
        }
    }

    /// Create the fixture's block and persist the mapping. The outer `Result`
    /// carries fatal flush errors; the inner one a store failure.
    fn create(&mut self, fixture: &Fixture) -> Result<Result<String>> {
        let block = self.block_for(fixture);
        let block_id = match self.store.create(&block) {
            Ok(id) => id,
            Err(e) => return Ok(Err(e)),
        };
        if let Some(previous) = self.mapping.insert(&fixture.id, &block_id) {
            debug!(previous = %previous, block_id = %block_id, "Mapping entry now points at new block");
        }
        self.mapping.flush()?;
        Ok(Ok(block_id))
    }
}

/// Create / replace / skip for one fixture.
pub fn decide(mapping: &Mapping, fixture: &Fixture, now: DateTime<Utc>) -> PlannedAction {
    match mapping.get(&fixture.id) {
        None => PlannedAction::Create,
        Some(block_id) if fixture.last_updated >= now - STALE_AFTER => PlannedAction::Replace {
            block_id: block_id.to_string(),
        },
        Some(_) => PlannedAction::Skip,
    }
}
