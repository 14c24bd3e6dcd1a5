//! Data types used by the metric pipeline.
//!
//! Input records carry serde renames for the column names of the match-event
//! CSV exports; callers with other layouts map their columns onto these fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::parser::{deserialize_flag, deserialize_minute};

/// Opaque entity key (team, player or match identifier).
pub type EntityId = String;

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One match with a pre-match three-way forecast and the final score.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchForecast {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub home_team_id: EntityId,
    #[serde(default)]
    pub home_team_name: Option<String>,
    pub away_team_id: EntityId,
    #[serde(default)]
    pub away_team_name: Option<String>,
    pub prob_home: f64,
    pub prob_tie: f64,
    pub prob_away: f64,
    pub score_home: f64,
    pub score_away: f64,
}

/// Touches (or any other per-player count) for one player of a team.
#[derive(Debug, Clone, Deserialize)]
pub struct TouchRecord {
    #[serde(rename = "teamId")]
    pub team_id: EntityId,
    #[serde(rename = "teamName", default)]
    pub team_name: Option<String>,
    #[serde(rename = "playerId", default)]
    pub player_id: Option<EntityId>,
    pub touches: f64,
}

/// Where a shot crossed the goal line, in raw data units.
#[derive(Debug, Clone, Deserialize)]
pub struct ShotLocation {
    pub match_id: EntityId,
    pub team_id: EntityId,
    pub x: f64,
    pub y: f64,
}

/// Side of the pitch a team plays on in a given match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    #[serde(rename = "H")]
    Home,
    #[serde(rename = "A")]
    Away,
}

impl Venue {
    pub fn opposite(self) -> Self {
        match self {
            Venue::Home => Venue::Away,
            Venue::Away => Venue::Home,
        }
    }

    /// Direction of the diverging layout: home above the axis, away below.
    pub fn sign(self) -> f64 {
        match self {
            Venue::Home => 1.0,
            Venue::Away => -1.0,
        }
    }
}

/// A single shot with its match minute and expected-goals value.
#[derive(Debug, Clone, Deserialize)]
pub struct ShotEvent {
    pub match_id: EntityId,
    #[serde(rename = "teamId")]
    pub team_id: EntityId,
    #[serde(rename = "teamName", default)]
    pub team_name: Option<String>,
    pub venue: Venue,
    #[serde(rename = "min", deserialize_with = "deserialize_minute")]
    pub minute: u32,
    #[serde(rename = "xG")]
    pub xg: f64,
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(rename = "isOwnGoal", deserialize_with = "deserialize_flag", default)]
    pub is_own_goal: bool,
}

impl ShotEvent {
    pub fn is_goal(&self) -> bool {
        self.event_type == "Goal"
    }
}

/// Season-level foul rates for one player.
#[derive(Debug, Clone, Deserialize)]
pub struct DisciplineRecord {
    #[serde(rename = "playerId")]
    pub player_id: EntityId,
    #[serde(rename = "playerName", default)]
    pub player_name: Option<String>,
    pub fouls_per_90: f64,
    pub cards_per_fouls: f64,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A group whose computation failed; other groups are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFailure {
    pub entity: String,
    pub error: MetricError,
}

/// Output of a table builder: one row per successful group plus the failures.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub rows: Vec<T>,
    pub failures: Vec<GroupFailure>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    pub(crate) fn push(&mut self, entity: impl Into<String>, result: Result<T, MetricError>) {
        match result {
            Ok(row) => self.rows.push(row),
            Err(error) => {
                let entity = entity.into();
                tracing::warn!(entity = %entity, error = %error, "Group skipped");
                self.failures.push(GroupFailure { entity, error });
            }
        }
    }
}

/// Expanding-mean Brier score for one team across its matches.
#[derive(Debug, Clone, Serialize)]
pub struct BrierTrajectory {
    pub team_id: EntityId,
    pub team_name: Option<String>,
    pub scores: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl BrierTrajectory {
    /// Last value of the expanding mean.
    pub fn final_score(&self) -> Option<f64> {
        self.cumulative.last().copied()
    }
}

/// Flat, CSV-friendly view of one point of a [`BrierTrajectory`].
#[derive(Debug, Clone, Serialize)]
pub struct BrierPoint {
    pub team_id: EntityId,
    pub team_name: Option<String>,
    pub match_index: usize,
    pub brier_score: f64,
    pub cum_mean: f64,
}

/// Inequality indices for one team.
#[derive(Debug, Clone, Serialize)]
pub struct InequalityRow {
    pub team_id: EntityId,
    pub team_name: Option<String>,
    pub players: usize,
    pub top_10: f64,
    pub bottom_40: f64,
    pub palma_ratio: f64,
    pub hoover_index: f64,
    pub gini_coefficient: f64,
}

/// One cell of a shot map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinShare {
    pub bin_x: usize,
    pub bin_y: usize,
    pub count: usize,
    pub share: f64,
}

/// Shot distribution across the goal for one team in one match.
#[derive(Debug, Clone, Serialize)]
pub struct ShotMap {
    pub match_id: EntityId,
    pub team_id: EntityId,
    pub total: usize,
    pub binned: usize,
    pub bins: Vec<BinShare>,
}

/// Flat, CSV-friendly view of one cell of a [`ShotMap`].
#[derive(Debug, Clone, Serialize)]
pub struct ShotBinRow {
    pub match_id: EntityId,
    pub team_id: EntityId,
    pub bin_x: usize,
    pub bin_y: usize,
    pub count: usize,
    pub share: f64,
}

impl ShotMap {
    pub fn to_rows(&self) -> Vec<ShotBinRow> {
        self.bins
            .iter()
            .map(|b| ShotBinRow {
                match_id: self.match_id.clone(),
                team_id: self.team_id.clone(),
                bin_x: b.bin_x,
                bin_y: b.bin_y,
                count: b.count,
                share: b.share,
            })
            .collect()
    }
}

/// How a shot ended, as far as the timeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotKind {
    Shot,
    Goal,
    OwnGoal,
}

/// Position of one shot on the two-sided match timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelinePoint {
    pub match_id: EntityId,
    pub team_id: EntityId,
    pub minute: u32,
    pub x: f64,
    pub magnitude: f64,
    pub credited_to: Venue,
    pub kind: ShotKind,
}

/// Per-match xG and goal totals.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub match_id: EntityId,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_xg: f64,
    pub away_xg: f64,
    pub home_goals: u32,
    pub away_goals: u32,
}

/// Position of a player relative to the two league medians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Fouls often and gets booked for it.
    HighFoulsHighCards,
    HighFoulsLowCards,
    LowFoulsHighCards,
    LowFoulsLowCards,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineRow {
    pub player_id: EntityId,
    pub player_name: Option<String>,
    pub fouls_per_90: f64,
    pub cards_per_foul: f64,
    pub quadrant: Quadrant,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineSummary {
    pub median_fouls_per_90: f64,
    pub median_cards_per_foul: f64,
    pub players: Vec<DisciplineRow>,
}
