//! Two-sided match timeline (xG lollipop layout) and per-match totals.
//!
//! Home shots point up and away shots point down. An own goal is drawn on the
//! side of the team it counted for, so its sign is flipped. The flip only
//! applies to events recorded as goals; an own-goal flag on a non-goal event is
//! ignored.

use crate::config::TimelineConfig;
use crate::metrics::group::group_by;
use crate::metrics::types::{MatchSummary, ShotEvent, ShotKind, TimelinePoint, Venue};

/// Horizontal position of an event, nudged away from the half-time break.
pub fn timeline_x(minute: u32, config: &TimelineConfig) -> f64 {
    let offset = if minute < config.second_half_from {
        -config.half_offset
    } else {
        config.half_offset
    };
    minute as f64 + offset
}

impl ShotEvent {
    pub fn kind(&self) -> ShotKind {
        match (self.is_goal(), self.is_own_goal) {
            (true, true) => ShotKind::OwnGoal,
            (true, false) => ShotKind::Goal,
            (false, _) => ShotKind::Shot,
        }
    }

    /// Side of the layout the event is drawn on.
    pub fn credited_to(&self) -> Venue {
        match self.kind() {
            ShotKind::OwnGoal => self.venue.opposite(),
            _ => self.venue,
        }
    }

    /// Signed stem height: positive above the axis (home), negative below.
    pub fn signed_magnitude(&self) -> f64 {
        self.credited_to().sign() * self.xg
    }
}

pub fn timeline_point(event: &ShotEvent, config: &TimelineConfig) -> TimelinePoint {
    TimelinePoint {
        match_id: event.match_id.clone(),
        team_id: event.team_id.clone(),
        minute: event.minute,
        x: timeline_x(event.minute, config),
        magnitude: event.signed_magnitude(),
        credited_to: event.credited_to(),
        kind: event.kind(),
    }
}

/// Lays out every event, grouped by match. Events keep their input order
/// within a match; the position is carried by `x`, not by row order.
pub fn timeline_points(events: &[ShotEvent], config: &TimelineConfig) -> Vec<TimelinePoint> {
    group_by(events, |e| e.match_id.clone())
        .into_iter()
        .flat_map(|(_, group)| group.into_iter().map(move |e| timeline_point(e, config)))
        .collect()
}

/// xG and goal totals per match.
///
/// xG excludes own goals. A side's goals are its own non-own goals plus the
/// opponent's own goals.
pub fn match_summaries(events: &[ShotEvent]) -> Vec<MatchSummary> {
    group_by(events, |e| e.match_id.clone())
        .into_iter()
        .map(|(match_id, group)| {
            let team = |venue: Venue| {
                group
                    .iter()
                    .find(|e| e.venue == venue)
                    .map(|e| e.team_name.clone().unwrap_or_else(|| e.team_id.clone()))
            };

            let mut summary = MatchSummary {
                match_id,
                home_team: team(Venue::Home),
                away_team: team(Venue::Away),
                home_xg: 0.0,
                away_xg: 0.0,
                home_goals: 0,
                away_goals: 0,
            };

            for e in &group {
                if !e.is_own_goal {
                    match e.venue {
                        Venue::Home => summary.home_xg += e.xg,
                        Venue::Away => summary.away_xg += e.xg,
                    }
                }
                if e.is_goal() {
                    match e.credited_to() {
                        Venue::Home => summary.home_goals += 1,
                        Venue::Away => summary.away_goals += 1,
                    }
                }
            }

            summary
        })
        .collect()
}
