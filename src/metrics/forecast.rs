//! Brier scoring of three-way match forecasts.
//!
//! Probabilities are taken as given: they are not checked to lie in `[0, 1]`
//! or to sum to one, and the squared-error formula is applied to whatever the
//! caller supplies. Only inputs that do form a distribution keep the score
//! within `[0, 2/3]`.

use crate::metrics::group::group_by;
use crate::metrics::types::{BrierPoint, BrierTrajectory, EntityId, MatchForecast};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Home,
    Tie,
    Away,
}

/// Predicted probabilities for the three outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prob3 {
    pub home: f64,
    pub tie: f64,
    pub away: f64,
}

impl Outcome {
    /// One-hot encoding in (home, tie, away) order.
    pub fn one_hot(self) -> Prob3 {
        match self {
            Outcome::Home => Prob3 { home: 1.0, tie: 0.0, away: 0.0 },
            Outcome::Tie => Prob3 { home: 0.0, tie: 1.0, away: 0.0 },
            Outcome::Away => Prob3 { home: 0.0, tie: 0.0, away: 1.0 },
        }
    }
}

pub fn classify_outcome(score_home: f64, score_away: f64) -> Outcome {
    if score_home > score_away {
        Outcome::Home
    } else if score_home < score_away {
        Outcome::Away
    } else {
        Outcome::Tie
    }
}

/// `(1/3) * Σ (predicted_k - actual_k)²` over the three outcomes.
pub fn brier_score(predicted: Prob3, actual: Outcome) -> f64 {
    let a = actual.one_hot();
    ((predicted.home - a.home).powi(2)
        + (predicted.tie - a.tie).powi(2)
        + (predicted.away - a.away).powi(2))
        / 3.0
}

/// Running arithmetic mean: `out[i] = mean(values[0..=i])`.
pub fn expanding_mean(values: &[f64]) -> Vec<f64> {
    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            sum += v;
            sum / (i + 1) as f64
        })
        .collect()
}

impl MatchForecast {
    pub fn prediction(&self) -> Prob3 {
        Prob3 {
            home: self.prob_home,
            tie: self.prob_tie,
            away: self.prob_away,
        }
    }

    pub fn outcome(&self) -> Outcome {
        classify_outcome(self.score_home, self.score_away)
    }

    pub fn brier_score(&self) -> f64 {
        brier_score(self.prediction(), self.outcome())
    }
}

/// Builds one expanding-mean trajectory per team.
///
/// A team's sequence holds every match it played, home or away, in input
/// order; input is assumed chronological and is not re-sorted. Teams appear in
/// order of first appearance.
pub fn team_trajectories(matches: &[MatchForecast]) -> Vec<BrierTrajectory> {
    struct Appearance<'a> {
        team_id: &'a EntityId,
        team_name: Option<&'a String>,
        score: f64,
    }

    let mut appearances = Vec::with_capacity(matches.len() * 2);
    for m in matches {
        let score = m.brier_score();
        appearances.push(Appearance {
            team_id: &m.home_team_id,
            team_name: m.home_team_name.as_ref(),
            score,
        });
        if m.away_team_id != m.home_team_id {
            appearances.push(Appearance {
                team_id: &m.away_team_id,
                team_name: m.away_team_name.as_ref(),
                score,
            });
        }
    }

    group_by(&appearances, |a| a.team_id)
        .into_iter()
        .map(|(team_id, group)| {
            let scores: Vec<f64> = group.iter().map(|a| a.score).collect();
            let team_name = group.iter().find_map(|a| a.team_name).cloned();
            tracing::debug!(team_id = %team_id, matches = scores.len(), "Brier trajectory built");

            BrierTrajectory {
                team_id: team_id.clone(),
                team_name,
                cumulative: expanding_mean(&scores),
                scores,
            }
        })
        .collect()
}

/// Sorts trajectories ascending by final cumulative score, most predictable
/// team first. Ties fall back to team id.
pub fn rank_by_final(trajectories: &mut [BrierTrajectory]) {
    trajectories.sort_by(|a, b| {
        let fa = a.final_score().unwrap_or(f64::INFINITY);
        let fb = b.final_score().unwrap_or(f64::INFINITY);
        fa.total_cmp(&fb).then_with(|| a.team_id.cmp(&b.team_id))
    });
}

/// Flattens trajectories into one row per (team, match index).
pub fn trajectory_points(trajectories: &[BrierTrajectory]) -> Vec<BrierPoint> {
    trajectories
        .iter()
        .flat_map(|t| {
            t.scores
                .iter()
                .zip(&t.cumulative)
                .enumerate()
                .map(|(i, (score, cum))| BrierPoint {
                    team_id: t.team_id.clone(),
                    team_name: t.team_name.clone(),
                    match_index: i,
                    brier_score: *score,
                    cum_mean: *cum,
                })
        })
        .collect()
}
