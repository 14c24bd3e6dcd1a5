//! Distributional inequality indices over a team's per-player measurements.
//!
//! Conventions:
//! - an empty group is an [`MetricError::EmptyGroup`];
//! - a single measurement has nothing to redistribute, so Gini and Hoover are
//!   exactly 0 regardless of its value;
//! - otherwise a zero total (all measurements zero) makes Gini and Hoover
//!   undefined, and a zero lower quantile makes the percentile ratio undefined.
//!
//! Negative measurements are accepted and fed through the formulas unchanged;
//! the `[0, 1)` ranges only hold for non-negative input.

use crate::config::PercentileRatio;
use crate::error::MetricError;
use crate::metrics::group::group_by;
use crate::metrics::types::{InequalityRow, Table, TouchRecord};
use crate::metrics::utility::{check_group, mean, quantile_sorted, sorted};

/// Ratio of the `upper` to the `lower` quantile of `values`.
pub fn percentile_ratio(values: &[f64], upper: f64, lower: f64) -> Result<f64, MetricError> {
    check_group(values, "percentile_ratio")?;
    let s = sorted(values);
    let denominator = quantile_sorted(&s, lower);
    if denominator == 0.0 {
        return Err(MetricError::undefined(
            "percentile_ratio",
            format!("quantile {lower} is zero"),
        ));
    }
    Ok(quantile_sorted(&s, upper) / denominator)
}

/// `0.5 * Σ|x_i - mean| / Σx_i`.
pub fn hoover_index(values: &[f64]) -> Result<f64, MetricError> {
    check_group(values, "hoover_index")?;
    if values.len() == 1 {
        return Ok(0.0);
    }

    let total: f64 = values.iter().sum();
    if total == 0.0 {
        return Err(MetricError::undefined("hoover_index", "total is zero"));
    }

    let m = mean(values);
    let deviation: f64 = values.iter().map(|v| (v - m).abs()).sum();
    Ok(0.5 * deviation / total)
}

/// Gini coefficient via the full pairwise sum
/// `Σ_i Σ_j |x_i - x_j| / (2 n² mean)`. Quadratic in the group size.
pub fn gini_pairwise(values: &[f64]) -> Result<f64, MetricError> {
    let (n, m) = gini_preconditions(values)?;
    if values.len() == 1 {
        return Ok(0.0);
    }

    let mut pair_sum = 0.0;
    for a in values {
        for b in values {
            pair_sum += (a - b).abs();
        }
    }
    Ok(pair_sum / (2.0 * n * n * m))
}

/// Gini coefficient in `O(n log n)`.
///
/// With `x` sorted ascending, `Σ_i Σ_j |x_i - x_j| = 2 Σ_i (2i - n + 1) x_i`
/// (0-based `i`), which gives the same value as [`gini_pairwise`].
pub fn gini_coefficient(values: &[f64]) -> Result<f64, MetricError> {
    let (n, m) = gini_preconditions(values)?;
    if values.len() == 1 {
        return Ok(0.0);
    }

    let s = sorted(values);
    let weighted: f64 = s
        .iter()
        .enumerate()
        .map(|(i, x)| (2.0 * i as f64 - n + 1.0) * x)
        .sum();
    Ok(2.0 * weighted / (2.0 * n * n * m))
}

fn gini_preconditions(values: &[f64]) -> Result<(f64, f64), MetricError> {
    check_group(values, "gini_coefficient")?;
    let m = mean(values);
    if values.len() > 1 && m == 0.0 {
        return Err(MetricError::undefined("gini_coefficient", "mean is zero"));
    }
    Ok((values.len() as f64, m))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InequalityIndices {
    pub upper_quantile: f64,
    pub lower_quantile: f64,
    pub percentile_ratio: f64,
    pub hoover_index: f64,
    pub gini_coefficient: f64,
}

/// All indices for one group of measurements. Fails on the first undefined one.
pub fn inequality_indices(
    values: &[f64],
    ratio: &PercentileRatio,
) -> Result<InequalityIndices, MetricError> {
    check_group(values, "inequality")?;
    let s = sorted(values);

    Ok(InequalityIndices {
        upper_quantile: quantile_sorted(&s, ratio.upper),
        lower_quantile: quantile_sorted(&s, ratio.lower),
        percentile_ratio: percentile_ratio(values, ratio.upper, ratio.lower)?,
        hoover_index: hoover_index(values)?,
        gini_coefficient: gini_coefficient(values)?,
    })
}

/// One row per (team id, team name) with all inequality indices.
///
/// A team whose indices are undefined lands in [`Table::failures`]; the other
/// teams are still computed.
pub fn inequality_table(records: &[TouchRecord], ratio: &PercentileRatio) -> Table<InequalityRow> {
    let mut table = Table::default();

    for ((team_id, team_name), group) in
        group_by(records, |r| (r.team_id.clone(), r.team_name.clone()))
    {
        let touches: Vec<f64> = group.iter().map(|r| r.touches).collect();
        let result = inequality_indices(&touches, ratio).map(|ix| InequalityRow {
            team_id: team_id.clone(),
            team_name,
            players: touches.len(),
            top_10: ix.upper_quantile,
            bottom_40: ix.lower_quantile,
            palma_ratio: ix.percentile_ratio,
            hoover_index: ix.hoover_index,
            gini_coefficient: ix.gini_coefficient,
        });
        tracing::debug!(team_id = %team_id, players = touches.len(), ok = result.is_ok(), "Inequality computed");
        table.push(format!("team={team_id}"), result);
    }

    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InequalityMetric {
    PalmaRatio,
    HooverIndex,
    GiniCoefficient,
}

impl InequalityMetric {
    pub fn value(self, row: &InequalityRow) -> f64 {
        match self {
            InequalityMetric::PalmaRatio => row.palma_ratio,
            InequalityMetric::HooverIndex => row.hoover_index,
            InequalityMetric::GiniCoefficient => row.gini_coefficient,
        }
    }
}

/// Orders rows by one metric for display.
pub fn sort_by_metric(rows: &mut [InequalityRow], metric: InequalityMetric, descending: bool) {
    rows.sort_by(|a, b| {
        let ord = metric.value(a).total_cmp(&metric.value(b));
        if descending { ord.reverse() } else { ord }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_percentile_ratio_one_to_ten() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let s = sorted(&values);
        assert!((quantile_sorted(&s, 0.9) - 9.1).abs() < EPS);
        assert!((quantile_sorted(&s, 0.4) - 4.6).abs() < EPS);

        let ratio = percentile_ratio(&values, 0.9, 0.4).unwrap();
        assert!((ratio - 9.1 / 4.6).abs() < EPS);
        assert!((ratio - 1.978).abs() < 1e-3);
    }

    #[test]
    fn test_percentile_ratio_zero_denominator() {
        let values = [0.0, 0.0, 0.0, 5.0, 10.0];
        assert!(matches!(
            percentile_ratio(&values, 0.9, 0.4),
            Err(MetricError::UndefinedMetric { metric: "percentile_ratio", .. })
        ));
    }

    #[test]
    fn test_singleton_is_zero() {
        assert_eq!(gini_coefficient(&[42.0]), Ok(0.0));
        assert_eq!(gini_pairwise(&[42.0]), Ok(0.0));
        assert_eq!(hoover_index(&[42.0]), Ok(0.0));
        assert_eq!(gini_coefficient(&[0.0]), Ok(0.0));
        assert_eq!(hoover_index(&[0.0]), Ok(0.0));
    }

    #[test]
    fn test_all_zero_is_undefined() {
        let values = [0.0, 0.0, 0.0];
        assert!(matches!(
            gini_coefficient(&values),
            Err(MetricError::UndefinedMetric { .. })
        ));
        assert!(matches!(
            gini_pairwise(&values),
            Err(MetricError::UndefinedMetric { .. })
        ));
        assert!(matches!(
            hoover_index(&values),
            Err(MetricError::UndefinedMetric { .. })
        ));
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(
            gini_coefficient(&[]),
            Err(MetricError::EmptyGroup { metric: "gini_coefficient" })
        );
        assert_eq!(
            hoover_index(&[]),
            Err(MetricError::EmptyGroup { metric: "hoover_index" })
        );
    }

    #[test]
    fn test_equal_values_have_zero_inequality() {
        let values = [5.0; 8];
        assert!(gini_coefficient(&values).unwrap().abs() < EPS);
        assert!(hoover_index(&values).unwrap().abs() < EPS);
    }

    #[test]
    fn test_known_values() {
        // One player holds everything among four.
        let values = [0.0, 0.0, 0.0, 8.0];
        // pairs: 6 ordered pairs of |8-0| = 48; 48 / (2 * 16 * 2) = 0.75
        assert!((gini_coefficient(&values).unwrap() - 0.75).abs() < EPS);
        assert!((gini_pairwise(&values).unwrap() - 0.75).abs() < EPS);
        // deviations: 2+2+2+6 = 12; 0.5 * 12 / 8 = 0.75
        assert!((hoover_index(&values).unwrap() - 0.75).abs() < EPS);
    }

    #[test]
    fn test_inequality_table_scopes_failures() {
        let records = vec![
            touch("1", "Inter", 10.0),
            touch("1", "Inter", 20.0),
            touch("2", "Empoli", 0.0),
            touch("2", "Empoli", 0.0),
            touch("1", "Inter", 30.0),
        ];

        let table = inequality_table(&records, &PercentileRatio::default());
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].team_id, "1");
        assert_eq!(table.rows[0].players, 3);
        assert_eq!(table.rows[0].team_name.as_deref(), Some("Inter"));

        assert_eq!(table.failures.len(), 1);
        assert_eq!(table.failures[0].entity, "team=2");
    }

    #[test]
    fn test_sort_by_metric() {
        let records = vec![
            touch("1", "A", 10.0),
            touch("1", "A", 11.0),
            touch("2", "B", 1.0),
            touch("2", "B", 30.0),
        ];
        let mut rows = inequality_table(&records, &PercentileRatio::default()).rows;
        sort_by_metric(&mut rows, InequalityMetric::GiniCoefficient, true);
        assert_eq!(rows[0].team_id, "2");
        sort_by_metric(&mut rows, InequalityMetric::HooverIndex, false);
        assert_eq!(rows[0].team_id, "1");
    }

    proptest! {
        #[test]
        fn prop_gini_sorted_matches_pairwise(values in proptest::collection::vec(0.0f64..1000.0, 2..60)) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let fast = gini_coefficient(&values).unwrap();
            let naive = gini_pairwise(&values).unwrap();
            prop_assert!((fast - naive).abs() < 1e-9);
        }

        #[test]
        fn prop_gini_and_hoover_bounds(values in proptest::collection::vec(0.0f64..1000.0, 1..60)) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let gini = gini_coefficient(&values).unwrap();
            let hoover = hoover_index(&values).unwrap();
            prop_assert!(gini > -1e-12 && gini < 1.0);
            prop_assert!(hoover > -1e-12 && hoover < 1.0);
        }
    }

    // Helper functions for tests
    fn touch(team_id: &str, team_name: &str, touches: f64) -> TouchRecord {
        TouchRecord {
            team_id: team_id.to_string(),
            team_name: Some(team_name.to_string()),
            player_id: None,
            touches,
        }
    }
}
