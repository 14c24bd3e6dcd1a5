//! Foul rates against the league medians.

use std::collections::HashSet;

use crate::error::MetricError;
use crate::metrics::types::{DisciplineRecord, DisciplineRow, DisciplineSummary, EntityId, Quadrant};
use crate::metrics::utility::{check_group, median};

/// Players on or above a median count as "high" on that axis.
pub fn quadrant(fouls_per_90: f64, cards_per_foul: f64, median_fouls: f64, median_cards: f64) -> Quadrant {
    match (fouls_per_90 >= median_fouls, cards_per_foul >= median_cards) {
        (true, true) => Quadrant::HighFoulsHighCards,
        (true, false) => Quadrant::HighFoulsLowCards,
        (false, true) => Quadrant::LowFoulsHighCards,
        (false, false) => Quadrant::LowFoulsLowCards,
    }
}

/// Medians of both rates and each player's position relative to them.
/// Players listed in `highlight` are flagged; row order follows the input.
pub fn discipline_summary(
    records: &[DisciplineRecord],
    highlight: &HashSet<EntityId>,
) -> Result<DisciplineSummary, MetricError> {
    let fouls: Vec<f64> = records.iter().map(|r| r.fouls_per_90).collect();
    let cards: Vec<f64> = records.iter().map(|r| r.cards_per_fouls).collect();
    check_group(&fouls, "discipline")?;
    check_group(&cards, "discipline")?;

    let median_fouls_per_90 = median(&fouls);
    let median_cards_per_foul = median(&cards);

    let players = records
        .iter()
        .map(|r| DisciplineRow {
            player_id: r.player_id.clone(),
            player_name: r.player_name.clone(),
            fouls_per_90: r.fouls_per_90,
            cards_per_foul: r.cards_per_fouls,
            quadrant: quadrant(
                r.fouls_per_90,
                r.cards_per_fouls,
                median_fouls_per_90,
                median_cards_per_foul,
            ),
            highlighted: highlight.contains(&r.player_id),
        })
        .collect();

    Ok(DisciplineSummary {
        median_fouls_per_90,
        median_cards_per_foul,
        players,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(
            discipline_summary(&[], &HashSet::new()).unwrap_err(),
            MetricError::EmptyGroup { metric: "discipline" }
        );
    }

    #[test]
    fn test_summary_medians_and_quadrants() {
        let records = vec![
            player("30893", 1.0, 0.10),
            player("207236", 2.5, 0.30),
            player("127130", 2.0, 0.05),
            player("1", 0.5, 0.20),
        ];
        let highlight: HashSet<EntityId> = ["207236".to_string()].into_iter().collect();

        let summary = discipline_summary(&records, &highlight).unwrap();
        assert!((summary.median_fouls_per_90 - 1.5).abs() < 1e-12);
        assert!((summary.median_cards_per_foul - 0.15).abs() < 1e-12);

        let quadrants: Vec<_> = summary.players.iter().map(|p| p.quadrant).collect();
        assert_eq!(
            quadrants,
            vec![
                Quadrant::LowFoulsLowCards,
                Quadrant::HighFoulsHighCards,
                Quadrant::HighFoulsLowCards,
                Quadrant::LowFoulsHighCards,
            ]
        );

        let flagged: Vec<_> = summary
            .players
            .iter()
            .filter(|p| p.highlighted)
            .map(|p| p.player_id.as_str())
            .collect();
        assert_eq!(flagged, vec!["207236"]);
    }

    fn player(id: &str, fouls_per_90: f64, cards_per_fouls: f64) -> DisciplineRecord {
        DisciplineRecord {
            player_id: id.to_string(),
            player_name: None,
            fouls_per_90,
            cards_per_fouls,
        }
    }
}
