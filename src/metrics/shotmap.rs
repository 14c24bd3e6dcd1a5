//! Shot-location binning over the goal face.
//!
//! Raw coordinates are scaled onto the physical frame, then counted into a
//! `grid_x × grid_y` grid of equal cells. Each cell covers the half-open
//! interval `(lo, hi]` on both axes, so a shot exactly on the far post or the
//! crossbar (`x == width`, `y == height`) lands in the last cell while one at
//! exactly 0 is outside the grid. Shares are taken over every shot of the
//! group, binned or not.

use crate::config::GoalFrame;
use crate::error::MetricError;
use crate::metrics::group::group_by;
use crate::metrics::types::{BinShare, ShotLocation, ShotMap, Table};

/// A validated binning grid over a [`GoalFrame`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShotGrid {
    frame: GoalFrame,
    grid_x: usize,
    grid_y: usize,
}

impl ShotGrid {
    /// Fails with [`MetricError::InvalidGrid`] unless both dimensions are
    /// positive even integers, and with [`MetricError::InvalidFrame`] unless
    /// every frame extent is positive and finite.
    pub fn new(frame: GoalFrame, grid_x: usize, grid_y: usize) -> Result<Self, MetricError> {
        if grid_x == 0 || grid_y == 0 || grid_x % 2 != 0 || grid_y % 2 != 0 {
            return Err(MetricError::InvalidGrid { grid_x, grid_y });
        }
        let extents = [
            ("width", frame.width),
            ("height", frame.height),
            ("input_width", frame.input_width),
            ("input_height", frame.input_height),
        ];
        if let Some((name, value)) = extents.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(MetricError::InvalidFrame {
                reason: format!("{name} must be positive, got {value}"),
            });
        }
        Ok(Self {
            frame,
            grid_x,
            grid_y,
        })
    }

    /// Grid with the frame's own default dimensions.
    pub fn from_frame(frame: GoalFrame) -> Result<Self, MetricError> {
        let (gx, gy) = (frame.grid_x, frame.grid_y);
        Self::new(frame, gx, gy)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.grid_x, self.grid_y)
    }

    pub fn cell_count(&self) -> usize {
        self.grid_x * self.grid_y
    }

    /// Width and height of one cell in physical units.
    pub fn cell_size(&self) -> (f64, f64) {
        (
            self.frame.width / self.grid_x as f64,
            self.frame.height / self.grid_y as f64,
        )
    }

    /// Maps a raw data coordinate onto the physical goal face.
    pub fn rescale(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.frame.width / self.frame.input_width,
            y * self.frame.height / self.frame.input_height,
        )
    }

    /// Cell holding a physical point, or `None` when it is outside the frame.
    pub fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !(x > 0.0 && x <= self.frame.width && y > 0.0 && y <= self.frame.height) {
            return None;
        }
        let (cw, ch) = self.cell_size();
        // Rounding can put a point on the far edge one cell past the grid.
        let bx = ((x / cw).ceil() as usize).clamp(1, self.grid_x) - 1;
        let by = ((y / ch).ceil() as usize).clamp(1, self.grid_y) - 1;
        Some((bx, by))
    }

    /// Flat index of a cell: x-major, y ascending within each column.
    fn flat_index(&self, bx: usize, by: usize) -> usize {
        bx * self.grid_y + by
    }

    /// Bins one group of shots.
    ///
    /// Each share is the cell count over the group's total shot count, so
    /// shots outside the frame lower every share. An empty group yields every
    /// cell with a zero share.
    pub fn bin_shares(&self, shots: &[&ShotLocation]) -> (usize, Vec<BinShare>) {
        let mut counts = vec![0usize; self.cell_count()];
        let mut binned = 0usize;

        for shot in shots {
            let (x, y) = self.rescale(shot.x, shot.y);
            if let Some((bx, by)) = self.cell_of(x, y) {
                counts[self.flat_index(bx, by)] += 1;
                binned += 1;
            }
        }

        let mut bins = Vec::with_capacity(self.cell_count());
        for bx in 0..self.grid_x {
            for by in 0..self.grid_y {
                let count = counts[self.flat_index(bx, by)];
                let share = if shots.is_empty() {
                    0.0
                } else {
                    count as f64 / shots.len() as f64
                };
                bins.push(BinShare {
                    bin_x: bx,
                    bin_y: by,
                    count,
                    share,
                });
            }
        }

        (binned, bins)
    }

    /// Fails with [`MetricError::NonFinite`] when a shot has a NaN or
    /// infinite coordinate.
    fn shot_map(
        &self,
        match_id: &str,
        team_id: &str,
        shots: &[&ShotLocation],
    ) -> Result<ShotMap, MetricError> {
        if shots.iter().any(|s| !(s.x.is_finite() && s.y.is_finite())) {
            return Err(MetricError::NonFinite { metric: "shot_map" });
        }
        let (binned, bins) = self.bin_shares(shots);
        if binned < shots.len() {
            tracing::debug!(
                match_id,
                team_id,
                outside = shots.len() - binned,
                "Shots outside the goal frame were not binned"
            );
        }
        Ok(ShotMap {
            match_id: match_id.to_string(),
            team_id: team_id.to_string(),
            total: shots.len(),
            binned,
            bins,
        })
    }
}

/// One shot map per (match, team) present in `shots`. A group with a
/// non-finite coordinate is reported in `failures`.
pub fn shot_map_table(shots: &[ShotLocation], grid: &ShotGrid) -> Table<ShotMap> {
    let mut table = Table::default();
    for ((match_id, team_id), group) in
        group_by(shots, |s| (s.match_id.clone(), s.team_id.clone()))
    {
        let map = grid.shot_map(&match_id, &team_id, &group);
        table.push(format!("match={match_id},team={team_id}"), map);
    }
    table
}

/// Shot map for one (match, team) pair. A pair with no shots gets an all-zero
/// map rather than an error.
pub fn shot_map_for(
    shots: &[ShotLocation],
    grid: &ShotGrid,
    match_id: &str,
    team_id: &str,
) -> Result<ShotMap, MetricError> {
    let group: Vec<&ShotLocation> = shots
        .iter()
        .filter(|s| s.match_id == match_id && s.team_id == team_id)
        .collect();
    grid.shot_map(match_id, team_id, &group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_rejects_odd_or_zero() {
        let frame = GoalFrame::default();
        assert_eq!(
            ShotGrid::new(frame.clone(), 5, 2),
            Err(MetricError::InvalidGrid { grid_x: 5, grid_y: 2 })
        );
        assert!(ShotGrid::new(frame.clone(), 6, 3).is_err());
        assert!(ShotGrid::new(frame.clone(), 0, 2).is_err());
        assert!(ShotGrid::new(frame, 6, 2).is_ok());
    }

    #[test]
    fn test_grid_rejects_degenerate_frame() {
        let frame = GoalFrame {
            input_width: 0.0,
            ..GoalFrame::default()
        };
        assert!(matches!(
            ShotGrid::new(frame, 6, 2),
            Err(MetricError::InvalidFrame { .. })
        ));

        let frame = GoalFrame {
            height: f64::NAN,
            ..GoalFrame::default()
        };
        assert!(matches!(
            ShotGrid::from_frame(frame),
            Err(MetricError::InvalidFrame { .. })
        ));
    }

    #[test]
    fn test_rescale_to_goal_frame() {
        let grid = default_grid();
        let (x, y) = grid.rescale(2.1, 0.7);
        assert!((x - 24.0).abs() < 1e-9);
        assert!((y - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_cells_are_right_closed() {
        let grid = default_grid();
        // 6x2 over 24x8: cells are 4 wide and 4 high.
        assert_eq!(grid.cell_of(0.001, 0.001), Some((0, 0)));
        assert_eq!(grid.cell_of(4.0, 4.0), Some((0, 0)));
        assert_eq!(grid.cell_of(4.001, 4.001), Some((1, 1)));
        assert_eq!(grid.cell_of(24.0, 8.0), Some((5, 1)));
        assert_eq!(grid.cell_of(0.0, 1.0), None);
        assert_eq!(grid.cell_of(1.0, 0.0), None);
        assert_eq!(grid.cell_of(24.1, 1.0), None);
        assert_eq!(grid.cell_of(1.0, 8.1), None);
        assert_eq!(grid.cell_of(-0.1, 1.0), None);
    }

    #[test]
    fn test_shot_on_far_corner_is_binned() {
        let grid = default_grid();
        let map = shot_map_for(&[shot("m", "t", 2.1, 0.7)], &grid, "m", "t").unwrap();
        assert_eq!(map.binned, 1);
        assert_eq!(map.bins[11].count, 1);
        assert_eq!(map.bins[11].share, 1.0);

        let map = shot_map_for(&[shot("m", "t", 0.0, 0.3)], &grid, "m", "t").unwrap();
        assert_eq!(map.binned, 0);
        assert!(map.bins.iter().all(|b| b.share == 0.0));
    }

    #[test]
    fn test_shares_use_total_shot_count() {
        let grid = default_grid();
        let shots = vec![shot("m", "t", 0.1, 0.1), shot("m", "t", 1.0, 0.9)];
        let map = shot_map_for(&shots, &grid, "m", "t").unwrap();
        assert_eq!(map.total, 2);
        assert_eq!(map.binned, 1);
        assert_eq!(map.bins[0].share, 0.5);
        let sum: f64 = map.bins.iter().map(|b| b.share).sum();
        assert!((sum - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bin_order_is_x_major() {
        let grid = default_grid();
        let (_, bins) = grid.bin_shares(&[]);
        let order: Vec<_> = bins.iter().map(|b| (b.bin_x, b.bin_y)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1), (3, 0), (3, 1), (4, 0), (4, 1), (5, 0), (5, 1)]
        );
    }

    #[test]
    fn test_empty_group_is_all_zero() {
        let grid = default_grid();
        let map = shot_map_for(&[], &grid, "1", "2").unwrap();
        assert_eq!(map.total, 0);
        assert_eq!(map.bins.len(), 12);
        assert!(map.bins.iter().all(|b| b.share == 0.0 && b.count == 0));
    }

    #[test]
    fn test_shot_map_table_per_match_and_team() {
        let grid = default_grid();
        let shots = vec![
            // raw (0.5, 0.5) -> physical (5.7, 5.7) -> cell (1, 1)
            shot("m1", "t1", 0.5, 0.5),
            shot("m1", "t1", 0.1, 0.1),
            shot("m1", "t1", 0.1, 0.1),
            shot("m1", "t2", 2.0, 0.6),
            // outside the frame
            shot("m1", "t2", 2.5, 0.1),
        ];

        let table = shot_map_table(&shots, &grid);
        assert!(table.failures.is_empty());
        assert_eq!(table.rows.len(), 2);

        let t1 = &table.rows[0];
        assert_eq!((t1.match_id.as_str(), t1.team_id.as_str()), ("m1", "t1"));
        assert_eq!(t1.total, 3);
        assert!((t1.bins[0].share - 2.0 / 3.0).abs() < 1e-12);
        assert!((t1.bins[3].share - 1.0 / 3.0).abs() < 1e-12);

        let t2 = &table.rows[1];
        assert_eq!(t2.total, 2);
        assert_eq!(t2.binned, 1);
        assert_eq!(t2.bins[11].share, 0.5);
    }

    #[test]
    fn test_non_finite_coordinate_fails_only_its_group() {
        let grid = default_grid();
        let shots = vec![
            shot("m1", "t1", 0.5, 0.5),
            shot("m1", "t2", f64::NAN, 0.5),
            shot("m1", "t2", 0.5, 0.5),
        ];

        let table = shot_map_table(&shots, &grid);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].team_id, "t1");
        assert_eq!(table.failures.len(), 1);
        assert_eq!(table.failures[0].entity, "match=m1,team=t2");
        assert_eq!(
            table.failures[0].error,
            MetricError::NonFinite { metric: "shot_map" }
        );
    }

    #[test]
    fn test_to_rows_flattens() {
        let grid = default_grid();
        let map = shot_map_for(&[shot("m", "t", 0.1, 0.1)], &grid, "m", "t").unwrap();
        let rows = map.to_rows();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].count, 1);
        assert_eq!(rows[0].match_id, "m");
    }

    proptest! {
        #[test]
        fn prop_shares_sum_to_one_inside_frame(points in proptest::collection::vec((0.01f64..2.1, 0.01f64..0.7), 1..80)) {
            let grid = default_grid();
            let shots: Vec<ShotLocation> = points.iter().map(|(x, y)| shot("m", "t", *x, *y)).collect();
            let map = shot_map_for(&shots, &grid, "m", "t").unwrap();
            prop_assert_eq!(map.binned, shots.len());
            let sum: f64 = map.bins.iter().map(|b| b.share).sum();
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_share_sum_is_binned_fraction(points in proptest::collection::vec((-1.0f64..3.0, -1.0f64..1.0), 1..80)) {
            let grid = default_grid();
            let shots: Vec<ShotLocation> = points.iter().map(|(x, y)| shot("m", "t", *x, *y)).collect();
            let map = shot_map_for(&shots, &grid, "m", "t").unwrap();
            let sum: f64 = map.bins.iter().map(|b| b.share).sum();
            prop_assert!((sum - map.binned as f64 / map.total as f64).abs() < 1e-9);
        }
    }

    // Helper functions for tests
    fn default_grid() -> ShotGrid {
        ShotGrid::from_frame(GoalFrame::default()).unwrap()
    }

    fn shot(match_id: &str, team_id: &str, x: f64, y: f64) -> ShotLocation {
        ShotLocation {
            match_id: match_id.to_string(),
            team_id: team_id.to_string(),
            x,
            y,
        }
    }
}
