//! Error taxonomy for metric computation.

use thiserror::Error;

/// Failure of a single metric computation over one group.
///
/// All variants are deterministic functions of the input, so none of them is
/// worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// A formula's precondition does not hold, e.g. a zero denominator.
    #[error("{metric} is undefined: {reason}")]
    UndefinedMetric {
        metric: &'static str,
        reason: String,
    },

    /// Spatial grid dimensions must be positive even integers.
    #[error("invalid grid {grid_x}x{grid_y}: dimensions must be positive even integers")]
    InvalidGrid { grid_x: usize, grid_y: usize },

    /// Goal frame extents must be positive and finite.
    #[error("invalid goal frame: {reason}")]
    InvalidFrame { reason: String },

    /// The group holds no records at all.
    #[error("{metric} requested for an empty group")]
    EmptyGroup { metric: &'static str },

    /// A measurement was NaN or infinite.
    #[error("{metric} received a non-finite measurement")]
    NonFinite { metric: &'static str },
}

impl MetricError {
    pub(crate) fn undefined(metric: &'static str, reason: impl Into<String>) -> Self {
        MetricError::UndefinedMetric {
            metric,
            reason: reason.into(),
        }
    }
}
