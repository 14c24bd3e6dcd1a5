//! Metric computation over match-event records.
//!
//! Every table builder groups its input by entity key, reduces each group with
//! a pure function and collects the results. Nothing here does I/O.

pub mod discipline;
pub mod forecast;
pub mod group;
pub mod inequality;
pub mod shotmap;
pub mod timeline;
pub mod types;
pub mod utility;
