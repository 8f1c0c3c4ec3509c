//! Heuristic cost estimates, independent of matching.

pub mod cost_estimate;

pub use cost_estimate::{estimate_for, get_cost_estimate, CostEstimate};
