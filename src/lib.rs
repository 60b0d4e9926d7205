//! Inventory restocking simulator comparing a fixed heuristic with a
//! tabular Q-learning policy.
//!
//! Typical flow: build an [`model::InventoryConfig`], train a
//! [`strategy::qlearning::QLearningAgent`], roll out both it and the
//! [`strategy::baseline::BaselineStrategy`] over the horizon, and compare
//! the trajectories with [`simulation::comparison::Comparison`].
//! [`simulation::engine::run_comparison`] does all of that in one call.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;
