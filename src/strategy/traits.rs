// src/strategy/traits.rs

use crate::model::{Action, Product};
use crate::simulation::random::RandomSource;
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;

/// Which strategy produced a result series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyLabel {
    Baseline,
    ReinforcementLearning,
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyLabel::Baseline => write!(f, "Baseline"),
            StrategyLabel::ReinforcementLearning => write!(f, "Reinforcement Learning"),
        }
    }
}

/// Defines the decision-making logic of a restocking strategy.
///
/// The day loop itself lives in the simulation engine; a policy only picks
/// the restock vector for a day and chooses how that day's demand is drawn.
pub trait RestockPolicy: Debug {
    fn label(&self) -> StrategyLabel;

    /// The products this policy manages, in action order.
    fn products(&self) -> &[Product];

    /// Calculates how much of each product to restock before demand is realized.
    ///
    /// # Arguments
    /// * `stock_levels` - On-hand units per product at the start of the day.
    /// * `day` - Zero-based day index within the run.
    /// * `rng` - Random source for stochastic policies.
    fn decide(&mut self, stock_levels: &[u32], day: usize, rng: &mut dyn RandomSource) -> Action;

    /// Draws the realized demand for `product` on `day`.
    fn draw_demand(&self, product: &Product, day: usize, rng: &mut dyn RandomSource) -> u32;
}
