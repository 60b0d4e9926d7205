// src/strategy/baseline.rs

use crate::error::ConfigError;
use crate::io::demand;
use crate::model::{validate_products, Action, Product, SimulationResult};
use crate::simulation::engine::run_policy;
use crate::simulation::random::RandomSource;
use crate::strategy::traits::{RestockPolicy, StrategyLabel};

/// The benchmark heuristic: "refill to twice the average when low".
///
/// When a product's stock falls below its average historical demand, order
/// enough to reach twice that average, never past the warehouse capacity.
/// Otherwise order nothing. Demand is drawn around the long-run average.
#[derive(Debug, Clone)]
pub struct BaselineStrategy {
    products: Vec<Product>,
    max_capacity: u32,
    avg_demand: Vec<f64>,
}

impl BaselineStrategy {
    pub fn new(products: Vec<Product>, max_capacity: u32) -> Result<Self, ConfigError> {
        validate_products(&products)?;
        let avg_demand = products.iter().map(Product::average_demand).collect();
        Ok(Self {
            products,
            max_capacity,
            avg_demand,
        })
    }

    /// Runs the heuristic for `days` days from the initial stock levels.
    pub fn simulate(&mut self, days: usize, rng: &mut dyn RandomSource) -> Vec<SimulationResult> {
        run_policy(self, days, rng)
    }

    fn restock_for(&self, idx: usize, stock: u32) -> u32 {
        let avg = self.avg_demand[idx];
        let stock = stock as f64;
        if stock >= avg {
            return 0;
        }

        let to_target = 2.0 * avg - stock;
        let headroom = self.max_capacity as f64 - stock;
        let order = to_target.min(headroom);

        // Whole units only; the capacity headroom is integral so rounding keeps the bound.
        if order <= 0.0 {
            0
        } else {
            order.round() as u32
        }
    }
}

impl RestockPolicy for BaselineStrategy {
    fn label(&self) -> StrategyLabel {
        StrategyLabel::Baseline
    }

    fn products(&self) -> &[Product] {
        &self.products
    }

    fn decide(&mut self, stock_levels: &[u32], _day: usize, _rng: &mut dyn RandomSource) -> Action {
        let amounts = stock_levels
            .iter()
            .enumerate()
            .map(|(i, &stock)| self.restock_for(i, stock))
            .collect();
        Action::new(amounts)
    }

    fn draw_demand(&self, product: &Product, _day: usize, rng: &mut dyn RandomSource) -> u32 {
        demand::average_demand(product, rng)
    }
}
