// src/model/results.rs

use serde::Serialize;

/// Restock quantities for one day, one entry per product, in product order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Action {
    pub restock_amounts: Vec<u32>,
}

impl Action {
    pub fn new(restock_amounts: Vec<u32>) -> Self {
        Self { restock_amounts }
    }

    /// The "do nothing" action.
    pub fn idle(products: usize) -> Self {
        Self {
            restock_amounts: vec![0; products],
        }
    }
}

/// Outcome for one product on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDayResult {
    pub product_id: String,
    /// Stock on hand after the restock, before demand.
    pub stock_level: u32,
    pub demand: u32,
    pub restock_action: u32,
    pub stockout_units: u32,
    pub daily_cost: f64,
    pub daily_revenue: f64,
}

/// All product outcomes for one day plus the day totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub day: usize,
    pub product_results: Vec<ProductDayResult>,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub total_profit: f64,
}

impl SimulationResult {
    pub fn from_products(day: usize, product_results: Vec<ProductDayResult>) -> Self {
        let total_cost: f64 = product_results.iter().map(|r| r.daily_cost).sum();
        let total_revenue: f64 = product_results.iter().map(|r| r.daily_revenue).sum();
        Self {
            day,
            product_results,
            total_cost,
            total_revenue,
            total_profit: total_revenue - total_cost,
        }
    }

    pub fn total_stockouts(&self) -> u64 {
        self.product_results
            .iter()
            .map(|r| r.stockout_units as u64)
            .sum()
    }

    /// Number of products restocked on this day.
    pub fn restock_count(&self) -> usize {
        self.product_results
            .iter()
            .filter(|r| r.restock_action > 0)
            .count()
    }
}
