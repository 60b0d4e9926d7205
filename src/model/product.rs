// src/model/product.rs

use crate::error::ConfigError;
use serde::Serialize;
use std::collections::HashSet;

/// Economics and demand history for a single stocked product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub initial_stock: u32,
    pub cost_per_item: f64,
    /// Cost per unit held per day.
    pub storage_cost_per_day: f64,
    /// Cost per unit of unmet demand.
    pub stockout_penalty: f64,
    /// Cycled through day by day to seed the expected demand.
    pub historical_demand: Vec<u32>,
}

impl Product {
    /// Arithmetic mean of the demand history (0 for an empty history).
    pub fn average_demand(&self) -> f64 {
        if self.historical_demand.is_empty() {
            return 0.0;
        }
        let total: u64 = self.historical_demand.iter().map(|&d| d as u64).sum();
        total as f64 / self.historical_demand.len() as f64
    }

    /// Expected demand for `day`, taken from the history cyclically.
    pub fn pattern_demand(&self, day: usize) -> u32 {
        if self.historical_demand.is_empty() {
            return 0;
        }
        self.historical_demand[day % self.historical_demand.len()]
    }
}

/// The full input of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryConfig {
    pub products: Vec<Product>,
    /// Per-product soft ceiling on stock; not enforced across products.
    pub max_warehouse_capacity: u32,
    pub optimization_days: usize,
}

impl InventoryConfig {
    pub fn new(products: Vec<Product>, max_warehouse_capacity: u32, optimization_days: usize) -> Self {
        Self {
            products,
            max_warehouse_capacity,
            optimization_days,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_products(&self.products)?;
        if self.optimization_days == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.max_warehouse_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Sum of initial stock over all products.
    pub fn total_initial_stock(&self) -> u64 {
        self.products.iter().map(|p| p.initial_stock as u64).sum()
    }
}

/// Checks the invariants every strategy relies on: at least one product,
/// unique ids, and a non-empty demand history for each.
pub fn validate_products(products: &[Product]) -> Result<(), ConfigError> {
    if products.is_empty() {
        return Err(ConfigError::NoProducts);
    }

    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if product.historical_demand.is_empty() {
            return Err(ConfigError::EmptyDemandHistory {
                product: product.id.clone(),
            });
        }
        if !seen.insert(product.id.as_str()) {
            return Err(ConfigError::DuplicateProductId(product.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_product(id: &str, initial_stock: u32, history: Vec<u32>) -> Product {
    Product {
        id: id.to_string(),
        name: id.to_string(),
        initial_stock,
        cost_per_item: 10.0,
        storage_cost_per_day: 1.0,
        stockout_penalty: 5.0,
        historical_demand: history,
    }
}
