// src/model/mod.rs

pub mod product;
pub mod results;

pub use product::{validate_products, InventoryConfig, Product};
pub use results::{Action, ProductDayResult, SimulationResult};
