// src/error.rs

use thiserror::Error;

/// Problems with an inventory configuration, caught before any simulated day runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("inventory configuration contains no products")]
    NoProducts,

    #[error("product '{product}' has an empty historical demand sequence")]
    EmptyDemandHistory { product: String },

    #[error("duplicate product id '{0}'")]
    DuplicateProductId(String),

    #[error("optimization horizon must be at least one day")]
    ZeroHorizon,

    #[error("warehouse capacity must be positive")]
    ZeroCapacity,
}

/// Errors raised while importing a product catalogue from CSV.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}: invalid {column} '{value}'")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while exporting comparison results.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
