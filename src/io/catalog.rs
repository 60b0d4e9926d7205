// src/io/catalog.rs

use crate::error::CatalogError;
use crate::model::{InventoryConfig, Product};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Header written by [`write_catalog`]; any header is accepted on import.
pub const CATALOG_HEADER: [&str; 6] = [
    "Product Name",
    "Initial Stock",
    "Cost Per Item",
    "Storage Cost Per Day",
    "Stockout Penalty",
    "Historical Demand (semicolon separated)",
];

const SAMPLE_CATALOG: &str = "\
Product Name,Initial Stock,Cost Per Item,Storage Cost Per Day,Stockout Penalty,Historical Demand (semicolon separated)
Widget A,100,10.50,0.25,5.00,15;18;12;20;14;16;13;19;17;15
Widget B,75,25.00,0.50,12.00,8;10;12;9;11;7;13;8;10;9
Widget C,50,45.00,1.00,20.00,5;6;4;7;5;6;8;4;5;6
Gadget X,200,8.75,0.20,3.50,25;30;28;32;26;29;31;27;33;28
Gadget Y,150,15.25,0.35,8.00,12;14;16;13;15;11;17;12;14;13
";

/// A ready-made five-product catalogue.
pub fn sample_catalog_csv() -> &'static str {
    SAMPLE_CATALOG
}

/// Parses a product catalogue.
///
/// The first row is a header. Each data row holds name, initial stock, cost
/// per item, storage cost per day, stockout penalty and a semicolon-separated
/// demand history. Rows with fewer than six fields are skipped. Products get
/// ids `product-<n>` from their 1-based data row number.
pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<Product>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut products = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        if record.len() < 6 {
            debug!(row, fields = record.len(), "skipping short catalogue row");
            continue;
        }

        let name = match &record[0] {
            "" => format!("Product {row}"),
            name => name.to_string(),
        };

        products.push(Product {
            id: format!("product-{row}"),
            name,
            initial_stock: parse_field(&record[1], row, "initial stock")?,
            cost_per_item: parse_field(&record[2], row, "cost per item")?,
            storage_cost_per_day: parse_field(&record[3], row, "storage cost per day")?,
            stockout_penalty: parse_field(&record[4], row, "stockout penalty")?,
            historical_demand: parse_history(&record[5], row)?,
        });
    }

    Ok(products)
}

pub fn parse_catalog_str(text: &str) -> Result<Vec<Product>, CatalogError> {
    parse_catalog(text.trim().as_bytes())
}

/// Reads a catalogue file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Product>, CatalogError> {
    let file = File::open(path.as_ref())?;
    let products = parse_catalog(file)?;
    info!(
        path = %path.as_ref().display(),
        products = products.len(),
        "loaded product catalogue"
    );
    Ok(products)
}

/// Builds and validates a configuration around an imported product list.
pub fn into_config(
    products: Vec<Product>,
    max_warehouse_capacity: u32,
    optimization_days: usize,
) -> Result<InventoryConfig, CatalogError> {
    let config = InventoryConfig::new(products, max_warehouse_capacity, optimization_days);
    config.validate()?;
    Ok(config)
}

/// Writes products in the import format, so the output parses back to the same values.
pub fn write_catalog<W: Write>(products: &[Product], writer: W) -> Result<(), CatalogError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CATALOG_HEADER)?;

    for product in products {
        let history = product
            .historical_demand
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(";");
        wtr.write_record([
            product.name.clone(),
            product.initial_stock.to_string(),
            product.cost_per_item.to_string(),
            product.storage_cost_per_day.to_string(),
            product.stockout_penalty.to_string(),
            history,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn parse_field<T: std::str::FromStr>(
    raw: &str,
    row: usize,
    column: &'static str,
) -> Result<T, CatalogError> {
    raw.parse().map_err(|_| CatalogError::InvalidField {
        row,
        column,
        value: raw.to_string(),
    })
}

fn parse_history(raw: &str, row: usize) -> Result<Vec<u32>, CatalogError> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_field(part, row, "historical demand"))
        .collect()
}
