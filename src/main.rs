use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use restock_optimizer::io::{catalog, reporting};
use restock_optimizer::simulation::comparison::{Comparison, StrategySummary};
use restock_optimizer::simulation::config::{AgentConfig, RunConfig};
use restock_optimizer::simulation::engine::run_comparison;
use restock_optimizer::simulation::random::RandomSource;
use std::env;
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    // 1. SETUP CONFIGURATION
    let run = RunConfig::from_env().with_args(env::args().skip(1));

    // 2. LOAD PRODUCTS
    let products = match &run.input_path {
        Some(path) => catalog::load_catalog(path)?,
        None => {
            info!("no catalogue given, using the built-in sample");
            catalog::parse_catalog_str(catalog::sample_catalog_csv())?
        }
    };
    let config = catalog::into_config(products, run.max_warehouse_capacity, run.optimization_days)?;
    info!(
        products = config.products.len(),
        initial_stock = config.total_initial_stock(),
        days = config.optimization_days,
        capacity = config.max_warehouse_capacity,
        "configuration ready"
    );

    // 3. TRAIN AND COMPARE
    let mut seeded;
    let mut thread;
    let rng: &mut dyn RandomSource = match run.seed {
        Some(seed) => {
            seeded = ChaCha8Rng::seed_from_u64(seed);
            &mut seeded
        }
        None => {
            thread = rand::thread_rng();
            &mut thread
        }
    };
    let comparison = run_comparison(&config, &run, AgentConfig::default(), rng)?;

    // 4. EXPORT RESULTS
    let rows = reporting::write_comparison_csv(&run.output_path, &comparison)?;
    println!("Success! {} rows written to ./{}", rows, run.output_path);

    // 5. PRINT COST ANALYSIS
    print_report(&comparison);
    Ok(())
}

fn print_summary(summary: &StrategySummary) {
    println!("{}:", summary.label);
    println!("  Total cost:          ${:.2}", summary.total_cost);
    println!("  Total stockouts:     {}", summary.total_stockouts);
    println!("  Restock frequency:   {:.2}", summary.restocking_frequency);
    for product in summary.product_breakdown() {
        println!(
            "    {}: ${:.2}, {} stockouts, {} restocks",
            product.product_id, product.total_cost, product.total_stockouts, product.restock_count
        );
    }
}

fn print_report(comparison: &Comparison) {
    println!("\n=== Cost Analysis ===");
    print_summary(&comparison.baseline);
    print_summary(&comparison.rl);

    println!("Episodes trained: {}", comparison.episodes);
    println!("Final day profit: ${:.2}", comparison.final_reward);
    println!("Cost reduction:   ${:.2}", comparison.improvement.cost_reduction);
    println!("Stockout change:  {}", comparison.improvement.stockout_reduction);
    match comparison.improvement.percent_improvement {
        Some(pct) => println!("Improvement:      {:.1}%", pct),
        None => println!("Improvement:      n/a (baseline cost is zero)"),
    }
}
