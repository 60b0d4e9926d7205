use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use restock_optimizer::io::{catalog, reporting};
use restock_optimizer::simulation::config::{AgentConfig, RunConfig};
use restock_optimizer::simulation::engine::run_comparison;
use restock_optimizer::strategy::baseline::BaselineStrategy;
use restock_optimizer::strategy::qlearning::QLearningAgent;
use restock_optimizer::simulation::random::ConstantSource;

fn sample_config(days: usize) -> restock_optimizer::model::InventoryConfig {
    let products = catalog::parse_catalog_str(catalog::sample_catalog_csv()).unwrap();
    catalog::into_config(products, 500, days).unwrap()
}

#[test]
fn seeded_runs_are_reproducible() {
    let config = sample_config(30);
    let run = RunConfig {
        episodes: 40,
        ..RunConfig::default()
    };

    let first = run_comparison(
        &config,
        &run,
        AgentConfig::default(),
        &mut ChaCha8Rng::seed_from_u64(2024),
    )
    .unwrap();
    let second = run_comparison(
        &config,
        &run,
        AgentConfig::default(),
        &mut ChaCha8Rng::seed_from_u64(2024),
    )
    .unwrap();

    assert_eq!(first.baseline.results, second.baseline.results);
    assert_eq!(first.rl.results, second.rl.results);
    assert_eq!(first.improvement, second.improvement);
}

#[test]
fn full_comparison_exports_one_row_per_product_day() {
    let config = sample_config(20);
    let run = RunConfig {
        episodes: 30,
        batch_size: 7,
        ..RunConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let comparison = run_comparison(&config, &run, AgentConfig::default(), &mut rng).unwrap();

    assert_eq!(comparison.episodes, 30);
    assert!(comparison.baseline.total_cost > 0.0);
    assert!(comparison.improvement.percent_improvement.is_some());

    let mut buf = Vec::new();
    let rows = reporting::write_comparison(&comparison, &mut buf).unwrap();
    assert_eq!(rows, 2 * 20 * 5);

    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().count(), rows + 1);
    assert!(text.lines().nth(1).unwrap().starts_with("Baseline,0,product-1,"));
    assert!(text
        .lines()
        .last()
        .unwrap()
        .starts_with("Reinforcement Learning,19,product-5,"));
}

#[test]
fn every_day_respects_stock_accounting() {
    let config = sample_config(60);
    let mut rng = ChaCha8Rng::seed_from_u64(77);

    let mut agent =
        QLearningAgent::new(config.products.clone(), 500, AgentConfig::default()).unwrap();
    agent.train(50, &mut rng);
    let rl = agent.simulate(60, &mut rng);

    let mut baseline = BaselineStrategy::new(config.products.clone(), 500).unwrap();
    let base = baseline.simulate(60, &mut rng);

    for run in [&rl, &base] {
        let mut carried: Vec<u32> = config.products.iter().map(|p| p.initial_stock).collect();
        for day in run.iter() {
            for (i, r) in day.product_results.iter().enumerate() {
                assert_eq!(r.stock_level, carried[i] + r.restock_action);
                assert_eq!(r.stockout_units, r.demand.saturating_sub(r.stock_level));
                carried[i] = r.stock_level.saturating_sub(r.demand);
            }
        }
    }
}

#[test]
fn baseline_is_deterministic_under_constant_randomness() {
    let config = sample_config(30);
    let mut a = BaselineStrategy::new(config.products.clone(), 500).unwrap();
    let mut b = BaselineStrategy::new(config.products.clone(), 500).unwrap();
    assert_eq!(
        a.simulate(30, &mut ConstantSource(0.5)),
        b.simulate(30, &mut ConstantSource(0.5))
    );
}
