// src/simulation/engine.rs

use crate::error::ConfigError;
use crate::model::{Action, InventoryConfig, Product, ProductDayResult, SimulationResult};
use crate::simulation::comparison::Comparison;
use crate::simulation::config::{AgentConfig, RunConfig};
use crate::simulation::random::RandomSource;
use crate::strategy::baseline::BaselineStrategy;
use crate::strategy::qlearning::QLearningAgent;
use crate::strategy::traits::RestockPolicy;
use tracing::{debug, info};

/// Revenue per unit sold, as a multiple of the unit cost.
pub const SALE_MARKUP: f64 = 1.5;

/// Adds the day's restock to every product at once.
pub fn apply_restock(stock_levels: &mut [u32], action: &Action) {
    for (stock, amount) in stock_levels.iter_mut().zip(&action.restock_amounts) {
        *stock = stock.saturating_add(*amount);
    }
}

/// Books one day of demand against stock that has already been restocked.
///
/// Records the post-restock stock level per product, then removes the
/// realized demand (clamped at zero) from `stock_levels`.
pub fn settle_day(
    products: &[Product],
    stock_levels: &mut [u32],
    action: &Action,
    demand: &[u32],
    day: usize,
) -> SimulationResult {
    debug_assert_eq!(stock_levels.len(), products.len());
    debug_assert_eq!(demand.len(), products.len());
    debug_assert_eq!(action.restock_amounts.len(), products.len());

    let mut product_results = Vec::with_capacity(products.len());

    for (i, product) in products.iter().enumerate() {
        let stock = stock_levels[i];
        let restock = action.restock_amounts[i];
        let wanted = demand[i];

        let sold = wanted.min(stock);
        let stockouts = wanted.saturating_sub(stock);

        let daily_revenue = sold as f64 * product.cost_per_item * SALE_MARKUP;
        let daily_cost = stock as f64 * product.storage_cost_per_day
            + restock as f64 * product.cost_per_item
            + stockouts as f64 * product.stockout_penalty;

        product_results.push(ProductDayResult {
            product_id: product.id.clone(),
            stock_level: stock,
            demand: wanted,
            restock_action: restock,
            stockout_units: stockouts,
            daily_cost,
            daily_revenue,
        });

        stock_levels[i] = stock.saturating_sub(wanted);
    }

    SimulationResult::from_products(day, product_results)
}

/// Runs `policy` for `days` days starting from every product's initial stock.
pub fn run_policy<P>(policy: &mut P, days: usize, rng: &mut dyn RandomSource) -> Vec<SimulationResult>
where
    P: RestockPolicy + ?Sized,
{
    let products = policy.products().to_vec();
    let mut stock_levels: Vec<u32> = products.iter().map(|p| p.initial_stock).collect();
    let mut results = Vec::with_capacity(days);

    for day in 0..days {
        let action = policy.decide(&stock_levels, day, rng);
        apply_restock(&mut stock_levels, &action);

        let demand: Vec<u32> = products
            .iter()
            .map(|p| policy.draw_demand(p, day, rng))
            .collect();

        results.push(settle_day(&products, &mut stock_levels, &action, &demand, day));
    }

    let total_cost: f64 = results.iter().map(|r| r.total_cost).sum();
    debug!(strategy = %policy.label(), days, total_cost, "rollout complete");
    results
}

/// Trains a learner, rolls out both strategies over the configured horizon
/// and compares them.
pub fn run_comparison(
    config: &InventoryConfig,
    run: &RunConfig,
    agent_config: AgentConfig,
    rng: &mut dyn RandomSource,
) -> Result<Comparison, ConfigError> {
    config.validate()?;

    let mut agent = QLearningAgent::new(
        config.products.clone(),
        config.max_warehouse_capacity,
        agent_config,
    )?;

    let batch = run.batch_size.max(1);
    let mut trained = 0;
    while trained < run.episodes {
        let step = batch.min(run.episodes - trained);
        let report = agent.train(step, rng);
        trained += step;
        info!(
            episodes = trained,
            total = run.episodes,
            epsilon = report.epsilon,
            states = report.states,
            "training batch complete"
        );
    }

    let rl_results = agent.simulate(config.optimization_days, rng);

    let mut baseline = BaselineStrategy::new(config.products.clone(), config.max_warehouse_capacity)?;
    let baseline_results = baseline.simulate(config.optimization_days, rng);

    let comparison = Comparison::from_results(
        baseline_results,
        rl_results,
        config.optimization_days,
        trained,
    )
    .ok_or(ConfigError::ZeroHorizon)?;

    info!(
        baseline_cost = comparison.baseline.total_cost,
        rl_cost = comparison.rl.total_cost,
        cost_reduction = comparison.improvement.cost_reduction,
        "comparison complete"
    );
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::product::test_product;
    use crate::simulation::random::ConstantSource;
    use crate::strategy::traits::StrategyLabel;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn settle_day_books_sales_stockouts_and_costs() {
        let products = vec![test_product("a", 0, vec![5])];
        let mut stock = vec![2];
        let action = Action::new(vec![0]);
        let day = settle_day(&products, &mut stock, &action, &[5], 0);

        let r = &day.product_results[0];
        assert_eq!(r.stock_level, 2);
        assert_eq!(r.stockout_units, 3);
        // 2 sold * 10 * 1.5
        assert!((r.daily_revenue - 30.0).abs() < 1e-9);
        // 2 held * 1 + 0 restock + 3 short * 5
        assert!((r.daily_cost - 17.0).abs() < 1e-9);
        assert!((day.total_profit - 13.0).abs() < 1e-9);
        assert_eq!(stock, vec![0]);
    }

    #[test]
    fn restock_is_applied_before_demand() {
        let products = vec![test_product("a", 0, vec![5]), test_product("b", 0, vec![5])];
        let mut stock = vec![1, 4];
        let action = Action::new(vec![6, 0]);
        apply_restock(&mut stock, &action);
        let day = settle_day(&products, &mut stock, &action, &[5, 5], 3);

        assert_eq!(day.day, 3);
        assert_eq!(day.product_results[0].stock_level, 7);
        assert_eq!(day.product_results[0].stockout_units, 0);
        assert_eq!(day.product_results[1].stockout_units, 1);
        assert_eq!(stock, vec![2, 0]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn settle_day_rejects_mismatched_lengths() {
        let products = vec![test_product("a", 0, vec![5])];
        let mut stock = vec![2];
        settle_day(&products, &mut stock, &Action::new(vec![0]), &[5, 5], 0);
    }

    #[derive(Debug)]
    struct FixedPolicy {
        products: Vec<Product>,
        restock: u32,
    }

    impl RestockPolicy for FixedPolicy {
        fn label(&self) -> StrategyLabel {
            StrategyLabel::Baseline
        }

        fn products(&self) -> &[Product] {
            &self.products
        }

        fn decide(&mut self, stock_levels: &[u32], _day: usize, _rng: &mut dyn RandomSource) -> Action {
            Action::new(vec![self.restock; stock_levels.len()])
        }

        fn draw_demand(&self, product: &Product, day: usize, _rng: &mut dyn RandomSource) -> u32 {
            product.pattern_demand(day)
        }
    }

    #[test]
    fn run_policy_produces_one_result_per_day() {
        let mut policy = FixedPolicy {
            products: vec![test_product("a", 10, vec![4, 6])],
            restock: 3,
        };
        let mut rng = ConstantSource(0.5);
        let results = run_policy(&mut policy, 4, &mut rng);

        assert_eq!(results.len(), 4);
        let levels: Vec<u32> = results.iter().map(|r| r.product_results[0].stock_level).collect();
        // 10+3=13 -4 -> 9+3=12 -6 -> 6+3=9 -4 -> 5+3=8
        assert_eq!(levels, vec![13, 12, 9, 8]);
        assert!(run_policy(&mut policy, 0, &mut rng).is_empty());
    }

    #[test]
    fn run_comparison_rejects_malformed_config() {
        let config = InventoryConfig::new(vec![test_product("a", 5, vec![])], 100, 10);
        let mut rng = ConstantSource(0.5);
        let err = run_comparison(&config, &RunConfig::default(), AgentConfig::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDemandHistory { .. }));
    }

    #[test]
    fn run_comparison_trains_requested_episodes() {
        let config = InventoryConfig::new(
            vec![test_product("a", 20, vec![8, 12, 10]), test_product("b", 5, vec![3, 4])],
            100,
            12,
        );
        let run = RunConfig {
            episodes: 25,
            batch_size: 10,
            ..RunConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let comparison = run_comparison(&config, &run, AgentConfig::default(), &mut rng).unwrap();

        assert_eq!(comparison.episodes, 25);
        assert_eq!(comparison.baseline.results.len(), 12);
        assert_eq!(comparison.rl.results.len(), 12);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: post-demand stock equals max(0, restocked - demand),
        /// stockouts equal max(0, demand - restocked), and stock never goes negative.
        #[test]
        fn settle_day_conserves_stock(
            start in prop::collection::vec(0u32..200, 1..6),
            restock_seed in prop::collection::vec(0u32..100, 6),
            demand_seed in prop::collection::vec(0u32..300, 6),
        ) {
            let n = start.len();
            let products: Vec<Product> = (0..n)
                .map(|i| test_product(&format!("p{i}"), start[i], vec![1]))
                .collect();
            let action = Action::new(restock_seed[..n].to_vec());
            let demand = demand_seed[..n].to_vec();

            let mut stock = start.clone();
            apply_restock(&mut stock, &action);
            let restocked = stock.clone();
            let day = settle_day(&products, &mut stock, &action, &demand, 0);

            for i in 0..n {
                let r = &day.product_results[i];
                prop_assert_eq!(r.stock_level, restocked[i]);
                prop_assert_eq!(stock[i], restocked[i].saturating_sub(demand[i]));
                prop_assert_eq!(r.stockout_units, demand[i].saturating_sub(restocked[i]));
                prop_assert!(r.daily_cost >= 0.0);
            }
        }
    }
}
