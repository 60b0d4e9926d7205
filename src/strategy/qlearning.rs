// src/strategy/qlearning.rs

use crate::error::ConfigError;
use crate::io::demand;
use crate::model::{validate_products, Action, Product, SimulationResult};
use crate::simulation::config::AgentConfig;
use crate::simulation::engine::{apply_restock, run_policy, SALE_MARKUP};
use crate::simulation::random::RandomSource;
use crate::strategy::traits::{RestockPolicy, StrategyLabel};
use std::collections::HashMap;
use tracing::{debug, info};

/// Fixed-point scale for normalized state components.
///
/// Normalized values are stored as integer millionths, which keeps every
/// distinct stock level distinct for any capacity below one million units.
pub const KEY_RESOLUTION: f64 = 1_000_000.0;

/// Weight on holding cost in the reward, on top of the plain storage cost.
const STORAGE_WEIGHT: f64 = 1.2;
const STOCKOUT_EXPONENT: f64 = 1.5;
const STOCKOUT_WEIGHT: f64 = 5.0;
const DAY_PENALTY_WEIGHT: f64 = 0.1;
/// Multiple of average demand the candidate generator aims to hold.
const SAFETY_FACTOR: f64 = 1.5;
/// Shift of the uniform draw that biases candidate variation upwards.
const VARIATION_BIAS: f64 = 0.3;
const TIE_BREAK_NOISE: f64 = 1e-6;

/// Discretized state: stock over capacity and day over the day normalizer,
/// both as fixed-point integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub stock: Vec<u64>,
    pub day: u64,
}

impl StateKey {
    pub fn from_normalized(stock: &[f64], day: f64) -> Self {
        Self {
            stock: stock.iter().map(|&s| to_fixed(s)).collect(),
            day: to_fixed(day),
        }
    }
}

fn to_fixed(value: f64) -> u64 {
    if value <= 0.0 {
        0
    } else {
        (value * KEY_RESOLUTION).round() as u64
    }
}

/// Tabular action-value estimates. Entries are only ever added or overwritten.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<StateKey, HashMap<Action, f64>>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current estimate, 0 for pairs never updated.
    pub fn get(&self, state: &StateKey, action: &Action) -> f64 {
        self.values
            .get(state)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Best estimate among `actions` in `state`; 0 when `actions` is empty.
    pub fn max_value(&self, state: &StateKey, actions: &[Action]) -> f64 {
        actions
            .iter()
            .map(|a| self.get(state, a))
            .fold(None, |best: Option<f64>, q| Some(best.map_or(q, |b| b.max(q))))
            .unwrap_or(0.0)
    }

    /// Number of distinct states with at least one estimate.
    pub fn state_count(&self) -> usize {
        self.values.len()
    }

    /// Number of (state, action) estimates.
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Summary of one `train` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub episodes: usize,
    /// Exploration rate after the last episode.
    pub epsilon: f64,
    /// Summed reward of the last episode (0 if no episode ran).
    pub last_episode_reward: f64,
    pub states: usize,
}

/// Reward for one day, summed over products.
///
/// `stock` is each product's on-hand stock after the restock and before
/// demand, the same level the day's cost accounting books against.
/// Stockouts are penalized super-linearly and holding grows more expensive
/// as the episode progresses. The day penalty scales the weighted storage
/// cost (×1.2), not the plain one.
pub fn calculate_reward(
    products: &[Product],
    action: &Action,
    stock: &[u32],
    demand: &[u32],
    day: usize,
    day_normalizer: f64,
) -> f64 {
    debug_assert_eq!(stock.len(), products.len());
    debug_assert_eq!(demand.len(), products.len());
    debug_assert_eq!(action.restock_amounts.len(), products.len());

    let mut total = 0.0;

    for (i, product) in products.iter().enumerate() {
        let sold = demand[i].min(stock[i]) as f64;
        let stockouts = demand[i].saturating_sub(stock[i]) as f64;

        let revenue = sold * product.cost_per_item * SALE_MARKUP;
        let storage_cost = stock[i] as f64 * product.storage_cost_per_day * STORAGE_WEIGHT;
        let restock_cost = action.restock_amounts[i] as f64 * product.cost_per_item;
        let stockout_cost =
            stockouts.powf(STOCKOUT_EXPONENT) * product.stockout_penalty * STOCKOUT_WEIGHT;
        let day_penalty = (day as f64 / day_normalizer) * DAY_PENALTY_WEIGHT * storage_cost;

        total += revenue - storage_cost - restock_cost - stockout_cost - day_penalty;
    }

    total
}

/// Tabular Q-learning restocking agent.
///
/// Candidate actions are sampled fresh around a safety-stock target at every
/// decision point, and selection is ε-greedy over that candidate set. The
/// agent owns its Q-table; build one agent per concurrent run.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    products: Vec<Product>,
    max_capacity: u32,
    config: AgentConfig,
    q_table: QTable,
    epsilon: f64,
    episodes_trained: usize,
    avg_demand: Vec<f64>,
}

impl QLearningAgent {
    pub fn new(
        products: Vec<Product>,
        max_capacity: u32,
        config: AgentConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_table(products, max_capacity, config, QTable::new())
    }

    /// Starts from an existing table instead of an empty one.
    pub fn with_table(
        products: Vec<Product>,
        max_capacity: u32,
        config: AgentConfig,
        q_table: QTable,
    ) -> Result<Self, ConfigError> {
        validate_products(&products)?;
        if max_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let avg_demand = products.iter().map(Product::average_demand).collect();
        Ok(Self {
            products,
            max_capacity,
            epsilon: config.initial_epsilon,
            config,
            q_table,
            episodes_trained: 0,
            avg_demand,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn episodes_trained(&self) -> usize {
        self.episodes_trained
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    /// Table key for `(stock_levels, day)`.
    ///
    /// Day is divided by the fixed day normalizer, not the evaluation horizon.
    pub fn state_key(&self, stock_levels: &[u32], day: usize) -> StateKey {
        let capacity = self.max_capacity as f64;
        let stock: Vec<f64> = stock_levels.iter().map(|&s| s as f64 / capacity).collect();
        StateKey::from_normalized(&stock, day as f64 / self.config.day_normalizer)
    }

    /// Fresh candidate set: `candidate_actions` sampled vectors plus the idle action.
    pub fn candidate_actions(&self, stock_levels: &[u32], rng: &mut dyn RandomSource) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.config.candidate_actions + 1);

        for _ in 0..self.config.candidate_actions {
            let amounts = stock_levels
                .iter()
                .enumerate()
                .map(|(i, &stock)| self.sample_restock(i, stock, rng))
                .collect();
            actions.push(Action::new(amounts));
        }

        actions.push(Action::idle(self.products.len()));
        actions
    }

    fn sample_restock(&self, idx: usize, stock: u32, rng: &mut dyn RandomSource) -> u32 {
        let avg = self.avg_demand[idx];
        let stock = stock as i64;

        let safety_stock = (avg * SAFETY_FACTOR).ceil() as i64;
        let suggested = (safety_stock - stock).max(0);
        let max_possible =
            (self.config.max_restock_per_product as i64).min(self.max_capacity as i64 - stock);
        let variation = ((rng.next_unit() - VARIATION_BIAS) * avg).floor() as i64;

        (suggested + variation).min(max_possible).max(0) as u32
    }

    /// ε-greedy choice over a freshly generated candidate set.
    pub fn select_action(&self, stock_levels: &[u32], day: usize, rng: &mut dyn RandomSource) -> Action {
        let state = self.state_key(stock_levels, day);
        let mut candidates = self.candidate_actions(stock_levels, rng);

        if rng.next_unit() < self.epsilon {
            let idx = rng.next_index(candidates.len());
            return candidates.swap_remove(idx);
        }

        let mut best_idx = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (idx, action) in candidates.iter().enumerate() {
            let value = self.q_table.get(&state, action) + rng.next_unit() * TIE_BREAK_NOISE;
            if value > best_value {
                best_value = value;
                best_idx = idx;
            }
        }
        candidates.swap_remove(best_idx)
    }

    /// Runs `episodes` training episodes of `episode_length` days each.
    ///
    /// The learning rate within this call is `α / sqrt(k + 1)` for the k-th
    /// episode of the call, and ε decays once per episode.
    pub fn train(&mut self, episodes: usize, rng: &mut dyn RandomSource) -> TrainingReport {
        let mut last_episode_reward = 0.0;

        for episode in 0..episodes {
            let mut stock_levels: Vec<u32> = self.products.iter().map(|p| p.initial_stock).collect();
            let learning_rate = self.config.learning_rate / ((episode + 1) as f64).sqrt();
            let mut episode_reward = 0.0;

            for day in 0..self.config.episode_length {
                let state = self.state_key(&stock_levels, day);
                let action = self.select_action(&stock_levels, day, rng);

                apply_restock(&mut stock_levels, &action);

                let demand: Vec<u32> = self
                    .products
                    .iter()
                    .map(|p| demand::pattern_demand(p, day, rng))
                    .collect();

                let reward = calculate_reward(
                    &self.products,
                    &action,
                    &stock_levels,
                    &demand,
                    day,
                    self.config.day_normalizer,
                );
                episode_reward += reward;

                for (stock, wanted) in stock_levels.iter_mut().zip(&demand) {
                    *stock = stock.saturating_sub(*wanted);
                }

                let next_state = self.state_key(&stock_levels, day + 1);
                let next_actions = self.candidate_actions(&stock_levels, rng);
                let max_next = self.q_table.max_value(&next_state, &next_actions);

                let current = self.q_table.get(&state, &action);
                let updated = current
                    + learning_rate * (reward + self.config.discount_factor * max_next - current);
                self.q_table.set(state, action, updated);
            }

            self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
            self.episodes_trained += 1;
            last_episode_reward = episode_reward;

            if self.config.log_interval > 0 && episode % self.config.log_interval == 0 {
                info!(
                    episode = self.episodes_trained,
                    epsilon = self.epsilon,
                    avg_reward = episode_reward / self.config.episode_length.max(1) as f64,
                    "training progress"
                );
            }
        }

        debug!(
            episodes,
            states = self.q_table.state_count(),
            entries = self.q_table.len(),
            "training call finished"
        );

        TrainingReport {
            episodes,
            epsilon: self.epsilon,
            last_episode_reward,
            states: self.q_table.state_count(),
        }
    }

    /// Rolls the learned policy out for `days` days.
    ///
    /// Selection stays ε-greedy at the current exploration rate; there is no
    /// separate greedy evaluation mode.
    pub fn simulate(&mut self, days: usize, rng: &mut dyn RandomSource) -> Vec<SimulationResult> {
        run_policy(self, days, rng)
    }
}

impl RestockPolicy for QLearningAgent {
    fn label(&self) -> StrategyLabel {
        StrategyLabel::ReinforcementLearning
    }

    fn products(&self) -> &[Product] {
        &self.products
    }

    fn decide(&mut self, stock_levels: &[u32], day: usize, rng: &mut dyn RandomSource) -> Action {
        self.select_action(stock_levels, day, rng)
    }

    fn draw_demand(&self, product: &Product, day: usize, rng: &mut dyn RandomSource) -> u32 {
        demand::pattern_demand(product, day, rng)
    }
}
