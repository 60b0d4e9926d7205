// src/simulation/config.rs

use std::env;
use std::str::FromStr;
use tracing::warn;

/// Hyperparameters of the Q-learning agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    pub min_epsilon: f64,
    pub epsilon_decay: f64,
    /// Days per training episode, independent of the evaluation horizon.
    pub episode_length: usize,
    /// Divisor applied to the day index when building state keys and day penalties.
    pub day_normalizer: f64,
    /// Random candidates generated per decision point (the idle action is added on top).
    pub candidate_actions: usize,
    /// Upper bound on a single product's restock in a candidate action.
    pub max_restock_per_product: u32,
    /// Training progress is logged every this many episodes.
    pub log_interval: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.2,
            discount_factor: 0.95,
            initial_epsilon: 1.0,
            min_epsilon: 0.01,
            epsilon_decay: 0.995,
            episode_length: 30,
            day_normalizer: 30.0,
            candidate_actions: 10,
            max_restock_per_product: 50,
            log_interval: 50,
        }
    }
}

/// Settings of one end-to-end optimization run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub episodes: usize,
    /// Episodes per `train` call; progress is reported after every batch.
    pub batch_size: usize,
    pub optimization_days: usize,
    pub max_warehouse_capacity: u32,
    /// Fixed seed for reproducible runs; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Product catalogue to load; `None` uses the built-in sample.
    pub input_path: Option<String>,
    pub output_path: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            episodes: 200,
            batch_size: 10,
            optimization_days: 30,
            max_warehouse_capacity: 500,
            seed: None,
            input_path: None,
            output_path: "optimization_results.csv".to_string(),
        }
    }
}

impl RunConfig {
    /// Defaults overridden by `RESTOCK_EPISODES`, `RESTOCK_BATCH`,
    /// `RESTOCK_DAYS`, `RESTOCK_CAPACITY` and `RESTOCK_SEED`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            episodes: env_or("RESTOCK_EPISODES", defaults.episodes),
            batch_size: env_or("RESTOCK_BATCH", defaults.batch_size).max(1),
            optimization_days: env_or("RESTOCK_DAYS", defaults.optimization_days),
            max_warehouse_capacity: env_or("RESTOCK_CAPACITY", defaults.max_warehouse_capacity),
            seed: env::var("RESTOCK_SEED")
                .ok()
                .and_then(|raw| parse_logged("RESTOCK_SEED", &raw)),
            ..defaults
        }
    }

    /// Applies positional arguments: `[input.csv] [output.csv]`.
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        if let Some(input) = args.next() {
            self.input_path = Some(input);
        }
        if let Some(output) = args.next() {
            self.output_path = output;
        }
        self
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => parse_logged(key, &raw).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_logged<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = raw, "ignoring unparseable environment override");
            None
        }
    }
}
