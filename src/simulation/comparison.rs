// src/simulation/comparison.rs

use crate::model::SimulationResult;
use crate::strategy::traits::StrategyLabel;
use serde::Serialize;

/// Totals for one strategy's trajectory.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub label: StrategyLabel,
    pub results: Vec<SimulationResult>,
    pub total_cost: f64,
    pub total_stockouts: u64,
    /// Product-days with a non-zero restock.
    pub restock_count: usize,
    /// `restock_count / optimization_days`.
    pub restocking_frequency: f64,
}

/// Per-product slice of a [`StrategySummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub total_cost: f64,
    pub total_stockouts: u64,
    pub restock_count: usize,
}

impl StrategySummary {
    pub fn from_results(
        label: StrategyLabel,
        results: Vec<SimulationResult>,
        optimization_days: usize,
    ) -> Self {
        let total_cost = results.iter().map(|r| r.total_cost).sum();
        let total_stockouts = results.iter().map(|r| r.total_stockouts()).sum();
        let restock_count = results.iter().map(|r| r.restock_count()).sum();
        let restocking_frequency = if optimization_days == 0 {
            0.0
        } else {
            restock_count as f64 / optimization_days as f64
        };

        Self {
            label,
            results,
            total_cost,
            total_stockouts,
            restock_count,
            restocking_frequency,
        }
    }

    /// Cost, stockouts and restocks per product, in product order.
    pub fn product_breakdown(&self) -> Vec<ProductSummary> {
        let mut breakdown: Vec<ProductSummary> = Vec::new();
        for day in &self.results {
            for r in &day.product_results {
                let existing = breakdown.iter().position(|p| p.product_id == r.product_id);
                let idx = match existing {
                    Some(idx) => idx,
                    None => {
                        breakdown.push(ProductSummary {
                            product_id: r.product_id.clone(),
                            total_cost: 0.0,
                            total_stockouts: 0,
                            restock_count: 0,
                        });
                        breakdown.len() - 1
                    }
                };
                let entry = &mut breakdown[idx];
                entry.total_cost += r.daily_cost;
                entry.total_stockouts += r.stockout_units as u64;
                if r.restock_action > 0 {
                    entry.restock_count += 1;
                }
            }
        }
        breakdown
    }

    /// Profit on the last simulated day (0 for an empty trajectory).
    pub fn final_profit(&self) -> f64 {
        self.results.last().map(|r| r.total_profit).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Improvement {
    /// Baseline total cost minus learner total cost.
    pub cost_reduction: f64,
    pub stockout_reduction: i64,
    /// `None` when the baseline cost is zero and the ratio is undefined.
    pub percent_improvement: Option<f64>,
}

/// Side-by-side result of the baseline and the learned policy.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub baseline: StrategySummary,
    pub rl: StrategySummary,
    /// Training episodes the learner ran before the rollout.
    pub episodes: usize,
    /// Learner profit on the last rollout day.
    pub final_reward: f64,
    pub improvement: Improvement,
}

impl Comparison {
    /// Returns `None` if either trajectory is empty.
    pub fn from_results(
        baseline: Vec<SimulationResult>,
        rl: Vec<SimulationResult>,
        optimization_days: usize,
        episodes: usize,
    ) -> Option<Self> {
        if baseline.is_empty() || rl.is_empty() {
            return None;
        }

        let baseline =
            StrategySummary::from_results(StrategyLabel::Baseline, baseline, optimization_days);
        let rl = StrategySummary::from_results(
            StrategyLabel::ReinforcementLearning,
            rl,
            optimization_days,
        );

        let cost_reduction = baseline.total_cost - rl.total_cost;
        let percent_improvement = if baseline.total_cost == 0.0 {
            None
        } else {
            Some(cost_reduction / baseline.total_cost * 100.0)
        };
        let improvement = Improvement {
            cost_reduction,
            stockout_reduction: baseline.total_stockouts as i64 - rl.total_stockouts as i64,
            percent_improvement,
        };

        Some(Self {
            final_reward: rl.final_profit(),
            baseline,
            rl,
            episodes,
            improvement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductDayResult;

    fn day(day: usize, cost: f64, restock: u32, stockouts: u32) -> SimulationResult {
        SimulationResult::from_products(
            day,
            vec![ProductDayResult {
                product_id: "a".to_string(),
                stock_level: 10,
                demand: 5,
                restock_action: restock,
                stockout_units: stockouts,
                daily_cost: cost,
                daily_revenue: 0.0,
            }],
        )
    }

    #[test]
    fn three_day_scenario_yields_twenty_percent() {
        let baseline = (0..3).map(|d| day(d, 10.0, 0, 0)).collect();
        let rl = (0..3).map(|d| day(d, 8.0, 0, 0)).collect();
        let cmp = Comparison::from_results(baseline, rl, 3, 200).unwrap();

        assert!((cmp.baseline.total_cost - 30.0).abs() < 1e-9);
        assert!((cmp.rl.total_cost - 24.0).abs() < 1e-9);
        assert!((cmp.improvement.cost_reduction - 6.0).abs() < 1e-9);
        let pct = cmp.improvement.percent_improvement.unwrap();
        assert!((pct - 20.0).abs() < 1e-9);
        assert_eq!(cmp.episodes, 200);
    }

    #[test]
    fn stockouts_and_restock_frequency_are_totalled() {
        let baseline = vec![day(0, 1.0, 5, 2), day(1, 1.0, 0, 1)];
        let rl = vec![day(0, 1.0, 3, 0), day(1, 1.0, 4, 0)];
        let cmp = Comparison::from_results(baseline, rl, 2, 10).unwrap();

        assert_eq!(cmp.baseline.total_stockouts, 3);
        assert_eq!(cmp.improvement.stockout_reduction, 3);
        assert!((cmp.baseline.restocking_frequency - 0.5).abs() < 1e-12);
        assert!((cmp.rl.restocking_frequency - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_baseline_cost_leaves_percentage_undefined() {
        let cmp = Comparison::from_results(vec![day(0, 0.0, 0, 0)], vec![day(0, 4.0, 0, 0)], 1, 0)
            .unwrap();
        assert_eq!(cmp.improvement.percent_improvement, None);
        assert!((cmp.improvement.cost_reduction + 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_trajectory_is_rejected() {
        assert!(Comparison::from_results(Vec::new(), vec![day(0, 1.0, 0, 0)], 1, 0).is_none());
        assert!(Comparison::from_results(vec![day(0, 1.0, 0, 0)], Vec::new(), 1, 0).is_none());
    }

    #[test]
    fn final_reward_is_last_day_profit() {
        let rl = vec![day(0, 1.0, 0, 0), day(1, 7.0, 0, 0)];
        let cmp = Comparison::from_results(vec![day(0, 1.0, 0, 0)], rl, 2, 0).unwrap();
        assert!((cmp.final_reward + 7.0).abs() < 1e-9);
    }

    #[test]
    fn product_breakdown_groups_by_product() {
        let mut d0 = day(0, 2.0, 1, 1);
        d0.product_results.push(ProductDayResult {
            product_id: "b".to_string(),
            stock_level: 0,
            demand: 3,
            restock_action: 0,
            stockout_units: 3,
            daily_cost: 15.0,
            daily_revenue: 0.0,
        });
        let summary =
            StrategySummary::from_results(StrategyLabel::Baseline, vec![d0, day(1, 3.0, 0, 0)], 2);
        let breakdown = summary.product_breakdown();

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].product_id, "a");
        assert!((breakdown[0].total_cost - 5.0).abs() < 1e-9);
        assert_eq!(breakdown[0].restock_count, 1);
        assert_eq!(breakdown[1].total_stockouts, 3);
    }
}
