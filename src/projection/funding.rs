//! Funding policies: required contributions and balance trajectories
//!
//! Three fixed policies are supported:
//! - **Baseline**: keep the balance from going below zero. The largest
//!   zero-contribution shortfall is amortized evenly over the horizon, which
//!   approximates (and can undershoot) the true minimum contribution.
//! - **Threshold**: straight-line amortization toward a fraction (default 50%)
//!   of the fully funded balance.
//! - **Fully Funded**: straight-line amortization toward 100% of the fully
//!   funded balance.
//!
//! Contributions are rounded up to whole currency units when solved; the
//! trajectory simulation itself never rounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserve funding policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingPolicy {
    Baseline,
    Threshold,
    FullyFunded,
}

impl FundingPolicy {
    /// All policies in report order
    pub const ALL: [FundingPolicy; 3] = [
        FundingPolicy::Baseline,
        FundingPolicy::Threshold,
        FundingPolicy::FullyFunded,
    ];

    /// Stable identifier used as the funding goal key
    pub fn key(&self) -> &'static str {
        match self {
            FundingPolicy::Baseline => "baseline",
            FundingPolicy::Threshold => "threshold",
            FundingPolicy::FullyFunded => "fully_funded",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FundingPolicy::Baseline => "Baseline Funding",
            FundingPolicy::Threshold => "Threshold Funding",
            FundingPolicy::FullyFunded => "Full Funding",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FundingPolicy::Baseline => {
                "Establishing a reserve funding goal of allowing the reserve cash balance \
                 to approach but never fall below zero during the cash flow projection."
            }
            FundingPolicy::Threshold => {
                "Establishing a reserve funding goal of keeping the reserve balance above \
                 a specified dollar or percent funded amount."
            }
            FundingPolicy::FullyFunded => {
                "Setting a reserve funding goal to attain and maintain reserves at or near \
                 100 percent funded."
            }
        }
    }

    /// Look up a policy by its key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

impl fmt::Display for FundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether interest is credited to the reserve balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestTreatment {
    /// Interest rate is carried but not applied
    #[default]
    Ignored,
    /// balance = balance * (1 + rate) + contribution - expenditure
    Compound,
}

/// Lower bound applied to a solved contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionFloor {
    /// Negative requirements become zero
    #[default]
    Zero,
    /// Negative requirements are reported and simulated as-is
    #[serde(alias = "none")]
    Unbounded,
}

impl ContributionFloor {
    pub fn apply(&self, required: f64) -> f64 {
        match self {
            ContributionFloor::Zero if required <= 0.0 => 0.0,
            _ => required,
        }
    }
}

/// Year-over-year balance recurrence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceModel {
    pub interest: InterestTreatment,
    pub interest_rate: f64,
}

impl Default for BalanceModel {
    fn default() -> Self {
        Self {
            interest: InterestTreatment::Ignored,
            interest_rate: 0.0,
        }
    }
}

impl BalanceModel {
    pub fn new(interest: InterestTreatment, interest_rate: f64) -> Self {
        Self { interest, interest_rate }
    }

    /// Year-end balance from the prior year-end balance
    pub fn step(&self, balance: f64, contribution: f64, expenditure: f64) -> f64 {
        match self.interest {
            InterestTreatment::Ignored => balance + contribution - expenditure,
            InterestTreatment::Compound => {
                balance * (1.0 + self.interest_rate) + contribution - expenditure
            }
        }
    }

    /// Year-end balances for a constant contribution
    pub fn simulate(&self, starting_balance: f64, contribution: f64, expenditures: &[f64]) -> Vec<f64> {
        let mut balance = starting_balance;
        expenditures
            .iter()
            .map(|&expenditure| {
                balance = self.step(balance, contribution, expenditure);
                balance
            })
            .collect()
    }
}

/// Round a contribution up to the next whole currency unit
fn ceil_currency(amount: f64) -> f64 {
    // + 0.0 normalizes -0.0
    amount.ceil() + 0.0
}

/// Baseline requirement: largest zero-contribution shortfall spread over the horizon
pub fn baseline_contribution(model: &BalanceModel, expenditures: &[f64], starting_balance: f64) -> f64 {
    if expenditures.is_empty() {
        return 0.0;
    }

    let max_shortfall = model
        .simulate(starting_balance, 0.0, expenditures)
        .into_iter()
        .map(|balance| (-balance).max(0.0))
        .fold(0.0, f64::max);

    ceil_currency(max_shortfall / expenditures.len() as f64)
}

/// Straight-line requirement to move from the starting balance to `target` over `years`
pub fn target_contribution(target: f64, starting_balance: f64, years: usize) -> f64 {
    if years == 0 {
        return 0.0;
    }
    ceil_currency((target - starting_balance) / years as f64)
}

/// Inputs shared by every policy
#[derive(Debug, Clone, Copy)]
pub struct FundingInputs<'a> {
    pub expenditures: &'a [f64],
    pub fully_funded_balance: f64,
    pub starting_balance: f64,
}

impl FundingInputs<'_> {
    pub fn years(&self) -> usize {
        self.expenditures.len()
    }
}

/// Solved contribution and simulated trajectory for one policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub policy: FundingPolicy,

    /// Solver output before the contribution floor
    pub required_contribution: f64,

    /// Recommended constant annual contribution
    pub annual_contribution: f64,

    /// Year-end balances, one per projected year
    pub trajectory: Vec<f64>,
}

impl PolicyOutcome {
    /// Lowest year-end balance (starting balance if the horizon is empty)
    pub fn min_balance(&self, starting_balance: f64) -> f64 {
        self.trajectory.iter().copied().fold(starting_balance, f64::min)
    }

    /// First projection year index with a negative balance
    pub fn first_underfunded_year(&self) -> Option<usize> {
        self.trajectory.iter().position(|&b| b < 0.0)
    }

    pub fn final_balance(&self) -> Option<f64> {
        self.trajectory.last().copied()
    }
}

/// Solves each funding policy against a common set of inputs
#[derive(Debug, Clone, Copy)]
pub struct FundingSolver {
    pub model: BalanceModel,
    pub threshold_ratio: f64,
    pub floor: ContributionFloor,
}

impl Default for FundingSolver {
    fn default() -> Self {
        Self {
            model: BalanceModel::default(),
            threshold_ratio: 0.5,
            floor: ContributionFloor::Zero,
        }
    }
}

impl FundingSolver {
    /// Un-floored contribution the policy calls for
    pub fn required_contribution(&self, policy: FundingPolicy, inputs: &FundingInputs<'_>) -> f64 {
        match policy {
            FundingPolicy::Baseline => {
                baseline_contribution(&self.model, inputs.expenditures, inputs.starting_balance)
            }
            FundingPolicy::Threshold => target_contribution(
                self.threshold_ratio * inputs.fully_funded_balance,
                inputs.starting_balance,
                inputs.years(),
            ),
            FundingPolicy::FullyFunded => target_contribution(
                inputs.fully_funded_balance,
                inputs.starting_balance,
                inputs.years(),
            ),
        }
    }

    pub fn solve(&self, policy: FundingPolicy, inputs: &FundingInputs<'_>) -> PolicyOutcome {
        let required_contribution = self.required_contribution(policy, inputs);
        let annual_contribution = self.floor.apply(required_contribution);
        let trajectory = self
            .model
            .simulate(inputs.starting_balance, annual_contribution, inputs.expenditures);

        log::debug!(
            "{}: required {:.0}, recommended {:.0}",
            policy.key(),
            required_contribution,
            annual_contribution
        );

        PolicyOutcome {
            policy,
            required_contribution,
            annual_contribution,
            trajectory,
        }
    }

    /// Outcomes for all policies in `FundingPolicy::ALL` order
    pub fn solve_all(&self, inputs: &FundingInputs<'_>) -> Vec<PolicyOutcome> {
        FundingPolicy::ALL.iter().map(|&p| self.solve(p, inputs)).collect()
    }
}
