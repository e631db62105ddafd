//! Projection output structures

use super::funding::{FundingPolicy, PolicyOutcome};
use super::schedule::ComponentExpenditure;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    /// Projection year, 1-based
    pub year: u32,

    /// Calendar year, when the study has a start year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<i32>,

    /// Total replacement cost falling in this year
    pub expenditures: f64,

    // Year-end balances under each funding policy
    pub baseline_balance: f64,
    pub threshold_balance: f64,
    pub fully_funded_balance: f64,

    /// Year-end balance at the association's current contribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<f64>,
}

impl YearRow {
    /// Create a row with zero balances
    pub fn new(year: u32) -> Self {
        Self {
            year,
            calendar_year: None,
            expenditures: 0.0,
            baseline_balance: 0.0,
            threshold_balance: 0.0,
            fully_funded_balance: 0.0,
            current_balance: None,
        }
    }

    /// Balance under a given policy
    pub fn balance(&self, policy: FundingPolicy) -> f64 {
        match policy {
            FundingPolicy::Baseline => self.baseline_balance,
            FundingPolicy::Threshold => self.threshold_balance,
            FundingPolicy::FullyFunded => self.fully_funded_balance,
        }
    }

    fn set_balance(&mut self, policy: FundingPolicy, balance: f64) {
        match policy {
            FundingPolicy::Baseline => self.baseline_balance = balance,
            FundingPolicy::Threshold => self.threshold_balance = balance,
            FundingPolicy::FullyFunded => self.fully_funded_balance = balance,
        }
    }

    /// Label for tables and charts: calendar year when known
    pub fn label(&self) -> String {
        match self.calendar_year {
            Some(y) => y.to_string(),
            None => format!("Year {}", self.year),
        }
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One row per projected year
    pub yearly_data: Vec<YearRow>,

    /// Recommended annual contribution keyed by policy
    pub funding_goals: BTreeMap<FundingPolicy, f64>,

    /// Solver detail per policy, in `FundingPolicy::ALL` order
    pub policies: Vec<PolicyOutcome>,

    /// Reserve balance at the start of the projection
    pub starting_balance: f64,

    /// Fully funded balance estimate at the start of the projection
    pub fully_funded_balance: f64,

    /// Starting balance as a percentage of the fully funded balance
    pub percent_funded: f64,

    /// Contribution the association currently budgets, if given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_contribution: Option<f64>,

    /// Replacement events per component
    pub component_expenditures: Vec<ComponentExpenditure>,

    /// Components whose replacement falls at or beyond the horizon
    pub long_life_components: Vec<String>,
}

impl ProjectionResult {
    /// Assemble yearly rows from the expenditure vector and policy trajectories
    pub fn build_rows(
        expenditures: &[f64],
        policies: &[PolicyOutcome],
        current: Option<&[f64]>,
        start_year: Option<i32>,
    ) -> Vec<YearRow> {
        expenditures
            .iter()
            .enumerate()
            .map(|(i, &expenditure)| {
                let mut row = YearRow::new(i as u32 + 1);
                row.calendar_year = start_year.map(|y| y + i as i32);
                row.expenditures = expenditure;
                for outcome in policies {
                    row.set_balance(outcome.policy, outcome.trajectory[i]);
                }
                row.current_balance = current.map(|t| t[i]);
                row
            })
            .collect()
    }

    /// Recommended contribution for a policy
    pub fn funding_goal(&self, policy: FundingPolicy) -> f64 {
        self.funding_goals.get(&policy).copied().unwrap_or(0.0)
    }

    pub fn outcome(&self, policy: FundingPolicy) -> Option<&PolicyOutcome> {
        self.policies.iter().find(|o| o.policy == policy)
    }

    /// Expenditure vector
    pub fn expenditures(&self) -> Vec<f64> {
        self.yearly_data.iter().map(|r| r.expenditures).collect()
    }

    /// Balance trajectory under a policy
    pub fn trajectory(&self, policy: FundingPolicy) -> Vec<f64> {
        self.yearly_data.iter().map(|r| r.balance(policy)).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_expenditures: f64 = self.yearly_data.iter().map(|r| r.expenditures).sum();
        let peak = self
            .yearly_data
            .iter()
            .filter(|r| r.expenditures > 0.0)
            .max_by(|a, b| a.expenditures.total_cmp(&b.expenditures));

        let policies = self
            .policies
            .iter()
            .map(|o| PolicySummary {
                policy: o.policy,
                annual_contribution: o.annual_contribution,
                total_contributions: o.annual_contribution * self.yearly_data.len() as f64,
                final_balance: o.final_balance().unwrap_or(self.starting_balance),
                min_balance: o.min_balance(self.starting_balance),
                first_underfunded_year: o.first_underfunded_year().map(|i| i as u32 + 1),
            })
            .collect();

        ProjectionSummary {
            total_years: self.yearly_data.len() as u32,
            total_expenditures,
            peak_expenditure_year: peak.map(|r| r.year),
            peak_expenditure: peak.map(|r| r.expenditures).unwrap_or(0.0),
            fully_funded_balance: self.fully_funded_balance,
            percent_funded: self.percent_funded,
            policies,
        }
    }
}

/// Per-policy summary figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub policy: FundingPolicy,
    pub annual_contribution: f64,
    pub total_contributions: f64,
    pub final_balance: f64,
    pub min_balance: f64,
    /// 1-based projection year of the first negative balance
    pub first_underfunded_year: Option<u32>,
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub total_expenditures: f64,
    pub peak_expenditure_year: Option<u32>,
    pub peak_expenditure: f64,
    pub fully_funded_balance: f64,
    pub percent_funded: f64,
    pub policies: Vec<PolicySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(policy: FundingPolicy, contribution: f64, trajectory: Vec<f64>) -> PolicyOutcome {
        PolicyOutcome {
            policy,
            required_contribution: contribution,
            annual_contribution: contribution,
            trajectory,
        }
    }

    #[test]
    fn test_build_rows() {
        let expenditures = vec![0.0, 500.0];
        let policies = vec![
            outcome(FundingPolicy::Baseline, 0.0, vec![100.0, -400.0]),
            outcome(FundingPolicy::Threshold, 10.0, vec![110.0, -380.0]),
            outcome(FundingPolicy::FullyFunded, 20.0, vec![120.0, -360.0]),
        ];
        let current = vec![105.0, -390.0];

        let rows = ProjectionResult::build_rows(&expenditures, &policies, Some(&current), Some(2025));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].year, 2);
        assert_eq!(rows[1].calendar_year, Some(2026));
        assert_eq!(rows[1].label(), "2026");
        assert_eq!(rows[1].expenditures, 500.0);
        assert_eq!(rows[1].balance(FundingPolicy::Threshold), -380.0);
        assert_eq!(rows[0].current_balance, Some(105.0));
    }

    #[test]
    fn test_row_label_without_start_year() {
        let row = YearRow::new(7);
        assert_eq!(row.label(), "Year 7");
    }

    #[test]
    fn test_funding_goals_serialize_with_policy_keys() {
        let mut goals = BTreeMap::new();
        goals.insert(FundingPolicy::FullyFunded, 3_583.0);
        goals.insert(FundingPolicy::Baseline, 10_165.0);
        let json = serde_json::to_string(&goals).unwrap();
        assert_eq!(json, r#"{"baseline":10165.0,"fully_funded":3583.0}"#);
    }
}
