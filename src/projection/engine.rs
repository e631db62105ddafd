//! Core projection engine: inventory and financial state to funding projections

use super::fully_funded::{fully_funded_balance, percent_funded};
use super::funding::{BalanceModel, ContributionFloor, FundingInputs, FundingSolver, InterestTreatment};
use super::result::ProjectionResult;
use super::schedule::{component_expenditures, schedule_expenditures, ScheduleMode};
use crate::financial::{FinancialParameters, FinancialRecord};
use crate::inventory::{Component, ComponentRecord};
use crate::validation::{validate_parameters, validate_study, ValidationError};
use serde::{Deserialize, Serialize};

/// Default threshold target as a fraction of the fully funded balance
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.5;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Single next replacement, or recurring every useful life
    pub schedule_mode: ScheduleMode,

    /// Whether the interest rate is credited to balances
    pub interest: InterestTreatment,

    /// Lower bound on recommended contributions
    pub contribution_floor: ContributionFloor,

    /// Threshold policy target as a fraction of the fully funded balance
    pub threshold_ratio: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            schedule_mode: ScheduleMode::SingleReplacement,
            interest: InterestTreatment::Ignored,
            contribution_floor: ContributionFloor::Zero,
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

impl ProjectionConfig {
    pub fn recurring(mut self) -> Self {
        self.schedule_mode = ScheduleMode::Recurring;
        self
    }

    pub fn with_compound_interest(mut self) -> Self {
        self.interest = InterestTreatment::Compound;
        self
    }

    pub fn unfloored(mut self) -> Self {
        self.contribution_floor = ContributionFloor::Unbounded;
        self
    }

    pub fn with_threshold_ratio(mut self, ratio: f64) -> Self {
        self.threshold_ratio = ratio;
        self
    }
}

/// Main projection engine
///
/// Stateless apart from its configuration; one engine can serve any number
/// of concurrent projections.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    fn balance_model(&self, financial: &FinancialParameters) -> BalanceModel {
        let rate = match (self.config.interest, financial.interest_rate) {
            (InterestTreatment::Compound, None) => {
                log::warn!("compound interest requested without an interest rate; using 0%");
                0.0
            }
            (_, rate) => rate.unwrap_or(0.0),
        };
        BalanceModel::new(self.config.interest, rate)
    }

    /// Run the projection on already-typed inputs
    ///
    /// Degenerate inputs (zero useful life, lives past the horizon) are
    /// clamped or excluded, never rejected. Use [`Self::project_checked`] to
    /// reject out-of-range values first.
    pub fn project(&self, components: &[Component], financial: &FinancialParameters) -> ProjectionResult {
        let years = financial.horizon();

        let expenditures = schedule_expenditures(components, years, self.config.schedule_mode);
        let ffb = fully_funded_balance(components);

        let solver = FundingSolver {
            model: self.balance_model(financial),
            threshold_ratio: self.config.threshold_ratio,
            floor: self.config.contribution_floor,
        };
        let inputs = FundingInputs {
            expenditures: &expenditures,
            fully_funded_balance: ffb,
            starting_balance: financial.starting_balance,
        };
        let policies = solver.solve_all(&inputs);

        let current_trajectory = financial
            .current_contribution
            .map(|c| solver.model.simulate(financial.starting_balance, c, &expenditures));

        let yearly_data = ProjectionResult::build_rows(
            &expenditures,
            &policies,
            current_trajectory.as_deref(),
            financial.start_year,
        );

        let funding_goals = policies
            .iter()
            .map(|o| (o.policy, o.annual_contribution))
            .collect();

        let long_life_components = components
            .iter()
            .filter(|c| c.is_long_life(financial.projection_years))
            .map(|c| c.name.clone())
            .collect();

        log::info!(
            "projected {} components over {} years: ffb {:.2}, goals {}",
            components.len(),
            years,
            ffb,
            policies
                .iter()
                .map(|o| format!("{}={:.0}", o.policy.key(), o.annual_contribution))
                .collect::<Vec<_>>()
                .join(", ")
        );

        ProjectionResult {
            yearly_data,
            funding_goals,
            policies,
            starting_balance: financial.starting_balance,
            fully_funded_balance: ffb,
            percent_funded: percent_funded(financial.starting_balance, ffb),
            current_contribution: financial.current_contribution,
            component_expenditures: component_expenditures(components, years, self.config.schedule_mode),
            long_life_components,
        }
    }

    /// Check value ranges, then project
    pub fn project_checked(
        &self,
        components: &[Component],
        financial: &FinancialParameters,
    ) -> Result<ProjectionResult, ValidationError> {
        validate_parameters(components, financial, &self.config)?;
        Ok(self.project(components, financial))
    }

    /// Validate raw records, reporting every missing field, then project
    pub fn project_records(
        &self,
        records: &[ComponentRecord],
        financial: &FinancialRecord,
    ) -> Result<ProjectionResult, ValidationError> {
        let (components, financial) = validate_study(records, financial, &self.config)?;
        Ok(self.project(&components, &financial))
    }
}

/// Project with the default configuration
pub fn project(components: &[Component], financial: &FinancialParameters) -> ProjectionResult {
    ProjectionEngine::default().project(components, financial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::ComponentCategory;
    use crate::projection::FundingPolicy;
    use approx::assert_relative_eq;

    fn roof() -> Component {
        Component::new("Roof", ComponentCategory::Roof, 25.0, 11.0, 448_800.0)
    }

    fn sample_inventory() -> Vec<Component> {
        vec![
            roof(),
            Component::new("Exterior Paint", ComponentCategory::Waterproofing, 10.0, 3.0, 96_000.0),
            Component::new("Fire Alarm", ComponentCategory::Fireproofing, 20.0, 0.0, 38_000.0),
            Component::new("Windows", ComponentCategory::WindowsAndDoors, 30.0, 3.7, 210_000.0),
            Component::new("Foundation", ComponentCategory::Structure, 75.0, 52.0, 1_200_000.0),
        ]
    }

    #[test]
    fn test_single_component_scenario() {
        let financial = FinancialParameters::new(143_858.40).with_years(30);
        let result = project(&[roof()], &financial);

        let exp = result.expenditures();
        assert_eq!(exp.len(), 30);
        assert_eq!(exp[11], 448_800.0);
        assert_eq!(exp.iter().filter(|&&x| x != 0.0).count(), 1);

        assert_relative_eq!(result.fully_funded_balance, 251_328.0, epsilon = 1e-6);
        assert_eq!(result.funding_goal(FundingPolicy::Baseline), 10_165.0);
        assert_eq!(result.funding_goal(FundingPolicy::Threshold), 0.0);
        assert_eq!(result.funding_goal(FundingPolicy::FullyFunded), 3_583.0);

        let threshold = result.outcome(FundingPolicy::Threshold).unwrap();
        assert_eq!(threshold.required_contribution, -606.0);
    }

    #[test]
    fn test_empty_inventory_scenario() {
        for starting in [0.0, 25_000.0] {
            let financial = FinancialParameters::new(starting).with_years(30);
            let result = project(&[], &financial);

            assert_eq!(result.fully_funded_balance, 0.0);
            assert!(result.expenditures().iter().all(|&x| x == 0.0));
            for policy in FundingPolicy::ALL {
                assert_eq!(result.funding_goal(policy), 0.0);
                assert!(result.trajectory(policy).iter().all(|&b| b == starting));
            }
        }
    }

    #[test]
    fn test_trajectory_recurrence_in_rows() {
        let financial = FinancialParameters::new(50_000.0).with_years(30);
        let result = project(&sample_inventory(), &financial);

        for policy in FundingPolicy::ALL {
            let contribution = result.funding_goal(policy);
            let mut prior = result.starting_balance;
            for row in &result.yearly_data {
                assert_eq!(row.balance(policy), prior + contribution - row.expenditures);
                prior = row.balance(policy);
            }
        }
    }

    #[test]
    fn test_fully_funded_not_below_threshold() {
        let financial = FinancialParameters::new(50_000.0);
        let result = project(&sample_inventory(), &financial);
        assert!(result.fully_funded_balance > result.starting_balance);
        assert!(
            result.funding_goal(FundingPolicy::FullyFunded) >= result.funding_goal(FundingPolicy::Threshold)
        );
    }

    #[test]
    fn test_idempotent() {
        let financial = FinancialParameters::new(50_000.0).with_start_year(2025);
        let inventory = sample_inventory();
        let first = project(&inventory, &financial);
        let second = project(&inventory, &financial);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_long_life_components_listed_but_accrued() {
        let financial = FinancialParameters::new(0.0);
        let result = project(&sample_inventory(), &financial);

        assert_eq!(result.long_life_components, vec!["Foundation".to_string()]);
        // 448,800*14/25 + 96,000*7/10 + 38,000 + 210,000*26.3/30 + 1,200,000*23/75
        let expected = 251_328.0 + 67_200.0 + 38_000.0 + 184_100.0 + 368_000.0;
        assert_relative_eq!(result.fully_funded_balance, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_current_contribution_trajectory() {
        let financial = FinancialParameters::new(100_000.0)
            .with_years(12)
            .with_current_contribution(20_000.0);
        let result = project(&[roof()], &financial);

        assert_eq!(result.yearly_data[0].current_balance, Some(120_000.0));
        assert_eq!(result.yearly_data[11].current_balance, Some(100_000.0 + 12.0 * 20_000.0 - 448_800.0));
    }

    #[test]
    fn test_calendar_years() {
        let financial = FinancialParameters::new(0.0).with_years(3).with_start_year(2025);
        let result = project(&[], &financial);
        let labels: Vec<Option<i32>> = result.yearly_data.iter().map(|r| r.calendar_year).collect();
        assert_eq!(labels, vec![Some(2025), Some(2026), Some(2027)]);
    }

    #[test]
    fn test_recurring_config() {
        let paint = Component::new("Paint", ComponentCategory::Waterproofing, 10.0, 3.0, 96_000.0);
        let financial = FinancialParameters::new(0.0);
        let engine = ProjectionEngine::new(ProjectionConfig::default().recurring());
        let result = engine.project(&[paint], &financial);

        assert_eq!(result.component_expenditures[0].events.len(), 3);
        assert_eq!(result.summary().total_expenditures, 288_000.0);
    }

    #[test]
    fn test_interest_ignored_by_default() {
        let financial = FinancialParameters::new(10_000.0).with_years(2).with_interest_rate(0.05);
        let result = project(&[], &financial);
        assert_eq!(result.trajectory(FundingPolicy::Baseline), vec![10_000.0, 10_000.0]);

        let engine = ProjectionEngine::new(ProjectionConfig::default().with_compound_interest());
        let result = engine.project(&[], &financial);
        assert_relative_eq!(result.yearly_data[1].baseline_balance, 11_025.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unfloored_config_simulates_negative_contribution() {
        let financial = FinancialParameters::new(143_858.40);
        let engine = ProjectionEngine::new(ProjectionConfig::default().unfloored());
        let result = engine.project(&[roof()], &financial);
        assert_eq!(result.funding_goal(FundingPolicy::Threshold), -606.0);
        assert_relative_eq!(result.yearly_data[0].threshold_balance, 143_252.40, epsilon = 1e-6);
    }

    #[test]
    fn test_project_records_rejects_before_projecting() {
        let records = vec![ComponentRecord {
            name: Some("Roof".to_string()),
            useful_life: Some(25.0),
            ..Default::default()
        }];
        let err = ProjectionEngine::default()
            .project_records(&records, &FinancialRecord::default())
            .unwrap_err();
        assert_eq!(err.missing_fields().count(), 3);
    }

    #[test]
    fn test_project_checked() {
        let bad = Component::new("Bad", ComponentCategory::Other, 10.0, -1.0, 100.0);
        let financial = FinancialParameters::new(0.0);
        assert!(ProjectionEngine::default().project_checked(&[bad], &financial).is_err());
        assert!(ProjectionEngine::default().project_checked(&[roof()], &financial).is_ok());
    }

    #[test]
    fn test_unusable_threshold_ratio_rejected() {
        let engine = ProjectionEngine::new(ProjectionConfig::default().with_threshold_ratio(f64::NAN));
        let financial = FinancialParameters::new(143_858.40);
        let err = engine.project_checked(&[roof()], &financial).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field(), "threshold_ratio");

        let records = vec![ComponentRecord::from(&roof())];
        assert!(engine.project_records(&records, &FinancialRecord::from(&financial)).is_err());
    }

    #[test]
    fn test_recurring_tiny_life_request_is_bounded() {
        let request = r#"{
            "components": [
                {"name": "Filter", "useful_life": 1e-9, "remaining_life": 0, "replacement_cost": 1}
            ],
            "financial": {"starting_balance": 0, "projection_years": 30},
            "config": {"schedule_mode": "recurring"}
        }"#;
        let request = crate::scenario::StudyRequest::from_json(request).unwrap();
        let result = crate::scenario::StudyRunner::new().run(&request).unwrap();
        assert_eq!(result.component_expenditures[0].events.len(), 30);
        assert!(result.expenditures().iter().all(|&x| x > 0.0));
    }

    #[test]
    fn test_summary() {
        let financial = FinancialParameters::new(143_858.40);
        let summary = project(&[roof()], &financial).summary();

        assert_eq!(summary.total_years, 30);
        assert_eq!(summary.peak_expenditure_year, Some(12));
        assert_eq!(summary.peak_expenditure, 448_800.0);

        let baseline = &summary.policies[0];
        assert_eq!(baseline.policy, FundingPolicy::Baseline);
        assert_eq!(baseline.first_underfunded_year, Some(12));
        assert_eq!(baseline.total_contributions, 10_165.0 * 30.0);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ProjectionConfig = serde_json::from_str(r#"{"schedule_mode": "recurring"}"#).unwrap();
        assert_eq!(config.schedule_mode, ScheduleMode::Recurring);
        assert_eq!(config.threshold_ratio, DEFAULT_THRESHOLD_RATIO);
        assert_eq!(config.contribution_floor, ContributionFloor::Zero);
    }
}
