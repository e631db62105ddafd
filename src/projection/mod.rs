//! Funding projection: expenditure schedule, fully funded balance, and policy trajectories

mod engine;
mod fully_funded;
mod funding;
mod result;
mod schedule;

pub use engine::{project, ProjectionConfig, ProjectionEngine, DEFAULT_THRESHOLD_RATIO};
pub use fully_funded::{depreciation_ratio, fully_funded_balance, percent_funded};
pub use funding::{
    baseline_contribution, target_contribution, BalanceModel, ContributionFloor, FundingInputs,
    FundingPolicy, FundingSolver, InterestTreatment, PolicyOutcome,
};
pub use result::{PolicySummary, ProjectionResult, ProjectionSummary, YearRow};
pub use schedule::{
    component_expenditures, replacement_years, replacements, schedule_expenditures, ComponentExpenditure, ScheduleMode,
};
