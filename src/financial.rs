//! Starting financial state of the reserve fund

use serde::{Deserialize, Serialize};

/// Financial parameters for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialParameters {
    /// Reserve balance at the start of the projection
    pub starting_balance: f64,

    /// Number of projected years
    #[serde(default = "default_projection_years")]
    pub projection_years: u32,

    /// Annual interest rate earned on the reserve balance.
    /// Only applied under `InterestTreatment::Compound`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,

    /// Calendar year of projection index 0 (labels only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,

    /// Contribution currently budgeted by the association
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_contribution: Option<f64>,
}

fn default_projection_years() -> u32 {
    FinancialParameters::DEFAULT_PROJECTION_YEARS
}

impl FinancialParameters {
    /// Standard SIRS horizon
    pub const DEFAULT_PROJECTION_YEARS: u32 = 30;

    /// Longest horizon accepted from input; every projected year allocates a row
    pub const MAX_PROJECTION_YEARS: u32 = 200;

    /// Parameters with the default 30-year horizon
    pub fn new(starting_balance: f64) -> Self {
        Self {
            starting_balance,
            projection_years: Self::DEFAULT_PROJECTION_YEARS,
            interest_rate: None,
            start_year: None,
            current_contribution: None,
        }
    }

    pub fn with_years(mut self, projection_years: u32) -> Self {
        self.projection_years = projection_years;
        self
    }

    pub fn with_interest_rate(mut self, rate: f64) -> Self {
        self.interest_rate = Some(rate);
        self
    }

    pub fn with_start_year(mut self, year: i32) -> Self {
        self.start_year = Some(year);
        self
    }

    pub fn with_current_contribution(mut self, contribution: f64) -> Self {
        self.current_contribution = Some(contribution);
        self
    }

    /// Horizon as a vector length
    pub fn horizon(&self) -> usize {
        self.projection_years as usize
    }
}

/// Raw financial record as entered on the intake form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    #[serde(default)]
    pub starting_balance: Option<f64>,
    #[serde(default)]
    pub projection_years: Option<u32>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub current_contribution: Option<f64>,
}

impl From<&FinancialParameters> for FinancialRecord {
    fn from(params: &FinancialParameters) -> Self {
        Self {
            starting_balance: Some(params.starting_balance),
            projection_years: Some(params.projection_years),
            interest_rate: params.interest_rate,
            start_year: params.start_year,
            current_contribution: params.current_contribution,
        }
    }
}
