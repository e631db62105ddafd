//! Input validation for raw component and financial records
//!
//! Validation walks every record and collects all problems into a single
//! [`ValidationError`] so the caller can show them at once. Nothing is
//! projected from invalid input.

use crate::financial::{FinancialParameters, FinancialRecord};
use crate::inventory::{Component, ComponentCategory, ComponentRecord};
use crate::projection::ProjectionConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which input record an issue refers to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordRef {
    /// Component at `index` in the inventory (name if it was given)
    Component { index: usize, name: Option<String> },
    /// The financial parameters record
    Financial,
    /// The projection configuration
    Config,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Component { index, name: Some(name) } => {
                write!(f, "component #{} ({})", index + 1, name)
            }
            RecordRef::Component { index, name: None } => write!(f, "component #{}", index + 1),
            RecordRef::Financial => f.write_str("financial parameters"),
            RecordRef::Config => f.write_str("projection config"),
        }
    }
}

/// A single problem found in the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Required field absent
    Missing { record: RecordRef, field: String },
    /// Field present but outside its allowed range
    Invalid {
        record: RecordRef,
        field: String,
        reason: String,
    },
}

impl ValidationIssue {
    fn missing(record: &RecordRef, field: &str) -> Self {
        ValidationIssue::Missing {
            record: record.clone(),
            field: field.to_string(),
        }
    }

    fn invalid(record: &RecordRef, field: &str, reason: impl Into<String>) -> Self {
        ValidationIssue::Invalid {
            record: record.clone(),
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn record(&self) -> &RecordRef {
        match self {
            ValidationIssue::Missing { record, .. } | ValidationIssue::Invalid { record, .. } => record,
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ValidationIssue::Missing { field, .. } | ValidationIssue::Invalid { field, .. } => field,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ValidationIssue::Missing { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Missing { record, field } => {
                write!(f, "{}: missing required field `{}`", record, field)
            }
            ValidationIssue::Invalid { record, field, reason } => {
                write!(f, "{}: invalid `{}` ({})", record, field, reason)
            }
        }
    }
}

/// All problems found in a projection request
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid projection input: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn summarize(issues: &[ValidationIssue]) -> String {
    match issues.first() {
        Some(first) => format!("{} issue(s), first: {}", issues.len(), first),
        None => "no issues recorded".to_string(),
    }
}

impl ValidationError {
    /// Only the missing-field issues
    pub fn missing_fields(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_missing())
    }
}

/// Accumulates issues across records
#[derive(Debug, Default)]
struct IssueCollector {
    issues: Vec<ValidationIssue>,
}

impl IssueCollector {
    fn require<T: Clone>(&mut self, record: &RecordRef, field: &str, value: &Option<T>) -> Option<T> {
        if value.is_none() {
            self.issues.push(ValidationIssue::missing(record, field));
        }
        value.clone()
    }

    fn require_number(&mut self, record: &RecordRef, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            None => {
                self.issues.push(ValidationIssue::missing(record, field));
                None
            }
            Some(v) if !v.is_finite() => {
                self.issues.push(ValidationIssue::invalid(record, field, "not a finite number"));
                None
            }
            Some(v) => Some(v),
        }
    }

    fn non_negative(&mut self, record: &RecordRef, field: &str, value: Option<f64>) {
        if let Some(v) = value {
            if v < 0.0 {
                self.issues
                    .push(ValidationIssue::invalid(record, field, format!("{} is negative", v)));
            }
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(v) if self.issues.is_empty() => Ok(v),
            _ => Err(ValidationError { issues: self.issues }),
        }
    }
}

fn check_component(
    collector: &mut IssueCollector,
    index: usize,
    record: &ComponentRecord,
) -> Option<Component> {
    let name = record.name.as_ref().filter(|n| !n.trim().is_empty()).cloned();
    let at = RecordRef::Component {
        index,
        name: name.clone(),
    };

    let name = collector.require(&at, "name", &name);
    let useful_life = collector.require_number(&at, "useful_life", record.useful_life);
    let remaining_life = collector.require_number(&at, "remaining_life", record.remaining_life);
    let replacement_cost = collector.require_number(&at, "replacement_cost", record.replacement_cost);

    collector.non_negative(&at, "useful_life", useful_life);
    collector.non_negative(&at, "remaining_life", remaining_life);
    collector.non_negative(&at, "replacement_cost", replacement_cost);

    let category = record
        .category
        .as_deref()
        .map(|c| c.parse::<ComponentCategory>().unwrap_or_default())
        .unwrap_or_default();

    Some(Component {
        name: name?,
        category,
        useful_life: useful_life?,
        remaining_life: remaining_life?,
        replacement_cost: replacement_cost?,
        quantity: record.quantity,
        unit: record.unit.clone(),
        description: record.description.clone(),
    })
}

fn check_financial(collector: &mut IssueCollector, record: &FinancialRecord) -> Option<FinancialParameters> {
    let at = RecordRef::Financial;

    let starting_balance = collector.require_number(&at, "starting_balance", record.starting_balance);
    collector.non_negative(&at, "starting_balance", starting_balance);

    let projection_years = record.projection_years.unwrap_or(FinancialParameters::DEFAULT_PROJECTION_YEARS);
    if projection_years == 0 {
        collector
            .issues
            .push(ValidationIssue::invalid(&at, "projection_years", "horizon must be at least one year"));
    } else if projection_years > FinancialParameters::MAX_PROJECTION_YEARS {
        collector.issues.push(ValidationIssue::invalid(
            &at,
            "projection_years",
            format!(
                "{} exceeds the {}-year maximum",
                projection_years,
                FinancialParameters::MAX_PROJECTION_YEARS
            ),
        ));
    }

    if let Some(rate) = record.interest_rate {
        if !rate.is_finite() || rate <= -1.0 {
            collector
                .issues
                .push(ValidationIssue::invalid(&at, "interest_rate", format!("{} is not a usable rate", rate)));
        }
    }

    if let Some(contribution) = record.current_contribution {
        if !contribution.is_finite() {
            collector.issues.push(ValidationIssue::invalid(
                &at,
                "current_contribution",
                "not a finite number",
            ));
        }
    }

    Some(FinancialParameters {
        starting_balance: starting_balance?,
        projection_years,
        interest_rate: record.interest_rate,
        start_year: record.start_year,
        current_contribution: record.current_contribution,
    })
}

/// Validate raw component records
pub fn validate_components(records: &[ComponentRecord]) -> Result<Vec<Component>, ValidationError> {
    let mut collector = IssueCollector::default();
    let components: Option<Vec<Component>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| check_component(&mut collector, i, r))
        .collect::<Vec<_>>()
        .into_iter()
        .collect();
    collector.finish(components)
}

/// Validate a raw financial record
pub fn validate_financial(record: &FinancialRecord) -> Result<FinancialParameters, ValidationError> {
    let mut collector = IssueCollector::default();
    let financial = check_financial(&mut collector, record);
    collector.finish(financial)
}

fn check_config(collector: &mut IssueCollector, config: &ProjectionConfig) {
    let at = RecordRef::Config;
    let ratio = config.threshold_ratio;
    if !ratio.is_finite() || ratio < 0.0 {
        collector.issues.push(ValidationIssue::invalid(
            &at,
            "threshold_ratio",
            format!("{} is not a usable fraction of the fully funded balance", ratio),
        ));
    }
}

fn check_request(
    collector: &mut IssueCollector,
    records: &[ComponentRecord],
    financial: &FinancialRecord,
) -> Option<(Vec<Component>, FinancialParameters)> {
    let components: Vec<Option<Component>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| check_component(collector, i, r))
        .collect();
    let financial = check_financial(collector, financial);

    let components: Option<Vec<Component>> = components.into_iter().collect();
    components.zip(financial)
}

/// Validate components and financial parameters together, reporting every issue
pub fn validate_request(
    records: &[ComponentRecord],
    financial: &FinancialRecord,
) -> Result<(Vec<Component>, FinancialParameters), ValidationError> {
    let mut collector = IssueCollector::default();
    let both = check_request(&mut collector, records, financial);
    collector.finish(both)
}

/// Validate a projection configuration
pub fn validate_config(config: &ProjectionConfig) -> Result<(), ValidationError> {
    let mut collector = IssueCollector::default();
    check_config(&mut collector, config);
    collector.finish(Some(()))
}

/// Validate records and the configuration they will be projected with
pub fn validate_study(
    records: &[ComponentRecord],
    financial: &FinancialRecord,
    config: &ProjectionConfig,
) -> Result<(Vec<Component>, FinancialParameters), ValidationError> {
    let mut collector = IssueCollector::default();
    let both = check_request(&mut collector, records, financial);
    check_config(&mut collector, config);
    collector.finish(both)
}

/// Validate already-typed inputs (numeric ranges only)
pub fn validate_parameters(
    components: &[Component],
    financial: &FinancialParameters,
    config: &ProjectionConfig,
) -> Result<(), ValidationError> {
    let records: Vec<ComponentRecord> = components.iter().map(ComponentRecord::from).collect();
    validate_study(&records, &FinancialRecord::from(financial), config).map(|_| ())
}
