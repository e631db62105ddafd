//! Study requests and a batch runner for many independent projections
//!
//! Each projection is a pure function of its inputs, so batches run in
//! parallel with no coordination between them.

use crate::financial::FinancialRecord;
use crate::inventory::{Component, ComponentRecord};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use crate::validation::ValidationError;
use crate::FinancialParameters;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A complete projection request: raw inventory, financial record, optional config
///
/// This is the JSON envelope accepted by the CLI and the Lambda handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyRequest {
    /// Study label (property name), carried through to batch output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub components: Vec<ComponentRecord>,

    pub financial: FinancialRecord,

    /// Overrides the runner's config when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ProjectionConfig>,
}

impl StudyRequest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Runs projections with a shared base configuration
///
/// # Example
/// ```ignore
/// let runner = StudyRunner::new();
///
/// // Same inventory, several configurations
/// let configs = [ProjectionConfig::default(), ProjectionConfig::default().recurring()];
/// let results = runner.run_scenarios(&components, &financial, &configs);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StudyRunner {
    base_config: ProjectionConfig,
}

impl StudyRunner {
    /// Create runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with a specific base configuration
    pub fn with_config(config: ProjectionConfig) -> Self {
        Self { base_config: config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.base_config
    }

    /// Get mutable reference to the base configuration for customization
    pub fn config_mut(&mut self) -> &mut ProjectionConfig {
        &mut self.base_config
    }

    fn engine_for(&self, request: &StudyRequest) -> ProjectionEngine {
        ProjectionEngine::new(request.config.clone().unwrap_or_else(|| self.base_config.clone()))
    }

    /// Validate and project a single request
    pub fn run(&self, request: &StudyRequest) -> Result<ProjectionResult, ValidationError> {
        self.engine_for(request)
            .project_records(&request.components, &request.financial)
    }

    /// Project many requests in parallel; results keep the input order
    pub fn run_batch(&self, requests: &[StudyRequest]) -> Vec<Result<ProjectionResult, ValidationError>> {
        log::info!("running {} studies", requests.len());
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    /// Project one inventory under several configurations in parallel
    pub fn run_scenarios(
        &self,
        components: &[Component],
        financial: &FinancialParameters,
        configs: &[ProjectionConfig],
    ) -> Vec<ProjectionResult> {
        configs
            .par_iter()
            .map(|config| ProjectionEngine::new(config.clone()).project(components, financial))
            .collect()
    }
}
