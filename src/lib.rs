//! Reserve Study - funding projection engine for condominium Structural Integrity Reserve Studies
//!
//! This library provides:
//! - Expenditure scheduling from a component inventory
//! - Fully funded balance and percent funded estimates
//! - Baseline, threshold, and fully funded policy contributions and balance trajectories
//! - Input validation that reports every missing field at once
//! - Batch projection of many independent studies

pub mod error;
pub mod financial;
pub mod inventory;
pub mod projection;
pub mod scenario;
pub mod validation;

// Re-export commonly used types
pub use error::LoadError;
pub use financial::{FinancialParameters, FinancialRecord};
pub use inventory::{Component, ComponentCategory, ComponentRecord};
pub use projection::{project, FundingPolicy, ProjectionConfig, ProjectionEngine, ProjectionResult, YearRow};
pub use scenario::{StudyRequest, StudyRunner};
pub use validation::{ValidationError, ValidationIssue};
