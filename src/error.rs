//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while composing payroll.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calculation::InputCategory;
use crate::models::{Issue, PayrollStatus};

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::InputCategory;
/// use payroll_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::MissingInput {
///     employee_id: "emp_001".to_string(),
///     category: InputCategory::SalaryBase,
///     date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No salary base version for employee 'emp_001' effective on 2024-03-31"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// No effective version of a required input covers the target date.
    #[error("No {category} version for employee '{employee_id}' effective on {date}")]
    MissingInput {
        /// The employee whose input is missing.
        employee_id: String,
        /// Which input is missing.
        category: InputCategory,
        /// The date that had to be covered.
        date: NaiveDate,
    },

    /// Validation found blocking errors.
    #[error("Payroll for employee '{employee_id}' failed validation with {} error(s)", .errors.len())]
    ValidationFailed {
        /// The employee whose payroll was validated.
        employee_id: String,
        /// The blocking findings.
        errors: Vec<Issue>,
    },

    /// The composer produced totals that do not reconcile with their parts.
    #[error(
        "Internal consistency error for employee '{employee_id}': {field} is {stored} but components sum to {recomputed}"
    )]
    InternalConsistency {
        /// The employee being composed.
        employee_id: String,
        /// The total that failed to reconcile.
        field: String,
        /// The stored value.
        stored: String,
        /// The value recomputed from components.
        recomputed: String,
    },

    /// A workflow transition not allowed from the current state.
    #[error("Invalid payroll status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: PayrollStatus,
        /// The requested status.
        to: PayrollStatus,
    },

    /// Effective windows are malformed or overlap.
    #[error("Invalid version window for employee '{employee_id}': {message}")]
    InvalidVersionWindow {
        /// The employee whose versions are affected.
        employee_id: String,
        /// What is wrong with the windows.
        message: String,
    },

    /// A compensation/penalty execution was rejected.
    #[error("Invalid adjustment '{record_id}': {message}")]
    InvalidAdjustment {
        /// The record concerned.
        record_id: String,
        /// Why the operation was rejected.
        message: String,
    },

    /// A payroll period outside the calendar.
    #[error("Invalid payroll period {year}-{month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration key holds a value of the wrong type or form.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfigValue {
        /// The configuration key.
        key: String,
        /// What is wrong with the value.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
