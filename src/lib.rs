//! Monthly payroll composition engine
//!
//! This crate composes one employee's monthly payroll from effective-dated
//! salary and social-security versions, daily attendance, a performance
//! appraisal and compensation/penalty records, then validates the result and
//! moves it through the calculation/approval/payment workflow.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
