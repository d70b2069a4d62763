//! Configuration loading and management for the payroll engine.
//!
//! Rules are typed values looked up by string key through a
//! [`ConfigProvider`]. [`PayrollSettings`] reads them once, with documented
//! defaults for absent keys, and is then passed to every calculator.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! let settings = loader.settings().unwrap();
//! println!("Standard check-in: {}", settings.standard_check_in);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, ConfigProvider};
pub use types::{
    LeaveDeductionRatios, OvertimeMultipliers, PayrollSettings, RoundingMode, keys,
};
