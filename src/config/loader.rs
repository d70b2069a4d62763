//! Configuration loading functionality.
//!
//! This module provides the [`ConfigProvider`] lookup trait and the
//! [`ConfigLoader`] type, which reads typed rules from a YAML file.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{ConfigRule, RuleValue};

use super::types::PayrollSettings;

/// A source of configuration values looked up by string key.
///
/// Absence is not an error: callers supply their own default.
pub trait ConfigProvider {
    /// Returns the value stored under `key`, if any.
    fn rule_value(&self, key: &str) -> Option<RuleValue>;
}

impl ConfigProvider for HashMap<String, RuleValue> {
    fn rule_value(&self, key: &str) -> Option<RuleValue> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rules: Vec<ConfigRule>,
}

/// Loads and provides access to payroll configuration rules.
///
/// # File Format
///
/// ```text
/// rules:
///   - key: overtime.regular_multiplier
///     value:
///       type: numeric
///       value: "1.5"
///     description: Weekday overtime multiplier
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
/// let settings = loader.settings().unwrap();
/// println!("Monthly standard hours: {}", settings.monthly_standard_hours);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    rules: HashMap<String, ConfigRule>,
}

impl ConfigLoader {
    /// Loads rules from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or a key appears twice (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses rules from YAML text.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::ConfigLoader;
    /// use rust_decimal::Decimal;
    ///
    /// let loader = ConfigLoader::from_yaml_str(r#"
    /// rules:
    ///   - key: bonus.full_attendance
    ///     value:
    ///       type: numeric
    ///       value: "200"
    /// "#).unwrap();
    ///
    /// let settings = loader.settings().unwrap();
    /// assert_eq!(settings.full_attendance_bonus, Decimal::new(200, 0));
    /// ```
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, path: &str) -> EngineResult<Self> {
        let file: RulesFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let mut rules = HashMap::with_capacity(file.rules.len());
        for rule in file.rules {
            if rules.contains_key(&rule.key) {
                return Err(EngineError::ConfigParseError {
                    path: path.to_string(),
                    message: format!("duplicate key '{}'", rule.key),
                });
            }
            rules.insert(rule.key.clone(), rule);
        }

        tracing::debug!(path, rule_count = rules.len(), "Loaded payroll configuration");

        Ok(Self { rules })
    }

    /// Number of loaded rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules were loaded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Updates a rule value in place, keeping its data type.
    pub fn set(&mut self, key: &str, value: RuleValue) -> EngineResult<()> {
        match self.rules.get_mut(key) {
            Some(rule) => rule.set_value(value),
            None => {
                self.rules.insert(
                    key.to_string(),
                    ConfigRule {
                        key: key.to_string(),
                        value,
                        description: None,
                    },
                );
                Ok(())
            }
        }
    }

    /// Builds typed settings from the loaded rules.
    pub fn settings(&self) -> EngineResult<PayrollSettings> {
        PayrollSettings::from_provider(self)
    }
}

impl ConfigProvider for ConfigLoader {
    fn rule_value(&self, key: &str) -> Option<RuleValue> {
        self.rules.get(key).map(|rule| rule.value.clone())
    }
}
