//! Typed configuration values.
//!
//! A [`RuleValue`] is one of a fixed set of data types. Callers read it
//! through the typed accessors and match exhaustively when they need to
//! handle every type.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The data type of a [`RuleValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDataType {
    /// Free text.
    Text,
    /// A decimal number.
    Numeric,
    /// True or false.
    Boolean,
    /// A calendar date.
    Date,
    /// Arbitrary structured JSON.
    Json,
}

impl std::fmt::Display for RuleDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleDataType::Text => write!(f, "text"),
            RuleDataType::Numeric => write!(f, "numeric"),
            RuleDataType::Boolean => write!(f, "boolean"),
            RuleDataType::Date => write!(f, "date"),
            RuleDataType::Json => write!(f, "json"),
        }
    }
}

/// A configuration value tagged with its data type.
///
/// Serialized adjacently tagged, e.g. `{"type": "numeric", "value": "1.5"}`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RuleValue;
/// use rust_decimal::Decimal;
///
/// let value = RuleValue::Numeric(Decimal::new(15, 1));
/// assert_eq!(value.as_decimal(), Some(Decimal::new(15, 1)));
/// assert_eq!(value.as_text(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RuleValue {
    /// Free text.
    Text(String),
    /// A decimal number.
    Numeric(Decimal),
    /// True or false.
    Boolean(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// Arbitrary structured JSON.
    Json(serde_json::Value),
}

impl RuleValue {
    /// The data type of this value.
    pub fn data_type(&self) -> RuleDataType {
        match self {
            RuleValue::Text(_) => RuleDataType::Text,
            RuleValue::Numeric(_) => RuleDataType::Numeric,
            RuleValue::Boolean(_) => RuleDataType::Boolean,
            RuleValue::Date(_) => RuleDataType::Date,
            RuleValue::Json(_) => RuleDataType::Json,
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The number, if this is a numeric value.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RuleValue::Numeric(number) => Some(*number),
            _ => None,
        }
    }

    /// The flag, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RuleValue::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The date, if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RuleValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// The JSON document, if this is a JSON value.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            RuleValue::Json(json) => Some(json),
            _ => None,
        }
    }
}

/// A named configuration rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRule {
    /// The lookup key, e.g. `"attendance.standard_check_in"`.
    pub key: String,
    /// The typed value.
    pub value: RuleValue,
    /// Optional description for administrators.
    #[serde(default)]
    pub description: Option<String>,
}

impl ConfigRule {
    /// Replaces the value, rejecting a change of data type.
    pub fn set_value(&mut self, value: RuleValue) -> EngineResult<()> {
        if value.data_type() != self.value.data_type() {
            return Err(EngineError::InvalidConfigValue {
                key: self.key.clone(),
                message: format!(
                    "expected {} value, got {}",
                    self.value.data_type(),
                    value.data_type()
                ),
            });
        }
        self.value = value;
        Ok(())
    }
}
