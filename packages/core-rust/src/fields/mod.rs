//! Concrete field types.
//!
//! Each type is an attribute payload composed into [`FieldBuilder`]; the
//! constructors below start a builder with the type's defaults.

pub mod image;
pub mod select;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::field::FieldBuilder;

pub use image::{ImageField, LimitWh, UploadMode};
pub use select::{FieldNames, SelectField};
pub use text::TextField;

/// One choice of an enumerable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub disabled: bool,
}

impl FieldOption {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// Starts a single-line text input.
pub fn text(name: impl Into<String>, label: impl Into<String>) -> FieldBuilder<TextField> {
    FieldBuilder::new(name, label, TextField::default())
}

/// Starts a select box.
pub fn select(name: impl Into<String>, label: impl Into<String>) -> FieldBuilder<SelectField> {
    FieldBuilder::new(name, label, SelectField::default())
}

/// Starts an image upload.
pub fn image(name: impl Into<String>, label: impl Into<String>) -> FieldBuilder<ImageField> {
    FieldBuilder::new(name, label, ImageField::default())
}

/// Rejects `value` unless it is one of `allowed`.
pub(crate) fn check_one_of(
    field: &str,
    attribute: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<(), ConfigError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnumValue {
            field: field.to_string(),
            attribute,
            value: value.to_string(),
            allowed,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn option_omits_disabled_when_false() {
        let json = serde_json::to_value(FieldOption::new("On", 1)).expect("serialize");
        assert_eq!(json, json!({"label": "On", "value": 1}));
        let json = serde_json::to_value(FieldOption::new("Off", 0).disabled()).expect("serialize");
        assert_eq!(json, json!({"label": "Off", "value": 0, "disabled": true}));
    }

    #[test]
    fn check_one_of_accepts_members_only() {
        assert!(check_one_of("f", "mode", "tags", &["multiple", "tags"]).is_ok());
        assert!(check_one_of("f", "mode", "single", &["multiple", "tags"]).is_err());
    }
}
