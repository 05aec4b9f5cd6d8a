use serde::Serialize;
use serde_json::{Map, Value};

use super::{check_one_of, FieldOption};
use crate::error::ConfigError;
use crate::field::{FieldBuilder, FieldType, ItemProps};
use crate::when::operand_to_string;

const MODES: &[&str] = &["multiple", "tags"];

/// Default input width of a select box, in pixels.
const DEFAULT_WIDTH: u32 = 200;

/// Renames the keys read from each option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNames {
    pub label: String,
    pub value: String,
    pub children: String,
}

/// Drop-down select box.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectField {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// `multiple` or `tags`; single selection when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_clear: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_search: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_names: Option<FieldNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tag_count: Option<u32>,
}

impl Default for SelectField {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            mode: None,
            allow_clear: true,
            show_search: false,
            loading: false,
            field_names: None,
            max_tag_count: None,
        }
    }
}

impl FieldType for SelectField {
    const COMPONENT: &'static str = "selectField";

    fn init_props(props: &mut ItemProps) {
        props.style.insert("width".into(), Value::from(DEFAULT_WIDTH));
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        match &self.mode {
            Some(mode) => check_one_of(field, "mode", mode, MODES),
            None => Ok(()),
        }
    }

    fn value_enum(&self) -> Option<Map<String, Value>> {
        if self.options.is_empty() {
            return None;
        }
        Some(
            self.options
                .iter()
                .map(|o| (operand_to_string(&o.value), Value::String(o.label.clone())))
                .collect(),
        )
    }
}

impl FieldBuilder<SelectField> {
    pub fn options(self, options: Vec<FieldOption>) -> Self {
        self.map_attrs(|a| a.options = options)
    }

    /// Selection mode; checked against `multiple`/`tags` when built.
    pub fn mode(self, mode: impl Into<String>) -> Self {
        let mode = mode.into();
        self.map_attrs(|a| a.mode = Some(mode))
    }

    pub fn allow_clear(self, allow: bool) -> Self {
        self.map_attrs(|a| a.allow_clear = allow)
    }

    pub fn show_search(self, show: bool) -> Self {
        self.map_attrs(|a| a.show_search = show)
    }

    pub fn loading(self, loading: bool) -> Self {
        self.map_attrs(|a| a.loading = loading)
    }

    pub fn field_names(self, names: FieldNames) -> Self {
        self.map_attrs(|a| a.field_names = Some(names))
    }

    pub fn max_tag_count(self, count: u32) -> Self {
        self.map_attrs(|a| a.max_tag_count = Some(count))
    }
}
