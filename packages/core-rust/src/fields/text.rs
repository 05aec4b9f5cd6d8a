use serde::Serialize;

use crate::field::{FieldBuilder, FieldType};

/// Single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_count: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub allow_clear: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addon_after: Option<String>,
}

impl FieldType for TextField {
    const COMPONENT: &'static str = "textField";
}

impl FieldBuilder<TextField> {
    pub fn max_length(self, max: u32) -> Self {
        self.map_attrs(|a| a.max_length = Some(max))
    }

    pub fn show_count(self, show: bool) -> Self {
        self.map_attrs(|a| a.show_count = show)
    }

    pub fn allow_clear(self, allow: bool) -> Self {
        self.map_attrs(|a| a.allow_clear = allow)
    }

    pub fn addon_before(self, addon: impl Into<String>) -> Self {
        let addon = addon.into();
        self.map_attrs(|a| a.addon_before = Some(addon))
    }

    pub fn addon_after(self, addon: impl Into<String>) -> Self {
        let addon = addon.into();
        self.map_attrs(|a| a.addon_after = Some(addon))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::fields;
    use crate::key::KeyConfig;

    #[test]
    fn attributes_carry_only_set_keys() {
        let field = fields::text("title", "Title")
            .max_length(80)
            .addon_after("chars")
            .build(&KeyConfig::default())
            .expect("builds");
        assert_eq!(
            serde_json::Value::Object(field.attributes().clone()),
            json!({"maxLength": 80, "addonAfter": "chars"})
        );
    }
}
