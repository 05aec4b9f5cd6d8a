use serde::Serialize;

use super::check_one_of;
use crate::error::ConfigError;
use crate::field::{FieldBuilder, FieldType, ItemProps};

const MODES: &[&str] = &["single", "multiple"];

/// Upload endpoint used when none is configured.
pub const DEFAULT_UPLOAD_API: &str = "/api/admin/upload/image/handle";

/// Upload cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Single,
    Multiple,
}

impl UploadMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UploadMode::Single => "single",
            UploadMode::Multiple => "multiple",
        }
    }
}

/// Pixel size limits; `0` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LimitWh {
    pub width: u32,
    pub height: u32,
}

/// Image upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageField {
    /// Kept as configured so an invalid value can be reported at build time.
    pub mode: String,
    pub button: String,
    /// Maximum file size in megabytes.
    pub limit_size: u32,
    pub limit_type: Vec<String>,
    pub limit_num: u32,
    #[serde(rename = "limitWH")]
    pub limit_wh: LimitWh,
}

impl Default for ImageField {
    fn default() -> Self {
        Self {
            mode: UploadMode::Single.as_str().to_string(),
            button: "Upload image".to_string(),
            limit_size: 2,
            limit_type: vec!["image/jpeg".to_string(), "image/png".to_string()],
            limit_num: 3,
            limit_wh: LimitWh::default(),
        }
    }
}

impl FieldType for ImageField {
    const COMPONENT: &'static str = "imageField";

    fn init_props(props: &mut ItemProps) {
        props.api = Some(DEFAULT_UPLOAD_API.to_string());
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        check_one_of(field, "mode", &self.mode, MODES)
    }
}

impl FieldBuilder<ImageField> {
    /// Upload mode. `s` and `m` abbreviate `single` and `multiple`; anything
    /// else outside that set fails the build.
    pub fn mode(self, mode: &str) -> Self {
        let mode = match mode {
            "s" => UploadMode::Single.as_str(),
            "m" => UploadMode::Multiple.as_str(),
            other => other,
        }
        .to_string();
        self.map_attrs(|a| a.mode = mode)
    }

    pub fn upload_mode(self, mode: UploadMode) -> Self {
        self.map_attrs(|a| a.mode = mode.as_str().to_string())
    }

    pub fn button(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.map_attrs(|a| a.button = text)
    }

    pub fn limit_size(self, megabytes: u32) -> Self {
        self.map_attrs(|a| a.limit_size = megabytes)
    }

    pub fn limit_type(self, mime_types: Vec<String>) -> Self {
        self.map_attrs(|a| a.limit_type = mime_types)
    }

    pub fn limit_num(self, count: u32) -> Self {
        self.map_attrs(|a| a.limit_num = count)
    }

    pub fn limit_wh(self, width: u32, height: u32) -> Self {
        self.map_attrs(|a| a.limit_wh = LimitWh { width, height })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::fields;
    use crate::key::KeyConfig;

    #[test]
    fn defaults_serialize_with_upload_limits() {
        let field = fields::image("cover", "Cover")
            .build(&KeyConfig::default())
            .expect("builds");
        assert_eq!(
            Value::Object(field.attributes().clone()),
            json!({
                "mode": "single",
                "button": "Upload image",
                "limitSize": 2,
                "limitType": ["image/jpeg", "image/png"],
                "limitNum": 3,
                "limitWH": {"width": 0, "height": 0},
            })
        );
        assert_eq!(field.props().api.as_deref(), Some(DEFAULT_UPLOAD_API));
    }

    #[test]
    fn mode_aliases_normalize() {
        let field = fields::image("gallery", "Gallery")
            .mode("m")
            .limit_wh(800, 600)
            .build(&KeyConfig::default())
            .expect("builds");
        assert_eq!(field.attributes().get("mode"), Some(&json!("multiple")));
        assert_eq!(
            field.attributes().get("limitWH"),
            Some(&json!({"width": 800, "height": 600}))
        );
    }

    #[test]
    fn invalid_mode_is_fatal_not_defaulted() {
        let err = fields::image("cover", "Cover")
            .mode("grid")
            .build(&KeyConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnumValue {
                field: "cover".into(),
                attribute: "mode",
                value: "grid".into(),
                allowed: MODES,
            }
        );
    }
}
