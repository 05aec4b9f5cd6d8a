//! Table column projection of a field.
//!
//! Each field owns a [`Column`] describing how it appears on the index
//! table. Field-level settings (label, name, editable flag, value enum) are
//! merged into the column when the resource's table is projected.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Horizontal alignment of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixed {
    Left,
    Right,
}

/// One table column as sent to the client.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub data_index: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub ellipsis: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub copyable: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value_enum: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub hide_in_search: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub sorter: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fixed: Option<Fixed>,
}

impl Column {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn ellipsis(mut self, ellipsis: bool) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    #[must_use]
    pub fn copyable(mut self, copyable: bool) -> Self {
        self.copyable = copyable;
        self
    }

    #[must_use]
    pub fn hide_in_search(mut self, hide: bool) -> Self {
        self.hide_in_search = hide;
        self
    }

    #[must_use]
    pub fn sorter(mut self, sorter: bool) -> Self {
        self.sorter = sorter;
        self
    }

    #[must_use]
    pub fn fixed(mut self, fixed: Fixed) -> Self {
        self.fixed = Some(fixed);
        self
    }
}
