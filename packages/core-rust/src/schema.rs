//! Serialized field schema consumed by the rendering client.
//!
//! A [`FieldDescriptor`] is rendered per request: frontend rules depend on
//! the request path, everything else is copied from the frozen descriptor.
//!
//! Wire shape of one field:
//!
//! ```json
//! {
//!   "componentkey": "status",
//!   "component": "selectField",
//!   "name": "status",
//!   "label": "Status",
//!   "colon": true,
//!   "...": "item props and type attributes",
//!   "frontendRules": [{ "required": true, "message": "..." }],
//!   "when": { "items": [{ "condition": "<%=String(status) === '1' %>",
//!                         "conditionName": "status",
//!                         "conditionOperator": "=",
//!                         "option": "1",
//!                         "body": [] }] }
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::field::{FieldDescriptor, ItemProps};
use crate::rule::FrontendRule;
use crate::when::{When, WhenBody, WhenClause};

/// One rendered field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(rename = "componentkey")]
    pub component_key: String,
    pub component: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(flatten)]
    pub props: ItemProps,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    pub frontend_rules: Vec<FrontendRule>,
    pub when: Option<WhenSchema>,
}

/// Rendered `when` collection.
#[derive(Debug, Clone, Serialize)]
pub struct WhenSchema {
    pub items: Vec<WhenItemSchema>,
}

/// Rendered clause.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhenItemSchema {
    pub condition: String,
    pub condition_name: String,
    pub condition_operator: String,
    pub option: Value,
    pub body: BodySchema,
}

/// Rendered clause body. `Empty` serializes as `null`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BodySchema {
    Empty,
    Fields(Vec<FieldSchema>),
    Value(Value),
}

impl FieldDescriptor {
    /// Renders the field for a request to `path`.
    #[must_use]
    pub fn render(&self, path: &str) -> FieldSchema {
        FieldSchema {
            component_key: self.key().to_string(),
            component: self.component(),
            name: self.name().to_string(),
            label: self.label().to_string(),
            props: self.props().clone(),
            attributes: self.attributes().clone(),
            frontend_rules: self.rules().resolve(path),
            when: render_when(self.when(), path),
        }
    }
}

fn render_when(when: &When, path: &str) -> Option<WhenSchema> {
    if when.is_empty() {
        return None;
    }
    Some(WhenSchema {
        items: when.items().iter().map(|c| render_clause(c, path)).collect(),
    })
}

fn render_clause(clause: &WhenClause, path: &str) -> WhenItemSchema {
    let body = match &clause.body {
        WhenBody::Empty => BodySchema::Empty,
        WhenBody::Fields(fields) => BodySchema::Fields(render_all(fields.iter(), path)),
        WhenBody::Value(value) => BodySchema::Value(value.clone()),
    };
    WhenItemSchema {
        condition: clause.condition.clone(),
        condition_name: clause.condition_name.clone(),
        condition_operator: clause.condition_operator.clone(),
        option: clause.option.clone(),
        body,
    }
}

/// Renders every field against `path`.
pub fn render_all<'a>(
    fields: impl IntoIterator<Item = &'a FieldDescriptor>,
    path: &str,
) -> Vec<FieldSchema> {
    fields.into_iter().map(|f| f.render(path)).collect()
}
