//! Field descriptors and their staged construction.
//!
//! A field is declared with a [`FieldBuilder`], which owns the field's
//! identity, visibility, rules, display conditions, column projection and a
//! type-specific attribute payload. Every builder step consumes and returns
//! the builder. [`FieldBuilder::build`] freezes it into an immutable
//! [`FieldDescriptor`] that can be shared freely across request handlers.
//!
//! Field types (text, select, image, ...) are plain attribute structs
//! implementing [`FieldType`]; visibility, rule and condition handling is
//! implemented once here and shared by all of them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::column::Column;
use crate::error::ConfigError;
use crate::key::KeyConfig;
use crate::rule::{Rule, RuleSet};
use crate::view::{View, VisibilityMask};
use crate::when::{IntoWhenBody, When, WhenBody, WhenClause, DEFAULT_OPERATOR};

// ---------------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------------

/// Type-specific attribute payload of a field.
///
/// The payload serializes to a JSON object whose keys are merged into the
/// rendered field schema.
pub trait FieldType: Serialize {
    /// Component tag the client renders this field with.
    const COMPONENT: &'static str;

    /// Adjusts the item defaults when a builder is created.
    fn init_props(_props: &mut ItemProps) {}

    /// Checks closed-set attributes before the field is frozen.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnumValue`] for out-of-range values.
    fn validate(&self, _field: &str) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Value-to-label mapping used by table columns.
    fn value_enum(&self) -> Option<Map<String, Value>> {
        None
    }
}

// ---------------------------------------------------------------------------
// ItemProps
// ---------------------------------------------------------------------------

/// Form item display attributes shared by every field type.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProps {
    pub colon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_feedback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Initial value of the item; the form's own initial values win.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<Value>,
    pub label_align: LabelAlign,
    /// Grid layout of the label, e.g. `{"span": 3, "offset": 12}`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_col: Option<Value>,
    /// Render the bare control without item styling.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub no_style: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Property of the control that holds the value, e.g. `checked`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_prop_name: Option<String>,
    /// Grid layout of the control, same shape as `label_col`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_col: Option<Value>,
    /// Value is shown but not persisted.
    pub ignore: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Controlled value of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
}

impl Default for ItemProps {
    fn default() -> Self {
        Self {
            colon: true,
            extra: None,
            has_feedback: false,
            help: None,
            tooltip: None,
            hidden: false,
            initial_value: None,
            label_align: LabelAlign::Right,
            label_col: None,
            no_style: false,
            required: false,
            value_prop_name: None,
            wrapper_col: None,
            ignore: false,
            api: None,
            default_value: None,
            disabled: false,
            placeholder: None,
            value: None,
            style: Map::new(),
        }
    }
}

/// Alignment of a form item's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// ValueCallback
// ---------------------------------------------------------------------------

/// Transforms a stored value into its displayed form.
#[derive(Clone)]
pub struct ValueCallback(Arc<dyn Fn(&Value) -> Value + Send + Sync>);

impl ValueCallback {
    pub fn new(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn call(&self, value: &Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for ValueCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueCallback")
    }
}

// ---------------------------------------------------------------------------
// FieldBuilder
// ---------------------------------------------------------------------------

/// Staged, single-owner construction of a field.
///
/// Errors from individual steps (e.g. a malformed `when` operand) are
/// collected and reported by [`FieldBuilder::build`], so chains stay flat.
#[derive(Debug)]
#[must_use]
pub struct FieldBuilder<T: FieldType> {
    key: Option<String>,
    name: String,
    label: String,
    mask: VisibilityMask,
    rules: RuleSet,
    when: When,
    editable: bool,
    column: Column,
    callback: Option<ValueCallback>,
    props: ItemProps,
    attrs: T,
    errors: Vec<ConfigError>,
}

impl<T: FieldType> FieldBuilder<T> {
    /// Starts a field bound to `name` with the given label and payload.
    pub fn new(name: impl Into<String>, label: impl Into<String>, attrs: T) -> Self {
        let mut props = ItemProps::default();
        T::init_props(&mut props);
        Self {
            key: None,
            name: name.into(),
            label: label.into(),
            mask: VisibilityMask::default(),
            rules: RuleSet::default(),
            when: When::default(),
            editable: false,
            column: Column::default(),
            callback: None,
            props,
            attrs,
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attrs(&self) -> &T {
        &self.attrs
    }

    pub(crate) fn map_attrs(mut self, f: impl FnOnce(&mut T)) -> Self {
        f(&mut self.attrs);
        self
    }

    // ----- identity and item props -----

    /// Explicit component key. Defaults to one derived from the name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.props.tooltip = Some(tooltip.into());
        self
    }

    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.props.extra = Some(extra.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.props.help = Some(help.into());
        self
    }

    pub fn colon(mut self, colon: bool) -> Self {
        self.props.colon = colon;
        self
    }

    pub fn label_align(mut self, align: LabelAlign) -> Self {
        self.props.label_align = align;
        self
    }

    pub fn label_col(mut self, layout: impl Into<Value>) -> Self {
        self.props.label_col = Some(layout.into());
        self
    }

    pub fn wrapper_col(mut self, layout: impl Into<Value>) -> Self {
        self.props.wrapper_col = Some(layout.into());
        self
    }

    /// Shows the validation status icon next to the control.
    pub fn has_feedback(mut self, feedback: bool) -> Self {
        self.props.has_feedback = feedback;
        self
    }

    pub fn no_style(mut self, no_style: bool) -> Self {
        self.props.no_style = no_style;
        self
    }

    pub fn value_prop_name(mut self, name: impl Into<String>) -> Self {
        self.props.value_prop_name = Some(name.into());
        self
    }

    pub fn initial_value(mut self, value: impl Into<Value>) -> Self {
        self.props.initial_value = Some(value.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.props.value = Some(value.into());
        self
    }

    /// Marks the item as required in the form layout. Validation is still
    /// driven by the rules.
    pub fn required(mut self) -> Self {
        self.props.required = true;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.props.hidden = hidden;
        self
    }

    pub fn ignore(mut self, ignore: bool) -> Self {
        self.props.ignore = ignore;
        self
    }

    pub fn api(mut self, api: impl Into<String>) -> Self {
        self.props.api = Some(api.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.props.default_value = Some(value.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.props.disabled = disabled;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.props.placeholder = Some(placeholder.into());
        self
    }

    /// Sets one inline style property, keeping the others.
    pub fn style(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.style.insert(property.into(), value.into());
        self
    }

    /// Width of the input, either pixels or a size token (`xs`, `s`, `m`, `l`, `x`).
    pub fn width(self, width: impl Into<Value>) -> Self {
        self.style("width", width)
    }

    // ----- visibility -----

    pub fn hide_from(mut self, view: View, hidden: bool) -> Self {
        self.mask.hide_from(view, hidden);
        self
    }

    pub fn show_on(mut self, view: View, shown: bool) -> Self {
        self.mask.show_on(view, shown);
        self
    }

    pub fn only_on(mut self, view: View) -> Self {
        self.mask.only_on(view);
        self
    }

    pub fn only_on_forms(mut self) -> Self {
        self.mask.only_on_forms();
        self
    }

    pub fn except_on_forms(mut self) -> Self {
        self.mask.except_on_forms();
        self
    }

    #[must_use]
    pub fn is_shown_on(&self, view: View) -> bool {
        self.mask.is_shown_on(view)
    }

    // ----- rules -----

    /// Rules applied to every submission. Replaces earlier global rules.
    pub fn rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules.global = rules;
        self
    }

    /// Rules applied to creation submissions only.
    pub fn creation_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules.creation = rules;
        self
    }

    /// Rules applied to update submissions only.
    pub fn update_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules.update = rules;
        self
    }

    // ----- display conditions -----

    /// Shows `body` when this field's value equals `operand`.
    pub fn when<V, F, B>(self, operand: V, body: F) -> Self
    where
        V: Serialize,
        F: FnOnce() -> B,
        B: IntoWhenBody,
    {
        self.when_op(DEFAULT_OPERATOR, operand, body)
    }

    /// Shows `body` when `operator` holds between this field's value and
    /// `operand`. Appends a clause; earlier clauses are kept.
    pub fn when_op<V, F, B>(mut self, operator: &str, operand: V, body: F) -> Self
    where
        V: Serialize,
        F: FnOnce() -> B,
        B: IntoWhenBody,
    {
        let clause = body()
            .into_when_body()
            .and_then(|body| WhenClause::compile(operator, &self.name, &operand, body));
        match clause {
            Ok(clause) => self.when.push(clause),
            Err(err) => self.errors.push(err),
        }
        self
    }

    // ----- table -----

    /// Allows inline editing of the field's table cell.
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Adjusts the field's table column.
    pub fn column(mut self, f: impl FnOnce(Column) -> Column) -> Self {
        self.column = f(self.column);
        self
    }

    /// Display transform applied to values of this field.
    pub fn callback(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.callback = Some(ValueCallback::new(f));
        self
    }

    // ----- freeze -----

    /// Validates the configuration and freezes it.
    ///
    /// # Errors
    ///
    /// Returns the first error recorded by a builder step, an invalid rule
    /// pattern, an out-of-range type attribute, or an attribute payload that
    /// does not serialize to a JSON object.
    pub fn build(self, keys: &KeyConfig) -> Result<FieldDescriptor, ConfigError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }
        self.rules.validate(&self.name)?;
        self.attrs.validate(&self.name)?;

        let attributes = match serde_json::to_value(&self.attrs) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                return Err(ConfigError::Attributes {
                    field: self.name,
                    reason: format!("expected an object, got {other}"),
                })
            }
            Err(e) => {
                return Err(ConfigError::Attributes {
                    field: self.name,
                    reason: e.to_string(),
                })
            }
        };
        let value_enum = self.attrs.value_enum();
        let key = keys.make_key(self.key.as_deref(), &self.name);

        tracing::debug!(
            field = %self.name,
            component = T::COMPONENT,
            key = %key,
            when = self.when.len(),
            "field frozen"
        );

        Ok(FieldDescriptor {
            key,
            explicit_key: self.key,
            name: self.name,
            label: self.label,
            component: T::COMPONENT,
            mask: self.mask,
            rules: self.rules,
            when: self.when,
            editable: self.editable,
            column: self.column,
            callback: self.callback,
            props: self.props,
            attributes,
            value_enum,
        })
    }
}

// ---------------------------------------------------------------------------
// FieldDescriptor
// ---------------------------------------------------------------------------

/// A frozen field. Exposes reads only.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    key: String,
    explicit_key: Option<String>,
    name: String,
    label: String,
    component: &'static str,
    mask: VisibilityMask,
    rules: RuleSet,
    when: When,
    editable: bool,
    column: Column,
    callback: Option<ValueCallback>,
    props: ItemProps,
    attributes: Map<String, Value>,
    value_enum: Option<Map<String, Value>>,
}

impl FieldDescriptor {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn component(&self) -> &'static str {
        self.component
    }

    #[must_use]
    pub fn visibility(&self) -> VisibilityMask {
        self.mask
    }

    #[must_use]
    pub fn is_shown_on(&self, view: View) -> bool {
        self.mask.is_shown_on(view)
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub fn when(&self) -> &When {
        &self.when
    }

    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    #[must_use]
    pub fn props(&self) -> &ItemProps {
        &self.props
    }

    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    #[must_use]
    pub fn value_enum(&self) -> Option<&Map<String, Value>> {
        self.value_enum.as_ref()
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Applies the display callback, or returns the value unchanged.
    #[must_use]
    pub fn display_value(&self, value: &Value) -> Value {
        match &self.callback {
            Some(cb) => cb.call(value),
            None => value.clone(),
        }
    }

    /// This field followed by the fields nested in its `when` bodies, depth
    /// first.
    #[must_use]
    pub fn with_nested(&self) -> Vec<&FieldDescriptor> {
        let mut out = vec![self];
        for clause in self.when.items() {
            if let WhenBody::Fields(nested) = &clause.body {
                for field in nested {
                    out.extend(field.with_nested());
                }
            }
        }
        out
    }

    /// Derives the component keys of this field and its nested fields again
    /// under `keys`. Explicit keys stay the source of their field's key.
    pub(crate) fn rekey(&mut self, keys: &KeyConfig) {
        self.key = keys.make_key(self.explicit_key.as_deref(), &self.name);
        for clause in self.when.items_mut() {
            if let WhenBody::Fields(nested) = &mut clause.body {
                for field in nested {
                    field.rekey(keys);
                }
            }
        }
    }

    /// The field's table column with field-level settings merged in.
    ///
    /// Title falls back to the label; an explicit column title is kept.
    #[must_use]
    pub fn column(&self) -> Column {
        let mut column = self.column.clone();
        if column.title.is_empty() {
            column.title.clone_from(&self.label);
        }
        column.data_index.clone_from(&self.name);
        column.key.clone_from(&self.key);
        column.editable = self.editable;
        if column.value_enum.is_none() {
            column.value_enum.clone_from(&self.value_enum);
        }
        column
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fields::{self, ImageField, TextField};

    fn keys() -> KeyConfig {
        KeyConfig::default()
    }

    #[test]
    fn defaults_show_everywhere() {
        let field = fields::text("title", "Title").build(&keys()).expect("builds");
        for view in View::ALL {
            assert!(field.is_shown_on(view));
        }
        assert_eq!(field.key(), "title");
        assert_eq!(field.component(), TextField::COMPONENT);
    }

    #[test]
    fn visibility_chain_last_write_wins() {
        let field = fields::text("title", "Title")
            .only_on_forms()
            .hide_from(View::Update, true)
            .show_on(View::Index, true)
            .build(&keys())
            .expect("builds");
        assert!(field.is_shown_on(View::Creation));
        assert!(!field.is_shown_on(View::Update));
        assert!(field.is_shown_on(View::Index));
        assert!(!field.is_shown_on(View::Detail));
    }

    #[test]
    fn two_when_calls_produce_two_clauses_in_order() {
        let field = fields::select("status", "Status")
            .when(1, || ())
            .when(2, || json!({"component": "text"}))
            .build(&keys())
            .expect("builds");
        let clauses = field.when().items();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].condition, "<%=String(status) === '1' %>");
        assert_eq!(clauses[1].condition, "<%=String(status) === '2' %>");
        assert!(matches!(clauses[1].body, WhenBody::Value(_)));
    }

    #[test]
    fn when_body_closure_runs_once_at_definition() {
        let mut calls = 0;
        let _ = fields::text("status", "Status").when_op(">=", "5", || {
            calls += 1;
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn in_operand_must_be_sequence() {
        let err = fields::select("status", "Status")
            .when_op("in", "1", || ())
            .build(&keys())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InOperandNotSequence { .. }));
    }

    #[test]
    fn nested_build_error_surfaces_on_parent() {
        let err = fields::select("kind", "Kind")
            .when("photo", || fields::image("cover", "Cover").mode("many").build(&keys()))
            .build(&keys())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnumValue { ref field, .. } if field == "cover"));
    }

    #[test]
    fn nested_fields_become_body() {
        let field = fields::select("kind", "Kind")
            .when("photo", || fields::image("cover", "Cover").build(&keys()))
            .build(&keys())
            .expect("builds");
        match &field.when().items()[0].body {
            WhenBody::Fields(nested) => assert_eq!(nested[0].component(), ImageField::COMPONENT),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn invalid_pattern_rejected_at_build() {
        let err = fields::text("slug", "Slug")
            .rules(vec![Rule::pattern("(", "bad")])
            .build(&keys())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn width_merges_into_style() {
        let field = fields::text("title", "Title")
            .style("color", "red")
            .width(400)
            .build(&keys())
            .expect("builds");
        assert_eq!(field.props().style.get("width"), Some(&json!(400)));
        assert_eq!(field.props().style.get("color"), Some(&json!("red")));
    }

    #[test]
    fn column_merges_field_settings() {
        let field = fields::select("status", "Status")
            .options(vec![fields::FieldOption::new("On", 1)])
            .editable(true)
            .column(|c| c.width(80))
            .build(&keys())
            .expect("builds");
        let column = field.column();
        assert_eq!(column.title, "Status");
        assert_eq!(column.data_index, "status");
        assert_eq!(column.width, Some(80));
        assert!(column.editable);
        assert_eq!(column.value_enum, Some(json!({"1": "On"}).as_object().cloned().unwrap()));
    }

    #[test]
    fn callback_transforms_display_value() {
        let field = fields::text("price", "Price")
            .callback(|v| json!(format!("${}", v)))
            .build(&keys())
            .expect("builds");
        assert!(field.has_callback());
        assert_eq!(field.display_value(&json!(5)), json!("$5"));

        let plain = fields::text("price", "Price").build(&keys()).expect("builds");
        assert_eq!(plain.display_value(&json!(5)), json!(5));
    }

    #[test]
    fn descriptor_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldDescriptor>();
    }
}
