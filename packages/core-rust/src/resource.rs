//! Resource definitions.
//!
//! A resource is a named, ordered list of frozen fields. It is assembled once
//! with a [`ResourceBuilder`] and then only read.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::column::Column;
use crate::error::ConfigError;
use crate::field::{FieldBuilder, FieldDescriptor, FieldType};
use crate::key::KeyConfig;
use crate::projector::{project, project_iter};
use crate::schema::{render_all, FieldSchema};
use crate::view::View;

// ---------------------------------------------------------------------------
// ResourceBuilder
// ---------------------------------------------------------------------------

type PendingField = Box<dyn FnOnce(&KeyConfig) -> Result<FieldDescriptor, ConfigError> + Send>;

/// Assembles a [`Resource`].
///
/// Fields are frozen by [`ResourceBuilder::build`], all under the builder's
/// final [`KeyConfig`]. Fields nested in `when` bodies are keyed the same way,
/// whatever configuration they were built with.
#[must_use]
pub struct ResourceBuilder {
    name: String,
    title: String,
    keys: KeyConfig,
    pending: Vec<PendingField>,
}

impl ResourceBuilder {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            keys: KeyConfig::default(),
            pending: Vec::new(),
        }
    }

    /// Key settings for every field of the resource.
    pub fn key_config(mut self, keys: KeyConfig) -> Self {
        self.keys = keys;
        self
    }

    /// Appends a field, frozen at [`ResourceBuilder::build`].
    pub fn field<T: FieldType + Send + 'static>(mut self, field: FieldBuilder<T>) -> Self {
        self.pending.push(Box::new(move |keys| field.build(keys)));
        self
    }

    /// Appends an already frozen field. Its keys are derived again under the
    /// resource's key settings.
    pub fn descriptor(mut self, field: FieldDescriptor) -> Self {
        self.pending.push(Box::new(move |_| Ok(field)));
        self
    }

    /// Finishes the resource.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyName`] for an unnamed resource, the first
    /// field error in declaration order, or [`ConfigError::DuplicateKey`] when
    /// two fields, nested ones included, share a component key.
    pub fn build(self) -> Result<Resource, ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let mut fields = Vec::with_capacity(self.pending.len());
        for freeze in self.pending {
            let mut field = freeze(&self.keys)?;
            field.rekey(&self.keys);
            fields.push(field);
        }

        let mut seen = HashSet::new();
        for field in fields.iter().flat_map(FieldDescriptor::with_nested) {
            if !seen.insert(field.key()) {
                return Err(ConfigError::DuplicateKey {
                    resource: self.name,
                    key: field.key().to_string(),
                });
            }
        }

        tracing::debug!(resource = %self.name, fields = fields.len(), "resource defined");

        Ok(Resource {
            name: self.name,
            title: self.title,
            fields,
        })
    }
}

impl fmt::Debug for ResourceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceBuilder")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("keys", &self.keys)
            .field("fields", &self.pending.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Name and label of one spreadsheet column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetHeader {
    pub name: String,
    pub label: String,
}

/// An immutable resource definition.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    title: String,
    fields: Vec<FieldDescriptor>,
}

impl Resource {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks a field up by component key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key() == key)
    }

    /// Fields shown on `view`, in declaration order.
    #[must_use]
    pub fn fields_for(&self, view: View) -> Vec<&FieldDescriptor> {
        project(view, &self.fields)
    }

    /// Rendered fields of `view` for a request to `path`.
    #[must_use]
    pub fn form_schema(&self, view: View, path: &str) -> Vec<FieldSchema> {
        render_all(project_iter(view, &self.fields), path)
    }

    /// Table columns of the index view.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        project_iter(View::Index, &self.fields)
            .map(FieldDescriptor::column)
            .collect()
    }

    /// Display form of one record on `view`: the fields shown there, each
    /// value passed through its field's callback. Missing values are `null`.
    #[must_use]
    pub fn display_row(&self, view: View, record: &Map<String, Value>) -> Map<String, Value> {
        project_iter(view, &self.fields)
            .map(|f| {
                let value = record.get(f.name()).unwrap_or(&Value::Null);
                (f.name().to_string(), f.display_value(value))
            })
            .collect()
    }

    /// Spreadsheet headers of the export or import view.
    #[must_use]
    pub fn sheet_headers(&self, view: View) -> Vec<SheetHeader> {
        project_iter(view, &self.fields)
            .map(|f| SheetHeader {
                name: f.name().to_string(),
                label: f.label().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{self, FieldOption};

    fn article() -> Resource {
        ResourceBuilder::new("article", "Articles")
            .field(fields::text("title", "Title").editable(true))
            .field(
                fields::select("status", "Status")
                    .options(vec![FieldOption::new("Draft", 0)])
                    .except_on_forms(),
            )
            .field(fields::image("cover", "Cover").only_on_forms())
            .field(fields::text("secret", "Secret").only_on(View::Export))
            .build()
            .expect("builds")
    }

    #[test]
    fn fields_for_projects_by_view() {
        let resource = article();
        let names = |view| -> Vec<String> {
            resource
                .fields_for(view)
                .iter()
                .map(|f| f.name().to_string())
                .collect()
        };
        assert_eq!(names(View::Index), vec!["title", "status"]);
        assert_eq!(names(View::Creation), vec!["title", "cover"]);
        assert_eq!(names(View::Export), vec!["title", "status", "secret"]);
    }

    #[test]
    fn columns_project_index_fields() {
        let columns = article().columns();
        assert_eq!(columns.len(), 2);
        assert!(columns[0].editable);
        assert_eq!(columns[1].data_index, "status");
        assert!(columns[1].value_enum.is_some());
    }

    #[test]
    fn form_schema_renders_visible_fields() {
        let schema = article().form_schema(View::Update, "/api/admin/article/1/edit");
        let components: Vec<_> = schema.iter().map(|s| s.component).collect();
        assert_eq!(components, vec!["textField", "imageField"]);
    }

    #[test]
    fn sheet_headers_use_name_and_label() {
        let headers = article().sheet_headers(View::Import);
        assert_eq!(
            headers,
            vec![
                SheetHeader { name: "title".into(), label: "Title".into() },
                SheetHeader { name: "status".into(), label: "Status".into() },
            ]
        );
    }

    #[test]
    fn duplicate_keys_fail() {
        let err = ResourceBuilder::new("article", "Articles")
            .field(fields::text("title", "Title"))
            .field(fields::text("title", "Again"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateKey {
                resource: "article".into(),
                key: "title".into(),
            }
        );
    }

    #[test]
    fn explicit_keys_disambiguate_same_name() {
        let resource = ResourceBuilder::new("article", "Articles")
            .field(fields::text("title", "Title"))
            .field(fields::text("title", "Title (copy)").key("title_copy"))
            .build()
            .expect("builds");
        assert!(resource.field("title_copy").is_some());
    }

    #[test]
    fn field_error_aborts_registration() {
        let err = ResourceBuilder::new("article", "Articles")
            .field(fields::image("cover", "Cover").mode("grid"))
            .field(fields::text("title", "Title"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    }

    #[test]
    fn empty_name_fails() {
        let err = ResourceBuilder::new("", "Nothing").build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyName);
    }

    #[test]
    fn crypt_keys_apply_to_all_fields() {
        let resource = ResourceBuilder::new("article", "Articles")
            .key_config(KeyConfig { default_key: None, crypt: true })
            .field(fields::text("title", "Title"))
            .build()
            .expect("builds");
        assert_eq!(resource.fields()[0].key(), crate::key::crypt_key("title"));
    }

    #[test]
    fn resource_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resource>();
    }

    fn crypt() -> KeyConfig {
        KeyConfig { default_key: None, crypt: true }
    }

    #[test]
    fn nested_fields_take_resource_key_config() {
        let resource = ResourceBuilder::new("article", "Articles")
            .key_config(crypt())
            .field(
                fields::select("status", "Status")
                    .when(1, || fields::text("reason", "Reason").build(&KeyConfig::default())),
            )
            .build()
            .expect("builds");

        let keys: Vec<_> = resource.fields()[0]
            .with_nested()
            .iter()
            .map(|f| f.key().to_string())
            .collect();
        assert_eq!(keys, vec![crate::key::crypt_key("status"), crate::key::crypt_key("reason")]);
    }

    #[test]
    fn nested_key_clashing_with_sibling_fails() {
        let err = ResourceBuilder::new("article", "Articles")
            .field(fields::text("title", "Title"))
            .field(
                fields::select("status", "Status")
                    .when(1, || fields::text("title", "Title").build(&KeyConfig::default())),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateKey {
                resource: "article".into(),
                key: "title".into(),
            }
        );
    }

    #[test]
    fn key_config_applies_regardless_of_call_order() {
        let resource = ResourceBuilder::new("article", "Articles")
            .field(fields::text("title", "Title"))
            .key_config(crypt())
            .field(fields::text("body", "Body").key("content"))
            .build()
            .expect("builds");
        let keys: Vec<_> = resource.fields().iter().map(FieldDescriptor::key).collect();
        assert_eq!(
            keys,
            vec![crate::key::crypt_key("title"), crate::key::crypt_key("content")]
        );
    }

    #[test]
    fn prebuilt_descriptor_is_rekeyed() {
        let descriptor = fields::text("title", "Title")
            .build(&KeyConfig::default())
            .expect("builds");
        let resource = ResourceBuilder::new("article", "Articles")
            .key_config(crypt())
            .descriptor(descriptor)
            .build()
            .expect("builds");
        assert_eq!(resource.fields()[0].key(), crate::key::crypt_key("title"));
    }

    #[test]
    fn display_row_applies_callbacks_of_visible_fields() {
        let resource = ResourceBuilder::new("product", "Products")
            .field(fields::text("name", "Name"))
            .field(
                fields::text("price", "Price")
                    .callback(|v| serde_json::json!(format!("${v}"))),
            )
            .field(fields::text("note", "Note").only_on_forms())
            .build()
            .expect("builds");

        let record = serde_json::json!({"name": "Lamp", "price": 12, "note": "x"});
        let row = resource.display_row(View::Index, record.as_object().expect("object"));
        assert_eq!(
            Value::Object(row),
            serde_json::json!({"name": "Lamp", "price": "$12"})
        );

        let empty = resource.display_row(View::Index, &Map::new());
        assert_eq!(empty.get("name"), Some(&Value::Null));
    }
}
