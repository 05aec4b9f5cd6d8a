//! adminforge core: field descriptors, per-view visibility, validation rule
//! resolution, display conditions, and schema rendering for admin panels.
//!
//! Resources are declared once at startup and frozen; rendering a resource
//! for a request is a pure read.

pub mod column;
pub mod error;
pub mod field;
pub mod fields;
pub mod key;
pub mod projector;
pub mod resource;
pub mod rule;
pub mod schema;
pub mod view;
pub mod when;

pub use column::{Align, Column, Fixed};
pub use error::ConfigError;
pub use field::{FieldBuilder, FieldDescriptor, FieldType, ItemProps, LabelAlign, ValueCallback};
pub use fields::FieldOption;
pub use key::KeyConfig;
pub use projector::{project, Visible};
pub use resource::{Resource, ResourceBuilder, SheetHeader};
pub use rule::{FrontendRule, RequestPhase, Rule, RuleKind, RuleSet, ValueType};
pub use schema::{BodySchema, FieldSchema, WhenItemSchema, WhenSchema};
pub use view::{View, VisibilityMask};
pub use when::{IntoWhenBody, Operator, When, WhenBody, WhenClause};
