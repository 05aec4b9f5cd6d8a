//! Definition-time configuration errors.
//!
//! Every variant is fatal for resource registration: a resource that fails to
//! build must never be served, because the rendering client cannot recover
//! from a malformed schema.

/// Errors detected while freezing field descriptors and resources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A closed-set attribute received a value outside its allowed set.
    #[error("field '{field}': {attribute} must be one of {allowed:?}, got '{value}'")]
    InvalidEnumValue {
        field: String,
        attribute: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// A `when` operand could not be serialized.
    #[error("field '{field}': when operand could not be serialized: {reason}")]
    Operand { field: String, reason: String },

    /// The `in` operator requires an operand that serializes to a sequence.
    #[error("field '{field}': operand of 'in' must be a sequence, got {found}")]
    InOperandNotSequence { field: String, found: String },

    /// A pattern rule carries a regular expression that does not compile.
    #[error("field '{field}': invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },

    /// Two fields of one resource resolved to the same component key.
    #[error("resource '{resource}': duplicate field key '{key}'")]
    DuplicateKey { resource: String, key: String },

    /// A resource was declared without a name.
    #[error("resource name must not be empty")]
    EmptyName,

    /// Type-owned attributes did not serialize to a JSON object.
    #[error("field '{field}': attributes could not be serialized: {reason}")]
    Attributes { field: String, reason: String },
}
