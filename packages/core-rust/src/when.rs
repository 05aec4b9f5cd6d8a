//! Inter-field display conditions ("when").
//!
//! A clause links the display of a nested body to the runtime value of the
//! field it is attached to. Conditions compile to template expressions of the
//! form `<%= ... %>` that the rendering client evaluates; the server never
//! evaluates them. The expression strings are part of the wire contract with
//! the client and are reproduced byte-for-byte, including the `=>` emitted
//! for `>=`.

use serde::Serialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::field::FieldDescriptor;

/// Operator token used when none is given.
pub const DEFAULT_OPERATOR: &str = "=";

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Recognized comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Le,
    Ge,
    Has,
    In,
}

impl Operator {
    /// Parses an operator token. Unknown tokens yield `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Operator::Eq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            ">=" => Some(Operator::Ge),
            "has" => Some(Operator::Has),
            "in" => Some(Operator::In),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Content shown when a clause's condition holds.
#[derive(Debug, Clone, Default)]
pub enum WhenBody {
    /// Nothing to show.
    #[default]
    Empty,
    /// Nested fields, rendered against the same request as their parent.
    Fields(Vec<FieldDescriptor>),
    /// Pre-built schema fragment passed through verbatim.
    Value(Value),
}

/// Values a `when` body closure may produce.
///
/// Implemented for `Result` so a nested field that fails to build reports its
/// error through the parent field.
pub trait IntoWhenBody {
    /// Converts into a body.
    ///
    /// # Errors
    ///
    /// Propagates the error of a failed nested build.
    fn into_when_body(self) -> Result<WhenBody, ConfigError>;
}

impl IntoWhenBody for WhenBody {
    fn into_when_body(self) -> Result<WhenBody, ConfigError> {
        Ok(self)
    }
}

impl IntoWhenBody for Vec<FieldDescriptor> {
    fn into_when_body(self) -> Result<WhenBody, ConfigError> {
        Ok(WhenBody::Fields(self))
    }
}

impl IntoWhenBody for FieldDescriptor {
    fn into_when_body(self) -> Result<WhenBody, ConfigError> {
        Ok(WhenBody::Fields(vec![self]))
    }
}

impl IntoWhenBody for Value {
    fn into_when_body(self) -> Result<WhenBody, ConfigError> {
        Ok(WhenBody::Value(self))
    }
}

impl IntoWhenBody for () {
    fn into_when_body(self) -> Result<WhenBody, ConfigError> {
        Ok(WhenBody::Empty)
    }
}

impl<T: IntoWhenBody> IntoWhenBody for Result<T, ConfigError> {
    fn into_when_body(self) -> Result<WhenBody, ConfigError> {
        self.and_then(IntoWhenBody::into_when_body)
    }
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// One compiled display condition.
#[derive(Debug, Clone)]
pub struct WhenClause {
    /// Template expression evaluated by the client.
    pub condition: String,
    /// Name of the field whose value is tested.
    pub condition_name: String,
    /// Operator token exactly as configured.
    pub condition_operator: String,
    /// Operand as configured.
    pub option: Value,
    pub body: WhenBody,
}

impl WhenClause {
    /// Compiles a clause for the field named `field_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Operand`] when the operand does not serialize,
    /// and [`ConfigError::InOperandNotSequence`] when `in` is given anything
    /// other than a sequence.
    pub fn compile<T: Serialize + ?Sized>(
        operator: &str,
        field_name: &str,
        operand: &T,
        body: WhenBody,
    ) -> Result<Self, ConfigError> {
        let option = serde_json::to_value(operand).map_err(|e| ConfigError::Operand {
            field: field_name.to_string(),
            reason: e.to_string(),
        })?;
        let condition = compile_condition(operator, field_name, &option)?;
        Ok(Self {
            condition,
            condition_name: field_name.to_string(),
            condition_operator: operator.to_string(),
            option,
            body,
        })
    }
}

/// Ordered clauses of one field. The client shows a body when its own
/// clause holds; clauses are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct When {
    items: Vec<WhenClause>,
}

impl When {
    /// Appends a clause; earlier clauses are kept.
    pub fn push(&mut self, clause: WhenClause) {
        self.items.push(clause);
    }

    #[must_use]
    pub fn items(&self) -> &[WhenClause] {
        &self.items
    }

    pub(crate) fn items_mut(&mut self) -> &mut [WhenClause] {
        &mut self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Stringifies an operand the way it is embedded into expressions.
#[must_use]
pub fn operand_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Compiles the expression for `operator` over field `name`.
///
/// Unrecognized operators fall back to the equality pattern.
///
/// # Errors
///
/// Returns [`ConfigError::InOperandNotSequence`] when `operator` is `in` and
/// `operand` is not an array.
pub fn compile_condition(operator: &str, name: &str, operand: &Value) -> Result<String, ConfigError> {
    let text = operand_to_string(operand);
    let condition = match Operator::parse(operator) {
        Some(Operator::Gt) => format!("<%=String({name}) > '{text}' %>"),
        Some(Operator::Lt) => format!("<%=String({name}) < '{text}' %>"),
        Some(Operator::Le) => format!("<%=String({name}) <= '{text}' %>"),
        Some(Operator::Ge) => format!("<%=String({name}) => '{text}' %>"),
        Some(Operator::Has) => format!("<%=(String({name}).indexOf('{text}') !=-1) %>"),
        Some(Operator::In) => {
            if !operand.is_array() {
                return Err(ConfigError::InOperandNotSequence {
                    field: name.to_string(),
                    found: json_kind(operand).to_string(),
                });
            }
            format!("<%=({operand}.indexOf({name}) !=-1) %>")
        }
        Some(Operator::Eq) | None => format!("<%=String({name}) === '{text}' %>"),
    };
    Ok(condition)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
