//! Validation rules and their request-path based resolution.
//!
//! A field carries three ordered rule lists: rules that always apply, rules
//! that apply only when creating, and rules that apply only when updating.
//! [`RuleSet::resolve`] picks the lists relevant to a request path and
//! converts each rule into the shape the rendering client validates with.
//! Rules that only the server can enforce (e.g. uniqueness) have no frontend
//! form and are dropped from the resolved list.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// Value type a `type` rule checks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
    Email,
    Url,
}

/// What a rule checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleKind {
    /// Value must be present.
    Required,
    /// Minimum length (strings, lists) or value (numbers).
    Min { value: u64 },
    /// Maximum length (strings, lists) or value (numbers).
    Max { value: u64 },
    /// Exact length.
    Len { value: u64 },
    /// Value must match the regular expression.
    Pattern { pattern: String },
    /// Value must be of the given type.
    Type { value_type: ValueType },
    /// Whitespace-only strings count as empty.
    Whitespace,
    /// Value must be unique in `table.column`. Enforced by the server only.
    Unique { table: String, column: String },
    /// Named server-side validator. Enforced by the server only.
    Custom { name: String },
}

/// A validator specification attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub message: String,
}

impl Rule {
    fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    #[must_use]
    pub fn min(value: u64, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Min { value }, message)
    }

    #[must_use]
    pub fn max(value: u64, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Max { value }, message)
    }

    #[must_use]
    pub fn len(value: u64, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Len { value }, message)
    }

    /// The pattern is checked when the owning field is built.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            RuleKind::Pattern {
                pattern: pattern.into(),
            },
            message,
        )
    }

    #[must_use]
    pub fn value_type(value_type: ValueType, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Type { value_type }, message)
    }

    #[must_use]
    pub fn email(message: impl Into<String>) -> Self {
        Self::value_type(ValueType::Email, message)
    }

    #[must_use]
    pub fn url(message: impl Into<String>) -> Self {
        Self::value_type(ValueType::Url, message)
    }

    #[must_use]
    pub fn whitespace(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Whitespace, message)
    }

    #[must_use]
    pub fn unique(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            RuleKind::Unique {
                table: table.into(),
                column: column.into(),
            },
            message,
        )
    }

    #[must_use]
    pub fn custom(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(RuleKind::Custom { name: name.into() }, message)
    }

    /// Converts the rule to its client-side form.
    ///
    /// Returns `None` for rules the client cannot evaluate.
    #[must_use]
    pub fn to_frontend(&self) -> Option<FrontendRule> {
        let mut rule = FrontendRule {
            message: self.message.clone(),
            ..FrontendRule::default()
        };
        match &self.kind {
            RuleKind::Required => rule.required = Some(true),
            RuleKind::Min { value } => rule.min = Some(*value),
            RuleKind::Max { value } => rule.max = Some(*value),
            RuleKind::Len { value } => rule.len = Some(*value),
            RuleKind::Pattern { pattern } => rule.pattern = Some(pattern.clone()),
            RuleKind::Type { value_type } => rule.value_type = Some(*value_type),
            RuleKind::Whitespace => rule.whitespace = Some(true),
            RuleKind::Unique { .. } | RuleKind::Custom { .. } => return None,
        }
        Some(rule)
    }
}

/// A rule in the shape consumed by the rendering client's form validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendRule {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pattern: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub value_type: Option<ValueType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub whitespace: Option<bool>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// RequestPhase
// ---------------------------------------------------------------------------

/// Which form submission a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Creating,
    Editing,
    Other,
}

impl RequestPhase {
    /// Classifies a request path by its final non-empty segment.
    ///
    /// `create`/`store` select creation, `edit`/`update` select editing.
    /// Query strings and fragments are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.split('/').filter(|s| !s.is_empty()).next_back() {
            Some("create" | "store") => RequestPhase::Creating,
            Some("edit" | "update") => RequestPhase::Editing,
            _ => RequestPhase::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Global, creation-only and update-only rules of one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub global: Vec<Rule>,
    pub creation: Vec<Rule>,
    pub update: Vec<Rule>,
}

impl RuleSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.creation.is_empty() && self.update.is_empty()
    }

    /// Rules that apply to `phase`, in order: global, then creation or update.
    pub fn applicable(&self, phase: RequestPhase) -> impl Iterator<Item = &Rule> {
        let phase_rules: &[Rule] = match phase {
            RequestPhase::Creating => &self.creation,
            RequestPhase::Editing => &self.update,
            RequestPhase::Other => &[],
        };
        self.global.iter().chain(phase_rules)
    }

    /// Resolves the frontend rules for a request path.
    ///
    /// Deterministic and side-effect free. Rules without a frontend form are
    /// skipped.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Vec<FrontendRule> {
        let phase = RequestPhase::from_path(path);
        self.applicable(phase)
            .filter_map(|rule| {
                let converted = rule.to_frontend();
                if converted.is_none() {
                    tracing::trace!(kind = ?rule.kind, "rule has no frontend form; skipped");
                }
                converted
            })
            .collect()
    }

    /// Checks every pattern rule compiles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        for rule in self.global.iter().chain(&self.creation).chain(&self.update) {
            if let RuleKind::Pattern { pattern } = &rule.kind {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                    field: field.to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            }
        }
        Ok(())
    }
}
