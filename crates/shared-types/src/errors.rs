//! # Error Types
//!
//! Construction-time validation failures shared by every value type and
//! aggregate record.

use std::fmt;

use thiserror::Error;

/// A single broken rule, addressed by the (possibly dotted) field path that
/// violated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field path, e.g. `value` or `actionId.value`.
    pub field: String,
    /// Human readable constraint, e.g. `should not be empty`.
    pub constraint: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Prefix the field path with a parent field name.
    pub fn nested(self, parent: &str) -> Self {
        Self {
            field: format!("{}.{}", parent, self.field),
            constraint: self.constraint,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.constraint)
    }
}

/// A value type or aggregate record refused to exist.
///
/// Carries the originating value (rendered as text) and every violated rule.
/// Displayed as `<value>, <violation>, <violation>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.value, .violations))]
pub struct ValidationError {
    pub value: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(value: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            value: value.into(),
            violations,
        }
    }

    /// Single-rule convenience constructor.
    pub fn single(
        value: impl Into<String>,
        field: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::new(value, vec![Violation::new(field, constraint)])
    }

    /// One `"<field> <constraint>"` message per violation.
    ///
    /// This is the shape the REST layer places under `{"error": ...}`.
    pub fn field_messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Re-address every violation under `parent`.
    pub fn nested(self, parent: &str) -> Self {
        Self {
            value: self.value,
            violations: self
                .violations
                .into_iter()
                .map(|v| v.nested(parent))
                .collect(),
        }
    }
}

fn render(value: &str, violations: &[Violation]) -> String {
    let mut out = value.to_string();
    for violation in violations {
        out.push_str(", ");
        out.push_str(&violation.to_string());
    }
    out
}

/// Accumulates violations for aggregate validation.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<Violation>);

impl Violations {
    pub(crate) fn check(&mut self, ok: bool, field: &str, constraint: &str) {
        if !ok {
            self.0.push(Violation::new(field, constraint));
        }
    }

    pub(crate) fn finish(self, value: impl Into<String>) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(value, self.0))
        }
    }
}
