//! Configuration errors
//!
//! Everything in this module signals a programming mistake: a malformed rule
//! definition, a custom validator that replied with the wrong shape, a prop
//! bag that violates its schema, or a state key nobody declared. User input
//! that fails a rule is never an error here; it ends up in
//! [`ValidationResult::errors`](crate::ValidationResult::errors).

use std::error::Error as StdError;
use std::fmt;

/// A rule or data description failed its shape check.
///
/// Raised while loading a [`ValidationSpec`](crate::ValidationSpec) or
/// [`DataBag`](crate::DataBag) from JSON, before any field is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Field whose rule was rejected, when one is known
    pub field: Option<String>,
    /// What was wrong with it
    pub message: String,
}

impl SchemaError {
    /// Shape error for a specific field's rule.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Shape error for the description as a whole.
    pub fn whole(message: impl Into<String>) -> Self {
        SchemaError {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "invalid rule for field '{}': {}", field, self.message),
            None => write!(f, "invalid rule set: {}", self.message),
        }
    }
}

impl StdError for SchemaError {}

/// Description of how a custom validator's reply was malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeViolation {
    message: String,
}

impl ShapeViolation {
    /// Create a violation with the given explanation.
    pub fn new(message: impl Into<String>) -> Self {
        ShapeViolation {
            message: message.into(),
        }
    }

    /// The explanation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for ShapeViolation {}

impl From<serde_json::Error> for ShapeViolation {
    fn from(err: serde_json::Error) -> Self {
        ShapeViolation::new(err.to_string())
    }
}

/// A custom validator returned something other than `{ valid, message? }`.
///
/// This aborts the whole [`validate_form`](crate::validate_form) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomValidatorShapeError {
    /// Field whose custom validator misbehaved
    pub field: String,
    /// The underlying shape problem
    pub violation: ShapeViolation,
}

impl fmt::Display for CustomValidatorShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "custom validator for field '{}' did not return the proper data: {}",
            self.field, self.violation
        )
    }
}

impl StdError for CustomValidatorShapeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.violation)
    }
}

/// Either kind of configuration error a JSON-driven validation can hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The rule set or data bag was malformed
    Schema(SchemaError),
    /// A custom validator replied with the wrong shape
    CustomShape(CustomValidatorShapeError),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Schema(err) => fmt::Display::fmt(err, f),
            FormError::CustomShape(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl StdError for FormError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            FormError::Schema(err) => Some(err),
            FormError::CustomShape(err) => Some(err),
        }
    }
}

impl From<SchemaError> for FormError {
    fn from(err: SchemaError) -> Self {
        FormError::Schema(err)
    }
}

impl From<CustomValidatorShapeError> for FormError {
    fn from(err: CustomValidatorShapeError) -> Self {
        FormError::CustomShape(err)
    }
}

/// A prop bag violated its declared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropError {
    /// A required prop has no value
    Missing {
        /// Prop name
        prop: String,
    },
    /// A prop holds a value of the wrong kind
    WrongKind {
        /// Prop name
        prop: String,
        /// Kind the schema declares
        expected: &'static str,
        /// Kind actually found
        found: &'static str,
    },
    /// The prop is not declared in the schema
    Undeclared {
        /// Prop name
        prop: String,
    },
}

impl PropError {
    /// Name of the offending prop.
    pub fn prop(&self) -> &str {
        match self {
            PropError::Missing { prop }
            | PropError::WrongKind { prop, .. }
            | PropError::Undeclared { prop } => prop,
        }
    }
}

impl fmt::Display for PropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropError::Missing { prop } => write!(f, "prop '{}' is required", prop),
            PropError::WrongKind {
                prop,
                expected,
                found,
            } => write!(f, "prop '{}' must be {}, got {}", prop, expected, found),
            PropError::Undeclared { prop } => write!(f, "prop '{}' is not declared", prop),
        }
    }
}

impl StdError for PropError {}

/// Misuse of a [`StateManager`](crate::StateManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The key was declared neither stored nor temporary
    UnknownKey(String),
    /// The key was declared both stored and temporary
    DuplicateKey(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::UnknownKey(key) => write!(f, "unknown state key '{}'", key),
            StateError::DuplicateKey(key) => {
                write!(f, "state key '{}' declared more than once", key)
            }
        }
    }
}

impl StdError for StateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_display_names_field() {
        let err = SchemaError::for_field("email", "unknown field `pattern`");
        assert_eq!(
            err.to_string(),
            "invalid rule for field 'email': unknown field `pattern`"
        );
    }

    #[test]
    fn shape_error_source_is_violation() {
        let err = CustomValidatorShapeError {
            field: "username".to_string(),
            violation: ShapeViolation::new("missing field `valid`"),
        };

        assert!(err.to_string().contains("'username'"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("missing field `valid`"));
    }

    #[test]
    fn form_error_from_conversions() {
        let schema: FormError = SchemaError::whole("expected an object").into();
        assert!(matches!(schema, FormError::Schema(_)));

        let shape: FormError = CustomValidatorShapeError {
            field: "f".to_string(),
            violation: ShapeViolation::new("bad"),
        }
        .into();
        assert!(matches!(shape, FormError::CustomShape(_)));
    }

    #[test]
    fn prop_error_reports_prop_name() {
        let err = PropError::WrongKind {
            prop: "count".to_string(),
            expected: "number",
            found: "text",
        };
        assert_eq!(err.prop(), "count");
        assert_eq!(err.to_string(), "prop 'count' must be number, got text");
    }
}
