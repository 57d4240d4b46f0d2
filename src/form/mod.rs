//! Declarative form validation
//!
//! A [`ValidationSpec`] maps field names to [`FieldRule`]s. [`validate_form`]
//! walks the rule set in declaration order, runs each field's checks against a
//! [`DataBag`], and collects at most one [`FieldError`] per field.
//!
//! User input that fails a rule is reported in the returned
//! [`ValidationResult`]. Only a custom validator replying with the wrong shape
//! makes the call itself fail.
//!
//! ```
//! use tidewater::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let spec = ValidationSpec::new()
//!     .field("email", FieldRule::new().required().email())
//!     .field("password", FieldRule::new().required().min_length(8));
//!
//! let data = DataBag::new()
//!     .with("email", "not-an-email")
//!     .with("password", "hunter2");
//!
//! let result = validate_form(&data, &spec).await.unwrap();
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].message, "Field does not contain a valid email.");
//! assert_eq!(
//!     result.errors[1].message,
//!     "This field does not meet the minimum length requirements."
//! );
//! # });
//! ```

mod custom;
mod rule;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CustomValidatorShapeError, FormError};
use crate::predicate::{is_email, min_length, Predicate};
use crate::{DataBag, FieldValue, Validation};

pub use custom::{CustomContext, CustomRegistry, CustomResult, CustomValidator};
pub use rule::{FieldRule, ValidationSpec, RULE_KEYS};

/// Message for a required field with no value.
pub const REQUIRED_MESSAGE: &str = "Field is required";
/// Message for a value that is not an email address.
pub const EMAIL_MESSAGE: &str = "Field does not contain a valid email.";
/// Message for a value shorter than the rule's minimum.
pub const MIN_LENGTH_MESSAGE: &str = "This field does not meet the minimum length requirements.";

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name
    pub name: String,
    /// User-facing message
    pub message: String,
}

impl FieldError {
    /// Create an error with an arbitrary message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The "Field is required" error.
    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, REQUIRED_MESSAGE)
    }

    /// The invalid email error.
    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, EMAIL_MESSAGE)
    }

    /// The minimum length error.
    pub fn min_length(name: impl Into<String>) -> Self {
        Self::new(name, MIN_LENGTH_MESSAGE)
    }

    /// A custom validator's rejection.
    pub fn custom(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, message)
    }
}

/// Outcome of validating a whole form.
///
/// Serializes as `{ "valid": bool, "errors": [{ "name", "message" }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub valid: bool,
    /// Failing fields in declaration order
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Errors reported for one field (zero or one).
    pub fn errors_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |err| err.name == name)
    }

    /// View the result as a [`Validation`].
    pub fn into_validation(self) -> Validation<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Validation::success(())
        } else {
            Validation::failure(self.errors)
        }
    }
}

impl From<Validation<(), Vec<FieldError>>> for ValidationResult {
    fn from(validation: Validation<(), Vec<FieldError>>) -> Self {
        match validation {
            Validation::Success(()) => ValidationResult {
                valid: true,
                errors: Vec::new(),
            },
            Validation::Failure(errors) => ValidationResult {
                valid: errors.is_empty(),
                errors,
            },
        }
    }
}

type FieldCheck = Validation<(), Vec<FieldError>>;

/// Validate `data` against every rule in `spec`.
///
/// Fields are processed one at a time in declaration order; custom
/// validators are awaited sequentially, never concurrently. There is no
/// timeout: a custom validator that never resolves stalls the call.
///
/// # Errors
///
/// Returns [`CustomValidatorShapeError`] as soon as a custom validator's
/// reply fails its shape check. Remaining fields are not processed.
pub async fn validate_form(
    data: &DataBag,
    spec: &ValidationSpec,
) -> Result<ValidationResult, CustomValidatorShapeError> {
    let mut outcome = FieldCheck::success(());
    let mut shared: Option<Arc<DataBag>> = None;

    for (name, rule) in spec.iter() {
        let field = check_field(name, rule, data, &mut shared).await?;
        outcome = outcome.and(field).map(|_| ());
    }

    let result = ValidationResult::from(outcome);
    tracing::debug!(
        fields = spec.len(),
        errors = result.errors.len(),
        "form validated"
    );
    Ok(result)
}

async fn check_field(
    name: &str,
    rule: &FieldRule,
    data: &DataBag,
    shared: &mut Option<Arc<DataBag>>,
) -> Result<FieldCheck, CustomValidatorShapeError> {
    let value = data.get(name);

    if rule.required && value.is_none() {
        tracing::debug!(field = name, "required field is absent");
        return Ok(FieldCheck::failure(vec![FieldError::required(name)]));
    }

    if value.is_some_and(FieldValue::is_empty_text) {
        return Ok(FieldCheck::success(()));
    }

    if rule.email && !value.is_some_and(|v| is_email().check(v)) {
        tracing::debug!(field = name, "not an email address");
        return Ok(FieldCheck::failure(vec![FieldError::email(name)]));
    }

    if let Some(min) = rule.min_length {
        if !value.is_none_or(|v| min_length(min).check(v)) {
            tracing::debug!(field = name, min, "below minimum length");
            return Ok(FieldCheck::failure(vec![FieldError::min_length(name)]));
        }
    }

    if let Some(custom) = &rule.custom {
        let ctx = CustomContext {
            name: name.to_string(),
            value: value.cloned(),
            data: Arc::clone(shared.get_or_insert_with(|| Arc::new(data.clone()))),
        };

        match custom.check(ctx).await {
            Ok(CustomResult::Valid) => {}
            Ok(CustomResult::Invalid { message }) => {
                tracing::debug!(field = name, "custom validator rejected value");
                return Ok(FieldCheck::failure(vec![FieldError::custom(name, message)]));
            }
            Err(violation) => {
                tracing::error!(
                    field = name,
                    %violation,
                    "custom validator for field '{}' did not return the proper data",
                    name
                );
                return Err(CustomValidatorShapeError {
                    field: name.to_string(),
                    violation,
                });
            }
        }
    }

    Ok(FieldCheck::success(()))
}

/// A reusable validator bound to one rule set.
///
/// ```
/// use tidewater::prelude::*;
///
/// # tokio_test::block_on(async {
/// let validator = FormValidator::new(
///     ValidationSpec::new().field("name", FieldRule::new().required()),
/// );
///
/// let ok = validator.validate(&DataBag::new().with("name", "Ada")).await.unwrap();
/// assert!(ok.valid);
///
/// let missing = validator.validate(&DataBag::new()).await.unwrap();
/// assert_eq!(missing.errors, vec![FieldError::required("name")]);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    spec: ValidationSpec,
}

impl FormValidator {
    /// Bind a rule set.
    pub fn new(spec: ValidationSpec) -> Self {
        FormValidator { spec }
    }

    /// Load the rule set from JSON; see [`ValidationSpec::from_json_with`].
    pub fn from_json(value: Value, registry: &CustomRegistry) -> Result<Self, FormError> {
        Ok(FormValidator::new(ValidationSpec::from_json_with(
            value, registry,
        )?))
    }

    /// The bound rule set.
    pub fn spec(&self) -> &ValidationSpec {
        &self.spec
    }

    /// Validate one data bag; see [`validate_form`].
    pub async fn validate(
        &self,
        data: &DataBag,
    ) -> Result<ValidationResult, CustomValidatorShapeError> {
        validate_form(data, &self.spec).await
    }
}

/// Load both the data and the rule set from JSON, then validate.
///
/// ```
/// use serde_json::json;
/// use tidewater::{validate_json, CustomRegistry};
///
/// # tokio_test::block_on(async {
/// let result = validate_json(
///     json!({ "email": "a@b.co" }),
///     json!({ "email": { "required": true, "email": true } }),
///     &CustomRegistry::new(),
/// )
/// .await
/// .unwrap();
/// assert!(result.valid);
/// # });
/// ```
pub async fn validate_json(
    data: Value,
    spec: Value,
    registry: &CustomRegistry,
) -> Result<ValidationResult, FormError> {
    let spec = ValidationSpec::from_json_with(spec, registry)?;
    let data = DataBag::from_json(data)?;
    Ok(validate_form(&data, &spec).await?)
}
