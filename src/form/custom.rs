//! Caller-supplied asynchronous field checks

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ShapeViolation;
use crate::{DataBag, FieldValue};

/// What a custom validator gets to look at.
#[derive(Debug, Clone)]
pub struct CustomContext {
    /// Name of the field being validated
    pub name: String,
    /// The field's value, `None` when absent
    pub value: Option<FieldValue>,
    /// The whole data bag, for checks that look at other fields
    pub data: Arc<DataBag>,
}

/// Verdict of a custom validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomResult {
    /// The value is acceptable
    Valid,
    /// The value is rejected with a user-facing message
    Invalid {
        /// Message reported for the field
        message: String,
    },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CustomReply {
    valid: bool,
    #[serde(default)]
    message: Option<String>,
}

impl CustomResult {
    /// Accept the value.
    pub fn valid() -> Self {
        CustomResult::Valid
    }

    /// Reject the value with `message`.
    pub fn invalid(message: impl Into<String>) -> Self {
        CustomResult::Invalid {
            message: message.into(),
        }
    }

    /// Shape-check a dynamic `{ "valid": bool, "message"?: string }` reply.
    ///
    /// `valid` is required, `message` is optional and nothing else is
    /// allowed. A rejection without a message reports an empty message.
    ///
    /// ```
    /// use serde_json::json;
    /// use tidewater::CustomResult;
    ///
    /// let ok = CustomResult::from_json(json!({ "valid": true })).unwrap();
    /// assert_eq!(ok, CustomResult::Valid);
    ///
    /// let err = CustomResult::from_json(json!({ "valid": "yes" }));
    /// assert!(err.is_err());
    /// ```
    pub fn from_json(value: Value) -> Result<Self, ShapeViolation> {
        let reply: CustomReply = serde_json::from_value(value)?;
        Ok(if reply.valid {
            CustomResult::Valid
        } else {
            CustomResult::Invalid {
                message: reply.message.unwrap_or_default(),
            }
        })
    }
}

type CheckFn =
    dyn Fn(CustomContext) -> BoxFuture<'static, Result<CustomResult, ShapeViolation>> + Send + Sync;

/// An asynchronous custom check attached to a field rule.
///
/// Cloning is cheap; clones share the same callback.
///
/// ```
/// use tidewater::{CustomResult, CustomValidator};
///
/// let no_admins = CustomValidator::new(|ctx| async move {
///     match ctx.value.as_ref().and_then(|v| v.as_text()) {
///         Some("admin") => CustomResult::invalid("That name is reserved"),
///         _ => CustomResult::valid(),
///     }
/// });
/// # let _ = no_admins;
/// ```
#[derive(Clone)]
pub struct CustomValidator {
    check: Arc<CheckFn>,
}

impl CustomValidator {
    /// Wrap a typed async check.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(CustomContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CustomResult> + Send + 'static,
    {
        let check: Arc<CheckFn> = Arc::new(
            move |ctx: CustomContext| -> BoxFuture<'static, Result<CustomResult, ShapeViolation>> {
                f(ctx).map(Ok::<_, ShapeViolation>).boxed()
            },
        );
        CustomValidator { check }
    }

    /// Wrap an async check that replies with a dynamic JSON object.
    ///
    /// The reply is shape-checked with [`CustomResult::from_json`]; a bad
    /// shape aborts the whole form validation.
    pub fn from_json<F, Fut>(f: F) -> Self
    where
        F: Fn(CustomContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        let check: Arc<CheckFn> = Arc::new(
            move |ctx: CustomContext| -> BoxFuture<'static, Result<CustomResult, ShapeViolation>> {
                f(ctx).map(CustomResult::from_json).boxed()
            },
        );
        CustomValidator { check }
    }

    /// Run the check.
    pub fn check(
        &self,
        ctx: CustomContext,
    ) -> impl Future<Output = Result<CustomResult, ShapeViolation>> + Send + 'static {
        (self.check)(ctx)
    }
}

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValidator").finish_non_exhaustive()
    }
}

/// Named custom validators that JSON rule sets can refer to.
///
/// ```
/// use serde_json::json;
/// use tidewater::{CustomRegistry, CustomResult, CustomValidator, ValidationSpec};
///
/// let registry = CustomRegistry::new().with(
///     "even_length",
///     CustomValidator::new(|ctx| async move {
///         match ctx.value.and_then(|v| v.len()) {
///             Some(len) if len % 2 == 1 => CustomResult::invalid("Length must be even"),
///             _ => CustomResult::valid(),
///         }
///     }),
/// );
///
/// let spec = ValidationSpec::from_json_with(
///     json!({ "code": { "required": true, "custom": "even_length" } }),
///     &registry,
/// )
/// .unwrap();
/// assert!(spec.get("code").unwrap().custom.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomRegistry {
    validators: HashMap<String, CustomValidator>,
}

impl CustomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, validator: CustomValidator) -> Self {
        self.register(name, validator);
        self
    }

    /// Register a validator under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, validator: CustomValidator) {
        self.validators.insert(name.into(), validator);
    }

    /// Look up a validator.
    pub fn get(&self, name: &str) -> Option<&CustomValidator> {
        self.validators.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(value: Option<&str>) -> CustomContext {
        CustomContext {
            name: "field".to_string(),
            value: value.map(FieldValue::from),
            data: Arc::new(DataBag::new()),
        }
    }

    #[test]
    fn reply_shapes() {
        assert_eq!(
            CustomResult::from_json(json!({ "valid": false, "message": "nope" })),
            Ok(CustomResult::invalid("nope"))
        );
        assert_eq!(
            CustomResult::from_json(json!({ "valid": false })),
            Ok(CustomResult::invalid(""))
        );
        assert!(CustomResult::from_json(json!({ "valid": true, "extra": 1 })).is_err());
        assert!(CustomResult::from_json(json!({ "message": "x" })).is_err());
        assert!(CustomResult::from_json(json!({ "valid": true, "message": 3 })).is_err());
        assert!(CustomResult::from_json(Value::Null).is_err());
    }

    #[tokio::test]
    async fn typed_validator_sees_context() {
        let validator = CustomValidator::new(|ctx| async move {
            if ctx.value.as_ref().and_then(FieldValue::as_text) == Some("bad") {
                CustomResult::invalid(format!("{} is bad", ctx.name))
            } else {
                CustomResult::valid()
            }
        });

        assert_eq!(
            validator.check(ctx(Some("bad"))).await,
            Ok(CustomResult::invalid("field is bad"))
        );
        assert_eq!(validator.check(ctx(None)).await, Ok(CustomResult::Valid));
    }

    #[tokio::test]
    async fn json_validator_reports_violation() {
        let validator = CustomValidator::from_json(|_| async { json!({ "valid": "yes" }) });
        let err = validator.check(ctx(Some("x"))).await.unwrap_err();
        assert!(err.message().contains("expected a boolean"));
    }

    #[test]
    fn registry_replaces_by_name() {
        let mut registry = CustomRegistry::new();
        registry.register("a", CustomValidator::new(|_| async { CustomResult::valid() }));
        registry.register("a", CustomValidator::new(|_| async { CustomResult::invalid("x") }));
        assert!(registry.get("a").is_some());
        assert!(registry.get("b").is_none());
    }
}
