//! Assertion helpers for validation results
//!
//! ```rust
//! use tidewater::prelude::*;
//! use tidewater::{assert_field_errors, assert_form_invalid};
//!
//! # tokio_test::block_on(async {
//! let spec = ValidationSpec::new().field("name", FieldRule::new().required());
//! let result = validate_form(&DataBag::new(), &spec).await.unwrap();
//!
//! assert_form_invalid!(result);
//! assert_field_errors!(result, [("name", "Field is required")]);
//! # });
//! ```

/// Assert that a [`ValidationResult`](crate::ValidationResult) has no errors.
///
/// ```rust
/// use tidewater::{assert_form_valid, ValidationResult};
///
/// let result = ValidationResult { valid: true, errors: vec![] };
/// assert_form_valid!(result);
/// ```
#[macro_export]
macro_rules! assert_form_valid {
    ($result:expr) => {{
        let result = &$result;
        if !result.valid || !result.errors.is_empty() {
            panic!("Expected a valid form, got errors: {:?}", result.errors);
        }
    }};
}

/// Assert that a [`ValidationResult`](crate::ValidationResult) has errors.
#[macro_export]
macro_rules! assert_form_invalid {
    ($result:expr) => {{
        let result = &$result;
        if result.valid || result.errors.is_empty() {
            panic!("Expected an invalid form, got no errors");
        }
    }};
}

/// Assert the exact `(name, message)` errors of a
/// [`ValidationResult`](crate::ValidationResult), in order.
///
/// ```rust
/// use tidewater::{assert_field_errors, FieldError, ValidationResult};
///
/// let result = ValidationResult {
///     valid: false,
///     errors: vec![FieldError::required("email"), FieldError::custom("code", "nope")],
/// };
/// assert_field_errors!(result, [("email", "Field is required"), ("code", "nope")]);
/// ```
#[macro_export]
macro_rules! assert_field_errors {
    ($result:expr, [$(($name:expr, $message:expr)),* $(,)?]) => {{
        let result = &$result;
        let actual: ::std::vec::Vec<(&str, &str)> = result
            .errors
            .iter()
            .map(|err| (err.name.as_str(), err.message.as_str()))
            .collect();
        let expected: ::std::vec::Vec<(&str, &str)> = ::std::vec![$(($name, $message)),*];
        assert_eq!(actual, expected, "field errors differ");
        assert_eq!(
            result.valid,
            expected.is_empty(),
            "valid flag disagrees with errors"
        );
    }};
}

#[cfg(feature = "proptest")]
use crate::FieldValue;
#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for FieldValue {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let scalar = prop_oneof![
            Just(FieldValue::Null),
            any::<bool>().prop_map(FieldValue::Bool),
            (-1.0e6..1.0e6f64).prop_map(FieldValue::Number),
            ".{0,24}".prop_map(FieldValue::Text),
        ];
        scalar
            .prop_recursive(2, 16, 4, |inner| {
                prop::collection::vec(inner, 0..4).prop_map(FieldValue::List)
            })
            .boxed()
    }
}
