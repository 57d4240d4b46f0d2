//! # Tidewater
//!
//! Small declarative helpers for component UIs:
//!
//! - [`form`]: async form validation against per-field rule sets
//! - [`props`]: prop validity that follows every prop change
//! - [`mirror`]: two-way binding between a one-way prop and change events
//! - [`state`]: persisted and transient state over an injected key/value store
//!
//! ## Quick Example
//!
//! ```rust
//! use tidewater::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let taken = CustomValidator::new(|ctx| async move {
//!     match ctx.value.as_ref().and_then(FieldValue::as_text) {
//!         Some("admin") => CustomResult::invalid("That username is taken"),
//!         _ => CustomResult::valid(),
//!     }
//! });
//!
//! let spec = ValidationSpec::new()
//!     .field("username", FieldRule::new().required().min_length(3).custom(taken))
//!     .field("email", FieldRule::new().required().email())
//!     .field("bio", FieldRule::new().min_length(20));
//!
//! let data = DataBag::new()
//!     .with("username", "admin")
//!     .with("bio", "");
//!
//! let result = validate_form(&data, &spec).await.unwrap();
//! assert_eq!(
//!     result.errors,
//!     vec![
//!         FieldError::custom("username", "That username is taken"),
//!         FieldError::required("email"),
//!     ]
//! );
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod form;
pub mod mirror;
pub mod predicate;
pub mod props;
pub mod semigroup;
pub mod state;
pub mod testing;
pub mod validation;
pub mod value;
pub mod watch;

// Re-exports
pub use error::{
    CustomValidatorShapeError, FormError, PropError, SchemaError, ShapeViolation, StateError,
};
pub use form::{
    validate_form, validate_json, CustomContext, CustomRegistry, CustomResult, CustomValidator,
    FieldError, FieldRule, FormValidator, ValidationResult, ValidationSpec, RULE_KEYS,
};
pub use mirror::MirrorProp;
pub use props::{PropKind, PropSchema, PropTracker};
pub use semigroup::Semigroup;
pub use state::{KeyValueStore, MemoryStore, StateManager, StateManagerBuilder};
pub use validation::Validation;
pub use value::{DataBag, FieldValue};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{CustomValidatorShapeError, FormError, SchemaError};
    pub use crate::form::{
        validate_form, CustomRegistry, CustomResult, CustomValidator, FieldError, FieldRule,
        FormValidator, ValidationResult, ValidationSpec,
    };
    pub use crate::value::{DataBag, FieldValue};
}
