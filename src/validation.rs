//! Validation type for accumulating field errors
//!
//! `Validation` is like `Result`, except that combining two failures keeps
//! both error sets instead of stopping at the first. The form validator
//! produces one `Validation<(), Vec<FieldError>>` per field and folds them
//! with [`Validation::and`], so every failing field ends up in the result in
//! declaration order.
//!
//! ```
//! use tidewater::{FieldError, Validation};
//!
//! let email = Validation::<(), _>::failure(vec![FieldError::email("email")]);
//! let name = Validation::<(), Vec<FieldError>>::success(());
//! let age = Validation::<(), _>::failure(vec![FieldError::required("age")]);
//!
//! let all = Validation::all_vec(vec![email, name, age]);
//! let errors = all.into_result().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[1].name, "age");
//! ```

use crate::Semigroup;

/// A validation that either succeeds with a value or fails with accumulated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T, E> {
    /// Successful validation with a value
    Success(T),
    /// Failed validation with accumulated errors
    Failure(E),
}

impl<T, E> Validation<T, E> {
    /// Create a successful validation.
    #[inline]
    pub fn success(value: T) -> Self {
        Validation::Success(value)
    }

    /// Create a failed validation.
    #[inline]
    pub fn failure(error: E) -> Self {
        Validation::Failure(error)
    }

    /// Convert into a `Result`.
    ///
    /// ```
    /// use tidewater::Validation;
    ///
    /// let v = Validation::<u8, &str>::failure("too short");
    /// assert_eq!(v.into_result(), Err("too short"));
    /// ```
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Validation::Success(value) => Ok(value),
            Validation::Failure(error) => Err(error),
        }
    }

    /// Check if this validation is successful.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Validation::Success(_))
    }

    /// Check if this validation failed.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(self, Validation::Failure(_))
    }

    /// Transform the success value if present.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Validation<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Validation::Success(value) => Validation::Success(f(value)),
            Validation::Failure(error) => Validation::Failure(error),
        }
    }
}

impl<T, E: Semigroup> Validation<T, E> {
    /// Combine two validations, accumulating errors with `Semigroup::combine`.
    ///
    /// Errors from `self` come before errors from `other`.
    pub fn and<U>(self, other: Validation<U, E>) -> Validation<(T, U), E> {
        match (self, other) {
            (Validation::Success(a), Validation::Success(b)) => Validation::Success((a, b)),
            (Validation::Failure(e1), Validation::Failure(e2)) => {
                Validation::Failure(e1.combine(e2))
            }
            (Validation::Failure(e), _) => Validation::Failure(e),
            (_, Validation::Failure(e)) => Validation::Failure(e),
        }
    }

    /// Combine all validations in a Vec, preserving error order.
    pub fn all_vec(validations: Vec<Validation<T, E>>) -> Validation<Vec<T>, E> {
        let mut successes = Vec::new();
        let mut failure: Option<E> = None;

        for validation in validations {
            match validation {
                Validation::Success(value) => successes.push(value),
                Validation::Failure(error) => {
                    failure = Some(match failure {
                        Some(acc) => acc.combine(error),
                        None => error,
                    });
                }
            }
        }

        match failure {
            Some(error) => Validation::Failure(error),
            None => Validation::Success(successes),
        }
    }
}
