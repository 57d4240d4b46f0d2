//! Semigroup trait for accumulating field errors
//!
//! Combining two per-field outcomes must keep every error from both sides, in
//! order. `Semigroup` names that operation so [`Validation::and`] can merge
//! failures without knowing what the error container is.
//!
//! ```
//! use tidewater::{FieldError, Semigroup};
//!
//! let first = vec![FieldError::required("email")];
//! let second = vec![FieldError::min_length("password")];
//! let merged = first.combine(second);
//!
//! assert_eq!(merged[0].name, "email");
//! assert_eq!(merged[1].name, "password");
//! ```
//!
//! [`Validation::and`]: crate::Validation::and

/// A type with an associative combining operation.
///
/// `a.combine(b).combine(c)` must equal `a.combine(b.combine(c))`.
pub trait Semigroup: Sized {
    /// Combine this value with another, consuming both.
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

impl Semigroup for () {
    #[inline]
    fn combine(self, _other: Self) -> Self {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldError;

    #[test]
    fn vec_combine_keeps_order() {
        let left = vec![FieldError::required("a"), FieldError::email("b")];
        let right = vec![FieldError::custom("c", "nope")];

        let merged = left.combine(right);
        let names: Vec<_> = merged.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn vec_combine_is_associative() {
        let a = vec![1];
        let b = vec![2, 3];
        let c = vec![4];

        assert_eq!(
            a.clone().combine(b.clone()).combine(c.clone()),
            a.combine(b.combine(c))
        );
    }
}
