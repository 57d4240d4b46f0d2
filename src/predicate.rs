//! Built-in field predicates
//!
//! The form validator's built-in checks are plain predicates over field
//! values, so they can also be used on their own.
//!
//! ```rust
//! use tidewater::predicate::*;
//!
//! assert!(is_email().check("user@example.com"));
//! assert!(!is_email().check("user@localhost"));
//! assert!(min_length(3).check(&tidewater::FieldValue::from("abc")));
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::FieldValue;

/// A predicate over values of type T.
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

// Local part: dotted atoms or a quoted string. Domain: bracketed IPv4
// literal or DNS labels ending in an alphabetic TLD of two or more letters.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))"#,
        r#"@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-z\-0-9]+\.)+[a-z]{2,}))$"#,
    ))
    .unwrap_or_else(|err| panic!("email pattern failed to compile: {err}"))
});

/// Predicate that checks a string is an email address.
#[derive(Clone, Copy, Default, Debug)]
pub struct IsEmail;

impl Predicate<str> for IsEmail {
    fn check(&self, value: &str) -> bool {
        EMAIL.is_match(value)
    }
}

impl Predicate<FieldValue> for IsEmail {
    /// Only text can be an email address.
    fn check(&self, value: &FieldValue) -> bool {
        value.as_text().is_some_and(|text| EMAIL.is_match(text))
    }
}

/// Create a predicate that checks for an email address.
///
/// The whole string must match, case-insensitively.
///
/// ```rust
/// use tidewater::predicate::*;
///
/// assert!(is_email().check("user.name+tag@sub.domain.org"));
/// assert!(is_email().check("\"john doe\"@example.com"));
/// assert!(is_email().check("user@[192.168.1.1]"));
/// assert!(!is_email().check("not-an-email"));
/// ```
pub fn is_email() -> IsEmail {
    IsEmail
}

/// Predicate that checks a value is at least `min` long.
///
/// Values without a length (see [`FieldValue::len`]) always pass.
#[derive(Clone, Copy, Debug)]
pub struct MinLength {
    min: usize,
}

impl Predicate<FieldValue> for MinLength {
    #[inline]
    fn check(&self, value: &FieldValue) -> bool {
        value.len().is_none_or(|len| len >= self.min)
    }
}

/// Create a predicate that checks a value is at least `min` long.
///
/// ```rust
/// use tidewater::predicate::*;
/// use tidewater::FieldValue;
///
/// assert!(!min_length(5).check(&FieldValue::from("abcd")));
/// assert!(min_length(5).check(&FieldValue::from("abcde")));
/// assert!(min_length(5).check(&FieldValue::from(12)));
/// ```
pub fn min_length(min: usize) -> MinLength {
    MinLength { min }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_common_forms() {
        for email in [
            "a@b.co",
            "user.name+tag@sub.domain.org",
            "user@[192.168.1.1]",
            "USER@EXAMPLE.COM",
            "first-last@my-host.example.io",
            "\"quoted local\"@example.com",
        ] {
            assert!(is_email().check(email), "{email} should be accepted");
        }
    }

    #[test]
    fn email_rejects_malformed() {
        for email in [
            "not-an-email",
            "",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user..name@example.com",
            "user name@example.com",
            "user@[192.168.1]",
            "user@exa_mple.com",
            " user@example.com",
        ] {
            assert!(!is_email().check(email), "{email} should be rejected");
        }
    }

    #[test]
    fn email_on_field_values_requires_text() {
        assert!(is_email().check(&FieldValue::from("a@b.co")));
        assert!(!is_email().check(&FieldValue::Null));
        assert!(!is_email().check(&FieldValue::from(42)));
    }

    #[test]
    fn min_length_measures_chars() {
        let p = min_length(3);
        assert!(p.check(&FieldValue::from("äöü")));
        assert!(!p.check(&FieldValue::from("äö")));
        assert!(p.check(&FieldValue::from(vec!["a", "b", "c"])));
        assert!(!p.check(&FieldValue::from(vec!["a"])));
        assert!(p.check(&FieldValue::Bool(false)));
    }

    #[test]
    fn closures_are_predicates() {
        let short = |s: &str| s.len() < 4;
        assert!(short.check("abc"));
        assert!(!short.check("abcd"));
    }
}
