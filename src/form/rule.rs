//! Field rules and the ordered rule set

use serde::Deserialize;
use serde_json::Value;

use super::custom::{CustomRegistry, CustomValidator};
use crate::error::SchemaError;

/// The keys a rule description may use, in JSON spelling.
///
/// Any other key in a JSON rule is a [`SchemaError`].
pub const RULE_KEYS: [&str; 4] = ["required", "email", "minLength", "custom"];

/// Validation directives for one field.
///
/// Checks run in a fixed order (required, empty skip, email, minimum length,
/// custom) and the first failing one is the only error reported for the
/// field.
///
/// ```
/// use tidewater::FieldRule;
///
/// let rule = FieldRule::new().required().min_length(8);
/// assert!(rule.required);
/// assert_eq!(rule.min_length, Some(8));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldRule {
    /// An absent value fails with "Field is required"
    pub required: bool,
    /// The value must be an email address
    pub email: bool,
    /// Minimum length in characters (or elements for lists)
    pub min_length: Option<usize>,
    /// Extra asynchronous check, run last
    pub custom: Option<CustomValidator>,
}

impl FieldRule {
    /// A rule with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the field to be present.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require the value to be an email address.
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    /// Require at least `min` characters.
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Attach a custom check.
    pub fn custom(mut self, validator: CustomValidator) -> Self {
        self.custom = Some(validator);
        self
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RuleConfig {
    #[serde(default)]
    required: bool,
    #[serde(default)]
    email: bool,
    #[serde(default)]
    min_length: Option<usize>,
    #[serde(default)]
    custom: Option<String>,
}

impl RuleConfig {
    fn into_rule(self, field: &str, registry: &CustomRegistry) -> Result<FieldRule, SchemaError> {
        let custom = match self.custom {
            Some(name) => Some(registry.get(&name).cloned().ok_or_else(|| {
                SchemaError::for_field(
                    field,
                    format!("no custom validator named '{}' is registered", name),
                )
            })?),
            None => None,
        };

        Ok(FieldRule {
            required: self.required,
            email: self.email,
            min_length: self.min_length,
            custom,
        })
    }
}

/// Ordered mapping from field name to [`FieldRule`].
///
/// Fields are validated, and their errors reported, in insertion order.
///
/// ```
/// use tidewater::{FieldRule, ValidationSpec};
///
/// let spec = ValidationSpec::new()
///     .field("email", FieldRule::new().required().email())
///     .field("password", FieldRule::new().required().min_length(8));
///
/// assert_eq!(spec.names().collect::<Vec<_>>(), vec!["email", "password"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationSpec {
    rules: Vec<(String, FieldRule)>,
}

impl ValidationSpec {
    /// An empty rule set; validates everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(name, rule);
        self
    }

    /// Add a rule, or replace an existing field's rule in place.
    pub fn insert(&mut self, name: impl Into<String>, rule: FieldRule) {
        let name = name.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.rules.push((name, rule)),
        }
    }

    /// Look up a field's rule.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    /// Iterate rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields with rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Load a rule set from a JSON object of `{ field: rule }`.
    ///
    /// Rules may only use the keys in [`RULE_KEYS`]. Without a registry,
    /// any `custom` reference is a [`SchemaError`].
    pub fn from_json(value: Value) -> Result<Self, SchemaError> {
        Self::from_json_with(value, &CustomRegistry::new())
    }

    /// Load a rule set whose `custom` entries name validators in `registry`.
    ///
    /// The first malformed rule fails the whole load.
    pub fn from_json_with(value: Value, registry: &CustomRegistry) -> Result<Self, SchemaError> {
        let Value::Object(map) = value else {
            return Err(SchemaError::whole("rule set must be a JSON object"));
        };

        let mut spec = ValidationSpec::new();
        for (name, raw) in map {
            let config: RuleConfig = serde_json::from_value(raw)
                .map_err(|err| SchemaError::for_field(&name, err.to_string()))?;
            let rule = config.into_rule(&name, registry)?;
            spec.insert(name, rule);
        }
        Ok(spec)
    }
}

impl<K: Into<String>> FromIterator<(K, FieldRule)> for ValidationSpec {
    fn from_iter<I: IntoIterator<Item = (K, FieldRule)>>(iter: I) -> Self {
        let mut spec = ValidationSpec::new();
        for (name, rule) in iter {
            spec.insert(name, rule);
        }
        spec
    }
}
