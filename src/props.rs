//! Derived prop validity
//!
//! A [`PropTracker`] owns a component's props together with their declared
//! [`PropSchema`]. Every change re-validates the whole prop bag and updates a
//! single validity flag, so rendering code can check [`PropTracker::is_valid`]
//! instead of validating props itself. A failed validation is never
//! swallowed: the flag drops to false and the error is returned.
//!
//! ```
//! use tidewater::props::{PropKind, PropSchema, PropTracker};
//! use tidewater::DataBag;
//!
//! let schema = PropSchema::new()
//!     .required("title", PropKind::Text)
//!     .optional("count", PropKind::Number);
//!
//! let mut tracker = PropTracker::new(schema, DataBag::new().with("title", "Inbox")).unwrap();
//! assert!(tracker.is_valid());
//!
//! assert!(tracker.set("count", "three").is_err());
//! assert!(!tracker.is_valid());
//!
//! tracker.set("count", 3).unwrap();
//! assert!(tracker.is_valid());
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PropError, SchemaError};
use crate::watch::{WatchId, Watchers};
use crate::{DataBag, FieldValue};

/// Kind of value a prop accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    /// Anything
    Any,
    /// `FieldValue::Bool`
    #[serde(alias = "bool")]
    Boolean,
    /// `FieldValue::Number`
    Number,
    /// `FieldValue::Text`
    #[serde(alias = "string")]
    Text,
    /// `FieldValue::List`
    #[serde(alias = "array")]
    List,
}

impl PropKind {
    fn accepts(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (PropKind::Any, _)
                | (PropKind::Boolean, FieldValue::Bool(_))
                | (PropKind::Number, FieldValue::Number(_))
                | (PropKind::Text, FieldValue::Text(_))
                | (PropKind::List, FieldValue::List(_))
        )
    }

    fn name(self) -> &'static str {
        match self {
            PropKind::Any => "any",
            PropKind::Boolean => "boolean",
            PropKind::Number => "number",
            PropKind::Text => "text",
            PropKind::List => "list",
        }
    }
}

/// One declared prop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropDecl {
    /// Prop name
    pub name: String,
    /// Accepted kind
    #[serde(rename = "type", default = "any_kind")]
    pub kind: PropKind,
    /// Whether the prop must have a non-null value
    #[serde(default)]
    pub required: bool,
}

fn any_kind() -> PropKind {
    PropKind::Any
}

/// Ordered prop declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropSchema {
    decls: Vec<PropDecl>,
}

impl PropSchema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required prop.
    pub fn required(self, name: impl Into<String>, kind: PropKind) -> Self {
        self.declare(PropDecl {
            name: name.into(),
            kind,
            required: true,
        })
    }

    /// Declare an optional prop.
    pub fn optional(self, name: impl Into<String>, kind: PropKind) -> Self {
        self.declare(PropDecl {
            name: name.into(),
            kind,
            required: false,
        })
    }

    /// Add a declaration, replacing one with the same name.
    pub fn declare(mut self, decl: PropDecl) -> Self {
        match self.decls.iter_mut().find(|d| d.name == decl.name) {
            Some(slot) => *slot = decl,
            None => self.decls.push(decl),
        }
        self
    }

    /// Load from a JSON array of `{ "name", "type"?, "required"? }`.
    pub fn from_json(value: Value) -> Result<Self, SchemaError> {
        let decls: Vec<PropDecl> =
            serde_json::from_value(value).map_err(|err| SchemaError::whole(err.to_string()))?;
        Ok(decls.into_iter().fold(PropSchema::new(), PropSchema::declare))
    }

    /// Declared prop names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.iter().map(|d| d.name.as_str())
    }

    /// Whether `name` is declared.
    pub fn declares(&self, name: &str) -> bool {
        self.decls.iter().any(|d| d.name == name)
    }

    /// Check a whole prop bag; the first violation wins.
    pub fn check(&self, props: &DataBag) -> Result<(), PropError> {
        if let Some((name, _)) = props.iter().find(|(name, _)| !self.declares(name)) {
            return Err(PropError::Undeclared {
                prop: name.to_string(),
            });
        }

        for decl in &self.decls {
            match props.get(&decl.name) {
                None | Some(FieldValue::Null) if decl.required => {
                    return Err(PropError::Missing {
                        prop: decl.name.clone(),
                    });
                }
                None | Some(FieldValue::Null) => {}
                Some(value) if !decl.kind.accepts(value) => {
                    return Err(PropError::WrongKind {
                        prop: decl.name.clone(),
                        expected: decl.kind.name(),
                        found: value.kind_name(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Props plus a validity flag that follows every change.
#[derive(Debug)]
pub struct PropTracker {
    schema: PropSchema,
    props: DataBag,
    valid: bool,
    watchers: Watchers<bool>,
}

impl PropTracker {
    /// Validate the initial props.
    ///
    /// # Errors
    ///
    /// The initial props violate the schema.
    pub fn new(schema: PropSchema, props: DataBag) -> Result<Self, PropError> {
        let mut tracker = PropTracker {
            schema,
            props,
            valid: false,
            watchers: Watchers::new(),
        };
        tracker.revalidate()?;
        Ok(tracker)
    }

    /// Whether the current props satisfy the schema.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Current props.
    pub fn props(&self) -> &DataBag {
        &self.props
    }

    /// Current value of one prop.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.props.get(name)
    }

    /// Change a prop and re-validate.
    ///
    /// Setting a prop to its current value does nothing.
    ///
    /// # Errors
    ///
    /// The prop is undeclared (props are left untouched), or the new prop
    /// bag violates the schema (props are updated and the tracker becomes
    /// invalid).
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), PropError> {
        self.ensure_declared(name)?;
        let value = value.into();
        if self.props.get(name) == Some(&value) {
            return Ok(());
        }
        self.props.insert(name, value);
        self.revalidate()
    }

    /// Remove a prop's value and re-validate.
    pub fn unset(&mut self, name: &str) -> Result<(), PropError> {
        self.ensure_declared(name)?;
        if self.props.remove(name).is_none() {
            return Ok(());
        }
        self.revalidate()
    }

    /// Observe changes of the validity flag.
    pub fn on_validity_change<F>(&mut self, callback: F) -> WatchId
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.watchers.subscribe(callback)
    }

    /// Stop observing.
    pub fn unwatch(&mut self, id: WatchId) -> bool {
        self.watchers.unsubscribe(id)
    }

    fn ensure_declared(&self, name: &str) -> Result<(), PropError> {
        if self.schema.declares(name) {
            Ok(())
        } else {
            Err(PropError::Undeclared {
                prop: name.to_string(),
            })
        }
    }

    fn revalidate(&mut self) -> Result<(), PropError> {
        let checked = self.schema.check(&self.props);
        if let Err(err) = &checked {
            tracing::warn!(prop = err.prop(), %err, "props failed validation");
        }
        self.set_valid(checked.is_ok());
        checked
    }

    fn set_valid(&mut self, valid: bool) {
        if self.valid != valid {
            self.valid = valid;
            self.watchers.notify(&valid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn schema() -> PropSchema {
        PropSchema::new()
            .required("title", PropKind::Text)
            .optional("count", PropKind::Number)
            .optional("tags", PropKind::List)
    }

    #[test]
    fn creation_with_invalid_props_fails() {
        let err = PropTracker::new(schema(), DataBag::new()).unwrap_err();
        assert_eq!(
            err,
            PropError::Missing {
                prop: "title".to_string()
            }
        );
    }

    #[test]
    fn wrong_kind_flips_flag_and_reports() {
        let mut tracker = PropTracker::new(schema(), DataBag::new().with("title", "a")).unwrap();
        let err = tracker.set("tags", "not a list").unwrap_err();

        assert_eq!(err.prop(), "tags");
        assert!(!tracker.is_valid());
        assert_eq!(tracker.get("tags"), Some(&FieldValue::from("not a list")));

        tracker.unset("tags").unwrap();
        assert!(tracker.is_valid());
    }

    #[test]
    fn undeclared_prop_is_rejected_without_change() {
        let mut tracker = PropTracker::new(schema(), DataBag::new().with("title", "a")).unwrap();
        let err = tracker.set("color", "red").unwrap_err();

        assert!(matches!(err, PropError::Undeclared { .. }));
        assert!(tracker.is_valid());
        assert!(tracker.get("color").is_none());
    }

    #[test]
    fn null_counts_as_missing_for_required() {
        let err = schema()
            .check(&DataBag::new().with("title", FieldValue::Null))
            .unwrap_err();
        assert!(matches!(err, PropError::Missing { .. }));
    }

    #[test]
    fn observers_fire_only_on_flag_changes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tracker = PropTracker::new(schema(), DataBag::new().with("title", "a")).unwrap();

        let sink = Arc::clone(&seen);
        tracker.on_validity_change(move |valid| sink.lock().unwrap().push(*valid));

        tracker.set("title", "b").unwrap();
        let _ = tracker.set("count", "x");
        let _ = tracker.set("count", "y");
        tracker.set("count", 2).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn schema_from_json() {
        let schema = PropSchema::from_json(json!([
            { "name": "label", "type": "string", "required": true },
            { "name": "items", "type": "array" },
            { "name": "extra" },
        ]))
        .unwrap();

        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["label", "items", "extra"]);
        assert!(schema
            .check(&DataBag::new().with("label", "x").with("extra", true))
            .is_ok());
        assert!(PropSchema::from_json(json!([{ "name": "x", "default": 1 }])).is_err());
    }
}
