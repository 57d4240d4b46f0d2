//! Prop tracking, prop mirroring and state management working together

use std::sync::{Arc, Mutex};

use serde_json::json;
use tidewater::props::{PropKind, PropSchema, PropTracker};
use tidewater::state::{KeyValueStore, MemoryStore, StateManagerBuilder};
use tidewater::{DataBag, FieldValue, MirrorProp, PropError};

#[test]
fn shared_store_is_last_write_wins() {
    let store = Arc::new(MemoryStore::new());
    let mut tab_a = StateManagerBuilder::new()
        .stored(["locale"])
        .build(Arc::clone(&store))
        .unwrap();
    let mut tab_b = StateManagerBuilder::new()
        .stored(["locale"])
        .build(Arc::clone(&store))
        .unwrap();

    tab_a.set("locale", "en-GB").unwrap();
    tab_b.set("locale", "nb-NO").unwrap();

    assert_eq!(store.get("locale").as_deref(), Some("nb-NO"));
    // Neither manager re-reads the store after creation.
    assert_eq!(tab_a.get("locale").unwrap(), Some("en-GB"));

    let reopened = StateManagerBuilder::new()
        .stored(["locale"])
        .build(Arc::clone(&store))
        .unwrap();
    assert_eq!(reopened.get("locale").unwrap(), Some("nb-NO"));
}

#[test]
fn clearing_a_stored_key_removes_the_entry() {
    let store = Arc::new(MemoryStore::new());
    store.set("session", "abc");
    store.set("unrelated", "keep");

    let mut state = StateManagerBuilder::new()
        .stored(["session"])
        .temporary(["banner"])
        .build(Arc::clone(&store))
        .unwrap();

    state.clear("session").unwrap();
    assert_eq!(store.get("session"), None);
    assert_eq!(store.get("unrelated").as_deref(), Some("keep"));
    assert_eq!(store.len(), 1);
}

#[test]
fn mirrored_prop_drives_tracked_props() {
    // A pager component: the parent owns `page`, the child mirrors it and
    // the parent's prop bag is re-validated whenever the mirror emits.
    let schema = PropSchema::from_json(json!([
        { "name": "page", "type": "number", "required": true },
        { "name": "label", "type": "string" },
    ]))
    .unwrap();
    let parent = Arc::new(Mutex::new(
        PropTracker::new(schema, DataBag::new().with("page", 1)).unwrap(),
    ));

    let mut page = MirrorProp::new("page", Some(FieldValue::from(1)), FieldValue::from(0));
    let failures = Arc::new(Mutex::new(Vec::<PropError>::new()));
    {
        let parent = Arc::clone(&parent);
        let failures = Arc::clone(&failures);
        page.on_change(move |name, value: &FieldValue| {
            if let Err(err) = parent.lock().unwrap().set(name, value.clone()) {
                failures.lock().unwrap().push(err);
            }
        });
    }

    page.set(FieldValue::from(2));
    assert!(parent.lock().unwrap().is_valid());
    assert_eq!(parent.lock().unwrap().get("page"), Some(&FieldValue::from(2)));

    page.set(FieldValue::from("two"));
    assert!(!parent.lock().unwrap().is_valid());
    assert_eq!(failures.lock().unwrap().len(), 1);
    assert_eq!(failures.lock().unwrap()[0].prop(), "page");

    page.sync_from_prop(FieldValue::from(3));
    assert!(parent.lock().unwrap().is_valid());
}

#[test]
fn state_watchers_can_mirror_into_props() {
    let store = Arc::new(MemoryStore::new());
    let mut state = StateManagerBuilder::new()
        .stored(["theme"])
        .build(Arc::clone(&store))
        .unwrap();

    let theme = Arc::new(Mutex::new(MirrorProp::new("theme", None, String::from("light"))));
    {
        let theme = Arc::clone(&theme);
        state
            .watch("theme", move |value| {
                let next = value.clone().unwrap_or_else(|| "light".to_string());
                theme.lock().unwrap().sync_from_prop(next);
            })
            .unwrap();
    }

    state.set("theme", "dark").unwrap();
    assert_eq!(theme.lock().unwrap().get(), "dark");
    assert_eq!(store.get("theme").as_deref(), Some("dark"));

    state.clear("theme").unwrap();
    assert_eq!(theme.lock().unwrap().get(), "light");
}
