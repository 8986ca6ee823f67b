//! Per-type field hook tables
//!
//! A hook table maps a field name to a function used in place of the direct
//! copy performed by the reflective importer and exporter. Tables are built
//! once per item type and never mutated afterwards; a subtype derives its
//! table from a base table with [`HookTable::extend`].

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::error::CatalogError;

/// Import hook: `(item, json, field_name)`. Fully owns mutating the item.
pub type Updater<T> = fn(&mut T, &Map<String, Value>, &str) -> Result<(), CatalogError>;

/// Export hook: `(item, result, field_name, enabled_items_only)`. Fully owns
/// writing into the result object.
pub type Serializer<T> = fn(&T, &mut Map<String, Value>, &str, bool) -> Result<(), CatalogError>;

/// Updaters and serializers for one item type, keyed by field name
pub struct HookTable<T> {
    updaters: HashMap<&'static str, Updater<T>>,
    serializers: HashMap<&'static str, Serializer<T>>,
}

impl<T> HookTable<T> {
    /// Create an empty table (direct copy for every field)
    pub fn new() -> Self {
        Self {
            updaters: HashMap::new(),
            serializers: HashMap::new(),
        }
    }

    /// Register an import hook, replacing any inherited one for the same field
    pub fn with_updater(mut self, field: &'static str, updater: Updater<T>) -> Self {
        self.updaters.insert(field, updater);
        self
    }

    /// Register an export hook, replacing any inherited one for the same field
    pub fn with_serializer(mut self, field: &'static str, serializer: Serializer<T>) -> Self {
        self.serializers.insert(field, serializer);
        self
    }

    /// Start a derived table that inherits every hook of `self`
    pub fn extend(&self) -> Self {
        Self {
            updaters: self.updaters.clone(),
            serializers: self.serializers.clone(),
        }
    }

    /// Import hook for `field`, if one is registered
    pub fn updater(&self, field: &str) -> Option<Updater<T>> {
        self.updaters.get(field).copied()
    }

    /// Export hook for `field`, if one is registered
    pub fn serializer(&self, field: &str) -> Option<Serializer<T>> {
        self.serializers.get(field).copied()
    }

    /// Whether the table has no hooks at all
    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty() && self.serializers.is_empty()
    }
}

impl<T> Default for HookTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for HookTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut updaters: Vec<_> = self.updaters.keys().collect();
        let mut serializers: Vec<_> = self.serializers.keys().collect();
        updaters.sort();
        serializers.sort();
        f.debug_struct("HookTable")
            .field("updaters", &updaters)
            .field("serializers", &serializers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        value: String,
    }

    fn upper(item: &mut Probe, json: &Map<String, Value>, field: &str) -> Result<(), CatalogError> {
        item.value = json[field].as_str().unwrap_or_default().to_uppercase();
        Ok(())
    }

    fn lower(item: &mut Probe, json: &Map<String, Value>, field: &str) -> Result<(), CatalogError> {
        item.value = json[field].as_str().unwrap_or_default().to_lowercase();
        Ok(())
    }

    fn skip(_: &Probe, _: &mut Map<String, Value>, _: &str, _: bool) -> Result<(), CatalogError> {
        Ok(())
    }

    #[test]
    fn test_empty_table_has_no_hooks() {
        let table = HookTable::<Probe>::new();
        assert!(table.is_empty());
        assert!(table.updater("value").is_none());
        assert!(table.serializer("value").is_none());
    }

    #[test]
    fn test_extend_inherits_and_overrides() {
        let base = HookTable::<Probe>::new()
            .with_updater("value", upper)
            .with_serializer("value", skip);
        let derived = base.extend().with_updater("value", lower);

        let json = serde_json::json!({ "value": "MiXeD" });
        let json = json.as_object().unwrap();

        let mut probe = Probe::default();
        (base.updater("value").unwrap())(&mut probe, json, "value").unwrap();
        assert_eq!(probe.value, "MIXED");

        (derived.updater("value").unwrap())(&mut probe, json, "value").unwrap();
        assert_eq!(probe.value, "mixed");
        assert!(derived.serializer("value").is_some());
    }

    #[test]
    fn test_unknown_field_is_not_an_error() {
        let table = HookTable::<Probe>::new().with_updater("value", upper);
        assert!(table.updater("missing").is_none());
    }
}
