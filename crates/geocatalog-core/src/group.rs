//! Catalog groups - containers of data sources and other groups
//!
//! A group has no enablement of its own. When exporting enabled items only,
//! a group is written out only if at least one of its children survives.

use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::context::CatalogContext;
use crate::error::CatalogError;
use crate::field;
use crate::hooks::HookTable;
use crate::item::{CatalogItem, ItemRecord};
use crate::reflect::{json_kind, record_fields, Field, FieldSet, Reflect};

/// A named, ordered collection of catalog items
#[derive(Debug)]
pub struct CatalogGroup {
    pub record: ItemRecord,
    /// Whether the group is expanded in the catalog view
    pub is_open: bool,
    items: Vec<Box<dyn CatalogItem>>,
}

impl CatalogGroup {
    /// Append a child item
    pub fn add(&mut self, item: Box<dyn CatalogItem>) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Box<dyn CatalogItem>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First direct child with the given name
    pub fn find_by_name(&self, name: &str) -> Option<&dyn CatalogItem> {
        self.items
            .iter()
            .find(|item| item.name() == name)
            .map(|item| &**item)
    }

    fn find_mut(&mut self, item_type: &str, name: &str) -> Option<&mut Box<dyn CatalogItem>> {
        self.items
            .iter_mut()
            .find(|item| item.item_type() == item_type && item.name() == name)
    }
}

static FIELDS: LazyLock<FieldSet<CatalogGroup>> = LazyLock::new(|| {
    record_fields::<CatalogGroup>().with_fields([
        field!(CatalogGroup, "isOpen" => is_open),
        Field::hook_only("items"),
    ])
});

static HOOKS: LazyLock<HookTable<CatalogGroup>> = LazyLock::new(|| {
    HookTable::new()
        .with_updater("items", update_items)
        .with_serializer("items", serialize_items)
});

/// Merge child descriptions into the group.
///
/// A child with the same `type` and `name` as an existing item updates that
/// item in place; anything else is created through the registry and appended.
fn update_items(
    group: &mut CatalogGroup,
    json: &Map<String, Value>,
    field: &str,
) -> Result<(), CatalogError> {
    let entries = match json.get(field) {
        Some(Value::Array(entries)) => entries,
        Some(Value::Null) | None => return Ok(()),
        Some(other) => {
            return Err(CatalogError::invalid(
                field,
                format!("expected an array, got {}", json_kind(other)),
            ))
        }
    };

    let context = Arc::clone(group.record.context());
    for entry in entries {
        let object = entry
            .as_object()
            .ok_or_else(|| CatalogError::NotAnObject(json_kind(entry)))?;
        let item_type = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CatalogError::MissingType)?;
        let name = object.get("name").and_then(Value::as_str);

        if let Some(existing) = name.and_then(|name| group.find_mut(item_type, name)) {
            debug!(item_type, name = existing.name(), "Updating existing item");
            existing.update_from_json(entry)?;
        } else {
            let item = CatalogContext::create_item(&context, entry)?;
            group.items.push(item);
        }
    }

    Ok(())
}

fn serialize_items(
    group: &CatalogGroup,
    result: &mut Map<String, Value>,
    field: &str,
    enabled_items_only: bool,
) -> Result<(), CatalogError> {
    let mut items = Vec::with_capacity(group.items.len());
    for item in &group.items {
        if let Some(serialized) = item.serialize_to_json(enabled_items_only)? {
            items.push(Value::Object(serialized));
        }
    }
    result.insert(field.to_string(), Value::Array(items));
    Ok(())
}

impl Reflect for CatalogGroup {
    const TYPE: &'static str = "group";
    const TYPE_NAME: &'static str = "Group";

    fn new(context: Arc<CatalogContext>) -> Self {
        Self {
            record: ItemRecord::new(context),
            is_open: false,
            items: Vec::new(),
        }
    }

    fn base(&self) -> &ItemRecord {
        &self.record
    }

    fn base_mut(&mut self) -> &mut ItemRecord {
        &mut self.record
    }

    fn fields() -> &'static FieldSet<Self> {
        &FIELDS
    }

    fn hooks() -> Option<&'static HookTable<Self>> {
        Some(&HOOKS)
    }

    fn child_items(&self) -> &[Box<dyn CatalogItem>] {
        &self.items
    }
}
