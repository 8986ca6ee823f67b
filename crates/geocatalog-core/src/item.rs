//! The catalog item abstraction shared by data sources and groups

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::CatalogContext;
use crate::error::CatalogError;

/// Name given to items that have not been named yet
pub const DEFAULT_NAME: &str = "Unnamed Item";

/// Whether an item takes part in enabled-items-only exports.
///
/// Groups have no enablement of their own (`NotApplicable`), which is
/// distinct from a data source that has been switched off (`Disabled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enablement {
    NotApplicable,
    Enabled,
    Disabled,
}

impl From<bool> for Enablement {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Identity fields common to every catalog item
#[derive(Clone)]
pub struct ItemRecord {
    context: Arc<CatalogContext>,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
}

impl ItemRecord {
    pub fn new(context: Arc<CatalogContext>) -> Self {
        Self {
            context,
            name: DEFAULT_NAME.to_string(),
            description: String::new(),
        }
    }

    /// The catalog context this item was created in
    pub fn context(&self) -> &Arc<CatalogContext> {
        &self.context
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

impl fmt::Debug for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRecord")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Object-safe view of any catalog item.
///
/// Implemented for every [`Reflect`](crate::reflect::Reflect) type, so item
/// trees can hold `Box<dyn CatalogItem>` of mixed concrete types.
pub trait CatalogItem: fmt::Debug {
    /// Type discriminator written to the `type` key on export
    fn item_type(&self) -> &'static str;

    /// Human-readable name of this kind of item, e.g. "Web Map Service (WMS)"
    fn type_name(&self) -> &'static str;

    fn record(&self) -> &ItemRecord;

    fn record_mut(&mut self) -> &mut ItemRecord;

    fn enablement(&self) -> Enablement;

    /// Child items; empty for anything that is not a group
    fn items(&self) -> &[Box<dyn CatalogItem>];

    /// Apply the fields present in `json` to this item
    fn update_from_json(&mut self, json: &Value) -> Result<(), CatalogError>;

    /// Export this item, or `None` when it is omitted from the output
    fn serialize_to_json(
        &self,
        enabled_items_only: bool,
    ) -> Result<Option<Map<String, Value>>, CatalogError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Export only enabled data sources and the groups that contain them
    fn serialize_enabled(&self) -> Result<Option<Map<String, Value>>, CatalogError> {
        self.serialize_to_json(true)
    }

    fn name(&self) -> &str {
        self.record().name()
    }

    fn description(&self) -> &str {
        self.record().description()
    }

    fn context(&self) -> &Arc<CatalogContext> {
        self.record().context()
    }
}

impl<'a> dyn CatalogItem + 'a {
    pub fn downcast_ref<T: CatalogItem + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: CatalogItem + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enablement_from_bool() {
        assert_eq!(Enablement::from(true), Enablement::Enabled);
        assert_eq!(Enablement::from(false), Enablement::Disabled);
        assert_ne!(Enablement::Disabled, Enablement::NotApplicable);
    }

    #[test]
    fn test_record_defaults() {
        let context = CatalogContext::with_builtin_types();
        let mut record = ItemRecord::new(context.clone());
        assert_eq!(record.name(), DEFAULT_NAME);
        assert_eq!(record.description(), "");
        assert!(Arc::ptr_eq(record.context(), &context));

        record.set_name("Coastline");
        record.set_description("Australian coastline");
        assert_eq!(record.name(), "Coastline");
        assert_eq!(record.description(), "Australian coastline");
    }
}
