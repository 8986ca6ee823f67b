//! Item registry - maps `type` tags to item constructors

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::CatalogContext;
use crate::error::{CatalogError, ContractViolation};
use crate::geojson::GeoJsonItem;
use crate::group::CatalogGroup;
use crate::item::CatalogItem;
use crate::reflect::Reflect;
use crate::wms::WmsItem;

/// Builds a default-valued item bound to a context
pub type Constructor = fn(Arc<CatalogContext>) -> Box<dyn CatalogItem>;

#[derive(Clone, Copy)]
struct Entry {
    type_name: &'static str,
    construct: Constructor,
}

fn construct<T: Reflect>(context: Arc<CatalogContext>) -> Box<dyn CatalogItem> {
    Box::new(T::new(context))
}

/// Registry of the item types a catalog can create from JSON
#[derive(Clone, Default)]
pub struct ItemRegistry {
    entries: BTreeMap<&'static str, Entry>,
}

impl ItemRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the group, GeoJSON and WMS item types
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        registry.insert::<CatalogGroup>();
        registry.insert::<GeoJsonItem>();
        registry.insert::<WmsItem>();
        registry
    }

    /// Register an item type under its `TYPE` tag
    pub fn register<T: Reflect>(&mut self) -> Result<(), CatalogError> {
        if T::TYPE.is_empty() {
            return Err(ContractViolation::EmptyType.into());
        }
        if T::TYPE_NAME.is_empty() {
            return Err(ContractViolation::EmptyTypeName(T::TYPE).into());
        }
        if self.entries.contains_key(T::TYPE) {
            return Err(CatalogError::DuplicateType(T::TYPE));
        }
        self.insert::<T>();
        Ok(())
    }

    fn insert<T: Reflect>(&mut self) {
        self.entries.insert(
            T::TYPE,
            Entry {
                type_name: T::TYPE_NAME,
                construct: construct::<T>,
            },
        );
    }

    /// Construct a default-valued item of the given type
    pub fn create(
        &self,
        item_type: &str,
        context: &Arc<CatalogContext>,
    ) -> Result<Box<dyn CatalogItem>, CatalogError> {
        let entry = self
            .entries
            .get(item_type)
            .ok_or_else(|| CatalogError::UnknownType(item_type.to_string()))?;
        Ok((entry.construct)(Arc::clone(context)))
    }

    pub fn contains(&self, item_type: &str) -> bool {
        self.entries.contains_key(item_type)
    }

    /// Human-readable name registered for a type tag
    pub fn type_name(&self, item_type: &str) -> Option<&'static str> {
        self.entries.get(item_type).map(|entry| entry.type_name)
    }

    /// All registered type tags, sorted
    pub fn types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

impl fmt::Debug for ItemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
