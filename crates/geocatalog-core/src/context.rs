//! Catalog-wide services shared by every item

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::CatalogError;
use crate::item::CatalogItem;
use crate::reflect::json_kind;
use crate::registry::ItemRegistry;

/// Shared state handed to every item at construction.
///
/// Items hold it behind an `Arc` and never replace it.
#[derive(Debug)]
pub struct CatalogContext {
    registry: ItemRegistry,
}

impl CatalogContext {
    pub fn new(registry: ItemRegistry) -> Arc<Self> {
        Arc::new(Self { registry })
    }

    /// Context that knows the built-in group and data source types
    pub fn with_builtin_types() -> Arc<Self> {
        Self::new(ItemRegistry::with_builtin_types())
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Create an item from JSON, dispatching on its `type` key
    pub fn create_item(
        context: &Arc<Self>,
        json: &Value,
    ) -> Result<Box<dyn CatalogItem>, CatalogError> {
        let object = json
            .as_object()
            .ok_or_else(|| CatalogError::NotAnObject(json_kind(json)))?;
        let item_type = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CatalogError::MissingType)?;

        let mut item = context.registry.create(item_type, context)?;
        item.update_from_json(json)?;
        debug!(item_type, name = item.name(), "Created catalog item");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_item_dispatches_on_type() {
        let context = CatalogContext::with_builtin_types();
        let item = CatalogContext::create_item(
            &context,
            &json!({ "type": "geojson", "name": "Rivers", "url": "rivers.geojson" }),
        )
        .unwrap();
        assert_eq!(item.item_type(), "geojson");
        assert_eq!(item.type_name(), "GeoJSON");
        assert_eq!(item.name(), "Rivers");
    }

    #[test]
    fn test_create_item_requires_type() {
        let context = CatalogContext::with_builtin_types();
        let err = CatalogContext::create_item(&context, &json!({ "name": "x" })).unwrap_err();
        assert!(matches!(err, CatalogError::MissingType));

        let err = CatalogContext::create_item(&context, &json!({ "type": 3 })).unwrap_err();
        assert!(matches!(err, CatalogError::MissingType));

        let err = CatalogContext::create_item(&context, &json!("geojson")).unwrap_err();
        assert!(matches!(err, CatalogError::NotAnObject("a string")));
    }

    #[test]
    fn test_create_item_with_empty_registry() {
        let context = CatalogContext::new(ItemRegistry::new());
        let err =
            CatalogContext::create_item(&context, &json!({ "type": "group" })).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownType(_)));
    }
}
