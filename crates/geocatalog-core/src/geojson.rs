//! GeoJSON data source item

use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};

use crate::context::CatalogContext;
use crate::data_source::{data_source_fields, data_source_hooks, DataSource, DataSourceRecord};
use crate::error::CatalogError;
use crate::field;
use crate::hooks::HookTable;
use crate::item::{Enablement, ItemRecord};
use crate::reflect::{FieldSet, Reflect};

/// A GeoJSON document, either fetched from `url` or embedded as `data`
#[derive(Debug, Clone)]
pub struct GeoJsonItem {
    pub record: ItemRecord,
    pub source: DataSourceRecord,
    /// Location of the GeoJSON document
    pub url: Option<String>,
    /// Inline GeoJSON, used when there is no `url`
    pub data: Option<Value>,
}

static FIELDS: LazyLock<FieldSet<GeoJsonItem>> = LazyLock::new(|| {
    data_source_fields::<GeoJsonItem>().with_fields([
        field!(GeoJsonItem, "url" => url),
        field!(GeoJsonItem, "data" => data),
    ])
});

static HOOKS: LazyLock<HookTable<GeoJsonItem>> =
    LazyLock::new(|| data_source_hooks::<GeoJsonItem>().with_serializer("data", serialize_data));

// Inline data is redundant once the document has a URL.
fn serialize_data(
    item: &GeoJsonItem,
    result: &mut Map<String, Value>,
    field: &str,
    _enabled_items_only: bool,
) -> Result<(), CatalogError> {
    if item.url.is_none() {
        if let Some(data) = &item.data {
            result.insert(field.to_string(), data.clone());
        }
    }
    Ok(())
}

impl Reflect for GeoJsonItem {
    const TYPE: &'static str = "geojson";
    const TYPE_NAME: &'static str = "GeoJSON";

    fn new(context: Arc<CatalogContext>) -> Self {
        Self {
            record: ItemRecord::new(context),
            source: DataSourceRecord::default(),
            url: None,
            data: None,
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

    fn enablement_state(&self) -> Enablement {
        self.data_source_enablement()
    }
}

impl DataSource for GeoJsonItem {
    fn source(&self) -> &DataSourceRecord {
        &self.source
    }

    fn source_mut(&mut self) -> &mut DataSourceRecord {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::Rectangle;
    use crate::item::CatalogItem;
    use serde_json::json;

    fn item() -> GeoJsonItem {
        GeoJsonItem::new(CatalogContext::with_builtin_types())
    }

    #[test]
    fn test_update_from_json() {
        let mut geojson = item();
        geojson
            .update_from_json(&json!({
                "name": "Bushfire extents",
                "url": "https://example.com/fires.geojson",
                "isEnabled": true,
                "rectangle": [140, -40, 150, -30]
            }))
            .unwrap();

        assert_eq!(geojson.record.name, "Bushfire extents");
        assert_eq!(geojson.url.as_deref(), Some("https://example.com/fires.geojson"));
        assert!(geojson.is_enabled());
        assert_eq!(
            geojson.source.rectangle,
            Some(Rectangle::from_degrees(140.0, -40.0, 150.0, -30.0).unwrap())
        );
    }

    #[test]
    fn test_invalid_rectangle_is_rejected_by_hook() {
        let mut geojson = item();
        let err = geojson
            .update_from_json(&json!({ "rectangle": { "west": 0 } }))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidValue { ref field, .. } if field == "rectangle"));
    }

    #[test]
    fn test_null_rectangle_clears_extent() {
        let mut geojson = item();
        geojson.source.rectangle = Some(Rectangle::from_degrees(-180.0, -90.0, 180.0, 90.0).unwrap());
        geojson.update_from_json(&json!({ "rectangle": null })).unwrap();
        assert!(geojson.source.rectangle.is_none());
    }

    #[test]
    fn test_null_url_overwrites_existing_value() {
        let mut geojson = item();
        geojson.url = Some("stations.geojson".to_string());
        geojson.update_from_json(&json!({ "url": null })).unwrap();
        assert!(geojson.url.is_none());
    }

    #[test]
    fn test_serialize_enabled_item() {
        let mut geojson = item();
        geojson.record.name = "Rivers".to_string();
        geojson.set_enabled(true);
        geojson.source.rectangle = Some(Rectangle::from_degrees(0.0, 0.0, 10.0, 10.0).unwrap());

        let result = geojson.serialize_to_json(true).unwrap().unwrap();
        assert_eq!(
            Value::Object(result),
            json!({
                "type": "geojson",
                "name": "Rivers",
                "description": "",
                "isEnabled": true,
                "isShown": true,
                "rectangle": [0.0, 0.0, 10.0, 10.0],
                "url": null
            })
        );
    }

    #[test]
    fn test_disabled_item_omitted() {
        let geojson = item();
        assert_eq!(geojson.enablement(), Enablement::Disabled);
        assert!(geojson.serialize_to_json(true).unwrap().is_none());
        assert!(geojson.serialize_to_json(false).unwrap().is_some());
    }

    #[test]
    fn test_inline_data_dropped_when_url_set() {
        let mut geojson = item();
        geojson.data = Some(json!({ "type": "FeatureCollection", "features": [] }));

        let result = geojson.serialize_to_json(false).unwrap().unwrap();
        assert_eq!(result["data"]["type"], "FeatureCollection");

        geojson.url = Some("features.geojson".to_string());
        let result = geojson.serialize_to_json(false).unwrap().unwrap();
        assert!(!result.contains_key("data"));
    }

    #[test]
    fn test_round_trip() {
        let mut original = item();
        original.record.name = "Parks".to_string();
        original.record.description = "Urban parks".to_string();
        original.source.is_shown = false;
        original.source.rectangle = Some(Rectangle::from_degrees(150.0, -34.0, 151.5, -33.0).unwrap());
        original.data = Some(json!({ "type": "FeatureCollection", "features": [] }));

        let exported = original.serialize_to_json(false).unwrap().unwrap();
        let mut copy = item();
        copy.update_from_json(&Value::Object(exported)).unwrap();

        assert_eq!(copy.record.name, original.record.name);
        assert_eq!(copy.record.description, original.record.description);
        assert_eq!(copy.source, original.source);
        assert_eq!(copy.url, original.url);
        assert_eq!(copy.data, original.data);
    }
}
