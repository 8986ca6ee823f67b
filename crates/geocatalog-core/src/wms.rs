//! Web Map Service data source item

use serde_json::{Map, Value};
use std::sync::{Arc, LazyLock};

use crate::context::CatalogContext;
use crate::data_source::{data_source_fields, data_source_hooks, DataSource, DataSourceRecord};
use crate::error::CatalogError;
use crate::field;
use crate::hooks::HookTable;
use crate::item::{Enablement, ItemRecord};
use crate::reflect::{json_kind, FieldSet, Reflect};

/// One or more layers of a WMS server
#[derive(Debug, Clone)]
pub struct WmsItem {
    pub record: ItemRecord,
    pub source: DataSourceRecord,
    /// Base URL of the WMS server
    pub url: Option<String>,
    /// Comma-separated layer names
    pub layers: String,
    /// Extra GetMap parameters (e.g. `transparent`, `format`)
    pub parameters: Map<String, Value>,
}

impl WmsItem {
    /// Individual layer names
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers
            .split(',')
            .map(str::trim)
            .filter(|layer| !layer.is_empty())
    }
}

static FIELDS: LazyLock<FieldSet<WmsItem>> = LazyLock::new(|| {
    data_source_fields::<WmsItem>().with_fields([
        field!(WmsItem, "url" => url),
        field!(WmsItem, "layers" => layers),
        field!(WmsItem, "parameters" => parameters),
    ])
});

static HOOKS: LazyLock<HookTable<WmsItem>> =
    LazyLock::new(|| data_source_hooks::<WmsItem>().with_updater("layers", update_layers));

/// Accept `"a,b"` as well as `["a", "b"]`
fn update_layers(
    item: &mut WmsItem,
    json: &Map<String, Value>,
    field: &str,
) -> Result<(), CatalogError> {
    item.layers = match json.get(field) {
        Some(Value::String(layers)) => layers.clone(),
        Some(Value::Array(layers)) => layers
            .iter()
            .map(|layer| {
                layer.as_str().ok_or_else(|| {
                    CatalogError::invalid(field, format!("expected layer name, got {}", json_kind(layer)))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(","),
        Some(Value::Null) | None => String::new(),
        Some(other) => {
            return Err(CatalogError::invalid(
                field,
                format!("expected a string or an array of strings, got {}", json_kind(other)),
            ))
        }
    };
    Ok(())
}

impl Reflect for WmsItem {
    const TYPE: &'static str = "wms";
    const TYPE_NAME: &'static str = "Web Map Service (WMS)";

    fn new(context: Arc<CatalogContext>) -> Self {
        Self {
            record: ItemRecord::new(context),
            source: DataSourceRecord::default(),
            url: None,
            layers: String::new(),
            parameters: Map::new(),
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

impl DataSource for WmsItem {
    fn source(&self) -> &DataSourceRecord {
        &self.source
    }

    fn source_mut(&mut self) -> &mut DataSourceRecord {
        &mut self.source
    }
}
