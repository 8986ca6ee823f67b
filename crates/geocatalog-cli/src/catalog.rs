//! Catalog documents - loading init files into an item tree and back

use anyhow::{Context, Result};
use geocatalog_core::{CatalogContext, CatalogGroup, CatalogItem, Enablement, Reflect, WmsItem};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Name of the group holding the top-level catalog entries
pub const ROOT_NAME: &str = "Root";

/// Read and parse a catalog document
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let document = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    Ok(document)
}

/// Top-level entries: `{"catalog": [...]}` or a bare array
pub fn catalog_entries(document: &Value) -> Result<&Vec<Value>> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(object) => match object.get("catalog") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => anyhow::bail!("'catalog' must be an array of items"),
            None => anyhow::bail!("Catalog document has no 'catalog' key"),
        },
        _ => anyhow::bail!("Catalog document must be an object or an array"),
    }
}

/// Build the root group from a catalog document
pub fn build_catalog(context: &Arc<CatalogContext>, document: &Value) -> Result<CatalogGroup> {
    let entries = catalog_entries(document)?;

    let mut root = CatalogGroup::new(Arc::clone(context));
    root.record.set_name(ROOT_NAME);
    root.is_open = true;

    let mut json = Map::new();
    json.insert("items".to_string(), Value::Array(entries.clone()));
    root.update_from_json(&Value::Object(json))?;

    info!(count = root.len(), "Catalog built");
    Ok(root)
}

/// Export the root's children as `{"catalog": [...]}`
pub fn export_catalog(root: &CatalogGroup, enabled_items_only: bool) -> Result<Value> {
    let items = root
        .serialize_to_json(enabled_items_only)?
        .and_then(|mut result| result.remove("items"))
        .unwrap_or_else(|| Value::Array(Vec::new()));

    let mut document = Map::new();
    document.insert("catalog".to_string(), items);
    Ok(Value::Object(document))
}

/// Print one line per item, indented by depth
pub fn write_tree(out: &mut impl Write, item: &dyn CatalogItem, depth: usize) -> std::io::Result<()> {
    let state = match item.enablement() {
        Enablement::NotApplicable => "",
        Enablement::Enabled => " (enabled)",
        Enablement::Disabled => " (disabled)",
    };
    let layers = item
        .downcast_ref::<WmsItem>()
        .map(|wms| wms.layer_names().collect::<Vec<_>>().join(", "))
        .filter(|layers| !layers.is_empty())
        .map(|layers| format!(" layers: {layers}"))
        .unwrap_or_default();
    writeln!(
        out,
        "{:indent$}- {} [{}]{}{}",
        "",
        item.name(),
        item.type_name(),
        state,
        layers,
        indent = depth * 2
    )?;
    for child in item.items() {
        write_tree(out, &**child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "catalog": [
                {
                    "type": "group",
                    "name": "Base maps",
                    "items": [
                        { "type": "wms", "name": "Topography", "url": "https://maps.example.com/wms", "layers": "topo", "isEnabled": true },
                        { "type": "wms", "name": "Imagery", "layers": ["imagery", "labels"] }
                    ]
                },
                { "type": "geojson", "name": "Stations", "url": "stations.geojson" }
            ]
        })
    }

    #[test]
    fn test_catalog_entries_shapes() {
        assert_eq!(catalog_entries(&document()).unwrap().len(), 2);
        assert_eq!(catalog_entries(&json!([{ "type": "group" }])).unwrap().len(), 1);
        assert!(catalog_entries(&json!({ "items": [] })).is_err());
        assert!(catalog_entries(&json!({ "catalog": {} })).is_err());
        assert!(catalog_entries(&json!("catalog")).is_err());
    }

    #[test]
    fn test_build_and_export_enabled() {
        let context = CatalogContext::with_builtin_types();
        let root = build_catalog(&context, &document()).unwrap();
        assert_eq!(root.record.name, ROOT_NAME);
        assert_eq!(root.len(), 2);

        let exported = export_catalog(&root, true).unwrap();
        let catalog = exported["catalog"].as_array().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0]["name"], "Base maps");
        assert_eq!(catalog[0]["items"].as_array().unwrap().len(), 1);
        assert_eq!(catalog[0]["items"][0]["layers"], "topo");
    }

    #[test]
    fn test_export_all_and_rebuild() {
        let context = CatalogContext::with_builtin_types();
        let root = build_catalog(&context, &document()).unwrap();
        let exported = export_catalog(&root, false).unwrap();
        assert_eq!(exported["catalog"].as_array().unwrap().len(), 2);

        let rebuilt = build_catalog(&context, &exported).unwrap();
        assert_eq!(export_catalog(&rebuilt, false).unwrap(), exported);
    }

    #[test]
    fn test_nothing_enabled_exports_empty_catalog() {
        let context = CatalogContext::with_builtin_types();
        let root = build_catalog(&context, &json!({ "catalog": [{ "type": "wms", "name": "Off" }] })).unwrap();
        assert_eq!(export_catalog(&root, true).unwrap(), json!({ "catalog": [] }));
    }

    #[test]
    fn test_load_document_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, document().to_string()).unwrap();
        assert_eq!(load_document(&path).unwrap(), document());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_document(&path).is_err());
    }

    #[test]
    fn test_write_tree() {
        let context = CatalogContext::with_builtin_types();
        let root = build_catalog(&context, &document()).unwrap();
        let mut out = Vec::new();
        write_tree(&mut out, &root, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "- Root [Group]\n\
             \x20\x20- Base maps [Group]\n\
             \x20\x20\x20\x20- Topography [Web Map Service (WMS)] (enabled) layers: topo\n\
             \x20\x20\x20\x20- Imagery [Web Map Service (WMS)] (disabled) layers: imagery, labels\n\
             \x20\x20- Stations [GeoJSON] (disabled)\n"
        );
    }
}
