//! Geocatalog Core - catalog items and their JSON representation
//!
//! This crate provides the building blocks for catalog trees loaded from and
//! saved to JSON configuration documents:
//! - Catalog item abstraction with identity fields and a shared context
//! - Per-type field descriptors and hook tables
//! - Reflective import (`update_from_json`) and export (`serialize_to_json`)
//! - Item registry for creating items from their `type` tag
//! - Built-in group, GeoJSON and WMS item types

pub mod context;
pub mod data_source;
pub mod error;
pub mod geojson;
pub mod group;
pub mod hooks;
pub mod item;
pub mod reflect;
pub mod registry;
pub mod wms;

pub use context::CatalogContext;
pub use data_source::{data_source_fields, data_source_hooks, DataSource, DataSourceRecord, Rectangle};
pub use error::{CatalogError, ContractViolation};
pub use geojson::GeoJsonItem;
pub use group::CatalogGroup;
pub use hooks::{HookTable, Serializer, Updater};
pub use item::{CatalogItem, Enablement, ItemRecord, DEFAULT_NAME};
pub use reflect::{record_fields, serialize_to_json, update_from_json, Field, FieldSet, Reflect};
pub use registry::{Constructor, ItemRegistry};
pub use wms::WmsItem;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
