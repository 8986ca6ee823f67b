//! Fields and hooks shared by every leaf data source
//!
//! Data sources are the leaves of a catalog tree. Unlike groups they can be
//! switched on and off, which is what enabled-items-only exports key on.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::CatalogError;
use crate::hooks::HookTable;
use crate::item::Enablement;
use crate::reflect::{json_kind, record_fields, Field, FieldSet, Reflect};

/// Geographic extent in degrees.
///
/// `west` may be greater than `east` for extents crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Result<Self, String> {
        for (label, value, limit) in [
            ("west", west, 180.0),
            ("south", south, 90.0),
            ("east", east, 180.0),
            ("north", north, 90.0),
        ] {
            if !value.is_finite() || value.abs() > limit {
                return Err(format!("{label} must be within ±{limit} degrees, got {value}"));
            }
        }
        if south > north {
            return Err(format!("south ({south}) is greater than north ({north})"));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Parse the `[west, south, east, north]` form used in catalog files
    pub fn from_json(value: &Value) -> Result<Self, String> {
        let parts = value
            .as_array()
            .ok_or_else(|| format!("expected [west, south, east, north], got {}", json_kind(value)))?;
        if parts.len() != 4 {
            return Err(format!("expected 4 values, got {}", parts.len()));
        }
        let mut degrees = [0.0; 4];
        for (slot, part) in degrees.iter_mut().zip(parts) {
            *slot = part
                .as_f64()
                .ok_or_else(|| format!("expected a number, got {}", json_kind(part)))?;
        }
        Self::from_degrees(degrees[0], degrees[1], degrees[2], degrees[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

/// State common to all data sources
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceRecord {
    /// Whether the data source is loaded into the view
    pub is_enabled: bool,
    /// Whether an enabled data source is currently drawn
    pub is_shown: bool,
    /// Extent of the data, when known
    pub rectangle: Option<Rectangle>,
}

impl Default for DataSourceRecord {
    fn default() -> Self {
        Self {
            is_enabled: false,
            is_shown: true,
            rectangle: None,
        }
    }
}

/// A catalog item that is a leaf data source
pub trait DataSource: Reflect {
    fn source(&self) -> &DataSourceRecord;

    fn source_mut(&mut self) -> &mut DataSourceRecord;

    fn is_enabled(&self) -> bool {
        self.source().is_enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.source_mut().is_enabled = enabled;
    }

    fn data_source_enablement(&self) -> Enablement {
        self.source().is_enabled.into()
    }
}

/// Fields every data source type starts from: the record fields plus
/// `isEnabled`, `isShown` and the hook-handled `rectangle`
pub fn data_source_fields<T: DataSource>() -> FieldSet<T> {
    record_fields::<T>().with_fields([
        Field::new(
            "isEnabled",
            |item: &T| serde_json::to_value(item.source().is_enabled),
            |item: &mut T, value: Value| {
                item.source_mut().is_enabled = serde_json::from_value(value)?;
                Ok(())
            },
        ),
        Field::new(
            "isShown",
            |item: &T| serde_json::to_value(item.source().is_shown),
            |item: &mut T, value: Value| {
                item.source_mut().is_shown = serde_json::from_value(value)?;
                Ok(())
            },
        ),
        Field::hook_only("rectangle"),
    ])
}

/// Hooks every data source type starts from
pub fn data_source_hooks<T: DataSource>() -> HookTable<T> {
    HookTable::new()
        .with_updater("rectangle", update_rectangle::<T>)
        .with_serializer("rectangle", serialize_rectangle::<T>)
}

fn update_rectangle<T: DataSource>(
    item: &mut T,
    json: &Map<String, Value>,
    field: &str,
) -> Result<(), CatalogError> {
    let rectangle = match json.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => {
            Some(Rectangle::from_json(value).map_err(|message| CatalogError::invalid(field, message))?)
        }
    };
    item.source_mut().rectangle = rectangle;
    Ok(())
}

fn serialize_rectangle<T: DataSource>(
    item: &T,
    result: &mut Map<String, Value>,
    field: &str,
    _enabled_items_only: bool,
) -> Result<(), CatalogError> {
    if let Some(rectangle) = item.source().rectangle {
        result.insert(field.to_string(), json!(rectangle.to_array()));
    }
    Ok(())
}
