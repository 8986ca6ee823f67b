//! Reflective import and export of catalog items
//!
//! Each item type declares the fields it exposes to JSON as a static
//! [`FieldSet`], and optionally a [`HookTable`] that overrides the direct
//! copy for individual fields. [`update_from_json`] and [`serialize_to_json`]
//! walk that list without knowing anything else about the type:
//!
//! - Import applies only the fields present in the JSON object (partial
//!   update). `null`, `false` and `0` are present values.
//! - Export always writes `type`, then every field. With
//!   `enabled_items_only`, disabled data sources are omitted, and so are
//!   groups that end up with no items.
//!
//! Field names that are empty or start with `_` are never reflected.

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::context::CatalogContext;
use crate::error::{CatalogError, ContractViolation};
use crate::hooks::HookTable;
use crate::item::{CatalogItem, Enablement, ItemRecord};

/// Reads a field into a JSON value
pub type Getter<T> = fn(&T) -> Result<Value, serde_json::Error>;

/// Writes a JSON value into a field
pub type Setter<T> = fn(&mut T, Value) -> Result<(), serde_json::Error>;

/// Static description of a catalog item type.
///
/// `TYPE` and `TYPE_NAME` are mandatory, so a type cannot become a catalog
/// item without naming itself.
pub trait Reflect: fmt::Debug + Sized + 'static {
    /// Discriminator written to and read from the `type` key
    const TYPE: &'static str;
    /// Human-readable label for this kind of item
    const TYPE_NAME: &'static str;

    /// Create an item with default field values
    fn new(context: Arc<CatalogContext>) -> Self;

    /// Identity fields embedded in the item
    fn base(&self) -> &ItemRecord;

    fn base_mut(&mut self) -> &mut ItemRecord;

    /// Fields exposed to JSON, built once per type
    fn fields() -> &'static FieldSet<Self>;

    /// Per-field hooks; `None` means direct copy for every field
    fn hooks() -> Option<&'static HookTable<Self>> {
        None
    }

    fn enablement_state(&self) -> Enablement {
        Enablement::NotApplicable
    }

    fn child_items(&self) -> &[Box<dyn CatalogItem>] {
        &[]
    }
}

/// One field of an item type as seen by JSON
pub struct Field<T> {
    name: &'static str,
    access: Option<(Getter<T>, Setter<T>)>,
}

impl<T> Field<T> {
    /// A field copied directly between the record and JSON
    pub const fn new(name: &'static str, get: Getter<T>, set: Setter<T>) -> Self {
        Self {
            name,
            access: Some((get, set)),
        }
    }

    /// A field that can only be handled by hooks (e.g. a list of child items)
    pub const fn hook_only(name: &'static str) -> Self {
        Self { name, access: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this field takes part in import and export at all
    pub fn is_reflected(&self) -> bool {
        is_reflected_name(self.name)
    }

    fn read(&self, item_type: &'static str, item: &T) -> Result<Value, CatalogError> {
        let (get, _) = self.access.ok_or(ContractViolation::MissingHook {
            item_type,
            field: self.name,
            hook: "serializer",
        })?;
        get(item).map_err(|source| CatalogError::FieldValue {
            item_type,
            field: self.name,
            source,
        })
    }

    fn write(&self, item_type: &'static str, item: &mut T, value: Value) -> Result<(), CatalogError> {
        let (_, set) = self.access.ok_or(ContractViolation::MissingHook {
            item_type,
            field: self.name,
            hook: "updater",
        })?;
        set(item, value).map_err(|source| CatalogError::FieldValue {
            item_type,
            field: self.name,
            source,
        })
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("direct", &self.access.is_some())
            .finish()
    }
}

/// The ordered list of fields an item type exposes to JSON
pub struct FieldSet<T> {
    fields: Vec<Field<T>>,
}

impl<T> FieldSet<T> {
    pub fn new(fields: Vec<Field<T>>) -> Self {
        Self { fields }
    }

    /// Fields that take part in import and export
    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.fields.iter().filter(|field| field.is_reflected())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Field::name).collect()
    }

    /// Append a field, or replace an inherited field of the same name in place
    pub fn with_field(mut self, field: Field<T>) -> Self {
        match self.fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn with_fields(self, fields: impl IntoIterator<Item = Field<T>>) -> Self {
        fields.into_iter().fold(self, Self::with_field)
    }
}

impl<T> fmt::Debug for FieldSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

/// Declare a directly-copied field: `field!(MyItem, "isOpen" => is_open)`.
///
/// The field type must implement `Serialize` and `DeserializeOwned`.
#[macro_export]
macro_rules! field {
    ($ty:ty, $name:literal => $($path:ident).+) => {
        $crate::reflect::Field::<$ty>::new(
            $name,
            |item: &$ty| $crate::__private::serde_json::to_value(&item.$($path).+),
            |item: &mut $ty, value: $crate::__private::serde_json::Value| {
                item.$($path).+ = $crate::__private::serde_json::from_value(value)?;
                ::std::result::Result::Ok(())
            },
        )
    };
}

/// `name` and `description`, which every item type starts from
pub fn record_fields<T: Reflect>() -> FieldSet<T> {
    FieldSet::new(vec![
        Field::new(
            "name",
            |item: &T| serde_json::to_value(&item.base().name),
            |item: &mut T, value: Value| {
                item.base_mut().name = serde_json::from_value(value)?;
                Ok(())
            },
        ),
        Field::new(
            "description",
            |item: &T| serde_json::to_value(&item.base().description),
            |item: &mut T, value: Value| {
                item.base_mut().description = serde_json::from_value(value)?;
                Ok(())
            },
        ),
    ])
}

/// Non-empty and not marked internal with a leading underscore
pub fn is_reflected_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('_')
}

/// Short name of a JSON value's kind, for error messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn check_identity<T: Reflect>() -> Result<(), ContractViolation> {
    if T::TYPE.is_empty() {
        return Err(ContractViolation::EmptyType);
    }
    if T::TYPE_NAME.is_empty() {
        return Err(ContractViolation::EmptyTypeName(T::TYPE));
    }
    Ok(())
}

/// Update `item` from a JSON object.
///
/// Only fields present in `json` are touched. Fields with an updater hook are
/// handed to the hook; all others are assigned directly. A failing hook or an
/// unconvertible value stops the walk; fields applied before it stay applied.
pub fn update_from_json<T: Reflect>(item: &mut T, json: &Value) -> Result<(), CatalogError> {
    check_identity::<T>()?;
    let object = json
        .as_object()
        .ok_or_else(|| CatalogError::NotAnObject(json_kind(json)))?;
    let hooks = T::hooks();

    for field in T::fields().iter() {
        let name = field.name();
        let Some(value) = object.get(name) else {
            continue;
        };

        match hooks.and_then(|hooks| hooks.updater(name)) {
            Some(updater) => {
                trace!(item_type = T::TYPE, field = name, "Applying updater hook");
                updater(item, object, name)?;
            }
            None => {
                trace!(item_type = T::TYPE, field = name, "Copying field");
                field.write(T::TYPE, item, value.clone())?;
            }
        }
    }

    Ok(())
}

/// Serialize `item` to a JSON object.
///
/// Returns `None` when the item should be left out of its parent: with
/// `enabled_items_only`, a disabled data source, or a group whose exported
/// `items` is missing or empty.
pub fn serialize_to_json<T: Reflect>(
    item: &T,
    enabled_items_only: bool,
) -> Result<Option<Map<String, Value>>, CatalogError> {
    check_identity::<T>()?;
    let enablement = item.enablement_state();

    if enabled_items_only && enablement == Enablement::Disabled {
        debug!(item_type = T::TYPE, name = %item.base().name, "Omitting disabled item");
        return Ok(None);
    }

    let mut result = Map::new();
    result.insert("type".to_string(), Value::String(T::TYPE.to_string()));

    let hooks = T::hooks();
    for field in T::fields().iter() {
        let name = field.name();
        match hooks.and_then(|hooks| hooks.serializer(name)) {
            Some(serializer) => serializer(item, &mut result, name, enabled_items_only)?,
            None => {
                let value = field.read(T::TYPE, item)?;
                result.insert(name.to_string(), value);
            }
        }
    }

    if enabled_items_only && enablement == Enablement::NotApplicable && !has_items(&result) {
        debug!(item_type = T::TYPE, name = %item.base().name, "Omitting empty group");
        return Ok(None);
    }

    Ok(Some(result))
}

fn has_items(result: &Map<String, Value>) -> bool {
    match result.get("items") {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

impl<T: Reflect> CatalogItem for T {
    fn item_type(&self) -> &'static str {
        T::TYPE
    }

    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn record(&self) -> &ItemRecord {
        self.base()
    }

    fn record_mut(&mut self) -> &mut ItemRecord {
        self.base_mut()
    }

    fn enablement(&self) -> Enablement {
        self.enablement_state()
    }

    fn items(&self) -> &[Box<dyn CatalogItem>] {
        self.child_items()
    }

    fn update_from_json(&mut self, json: &Value) -> Result<(), CatalogError> {
        update_from_json(self, json)
    }

    fn serialize_to_json(
        &self,
        enabled_items_only: bool,
    ) -> Result<Option<Map<String, Value>>, CatalogError> {
        serialize_to_json(self, enabled_items_only)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
