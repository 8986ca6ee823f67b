//! Error types for catalog import/export

use thiserror::Error;

/// Errors raised while reconciling catalog items with JSON
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog item JSON must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("Failed to convert field '{field}' of '{item_type}': {source}")]
    FieldValue {
        item_type: &'static str,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },
    #[error("Catalog item JSON has no string 'type' key")]
    MissingType,
    #[error("Unknown catalog item type: {0}")]
    UnknownType(String),
    #[error("Catalog item type already registered: {0}")]
    DuplicateType(&'static str),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl CatalogError {
    /// Build an [`CatalogError::InvalidValue`] for a hook rejecting its input
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// True when the error signals a defect in an item type rather than bad data
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

/// A catalog item type that does not honor the item contract.
///
/// These are programming errors in the item implementation, never caused by
/// the JSON being imported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("Types implementing a catalog item must supply a non-empty \"type\"")]
    EmptyType,
    #[error("Catalog item type '{0}' must supply a non-empty \"typeName\"")]
    EmptyTypeName(&'static str),
    #[error("Field '{field}' of '{item_type}' has no direct accessors and no {hook} hook")]
    MissingHook {
        item_type: &'static str,
        field: &'static str,
        hook: &'static str,
    },
}
