//! Typed extraction of flat document fields.

use mongodb::bson::{Bson, Document};

use crate::error::{StoreError, StoreResult};

fn invalid(entity: &'static str, field: &'static str, reason: impl Into<String>) -> StoreError {
    StoreError::InvalidField {
        entity,
        field,
        reason: reason.into(),
    }
}

fn as_i32(entity: &'static str, field: &'static str, value: &Bson) -> StoreResult<i32> {
    match value {
        Bson::Int32(v) => Ok(*v),
        Bson::Int64(v) => i32::try_from(*v)
            .map_err(|_| invalid(entity, field, format!("{} does not fit in 32 bits", v))),
        other => Err(invalid(
            entity,
            field,
            format!("expected integer, found {:?}", other.element_type()),
        )),
    }
}

/// Integer field that must be present and non-null.
pub fn required_i32(document: &Document, entity: &'static str, field: &'static str) -> StoreResult<i32> {
    match document.get(field) {
        None | Some(Bson::Null) => Err(StoreError::MissingField { entity, field }),
        Some(value) => as_i32(entity, field, value),
    }
}

/// Integer field that may be absent or null.
pub fn optional_i32(
    document: &Document,
    entity: &'static str,
    field: &'static str,
) -> StoreResult<Option<i32>> {
    match document.get(field) {
        None | Some(Bson::Null) => Ok(None),
        Some(value) => as_i32(entity, field, value).map(Some),
    }
}

/// String field that must be present and non-null.
pub fn required_str(
    document: &Document,
    entity: &'static str,
    field: &'static str,
) -> StoreResult<String> {
    match document.get(field) {
        None | Some(Bson::Null) => Err(StoreError::MissingField { entity, field }),
        Some(Bson::String(value)) => Ok(value.clone()),
        Some(other) => Err(invalid(
            entity,
            field,
            format!("expected string, found {:?}", other.element_type()),
        )),
    }
}
