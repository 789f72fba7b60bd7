// ============================================================
// USER ENTITY
// ============================================================
// Canonical person record produced from one raw CSV row

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{AppError, Result};
use super::record::{get_nested, get_nested_str, RawRecord};

/// A validated person row ready for persistence.
///
/// Constructed only through [`transform`]; a record that fails validation
/// never becomes a `UserEntity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntity {
    /// Full name, `firstName lastName` trimmed
    pub name: String,

    /// Parsed age; no range check, zero and negative values are accepted
    pub age: i64,

    /// Raw top-level `address` subtree, passed through verbatim
    pub address: Option<Value>,

    /// Every other top-level key not consumed by the canonical fields
    pub additional_info: Option<Value>,
}

/// Validate and reshape one raw record into a [`UserEntity`].
///
/// Fails with `ValidationError` when `age` is absent, empty or not an
/// integer, or when either name part is absent or empty after trimming.
/// Pure and side-effect-free.
pub fn transform(record: &RawRecord) -> Result<UserEntity> {
    let age_raw = get_nested_str(record, "age").unwrap_or("");
    let age = age_raw.parse::<i64>().map_err(|_| {
        AppError::ValidationError(format!("Invalid age value \"{}\" encountered", age_raw))
    })?;

    let first_name = get_nested_str(record, "name.firstName").unwrap_or("");
    let last_name = get_nested_str(record, "name.lastName").unwrap_or("");
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::ValidationError(
            "Missing mandatory name fields".to_string(),
        ));
    }

    let address = get_nested(record, "address").cloned();

    let mut additional_info = serde_json::Map::new();
    for (key, value) in record {
        if key == "name" || key == "age" || key == "address" {
            continue;
        }
        additional_info.insert(key.clone(), value.clone());
    }

    Ok(UserEntity {
        name: format!("{} {}", first_name, last_name),
        age,
        address,
        additional_info: if additional_info.is_empty() {
            None
        } else {
            Some(Value::Object(additional_info))
        },
    })
}
