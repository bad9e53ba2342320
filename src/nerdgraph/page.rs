//! Typed access to a NerdGraph page container.
//!
//! Walks the query's container path through the `data` object, failing with
//! the offending dotted path when a node is missing or is not an object.
//! Inside the container the batch field itself is optional.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::nerdgraph::queries::PagedQuery;

/// One decoded page of a cursor-paginated query.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` once the last page is reached.
    pub next_cursor: Option<String>,
    pub total_count: Option<u64>,
    /// The container's `error` member, when the API reports one.
    pub error: Option<Value>,
}

/// Locate `query`'s container inside `data` and decode one page from it.
pub fn extract_page<T: DeserializeOwned>(data: &Value, query: &PagedQuery) -> Result<Page<T>, ApiError> {
    let container = walk(data, query.container_path)?;

    let batch = container
        .get("entities")
        .filter(|v| !v.is_null())
        .or_else(|| container.get("policies"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let items = batch
        .iter()
        .map(|item| {
            T::deserialize(item).map_err(|e| ApiError::Decode {
                endpoint: query.name.to_string(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<T>, _>>()?;

    let next_cursor = container
        .get("nextCursor")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let error = container.get("error").filter(|e| !e.is_null()).cloned();

    Ok(Page {
        items,
        next_cursor,
        total_count: container.get("totalCount").and_then(Value::as_u64),
        error,
    })
}

fn walk<'a>(data: &'a Value, path: &[&str]) -> Result<&'a serde_json::Map<String, Value>, ApiError> {
    let mut node = data.as_object().ok_or_else(|| ApiError::UnexpectedShape {
        path: "data".to_string(),
        reason: format!("expected an object, found {}", kind_of(data)),
    })?;

    for (depth, key) in path.iter().enumerate() {
        let dotted = path[..=depth].join(".");
        let next = node.get(*key).ok_or_else(|| ApiError::UnexpectedShape {
            path: dotted.clone(),
            reason: "field is missing".to_string(),
        })?;
        node = next.as_object().ok_or_else(|| ApiError::UnexpectedShape {
            path: dotted,
            reason: format!("expected an object, found {}", kind_of(next)),
        })?;
    }

    Ok(node)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
