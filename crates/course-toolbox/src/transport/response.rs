//! Parsed mutation replies.

use serde_json::{Map, Value};

use crate::model::ItemId;

/// The server's reply to a mutation.
///
/// Only a handful of fields have meaning to the engine; anything else is kept
/// in `extra`. Parsing is lenient: a body that is not a JSON object yields an
/// empty, successful response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationResponse {
    /// Present when the server rejected the mutation.
    pub error: Option<String>,
    /// Authoritative item title.
    pub instancename: Option<String>,
    /// Items whose own visibility flips along with a section.
    pub resourcestotoggle: Vec<ItemId>,
    /// Rendered content of a newly created item.
    pub fullcontent: Option<String>,
    pub extra: Map<String, Value>,
}

impl MutationResponse {
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => Self::from_map(map),
            Ok(_) => {
                tracing::debug!(target: "course_toolbox::transport", "response is not an object, treating as empty");
                Self::default()
            }
            Err(e) => {
                if !body.trim().is_empty() {
                    tracing::debug!(target: "course_toolbox::transport", error = %e, "unparseable response, treating as empty");
                }
                Self::default()
            }
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let error = map.remove("error").and_then(|value| match value {
            Value::Null => None,
            Value::String(message) => Some(message),
            other => Some(other.to_string()),
        });
        let instancename = map
            .remove("instancename")
            .and_then(|v| v.as_str().map(str::to_string));
        let resourcestotoggle = match map.remove("resourcestotoggle") {
            Some(Value::Array(items)) => items.iter().filter_map(ItemId::from_json).collect(),
            _ => Vec::new(),
        };
        let fullcontent = map
            .remove("fullcontent")
            .and_then(|v| v.as_str().map(str::to_string));

        Self {
            error,
            instancename,
            resourcestotoggle,
            fullcontent,
            extra: map,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Whether `id` is listed in `resourcestotoggle`.
    pub fn toggles(&self, id: &ItemId) -> bool {
        self.resourcestotoggle.contains(id)
    }
}
