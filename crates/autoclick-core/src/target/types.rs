use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a target context (a browser tab or equivalent).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The page the automation is pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub context_id: ContextId,
    pub origin_url: String,
}

impl Target {
    pub fn new(context_id: impl Into<ContextId>, origin_url: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            origin_url: origin_url.into(),
        }
    }
}

impl From<String> for ContextId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_id_is_transparent_on_the_wire() {
        let id = ContextId::new("tab-42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""tab-42""#);
    }

    #[test]
    fn test_target_serializes_camel_case() {
        let target = Target::new("tab-1", "https://example.com/queue");
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["contextId"], "tab-1");
        assert_eq!(json["originUrl"], "https://example.com/queue");
    }
}
