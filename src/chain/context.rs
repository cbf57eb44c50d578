use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

/// Key/value store threading runtime-produced values between the steps of
/// one chain run.
///
/// Owned exclusively by the runner for the duration of the run and dropped
/// when the chain completes; never shared across chains. Keys are written
/// once by convention; overwriting is allowed for explicit re-derivation
/// (e.g. refreshing `postId` later in a long chain) and is logged.
#[derive(Debug, Clone, Default)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(previous) = self.values.insert(key.clone(), value) {
            debug!(%key, %previous, "context key overwritten");
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn set_and_get() {
        let mut context = Context::new();
        context.set("postId", json!(101));

        assert_eq!(context.get("postId"), Some(&json!(101)));
        assert!(context.contains("postId"));
        assert_eq!(context.get("missing"), None);
    }

    #[test]
    fn overwrite_replaces_value() {
        let mut context = Context::new();
        context.set("postId", json!(101));
        context.set("postId", json!(102));

        assert_eq!(context.get("postId"), Some(&json!(102)));
        assert_eq!(context.len(), 1);
    }
}
