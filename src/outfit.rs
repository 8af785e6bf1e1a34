//! Default outfit table applied at startup.

use bevy::platform::collections::HashMap;

/// Default variant code per category.
///
/// Categories without an override use [`DefaultOutfit::default_code`]. The
/// stock table numbers most parts from `"1"` but names faces `A1`, `A2`, ...
#[derive(Debug, Clone)]
pub struct DefaultOutfit {
    pub default_code: String,
    pub overrides: HashMap<String, String>,
}

impl Default for DefaultOutfit {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert("Face".to_string(), "A1".to_string());
        Self {
            default_code: "1".to_string(),
            overrides,
        }
    }
}

impl DefaultOutfit {
    /// A table with no overrides.
    pub fn uniform(default_code: impl Into<String>) -> Self {
        Self {
            default_code: default_code.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, category: impl Into<String>, code: impl Into<String>) -> Self {
        self.overrides.insert(category.into(), code.into());
        self
    }

    pub fn code_for(&self, category: &str) -> &str {
        self.overrides
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default_code)
    }
}
