//! # Configuration
//!
//! A string key/value store on the app, mirroring Feathers'
//! `app.set()` / `app.get()`.
//!
//! ```rust
//! use lodging_core::LodgingApp;
//! let app = LodgingApp::<(), ()>::new();
//!
//! app.set("http.port", "8000");
//! assert_eq!(app.get("http.port"), Some("8000".to_string()));
//! ```
//!
//! Environment overrides use a prefix and `__` as the key separator:
//! `RETREAT__HTTP__PORT=9000` becomes `http.port = 9000`.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct LodgingConfig {
    values: HashMap<String, String>,
}

impl LodgingConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Apply every `(key, value)` whose key starts with `prefix`.
    ///
    /// Returns how many keys were applied.
    pub fn merge_prefixed<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                if stripped.is_empty() {
                    continue;
                }
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.values.insert(normalized, value);
                applied += 1;
            }
        }
        applied
    }

    pub fn snapshot(&self) -> LodgingConfigSnapshot {
        LodgingConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only copy of the config handed to hooks.
#[derive(Debug, Clone, Default)]
pub struct LodgingConfigSnapshot {
    map: HashMap<String, String>,
}

impl LodgingConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_vars_become_dotted_keys() {
        let mut cfg = LodgingConfig::new();
        cfg.set("http.port", "8000");

        let applied = cfg.merge_prefixed(
            "RETREAT__",
            vec![
                ("RETREAT__HTTP__PORT".to_string(), "9000".to_string()),
                ("RETREAT__".to_string(), "ignored".to_string()),
                ("PATH".to_string(), "/usr/bin".to_string()),
            ],
        );

        assert_eq!(applied, 1);
        assert_eq!(cfg.get("http.port"), Some("9000"));
        assert_eq!(cfg.get("path"), None);
        assert_eq!(cfg.snapshot().get("http.port"), Some("9000"));
    }
}
