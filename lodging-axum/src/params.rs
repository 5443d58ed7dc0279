use std::collections::HashMap;

use axum::http::HeaderMap;

/// Transport details handed to services as params.
#[derive(Debug, Clone, Default)]
pub struct RestParams {
    pub provider: String,
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
}

impl RestParams {
    pub fn from_parts(provider: &str, headers: &HeaderMap, query: HashMap<String, String>) -> Self {
        let headers = headers
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        Self {
            provider: provider.to_string(),
            headers,
            query,
        }
    }

    /// A query value, treating `?key=` the same as an absent key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

pub trait FromRestParams: Sized {
    fn from_rest_params(params: RestParams) -> Self;
}

impl FromRestParams for RestParams {
    fn from_rest_params(params: RestParams) -> Self {
        params
    }
}

impl FromRestParams for () {
    fn from_rest_params(_params: RestParams) -> Self {}
}
