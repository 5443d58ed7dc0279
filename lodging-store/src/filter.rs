use serde_json::Value;

use lodging_core::Identity;

/// A conjunction of `field = value` conditions.
///
/// A condition also matches when the stored field is an array holding the
/// value, so `Filter::eq("stay_days", 2)` matches `"stay_days": [1, 2]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
    excluded: Option<Identity>,
}

impl Filter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Leave the record with this identity out of the match set.
    pub fn excluding(mut self, id: Identity) -> Self {
        self.excluded = Some(id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.excluded.is_none()
    }

    pub fn matches(&self, record: &Value) -> bool {
        if let Some(excluded) = &self.excluded {
            if record.get("id").and_then(Value::as_str) == Some(excluded.to_string().as_str()) {
                return false;
            }
        }

        self.conditions
            .iter()
            .all(|(field, expected)| match record.get(field) {
                Some(Value::Array(items)) => items.contains(expected),
                Some(actual) => actual == expected,
                None => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_fields_match_by_equality() {
        let doc = json!({"room_id": "r1", "capacity": 2});

        assert!(Filter::eq("room_id", "r1").matches(&doc));
        assert!(!Filter::eq("room_id", "r2").matches(&doc));
        assert!(!Filter::eq("missing", "r1").matches(&doc));
        assert!(Filter::all().matches(&doc));
    }

    #[test]
    fn array_fields_match_on_membership() {
        let doc = json!({"room_id": "r1", "stay_days": [1, 3]});

        assert!(Filter::eq("stay_days", 1).matches(&doc));
        assert!(!Filter::eq("stay_days", 2).matches(&doc));
        assert!(Filter::eq("room_id", "r1").and_eq("stay_days", 3).matches(&doc));
        assert!(!Filter::eq("room_id", "r2").and_eq("stay_days", 3).matches(&doc));
    }

    #[test]
    fn excluded_record_never_matches() {
        let id = Identity::generate();
        let doc = json!({"id": id.to_string(), "room_id": "r1"});

        assert!(Filter::eq("room_id", "r1").matches(&doc));
        assert!(!Filter::eq("room_id", "r1").excluding(id).matches(&doc));
        assert!(Filter::eq("room_id", "r1")
            .excluding(Identity::generate())
            .matches(&doc));
    }
}
