//! Deep merge for JSON store values

use serde_json::Value;

/// Merge `patch` into `target`.
///
/// Objects merge key by key, recursively. A `null` inside a patch object
/// removes that field. Any other patch value replaces the target outright.
pub fn merge_value(target: &mut Value, patch: Value) {
    match patch {
        Value::Object(patch_fields) => {
            if !target.is_object() {
                *target = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(fields) = target {
                for (name, value) in patch_fields {
                    if value.is_null() {
                        fields.remove(&name);
                    } else {
                        merge_value(fields.entry(name).or_insert(Value::Null), value);
                    }
                }
            }
        }
        other => *target = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_nested_objects() {
        let mut target = json!({"authToken": "tok", "errors": {"1": "first"}});
        merge_value(&mut target, json!({"errors": {"2": "second"}}));
        assert_eq!(
            target,
            json!({"authToken": "tok", "errors": {"1": "first", "2": "second"}})
        );
    }

    #[test]
    fn test_merge_into_missing_value() {
        let mut target = Value::Null;
        merge_value(&mut target, json!({"errors": {"1": "boom"}}));
        assert_eq!(target, json!({"errors": {"1": "boom"}}));
    }

    #[test]
    fn test_null_removes_field() {
        let mut target = json!({"isOffline": true, "shouldForceOffline": true});
        merge_value(&mut target, json!({"shouldForceOffline": null}));
        assert_eq!(target, json!({"isOffline": true}));
    }

    #[test]
    fn test_scalar_replaces() {
        let mut target = json!({"a": 1});
        merge_value(&mut target, json!(false));
        assert_eq!(target, json!(false));
    }
}
