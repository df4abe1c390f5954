//! JSON parsing with an optional reviver.

use crate::error::{DataIoError, DataIoResult};
use crate::transform::ReviverFn;
use crate::types::Value;

/// Parse JSON text, then run `reviver` (if any) over the result.
///
/// The reviver is applied bottom-up: children are revived before their parent, object members
/// receive their key, array elements their index, and the root receives `""`.
pub fn parse_json(text: &str, reviver: Option<&ReviverFn>) -> DataIoResult<Value> {
    let value: Value = serde_json::from_str(text)?;
    match reviver {
        Some(f) => revive(f, "", value),
        None => Ok(value),
    }
}

fn revive(f: &ReviverFn, key: &str, value: Value) -> DataIoResult<Value> {
    let value = match value {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let v = revive(f, &k, v)?;
                out.insert(k, v);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| revive(f, &i.to_string(), v))
                .collect::<DataIoResult<Vec<_>>>()?,
        ),
        scalar => scalar,
    };
    f(key, value).map_err(DataIoError::Transform)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::TransformError;

    fn double_numbers(_key: &str, v: Value) -> Result<Value, TransformError> {
        Ok(match v.as_i64() {
            Some(n) => json!(n * 2),
            None => v,
        })
    }

    #[test]
    fn reviver_doubles_numeric_fields() {
        let out = parse_json(
            r#"[{"name":"jim","height":70},{"name":"francis","height":63}]"#,
            Some(&double_numbers),
        )
        .unwrap();
        assert_eq!(
            out.to_string(),
            r#"[{"name":"jim","height":140},{"name":"francis","height":126}]"#
        );
    }

    #[test]
    fn reviver_sees_keys_indices_and_root() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let record = move |key: &str, v: Value| -> Result<Value, TransformError> {
            sink.lock().unwrap().push(key.to_string());
            Ok(v)
        };
        parse_json(r#"{"a":[1,2],"b":{"c":true}}"#, Some(&record)).unwrap();
        assert_eq!(*seen.lock().unwrap(), ["0", "1", "a", "c", "b", ""]);
    }

    #[test]
    fn malformed_json_reports_position() {
        let err = parse_json("{ wrong: }", None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("json error:"));
        assert!(msg.contains("line 1 column 3"), "{msg}");
    }
}
