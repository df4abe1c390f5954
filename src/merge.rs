//! Shallow and deep merging of JSON objects.

use crate::types::{Row, Value};

/// Copy every key of each source into `target`, later sources winning.
pub fn extend<'a>(target: &mut Row, sources: impl IntoIterator<Item = &'a Row>) {
    for source in sources {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
}

/// Like [`extend`], but when both sides hold an object under the same key the two objects are
/// merged recursively. Arrays and scalars are replaced.
pub fn deep_extend<'a>(target: &mut Row, sources: impl IntoIterator<Item = &'a Row>) {
    for source in sources {
        merge_into(target, source);
    }
}

fn merge_into(target: &mut Row, source: &Row) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => merge_into(existing, incoming),
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
