//! ArchieML (AML) parsing.
//!
//! Supported subset:
//!
//! - `key: value`, with dot paths (`a.b: value`) creating nested objects
//! - `{scope}` to write keys under `scope`, `{}` to return to the root
//! - `[array]` ... `[]` holding either `* item` strings or objects (a repeated key starts the
//!   next object)
//! - `[+array]` freeform arrays: `key: value` lines become `{"type": key, "value": value}` and
//!   plain text lines become `{"type": "text", "value": line}`
//! - multi-line values: text lines after `key: value` are kept only if closed by `:end`
//! - `:skip` ... `:endskip`, `:ignore` (stop parsing), and a leading `\` to escape a line
//!
//! Anything else is ignored. Parsing never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Map;

use crate::types::Value;

static COMMAND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*:[ \t]*(endskip|ignore|skip|end)").expect("valid regex"));
static SCOPE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{\s*\.?([A-Za-z0-9_.\-]*)\s*\}").expect("valid regex"));
static ARRAY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[\s*(\+)?\.?([A-Za-z0-9_.\-]*)\s*\]").expect("valid regex"));
static KEY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_.\-]+)[ \t]*:[ \t]*(.*)$").expect("valid regex"));
static ITEM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*[ \t]*(.*)$").expect("valid regex"));

/// Parse AML text into an object. Empty input yields `{}`.
pub fn parse_aml(text: &str) -> Value {
    let mut parser = AmlParser::default();
    for line in text.lines() {
        if !parser.feed(line) {
            break;
        }
    }
    Value::Object(parser.root)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayKind {
    Undecided,
    Strings,
    Objects,
    Freeform,
}

#[derive(Debug)]
struct ArrayState {
    path: Vec<String>,
    kind: ArrayKind,
}

/// Where the most recent value was written, so `:end` can replace it.
#[derive(Debug)]
enum Slot {
    Key(Vec<String>),
    Element {
        array: Vec<String>,
        index: usize,
        key: Option<Vec<String>>,
    },
}

#[derive(Debug)]
struct Pending {
    slot: Slot,
    first: String,
    buffer: Vec<String>,
}

#[derive(Debug, Default)]
struct AmlParser {
    root: Map<String, Value>,
    scope: Vec<String>,
    array: Option<ArrayState>,
    pending: Option<Pending>,
    skipping: bool,
}

impl AmlParser {
    /// Process one line. Returns `false` once `:ignore` is reached.
    fn feed(&mut self, line: &str) -> bool {
        if let Some(caps) = COMMAND_LINE.captures(line) {
            match caps[1].to_ascii_lowercase().as_str() {
                "ignore" => return false,
                "skip" => {
                    self.skipping = true;
                    self.pending = None;
                }
                "endskip" => self.skipping = false,
                _ if !self.skipping => self.close_multiline(),
                _ => {}
            }
            return true;
        }
        if self.skipping {
            return true;
        }

        if let Some(caps) = SCOPE_LINE.captures(line) {
            self.pending = None;
            self.array = None;
            self.scope = split_path(&caps[1]);
        } else if let Some(caps) = ARRAY_LINE.captures(line) {
            self.pending = None;
            let path = split_path(&caps[2]);
            if path.is_empty() {
                self.array = None;
            } else {
                set_in(&mut self.root, &path, Value::Array(Vec::new()));
                let kind = if caps.get(1).is_some() {
                    ArrayKind::Freeform
                } else {
                    ArrayKind::Undecided
                };
                self.array = Some(ArrayState { path, kind });
            }
        } else if let Some(caps) = KEY_LINE.captures(line) {
            self.key_value(&caps[1], caps[2].trim());
        } else if let Some(caps) = ITEM_LINE
            .captures(line)
            .filter(|_| self.accepts_items())
        {
            self.item(caps[1].trim());
        } else {
            self.text(line);
        }
        true
    }

    fn accepts_items(&self) -> bool {
        matches!(
            self.array.as_ref().map(|a| a.kind),
            Some(ArrayKind::Undecided | ArrayKind::Strings)
        )
    }

    fn key_value(&mut self, key: &str, value: &str) {
        let key_path = split_path(key);
        self.pending = None;

        let Some(array) = self.array.as_mut() else {
            let mut path = self.scope.clone();
            path.extend(key_path);
            set_in(&mut self.root, &path, Value::String(value.to_owned()));
            self.pending = Some(Pending {
                slot: Slot::Key(path),
                first: value.to_owned(),
                buffer: Vec::new(),
            });
            return;
        };

        match array.kind {
            ArrayKind::Strings => {}
            ArrayKind::Freeform => {
                let items = array_at(&mut self.root, &array.path);
                let mut entry = Map::new();
                entry.insert("type".to_owned(), Value::String(key.to_owned()));
                entry.insert("value".to_owned(), Value::String(value.to_owned()));
                items.push(Value::Object(entry));
            }
            ArrayKind::Undecided | ArrayKind::Objects => {
                array.kind = ArrayKind::Objects;
                let items = array_at(&mut self.root, &array.path);
                let starts_new = match items.last() {
                    Some(Value::Object(obj)) => get_in(obj, &key_path).is_some(),
                    _ => true,
                };
                if starts_new {
                    items.push(Value::Object(Map::new()));
                }
                let index = items.len() - 1;
                if let Some(Value::Object(obj)) = items.last_mut() {
                    set_in(obj, &key_path, Value::String(value.to_owned()));
                }
                self.pending = Some(Pending {
                    slot: Slot::Element {
                        array: array.path.clone(),
                        index,
                        key: Some(key_path),
                    },
                    first: value.to_owned(),
                    buffer: Vec::new(),
                });
            }
        }
    }

    fn item(&mut self, value: &str) {
        let Some(array) = self.array.as_mut() else {
            return;
        };
        array.kind = ArrayKind::Strings;
        let items = array_at(&mut self.root, &array.path);
        items.push(Value::String(value.to_owned()));
        self.pending = Some(Pending {
            slot: Slot::Element {
                array: array.path.clone(),
                index: items.len() - 1,
                key: None,
            },
            first: value.to_owned(),
            buffer: Vec::new(),
        });
    }

    fn text(&mut self, line: &str) {
        let line = unescape(line);
        if let Some(array) = self.array.as_ref().filter(|a| a.kind == ArrayKind::Freeform) {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                let mut entry = Map::new();
                entry.insert("type".to_owned(), Value::String("text".to_owned()));
                entry.insert("value".to_owned(), Value::String(trimmed.to_owned()));
                array_at(&mut self.root, &array.path).push(Value::Object(entry));
            }
            return;
        }
        if let Some(pending) = self.pending.as_mut() {
            pending.buffer.push(line.to_owned());
        }
    }

    fn close_multiline(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let joined = format!("{}\n{}", pending.first, pending.buffer.join("\n"));
        let value = Value::String(joined.trim().to_owned());
        match pending.slot {
            Slot::Key(path) => set_in(&mut self.root, &path, value),
            Slot::Element { array, index, key } => {
                let items = array_at(&mut self.root, &array);
                match (items.get_mut(index), key) {
                    (Some(item), None) => *item = value,
                    (Some(Value::Object(obj)), Some(key)) => set_in(obj, &key, value),
                    _ => {}
                }
            }
        }
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('.')
        .filter(|seg| !seg.is_empty())
        .map(str::to_owned)
        .collect()
}

fn unescape(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed.strip_prefix('\\').unwrap_or(line)
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("slot was just replaced with an object"),
    }
}

fn object_at<'a>(root: &'a mut Map<String, Value>, path: &[String]) -> &'a mut Map<String, Value> {
    path.iter().fold(root, |cur, seg| {
        ensure_object(cur.entry(seg.clone()).or_insert(Value::Null))
    })
}

fn array_at<'a>(root: &'a mut Map<String, Value>, path: &[String]) -> &'a mut Vec<Value> {
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => unreachable!("array paths are never empty"),
    };
    let slot = object_at(root, parents)
        .entry(last.clone())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => items,
        _ => unreachable!("slot was just replaced with an array"),
    }
}

fn set_in(root: &mut Map<String, Value>, path: &[String], value: Value) {
    if let Some((last, parents)) = path.split_last() {
        object_at(root, parents).insert(last.clone(), value);
    }
}

fn get_in<'a>(root: &'a Map<String, Value>, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(root.get(first)?, |cur, seg| cur.as_object()?.get(seg))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn freeform_array_of_paragraphs() {
        let text = "[+text]\nI can type words here...\n\nAnd separate them into different paragraphs without tags.\n[]\n";
        assert_eq!(
            parse_aml(text).to_string(),
            r#"{"text":[{"type":"text","value":"I can type words here..."},{"type":"text","value":"And separate them into different paragraphs without tags."}]}"#
        );
    }

    #[test]
    fn empty_input_is_empty_object() {
        assert_eq!(parse_aml(""), json!({}));
    }

    #[test]
    fn keys_scopes_and_dot_paths() {
        let text = "title: Hello\n{meta}\nauthor.name: Jim\ndate: today\n{}\nend: yes\n";
        assert_eq!(
            parse_aml(text),
            json!({
                "title": "Hello",
                "meta": {"author": {"name": "Jim"}, "date": "today"},
                "end": "yes",
            })
        );
    }

    #[test]
    fn string_and_object_arrays() {
        let text = "[tags]\n* one\n* two\n[]\n[people]\nname: Jim\nage: 70\nname: Francis\n[]\n";
        assert_eq!(
            parse_aml(text),
            json!({
                "tags": ["one", "two"],
                "people": [{"name": "Jim", "age": "70"}, {"name": "Francis"}],
            })
        );
    }

    #[test]
    fn multiline_values_need_end() {
        let kept = parse_aml("body: first\nsecond\n\\:not a command\n:end\n");
        assert_eq!(kept, json!({"body": "first\nsecond\n:not a command"}));

        let dropped = parse_aml("body: first\nsecond\nother: x\n");
        assert_eq!(dropped, json!({"body": "first", "other": "x"}));
    }

    #[test]
    fn skip_and_ignore() {
        let text = "a: 1\n:skip\nb: 2\n:endskip\nc: 3\n:ignore\nd: 4\n";
        assert_eq!(parse_aml(text), json!({"a": "1", "c": "3"}));
    }

    #[test]
    fn freeform_keys_keep_their_type() {
        let text = "[+body]\nimage: cat.png\nA caption.\n[]\n";
        assert_eq!(
            parse_aml(text),
            json!({"body": [
                {"type": "image", "value": "cat.png"},
                {"type": "text", "value": "A caption."},
            ]})
        );
    }
}
