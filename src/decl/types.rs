//! Type guessing for literal default values.

use crate::eval::Value;

/// Maps a literal to an RBS type name. Anything non-literal (opaque
/// fragments, constant references) is `untyped`; containers union their
/// element types unless an `untyped` element poisons the union.
pub fn guess_type(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Int(_) => "::Integer".to_string(),
        Value::Float(_) => "::Float".to_string(),
        Value::Str(_) => "::String".to_string(),
        Value::Sym(_) => "::Symbol".to_string(),
        Value::Array(items) => {
            if items.is_empty() {
                return "::Array[untyped]".to_string();
            }
            let union = union_of(items.iter());
            match union {
                Some(inner) => format!("::Array[{inner}]"),
                None => "::Array[untyped]".to_string(),
            }
        }
        Value::Hash(pairs) => {
            if pairs.is_empty() {
                return "::Hash[untyped, untyped]".to_string();
            }
            let keys = union_of(pairs.iter().map(|(k, _)| k)).unwrap_or_else(|| "untyped".into());
            let values = union_of(pairs.iter().map(|(_, v)| v)).unwrap_or_else(|| "untyped".into());
            format!("::Hash[{keys}, {values}]")
        }
        Value::Namespace(_) | Value::Opaque(_) => "untyped".to_string(),
    }
}

/// De-duplicated union of guessed element types; `None` when the union is
/// poisoned by an `untyped` member.
fn union_of<'a>(values: impl Iterator<Item = &'a Value>) -> Option<String> {
    let mut names: Vec<String> = Vec::new();
    for value in values {
        let name = guess_type(value);
        if name == "untyped" {
            return None;
        }
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Some(names.join(" | "))
}
