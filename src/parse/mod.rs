mod decode;
mod encode;
mod error;

pub use error::ParseError;

use serde_json::Value;

use crate::types::{Condition, NodePath};

pub(crate) fn from_json(input: &str) -> Result<Condition, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(&value)
}

pub(crate) fn from_value(value: &Value) -> Result<Condition, ParseError> {
    // storage rows written through two stringify passes arrive as a JSON
    // string holding the document; unwrap exactly one level
    if let Value::String(inner) = value {
        let inner: Value = serde_json::from_str(inner)?;
        if matches!(inner, Value::String(_)) {
            return Err(ParseError::NotAnObject {
                path: NodePath::root(),
            });
        }
        return decode::decode(&inner, &NodePath::root(), 1);
    }
    decode::decode(value, &NodePath::root(), 1)
}

pub(crate) fn to_value(condition: &Condition) -> Value {
    encode::to_value(condition)
}

pub(crate) fn to_json(condition: &Condition) -> String {
    encode::to_value(condition).to_string()
}
