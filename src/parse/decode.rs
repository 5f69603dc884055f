use serde_json::{Map, Value};

use super::ParseError;
use crate::types::{
    ArithOp, CompareOp, Condition, Formula, Group, Literal, Logic, NodePath, Rhs, Rule, MAX_DEPTH,
};

/// Decode one node. `depth` is 1-based; a node past [`MAX_DEPTH`] is
/// rejected before its children are looked at.
pub(crate) fn decode(
    value: &Value,
    path: &NodePath,
    depth: usize,
) -> Result<Condition, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::MaxDepthExceeded {
            path: path.clone(),
            max: MAX_DEPTH,
        });
    }
    let Value::Object(object) = value else {
        return Err(ParseError::NotAnObject { path: path.clone() });
    };
    // a node carrying both keys reads as a group; "logic" wins
    if let Some(logic) = object.get("logic") {
        decode_group(logic, object, path, depth)
    } else if let Some(field) = object.get("field") {
        decode_rule(field, object, path)
    } else {
        Err(ParseError::UnknownShape { path: path.clone() })
    }
}

fn decode_group(
    logic: &Value,
    object: &Map<String, Value>,
    path: &NodePath,
    depth: usize,
) -> Result<Condition, ParseError> {
    let Value::String(token) = logic else {
        return Err(bad_value(path, "logic", "\"AND\" or \"OR\""));
    };
    let logic = Logic::from_token(token).ok_or_else(|| ParseError::BadOperator {
        path: path.clone(),
        op: token.clone(),
    })?;

    let items = match object.get("rules") {
        None => return Err(missing(path, "rules")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(bad_value(path, "rules", "an array")),
    };
    if items.is_empty() {
        return Err(ParseError::EmptyRules { path: path.clone() });
    }

    let rules = items
        .iter()
        .enumerate()
        .map(|(index, item)| decode(item, &path.child(index), depth + 1))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Condition::Group(Group { logic, rules }))
}

fn decode_rule(
    field: &Value,
    object: &Map<String, Value>,
    path: &NodePath,
) -> Result<Condition, ParseError> {
    let Value::String(field) = field else {
        return Err(bad_value(path, "field", "a string"));
    };

    let op = match object.get("operator") {
        None => return Err(missing(path, "operator")),
        Some(Value::String(token)) => {
            CompareOp::from_token(token).ok_or_else(|| ParseError::BadOperator {
                path: path.clone(),
                op: token.clone(),
            })?
        }
        Some(_) => return Err(bad_value(path, "operator", "a string")),
    };

    // presence is keyed on the JSON key existing; an explicit null is
    // present but decodes as a bad value
    let rhs = match (object.get("value"), object.get("formula")) {
        (Some(_), Some(_)) => {
            return Err(ParseError::BothValueAndFormula { path: path.clone() })
        }
        (None, None) => {
            return Err(ParseError::NeitherValueNorFormula { path: path.clone() })
        }
        (Some(value), None) => Rhs::Literal(decode_literal(value, path)?),
        (None, Some(formula)) => Rhs::Formula(decode_formula(formula, path)?),
    };

    Ok(Condition::Rule(Rule {
        field: field.clone(),
        op,
        rhs,
    }))
}

fn decode_literal(value: &Value, path: &NodePath) -> Result<Literal, ParseError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(Literal::Number)
            .ok_or_else(|| bad_value(path, "value", "a number, boolean, or string")),
        Value::Bool(b) => Ok(Literal::Bool(*b)),
        Value::String(s) => Ok(Literal::Text(s.clone())),
        _ => Err(bad_value(path, "value", "a number, boolean, or string")),
    }
}

fn decode_formula(value: &Value, path: &NodePath) -> Result<Formula, ParseError> {
    let Value::Object(object) = value else {
        return Err(bad_value(path, "formula", "an object"));
    };

    let base = match object.get("base") {
        None => return Err(missing(path, "base")),
        Some(Value::String(base)) => base.clone(),
        Some(_) => return Err(bad_value(path, "base", "a string")),
    };

    let op = match object.get("operator") {
        None => return Err(missing(path, "operator")),
        Some(Value::String(token)) => {
            ArithOp::from_token(token).ok_or_else(|| ParseError::BadOperator {
                path: path.clone(),
                op: token.clone(),
            })?
        }
        Some(_) => return Err(bad_value(path, "operator", "a string")),
    };

    let percent = match object.get("percent") {
        None => return Err(missing(path, "percent")),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| bad_value(path, "percent", "a number"))?,
        Some(_) => return Err(bad_value(path, "percent", "a number")),
    };

    Ok(Formula { base, op, percent })
}

fn missing(path: &NodePath, name: &'static str) -> ParseError {
    ParseError::MissingField {
        path: path.clone(),
        name,
    }
}

fn bad_value(path: &NodePath, name: &'static str, expected: &'static str) -> ParseError {
    ParseError::BadValue {
        path: path.clone(),
        name,
        expected,
    }
}
