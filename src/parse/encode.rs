use serde_json::{json, Map, Number, Value};

use crate::types::{Condition, Literal, Rhs};

/// Largest integer f64 represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_991.0;

pub(crate) fn to_value(condition: &Condition) -> Value {
    match condition {
        Condition::Group(group) => {
            let rules: Vec<Value> = group.rules.iter().map(to_value).collect();
            json!({ "logic": group.logic.token(), "rules": rules })
        }
        Condition::Rule(rule) => {
            let mut object = Map::new();
            object.insert("field".to_owned(), Value::String(rule.field.clone()));
            object.insert(
                "operator".to_owned(),
                Value::String(rule.op.token().to_owned()),
            );
            match &rule.rhs {
                Rhs::Literal(literal) => {
                    object.insert("value".to_owned(), encode_literal(literal));
                }
                Rhs::Formula(formula) => {
                    object.insert(
                        "formula".to_owned(),
                        json!({
                            "base": formula.base,
                            "operator": formula.op.token(),
                            "percent": encode_number(formula.percent),
                        }),
                    );
                }
            }
            Value::Object(object)
        }
    }
}

fn encode_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => encode_number(*n),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Text(s) => Value::String(s.clone()),
    }
}

/// Whole numbers encode as JSON integers so stored documents stay
/// diff-friendly; non-finite values have no JSON form and become null.
#[allow(clippy::cast_possible_truncation)]
fn encode_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}
