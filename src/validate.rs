//! Semantic checks against a field vocabulary.
//!
//! The wire codec already guarantees shape; this layer decides whether a
//! structurally sound tree is *sensible*: fields exist, operators fit the
//! field's type, values parse and sit in range, formulas reference numeric
//! bases. Every problem is collected, none aborts the walk.

use crate::types::{
    Condition, FieldSpec, FieldTable, FieldType, Formula, Literal, NodePath, Rhs, Rule,
    ValidationErrors, ValidationIssue, MAX_DEPTH,
};

pub(crate) fn validate(
    condition: &Condition,
    fields: &FieldTable,
) -> Result<(), ValidationErrors> {
    let mut issues = Vec::new();
    if !condition.is_group() {
        push(&mut issues, &NodePath::root(), "Root logic is required");
    }
    walk(condition, fields, &NodePath::root(), 1, &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(issues))
    }
}

fn walk(
    node: &Condition,
    fields: &FieldTable,
    path: &NodePath,
    depth: usize,
    issues: &mut Vec<ValidationIssue>,
) {
    if depth > MAX_DEPTH {
        push(
            issues,
            path,
            format!("Conditions cannot nest deeper than {MAX_DEPTH} levels"),
        );
        return;
    }
    match node {
        Condition::Group(group) => {
            if group.rules.is_empty() {
                push(issues, path, "At least one rule is required");
            }
            for (index, child) in group.rules.iter().enumerate() {
                walk(child, fields, &path.child(index), depth + 1, issues);
            }
        }
        Condition::Rule(rule) => check_rule(rule, fields, path, issues),
    }
}

fn check_rule(rule: &Rule, fields: &FieldTable, path: &NodePath, issues: &mut Vec<ValidationIssue>) {
    let spec = if rule.field.is_empty() {
        push(issues, path, "Field is required");
        None
    } else {
        match fields.get(&rule.field) {
            None => {
                push(issues, path, format!("Unknown field '{}'", rule.field));
                None
            }
            Some(spec) => {
                if spec.is_baseline_only() {
                    push(
                        issues,
                        path,
                        format!("'{}' can only be used as a formula base", rule.field),
                    );
                }
                Some(spec)
            }
        }
    };

    let is_bool_field = spec.is_some_and(|s| s.field_type() == FieldType::Boolean);
    if is_bool_field && rule.op.is_ordering() {
        push(issues, path, "Only = and != can be used with yes/no fields");
    }

    match &rule.rhs {
        Rhs::Literal(literal) => check_literal(literal, spec, path, issues),
        Rhs::Formula(formula) => {
            if is_bool_field {
                push(
                    issues,
                    path,
                    "Only numeric fields can be compared against a formula",
                );
            }
            check_formula(formula, fields, path, issues);
        }
    }
}

fn check_literal(
    literal: &Literal,
    spec: Option<&FieldSpec>,
    path: &NodePath,
    issues: &mut Vec<ValidationIssue>,
) {
    if spec.is_some_and(|s| s.field_type() == FieldType::Boolean) {
        if !matches!(literal, Literal::Bool(_)) {
            push(issues, path, "Value must be true or false");
        }
        return;
    }

    let number = match literal {
        Literal::Bool(_) => {
            push(issues, path, "Value must be a valid number");
            return;
        }
        Literal::Text(text) if text.trim().is_empty() => {
            push(issues, path, "Value is required");
            return;
        }
        _ => literal.as_number(),
    };

    match number {
        Some(n) if n.is_finite() => {
            if let Some(spec) = spec {
                check_range(n, spec, path, issues);
            }
        }
        _ => push(issues, path, "Value must be a valid number"),
    }
}

fn check_range(n: f64, spec: &FieldSpec, path: &NodePath, issues: &mut Vec<ValidationIssue>) {
    match (spec.min(), spec.max()) {
        (Some(min), Some(max)) if n < min || n > max => {
            push(
                issues,
                path,
                format!("{} must be between {min} and {max}", spec.label()),
            );
        }
        (Some(min), None) if n < min => {
            push(issues, path, format!("{} must be at least {min}", spec.label()));
        }
        (None, Some(max)) if n > max => {
            push(issues, path, format!("{} must be at most {max}", spec.label()));
        }
        _ => {}
    }
}

fn check_formula(
    formula: &Formula,
    fields: &FieldTable,
    path: &NodePath,
    issues: &mut Vec<ValidationIssue>,
) {
    if formula.base.is_empty() {
        push(issues, path, "Formula base is required");
    } else {
        match fields.get(&formula.base) {
            None => push(
                issues,
                path,
                format!("Unknown formula base '{}'", formula.base),
            ),
            Some(spec) if spec.field_type() == FieldType::Boolean => {
                push(issues, path, "Formula base must be a numeric field");
            }
            Some(_) => {}
        }
    }

    if !formula.percent.is_finite() {
        push(issues, path, "Percent must be a valid number");
    } else if !(0.0..=1.0).contains(&formula.percent) {
        push(issues, path, "Percent must be between 0 and 1");
    }
}

fn push(issues: &mut Vec<ValidationIssue>, path: &NodePath, message: impl Into<String>) {
    issues.push(ValidationIssue::new(path.clone(), message));
}
