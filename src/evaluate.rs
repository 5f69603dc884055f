use std::time::Instant;

use crate::types::{
    ArithOp, Condition, EvalError, EvalReport, FactSet, FactValue, Formula, Group, Literal, Logic,
    NodePath, Rhs, Rule, TraceDetail, TraceEvent,
};

pub(crate) fn evaluate(condition: &Condition, facts: &FactSet) -> bool {
    Walker::lenient(facts)
        .node(condition, &NodePath::root())
        .unwrap_or(false)
}

pub(crate) fn try_evaluate(condition: &Condition, facts: &FactSet) -> Result<bool, EvalError> {
    Walker::strict(facts).node(condition, &NodePath::root())
}

pub(crate) fn evaluate_detailed(condition: &Condition, facts: &FactSet) -> EvalReport {
    let start = Instant::now();
    let mut walker = Walker::traced(facts);
    let passed = walker
        .node(condition, &NodePath::root())
        .unwrap_or(false);
    EvalReport::new(passed, walker.trace.unwrap_or_default(), start.elapsed())
}

struct Walker<'a> {
    facts: &'a FactSet,
    strict: bool,
    trace: Option<Vec<TraceEvent>>,
}

impl<'a> Walker<'a> {
    fn lenient(facts: &'a FactSet) -> Self {
        Self {
            facts,
            strict: false,
            trace: None,
        }
    }

    fn strict(facts: &'a FactSet) -> Self {
        Self {
            facts,
            strict: true,
            trace: None,
        }
    }

    fn traced(facts: &'a FactSet) -> Self {
        Self {
            facts,
            strict: false,
            trace: Some(Vec::new()),
        }
    }

    fn node(&mut self, node: &Condition, path: &NodePath) -> Result<bool, EvalError> {
        match node {
            Condition::Group(group) => self.group(group, path),
            Condition::Rule(rule) => self.rule(rule, path),
        }
    }

    // Every child runs; no short-circuit. Traces cover the whole tree and
    // strict mode reports the first fault in document order.
    fn group(&mut self, group: &Group, path: &NodePath) -> Result<bool, EvalError> {
        let mark = self.trace.as_ref().map_or(0, Vec::len);
        let mut passed = matches!(group.logic, Logic::And);
        for (index, child) in group.rules.iter().enumerate() {
            let child_passed = self.node(child, &path.child(index))?;
            passed = match group.logic {
                Logic::And => passed && child_passed,
                Logic::Or => passed || child_passed,
            };
        }
        if let Some(events) = self.trace.as_mut() {
            let detail = TraceDetail::Group {
                logic: group.logic,
                passed,
            };
            events.insert(mark, TraceEvent::new(path.clone(), detail));
        }
        Ok(passed)
    }

    fn rule(&mut self, rule: &Rule, path: &NodePath) -> Result<bool, EvalError> {
        match self.compare(rule) {
            Ok((lhs, rhs, passed)) => {
                self.record(path, || TraceDetail::Comparison {
                    field: rule.field.clone(),
                    op: rule.op,
                    lhs,
                    rhs,
                    passed,
                });
                Ok(passed)
            }
            Err(fault) if self.strict => Err(fault),
            Err(fault) => {
                tracing::debug!(
                    field = rule.field.as_str(),
                    path = %path,
                    error = %fault,
                    "rule could not be resolved; treating as not passed"
                );
                self.record(path, || TraceDetail::Fault { error: fault });
                Ok(false)
            }
        }
    }

    fn compare(&self, rule: &Rule) -> Result<(FactValue, FactValue, bool), EvalError> {
        match &rule.rhs {
            Rhs::Formula(formula) => {
                // formula faults win over a missing subject fact
                let rhs = FactValue::Number(self.apply_formula(formula)?);
                let lhs = self.fact(&rule.field)?;
                Ok((lhs, rhs, lhs.compare(rule.op, rhs)?))
            }
            Rhs::Literal(literal) => {
                let lhs = self.fact(&rule.field)?;
                let rhs = literal_value(literal)?;
                Ok((lhs, rhs, lhs.compare(rule.op, rhs)?))
            }
        }
    }

    fn apply_formula(&self, formula: &Formula) -> Result<f64, EvalError> {
        let base = match self.fact(&formula.base)? {
            FactValue::Number(n) => n,
            FactValue::Bool(_) => {
                return Err(EvalError::Arithmetic(format!(
                    "formula base '{}' is not a number",
                    formula.base
                )))
            }
        };
        if formula.op == ArithOp::Div && formula.percent == 0.0 {
            return Err(EvalError::Arithmetic(format!(
                "division by zero: {} / 0",
                formula.base
            )));
        }
        let result = formula.op.apply(base, formula.percent);
        if result.is_finite() {
            Ok(result)
        } else {
            Err(EvalError::Arithmetic(format!(
                "'{} {} {}' is not a finite number",
                formula.base, formula.op, formula.percent
            )))
        }
    }

    fn fact(&self, field: &str) -> Result<FactValue, EvalError> {
        self.facts
            .get(field)
            .ok_or_else(|| EvalError::MissingFact(field.to_owned()))
    }

    fn record(&mut self, path: &NodePath, detail: impl FnOnce() -> TraceDetail) {
        if let Some(events) = self.trace.as_mut() {
            events.push(TraceEvent::new(path.clone(), detail()));
        }
    }
}

fn literal_value(literal: &Literal) -> Result<FactValue, EvalError> {
    match literal {
        Literal::Number(n) => Ok(FactValue::Number(*n)),
        Literal::Bool(b) => Ok(FactValue::Bool(*b)),
        Literal::Text(text) => literal.as_number().map(FactValue::Number).ok_or_else(|| {
            EvalError::InvalidComparison(format!("value '{text}' is not a number"))
        }),
    }
}
