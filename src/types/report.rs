use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::condition::{CompareOp, Logic};
use super::error::EvalError;
use super::path::NodePath;
use super::value::FactValue;

/// One node visited during a detailed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    path: NodePath,
    #[serde(flatten)]
    detail: TraceDetail,
}

impl TraceEvent {
    pub(crate) fn new(path: NodePath, detail: TraceDetail) -> Self {
        Self { path, detail }
    }

    #[must_use]
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    #[must_use]
    pub fn detail(&self) -> &TraceDetail {
        &self.detail
    }
}

/// What happened at one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceDetail {
    /// A group combined its children.
    Group { logic: Logic, passed: bool },
    /// A rule resolved both sides and compared them.
    Comparison {
        field: String,
        op: CompareOp,
        lhs: FactValue,
        rhs: FactValue,
        passed: bool,
    },
    /// A rule could not be resolved and folded to not-passed.
    Fault { error: EvalError },
}

impl fmt::Display for TraceDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group { logic, passed } => {
                write!(f, "{logic} group {}", pass_word(*passed))
            }
            Self::Comparison {
                field,
                op,
                lhs,
                rhs,
                passed,
            } => write!(f, "{field}: {lhs} {op} {rhs} {}", pass_word(*passed)),
            Self::Fault { error } => write!(f, "fault: {error}"),
        }
    }
}

fn pass_word(passed: bool) -> &'static str {
    if passed {
        "passed"
    } else {
        "failed"
    }
}

/// The outcome of [`evaluate_detailed`](crate::Condition::evaluate_detailed):
/// the overall verdict plus one event per node visited, in document order.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct EvalReport {
    passed: bool,
    events: Vec<TraceEvent>,
    duration: Duration,
}

impl EvalReport {
    pub(crate) fn new(passed: bool, events: Vec<TraceEvent>, duration: Duration) -> Self {
        Self {
            passed,
            events,
            duration,
        }
    }

    /// The verdict, identical to what [`evaluate`](crate::Condition::evaluate)
    /// returns for the same tree and facts.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The rules that could not be resolved, with their paths.
    pub fn faults(&self) -> impl Iterator<Item = (&NodePath, &EvalError)> {
        self.events.iter().filter_map(|event| match event.detail() {
            TraceDetail::Fault { error } => Some((event.path(), error)),
            _ => None,
        })
    }

    #[must_use]
    pub fn fault_count(&self) -> usize {
        self.faults().count()
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "condition {} ({} nodes, {} faults, {:?})",
            pass_word(self.passed),
            self.events.len(),
            self.fault_count(),
            self.duration,
        )?;
        for event in &self.events {
            writeln!(f, "  {}: {}", event.path(), event.detail())?;
        }
        Ok(())
    }
}
