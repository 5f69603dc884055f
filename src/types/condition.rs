use std::fmt;

use serde::Serialize;

use super::error::{EvalError, ValidationErrors};
use super::facts::FactSet;
use super::fields::FieldTable;
use super::path::NodePath;
use super::report::EvalReport;
use crate::parse::ParseError;

/// Nesting limit for condition trees, counted in node levels from the root.
///
/// The wire decoder rejects deeper documents and the validator stops
/// descending past it, so no code path recurses unboundedly.
pub const MAX_DEPTH: usize = 16;

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Logic {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Logic {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Comparison applied between a fact and a rule's right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
}

impl CompareOp {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Neq => "!=",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            ">=" => Some(Self::Gte),
            "<=" => Some(Self::Lte),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            "=" => Some(Self::Eq),
            "!=" => Some(Self::Neq),
            _ => None,
        }
    }

    /// True for `>`, `>=`, `<`, `<=`; false for `=` and `!=`.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Arithmetic applied to a formula base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArithOp {
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
}

impl ArithOp {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Add => "+",
            Self::Sub => "-",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            _ => None,
        }
    }

    pub(crate) fn apply(self, base: f64, percent: f64) -> f64 {
        match self {
            Self::Mul => base * percent,
            Self::Div => base / percent,
            Self::Add => base + percent,
            Self::Sub => base - percent,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A derived threshold computed from another field at evaluation time,
/// e.g. "80% of the baseline cigarette count".
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub base: String,
    pub op: ArithOp,
    pub percent: f64,
}

impl Formula {
    #[must_use]
    pub fn new(base: impl Into<String>, op: ArithOp, percent: f64) -> Self {
        Self {
            base: base.into(),
            op,
            percent,
        }
    }
}

/// The common multiplicative formula: `percent_of("fm_cigarettes_total", 0.8)`
/// resolves to 80% of that field's fact at evaluation time.
#[must_use]
pub fn percent_of(base: impl Into<String>, percent: f64) -> Formula {
    Formula::new(base, ArithOp::Mul, percent)
}

/// A literal right-hand side as authored.
///
/// `Text` holds raw editor input. The wire codec accepts it so drafts
/// round-trip; the validator is where non-numeric text is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Literal {
    /// Numeric view: `Number` directly, `Text` via trimmed parse.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Literal {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Right-hand side of a rule: exactly one of a literal or a formula.
///
/// The exclusivity is structural here; the wire codec is where a document
/// carrying both (or neither) is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rhs {
    Literal(Literal),
    Formula(Formula),
}

impl From<Literal> for Rhs {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

impl From<Formula> for Rhs {
    fn from(formula: Formula) -> Self {
        Self::Formula(formula)
    }
}

impl From<f64> for Rhs {
    fn from(n: f64) -> Self {
        Self::Literal(Literal::Number(n))
    }
}

impl From<i32> for Rhs {
    fn from(n: i32) -> Self {
        Self::Literal(Literal::from(n))
    }
}

impl From<i64> for Rhs {
    fn from(n: i64) -> Self {
        Self::Literal(Literal::from(n))
    }
}

impl From<bool> for Rhs {
    fn from(b: bool) -> Self {
        Self::Literal(Literal::Bool(b))
    }
}

impl From<&str> for Rhs {
    fn from(s: &str) -> Self {
        Self::Literal(Literal::from(s))
    }
}

/// A leaf comparison: one field against a literal or formula threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub field: String,
    pub op: CompareOp,
    pub rhs: Rhs,
}

/// An AND/OR combinator over child conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub logic: Logic,
    pub rules: Vec<Condition>,
}

/// A condition tree: what phase gates, missions, and achievements store.
///
/// Trees are immutable values. Parse one from its JSON document form,
/// build one with [`field`]/[`all`]/[`any`], or derive an edited copy with
/// the `with_*` methods. Evaluation takes `&self` and shares freely across
/// threads.
///
/// # Example
///
/// ```
/// use quitgate::{all, any, field, percent_of, FactSet};
///
/// let phase_gate = all([
///     field("progress").gte(80),
///     any([
///         field("craving_level_avg").lte(5),
///         field("avg_cigarettes").lte(percent_of("fm_cigarettes_total", 0.8)),
///     ]),
/// ]);
///
/// let facts = FactSet::new()
///     .set("progress", 85)
///     .set("craving_level_avg", 5)
///     .set("avg_cigarettes", 7)
///     .set("fm_cigarettes_total", 10);
///
/// assert!(phase_gate.evaluate(&facts));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Group(Group),
    Rule(Rule),
}

// --- Wire format ---

impl Condition {
    /// Decode a condition document from JSON text.
    ///
    /// A top-level JSON *string* containing JSON is unwrapped once, so
    /// storage columns written through two stringify passes stay readable.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the text is not JSON or the shape does
    /// not match the document grammar.
    pub fn from_json(input: &str) -> Result<Self, ParseError> {
        crate::parse::from_json(input)
    }

    /// Decode a condition from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the shape does not match the document
    /// grammar.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ParseError> {
        crate::parse::from_value(value)
    }

    /// Read and decode a condition document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`QuitgateError`](crate::QuitgateError) on I/O or parse
    /// failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::QuitgateError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&input)?)
    }

    /// Canonical JSON encoding: stable key order, integers kept exact.
    ///
    /// Total and pure; round-trips through [`Condition::from_value`] to a
    /// structurally equal tree.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        crate::parse::to_value(self)
    }

    /// Canonical JSON text, suitable for storage or snapshots.
    #[must_use]
    pub fn to_json(&self) -> String {
        crate::parse::to_json(self)
    }
}

// --- Validation and evaluation ---

impl Condition {
    /// Check this tree against a field vocabulary, collecting every problem.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing all issues with their paths;
    /// `Ok(())` means the tree is safe to persist.
    pub fn validate(&self, fields: &FieldTable) -> Result<(), ValidationErrors> {
        crate::validate::validate(self, fields)
    }

    /// Evaluate against a fact set with the production (lenient) policy.
    ///
    /// A rule that cannot be resolved, because its fact is missing, its
    /// formula fails, or its operands cannot be related, counts as not
    /// passed; sibling branches still evaluate. An `OR` with one faulted
    /// and one passing rule is therefore `true`.
    #[must_use]
    pub fn evaluate(&self, facts: &FactSet) -> bool {
        crate::evaluate::evaluate(self, facts)
    }

    /// Evaluate strictly: the first rule fault aborts with that error.
    ///
    /// Rules are visited in document order, so the reported fault is
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvalError`] encountered.
    pub fn try_evaluate(&self, facts: &FactSet) -> Result<bool, EvalError> {
        crate::evaluate::try_evaluate(self, facts)
    }

    /// Lenient evaluation with a full trace of every node visited.
    #[must_use]
    pub fn evaluate_detailed(&self, facts: &FactSet) -> EvalReport {
        crate::evaluate::evaluate_detailed(self, facts)
    }

    /// Parse a JSON document and evaluate it leniently in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the document does not parse; evaluation
    /// itself cannot fail in lenient mode.
    pub fn evaluate_json(input: &str, facts: &FactSet) -> Result<bool, ParseError> {
        Ok(Self::from_json(input)?.evaluate(facts))
    }
}

// --- Structure, navigation, editing ---

impl Condition {
    #[must_use]
    pub fn group(logic: Logic, rules: Vec<Condition>) -> Self {
        Self::Group(Group { logic, rules })
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Maximum node depth: a bare rule is 1, a group is one more than its
    /// deepest child (or 1 when empty).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Rule(_) => 1,
            Self::Group(group) => {
                1 + group
                    .rules
                    .iter()
                    .map(Condition::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Number of leaf rules in the tree.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        match self {
            Self::Rule(_) => 1,
            Self::Group(group) => group.rules.iter().map(Condition::rule_count).sum(),
        }
    }

    /// The node addressed by `path`, or `None` when the path walks off the
    /// tree.
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> Option<&Condition> {
        let mut node = self;
        for &index in path.indices() {
            match node {
                Self::Group(group) => node = group.rules.get(index)?,
                Self::Rule(_) => return None,
            }
        }
        Some(node)
    }

    /// A new tree with the node at `path` replaced. The original tree is
    /// untouched; `None` when the path is invalid.
    #[must_use]
    pub fn with_replaced(&self, path: &NodePath, replacement: Condition) -> Option<Condition> {
        match path.indices().split_last() {
            None => Some(replacement),
            Some((&index, parent)) => edit_group_at(self, parent, move |group| {
                if index >= group.rules.len() {
                    return None;
                }
                let mut rules = group.rules.clone();
                rules[index] = replacement;
                Some(Group {
                    logic: group.logic,
                    rules,
                })
            }),
        }
    }

    /// A new tree with the node at `path` removed from its parent group.
    ///
    /// The root cannot be removed. Removing a group's last child leaves an
    /// empty group, which validation then flags.
    #[must_use]
    pub fn with_removed(&self, path: &NodePath) -> Option<Condition> {
        let (&index, parent) = path.indices().split_last()?;
        edit_group_at(self, parent, move |group| {
            if index >= group.rules.len() {
                return None;
            }
            let mut rules = group.rules.clone();
            rules.remove(index);
            Some(Group {
                logic: group.logic,
                rules,
            })
        })
    }

    /// A new tree with `child` appended to the group at `group_path`.
    /// `None` when the path is invalid or addresses a rule.
    #[must_use]
    pub fn with_appended(&self, group_path: &NodePath, child: Condition) -> Option<Condition> {
        edit_group_at(self, group_path.indices(), move |group| {
            let mut rules = group.rules.clone();
            rules.push(child);
            Some(Group {
                logic: group.logic,
                rules,
            })
        })
    }
}

/// Rebuild the tree along `indices`, applying `edit` to the group found at
/// the end. Clones only the spine and the edited group's children.
fn edit_group_at<F>(node: &Condition, indices: &[usize], edit: F) -> Option<Condition>
where
    F: FnOnce(&Group) -> Option<Group>,
{
    let Condition::Group(group) = node else {
        return None;
    };
    match indices.split_first() {
        None => edit(group).map(Condition::Group),
        Some((&index, rest)) => {
            let child = group.rules.get(index)?;
            let rebuilt = edit_group_at(child, rest, edit)?;
            let mut rules = group.rules.clone();
            rules[index] = rebuilt;
            Some(Condition::Group(Group {
                logic: group.logic,
                rules,
            }))
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(rule) => match &rule.rhs {
                Rhs::Literal(Literal::Number(n)) => {
                    write!(f, "({} {} {n})", rule.field, rule.op)
                }
                Rhs::Literal(Literal::Bool(b)) => write!(f, "({} {} {b})", rule.field, rule.op),
                Rhs::Literal(Literal::Text(s)) => {
                    write!(f, "({} {} \"{s}\")", rule.field, rule.op)
                }
                Rhs::Formula(formula) => write!(
                    f,
                    "({} {} {} {} {})",
                    rule.field, rule.op, formula.base, formula.op, formula.percent
                ),
            },
            Self::Group(group) => {
                f.write_str("(")?;
                for (index, child) in group.rules.iter().enumerate() {
                    if index > 0 {
                        write!(f, " {} ", group.logic)?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// --- Builders ---

/// Intermediate builder for a single rule. Created by [`field()`]; a
/// comparison method produces the finished [`Condition`].
#[derive(Debug, Clone)]
pub struct FieldCond {
    field: String,
}

impl FieldCond {
    #[must_use]
    pub fn gte(self, rhs: impl Into<Rhs>) -> Condition {
        self.cmp(CompareOp::Gte, rhs)
    }

    #[must_use]
    pub fn lte(self, rhs: impl Into<Rhs>) -> Condition {
        self.cmp(CompareOp::Lte, rhs)
    }

    #[must_use]
    pub fn gt(self, rhs: impl Into<Rhs>) -> Condition {
        self.cmp(CompareOp::Gt, rhs)
    }

    #[must_use]
    pub fn lt(self, rhs: impl Into<Rhs>) -> Condition {
        self.cmp(CompareOp::Lt, rhs)
    }

    #[must_use]
    pub fn eq(self, rhs: impl Into<Rhs>) -> Condition {
        self.cmp(CompareOp::Eq, rhs)
    }

    #[must_use]
    pub fn neq(self, rhs: impl Into<Rhs>) -> Condition {
        self.cmp(CompareOp::Neq, rhs)
    }

    fn cmp(self, op: CompareOp, rhs: impl Into<Rhs>) -> Condition {
        Condition::Rule(Rule {
            field: self.field,
            op,
            rhs: rhs.into(),
        })
    }
}

/// Start a rule for the named field: `field("progress").gte(80)`.
#[must_use]
pub fn field(name: impl Into<String>) -> FieldCond {
    FieldCond {
        field: name.into(),
    }
}

/// An `AND` group over the given conditions.
#[must_use]
pub fn all(rules: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::group(Logic::And, rules.into_iter().collect())
}

/// An `OR` group over the given conditions.
#[must_use]
pub fn any(rules: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::group(Logic::Or, rules.into_iter().collect())
}
