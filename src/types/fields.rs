use std::collections::HashMap;

/// Value shape a field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Number,
    Boolean,
}

/// What the validator knows about one field: display label, type, optional
/// numeric range, and whether the field is reserved for formula bases.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    label: String,
    ty: FieldType,
    min: Option<f64>,
    max: Option<f64>,
    baseline_only: bool,
}

impl FieldSpec {
    /// An unbounded numeric field.
    #[must_use]
    pub fn number(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ty: FieldType::Number,
            min: None,
            max: None,
            baseline_only: false,
        }
    }

    /// A non-negative count.
    #[must_use]
    pub fn count(label: impl Into<String>) -> Self {
        let mut spec = Self::number(label);
        spec.min = Some(0.0);
        spec
    }

    /// A 0..=10 self-report scale.
    #[must_use]
    pub fn rating(label: impl Into<String>) -> Self {
        Self::bounded(label, 0.0, 10.0)
    }

    /// A numeric field with an inclusive range.
    #[must_use]
    pub fn bounded(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            ty: FieldType::Number,
            min: Some(min),
            max: Some(max),
            baseline_only: false,
        }
    }

    /// A yes/no field. Only `=` and `!=` apply.
    #[must_use]
    pub fn boolean(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ty: FieldType::Boolean,
            min: None,
            max: None,
            baseline_only: false,
        }
    }

    /// Restrict the field to formula bases; direct comparisons against it
    /// fail validation.
    #[must_use]
    pub fn baseline_only(mut self) -> Self {
        self.baseline_only = true;
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    #[must_use]
    pub fn is_baseline_only(&self) -> bool {
        self.baseline_only
    }
}

/// The field vocabulary a condition is validated against.
///
/// [`FieldTable::standard`] carries the built-in quit-tracking metrics;
/// [`FieldTable::with`] extends or overrides entries for custom
/// deployments.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct FieldTable {
    fields: HashMap<String, FieldSpec>,
}

impl FieldTable {
    /// A table with no fields; every rule fails validation against it.
    pub fn empty() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// The built-in vocabulary of quit-tracking metrics.
    pub fn standard() -> Self {
        Self::empty()
            .with("progress", FieldSpec::bounded("Progress", 0.0, 100.0))
            .with("craving_level_avg", FieldSpec::rating("Craving level"))
            .with("avg_mood", FieldSpec::rating("Mood"))
            .with("avg_anxiety", FieldSpec::rating("Anxiety"))
            .with("avg_confidence", FieldSpec::rating("Confidence"))
            .with("avg_cigarettes", FieldSpec::count("Daily cigarettes"))
            .with(
                "fm_cigarettes_total",
                FieldSpec::count("Baseline cigarettes").baseline_only(),
            )
            .with("streaks", FieldSpec::count("Streak"))
            .with("smoke_free_days", FieldSpec::count("Smoke-free days"))
            .with("steps", FieldSpec::count("Steps"))
            .with("money_saved", FieldSpec::count("Money saved"))
            .with("use_nrt", FieldSpec::boolean("NRT use"))
    }

    /// Add or replace a field.
    pub fn with(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::standard()
    }
}
