//! Data model for declarative calculator definitions.
//!
//! Definitions are plain data built at startup and never mutated afterwards.
//! All strings are `&'static str` because the catalog is compiled in, the way
//! the original configuration was.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::ComputeError;
use crate::projection::ProjectionRow;

/// What a field's raw text parses into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Date,
}

/// Which widget the presentation layer should render for a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    Input,
    Slider,
}

/// One input field of a calculator.
#[derive(Clone, Debug)]
pub struct FieldDef {
    /// Unique within a calculator; doubles as the expression variable name.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: ValueKind,
    pub control: ControlKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub unit: Option<&'static str>,
    pub default_value: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FieldDef {
    /// A numeric free-text input.
    pub fn input(name: &'static str, label: &'static str) -> Self {
        FieldDef {
            name,
            label,
            kind: ValueKind::Number,
            control: ControlKind::Input,
            min: None,
            max: None,
            step: None,
            unit: None,
            default_value: None,
            description: None,
        }
    }

    /// A bounded numeric slider.
    pub fn slider(name: &'static str, label: &'static str, min: f64, max: f64, step: f64) -> Self {
        FieldDef {
            name,
            label,
            kind: ValueKind::Number,
            control: ControlKind::Slider,
            min: Some(min),
            max: Some(max),
            step: Some(step),
            unit: None,
            default_value: None,
            description: None,
        }
    }

    /// A calendar date input.
    pub fn date(name: &'static str, label: &'static str) -> Self {
        FieldDef {
            name,
            label,
            kind: ValueKind::Date,
            control: ControlKind::Input,
            min: None,
            max: None,
            step: None,
            unit: None,
            default_value: None,
            description: None,
        }
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// A validated field value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Number(_) => None,
        }
    }
}

/// A complete validated mapping of field name to value, rebuilt on every edit.
pub type Binding = HashMap<&'static str, FieldValue>;

/// Helpers for custom routines reading their inputs out of a binding.
pub trait BindingExt {
    fn number(&self, name: &str) -> Result<f64, ComputeError>;
    fn date(&self, name: &str) -> Result<NaiveDate, ComputeError>;
}

impl BindingExt for Binding {
    fn number(&self, name: &str) -> Result<f64, ComputeError> {
        match self.get(name) {
            Some(FieldValue::Number(n)) => Ok(*n),
            Some(FieldValue::Date(_)) => Err(ComputeError::WrongKind(name.to_string())),
            None => Err(ComputeError::MissingField(name.to_string())),
        }
    }

    fn date(&self, name: &str) -> Result<NaiveDate, ComputeError> {
        match self.get(name) {
            Some(FieldValue::Date(d)) => Ok(*d),
            Some(FieldValue::Number(_)) => Err(ComputeError::WrongKind(name.to_string())),
            None => Err(ComputeError::MissingField(name.to_string())),
        }
    }
}

/// A custom computation routine, for results the closed expression grammar
/// cannot express (slab lookups, date arithmetic, iterative accumulation).
pub type ComputeRoutine = fn(&Binding) -> Result<f64, ComputeError>;

/// How a calculator produces its primary result. Exactly one variant, so a
/// definition can never carry both a formula and a routine.
#[derive(Clone)]
pub enum Computation {
    /// An expression over the calculator's field names.
    Expression(&'static str),
    /// A routine receiving the full binding, date fields included.
    Routine(ComputeRoutine),
}

impl std::fmt::Debug for Computation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Computation::Expression(expr) => f.debug_tuple("Expression").field(expr).finish(),
            Computation::Routine(_) => f.debug_tuple("Routine").finish(),
        }
    }
}

/// One named slice of a chart breakdown.
#[derive(Clone, Debug)]
pub struct BreakdownDef {
    pub name: &'static str,
    /// Expression over the field names plus the bound name `result`.
    pub value: &'static str,
    /// Display color hint, passed through untouched.
    pub color: &'static str,
}

/// Chart rendering hints: a total expression and an ordered set of slices.
///
/// Slices summing to the total is a convention of the configuration author,
/// not a runtime guarantee.
#[derive(Clone, Debug)]
pub struct ChartSpec {
    pub total: &'static str,
    pub slices: &'static [BreakdownDef],
}

/// One column of a projection table.
#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub key: &'static str,
    pub label: &'static str,
}

/// A per-period row generator. Receives the validated binding and the primary
/// result, returns a finite ordered sequence of rows.
pub type RowGenerator = fn(&Binding, f64) -> Vec<ProjectionRow>;

/// Projection table hints: ordered columns and the row-generation routine.
#[derive(Clone)]
pub struct ProjectionSpec {
    pub columns: &'static [ColumnDef],
    pub rows: RowGenerator,
}

impl std::fmt::Debug for ProjectionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionSpec")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// A complete calculator definition: the unit of configuration.
#[derive(Clone, Debug)]
pub struct CalculatorDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldDef>,
    pub computation: Computation,
    pub result_prefix: Option<&'static str>,
    pub result_suffix: Option<&'static str>,
    pub result_description: &'static str,
    pub chart: Option<ChartSpec>,
    pub projection: Option<ProjectionSpec>,
}

impl CalculatorDef {
    /// Names of the numeric fields, i.e. the variables visible to formulas
    /// and breakdown expressions.
    pub fn numeric_field_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.kind == ValueKind::Number)
            .map(|f| f.name)
            .collect()
    }
}
