//! The immutable calculator definition registry.
//!
//! Built once at startup from static configuration and validated in full at
//! construction, so a misauthored formula or field name fails the process
//! before any user interaction, never during it. Enumeration order is the
//! insertion order of the configuration.

use std::collections::HashSet;

use crate::catalog;
use crate::error::DefinitionError;
use crate::formula;
use crate::models::{CalculatorDef, Computation, ValueKind};

/// Names an expression may never shadow: the grammar's functions and the
/// bound name breakdown expressions use for the primary result.
const RESERVED_NAMES: &[&str] = &["pow", "log", "result"];

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Read-only lookup table of calculator definitions.
#[derive(Debug)]
pub struct Registry {
    defs: Vec<CalculatorDef>,
}

impl Registry {
    /// Build a registry, validating every definition.
    pub fn new(defs: Vec<CalculatorDef>) -> Result<Self, DefinitionError> {
        let mut seen_ids = HashSet::new();
        for def in &defs {
            if !seen_ids.insert(def.id) {
                return Err(DefinitionError::DuplicateCalculator(def.id.to_string()));
            }
            validate_definition(def)?;
            tracing::debug!(calculator = def.id, fields = def.fields.len(), "registered calculator");
        }
        Ok(Registry { defs })
    }

    /// The built-in catalog.
    pub fn builtin() -> Result<Self, DefinitionError> {
        Registry::new(catalog::definitions())
    }

    /// Look up a definition by identifier.
    pub fn lookup(&self, id: &str) -> Option<&CalculatorDef> {
        self.defs.iter().find(|def| def.id == id)
    }

    /// Definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CalculatorDef> {
        self.defs.iter()
    }

    /// The identifier the navigation layer falls back to: the first
    /// definition in the configuration.
    pub fn default_id(&self) -> Option<&'static str> {
        self.defs.first().map(|def| def.id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

fn validate_definition(def: &CalculatorDef) -> Result<(), DefinitionError> {
    let mut seen_fields = HashSet::new();
    for field in &def.fields {
        if !is_valid_identifier(field.name) {
            return Err(DefinitionError::InvalidFieldName {
                calculator: def.id.to_string(),
                field: field.name.to_string(),
            });
        }
        if RESERVED_NAMES.contains(&field.name) {
            return Err(DefinitionError::ReservedFieldName {
                calculator: def.id.to_string(),
                field: field.name.to_string(),
            });
        }
        if !seen_fields.insert(field.name) {
            return Err(DefinitionError::DuplicateField {
                calculator: def.id.to_string(),
                field: field.name.to_string(),
            });
        }
    }

    let numeric_names = def.numeric_field_names();

    if let Computation::Expression(expression) = &def.computation {
        // Formula calculators never declare date fields
        if let Some(field) = def.fields.iter().find(|f| f.kind == ValueKind::Date) {
            return Err(DefinitionError::DateFieldInFormula {
                calculator: def.id.to_string(),
                field: field.name.to_string(),
            });
        }
        check_expression(def.id, expression, &numeric_names)?;
    }

    if let Some(chart) = &def.chart {
        let mut chart_names = numeric_names.clone();
        chart_names.push("result");
        check_expression(def.id, chart.total, &chart_names)?;
        for slice in chart.slices {
            check_expression(def.id, slice.value, &chart_names)?;
        }
    }

    Ok(())
}

fn check_expression(
    calculator: &str,
    expression: &str,
    available: &[&str],
) -> Result<(), DefinitionError> {
    formula::validate_with_variables(expression, available).map_err(|source| {
        DefinitionError::InvalidExpression {
            calculator: calculator.to_string(),
            expression: expression.to_string(),
            source,
        }
    })
}
