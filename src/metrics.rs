//! Derived chart metrics.
//!
//! Breakdown expressions are evaluated in an environment holding the numeric
//! field values plus the bound name `result`. Each expression is evaluated
//! independently, and anything that fails or comes back non-finite degrades
//! to zero so a chart always has something to render.

use serde::Serialize;

use crate::formula;
use crate::models::{Binding, ChartSpec, FieldValue};

/// One resolved slice of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub name: &'static str,
    pub value: f64,
    pub color: &'static str,
}

/// Resolved chart data, ready for a donut/proportional widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub total: f64,
    pub slices: Vec<ChartSlice>,
}

/// The expression environment: numeric binding entries plus `result`.
/// Date fields are not visible to expressions.
fn chart_env<'a>(binding: &'a Binding, result: f64) -> impl Fn(&str) -> Option<f64> + 'a {
    move |name: &str| {
        if name == "result" {
            return Some(result);
        }
        match binding.get(name) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

fn eval_or_zero<V: formula::VariableProvider>(expression: &str, env: &V) -> f64 {
    match formula::compute(expression, env) {
        Ok(value) if value.is_finite() => value,
        Ok(value) => {
            tracing::debug!(expression, %value, "breakdown expression non-finite, using 0");
            0.0
        }
        Err(err) => {
            tracing::debug!(expression, %err, "breakdown expression failed, using 0");
            0.0
        }
    }
}

/// Evaluate a chart specification against the binding and primary result.
pub fn resolve(spec: &ChartSpec, binding: &Binding, result: f64) -> ChartData {
    let env = chart_env(binding, result);

    ChartData {
        total: eval_or_zero(spec.total, &env),
        slices: spec
            .slices
            .iter()
            .map(|slice| ChartSlice {
                name: slice.name,
                value: eval_or_zero(slice.value, &env),
                color: slice.color,
            })
            .collect(),
    }
}
