//! Result computation orchestration.
//!
//! `compute` runs one calculator against one validated binding. `derive_output`
//! is the full per-cycle derivation the presentation layer calls on every
//! edit: raw field text in, observables out. Both are pure functions; calling
//! them twice with the same inputs yields the same outputs.

use std::collections::HashMap;

use serde::Serialize;

use crate::binding::{bind, BindingOutcome};
use crate::error::ComputeError;
use crate::formula;
use crate::metrics::{self, ChartData};
use crate::models::{Binding, CalculatorDef, Computation, FieldValue};
use crate::projection::ProjectionRow;

/// The expression environment for a primary formula: numeric fields only.
fn formula_env(binding: &Binding) -> impl Fn(&str) -> Option<f64> + '_ {
    move |name: &str| match binding.get(name) {
        Some(FieldValue::Number(n)) => Some(*n),
        _ => None,
    }
}

/// Compute a calculator's primary result from a validated binding.
///
/// Formula calculators evaluate their expression over the numeric fields;
/// routine calculators receive the binding as-is, date fields included.
/// Either way the value must come back finite, otherwise the computation
/// failed and the caller gets a surfaceable error.
pub fn compute(def: &CalculatorDef, binding: &Binding) -> Result<f64, ComputeError> {
    let value = match &def.computation {
        Computation::Expression(expression) => {
            formula::compute(expression, &formula_env(binding))?
        }
        Computation::Routine(routine) => routine(binding)?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        tracing::warn!(calculator = def.id, %value, "computation produced a non-finite result");
        Err(ComputeError::NonFinite)
    }
}

/// Everything one computation cycle exposes to the presentation layer.
///
/// At most one of `result` and `error` is set; `chart` and `projection` are
/// only set alongside `result`, and only for calculators that define them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CalculatorOutput {
    pub result: Option<f64>,
    pub error: Option<String>,
    pub chart: Option<ChartData>,
    pub projection: Option<Vec<ProjectionRow>>,
}

impl CalculatorOutput {
    fn not_ready() -> Self {
        CalculatorOutput::default()
    }

    fn failed(err: ComputeError) -> Self {
        CalculatorOutput {
            error: Some(err.to_string()),
            ..CalculatorOutput::default()
        }
    }
}

/// The per-cycle derivation: `(definition, raw field text) -> observables`.
///
/// Not-ready input silently clears everything (no result, no error). A
/// computation failure carries only the error message. Success carries the
/// result plus whatever chart and projection the definition specifies.
pub fn derive_output(def: &CalculatorDef, raw: &HashMap<String, String>) -> CalculatorOutput {
    let binding = match bind(&def.fields, raw) {
        BindingOutcome::Ready(binding) => binding,
        BindingOutcome::NotReady => return CalculatorOutput::not_ready(),
    };

    let result = match compute(def, &binding) {
        Ok(result) => result,
        Err(err) => return CalculatorOutput::failed(err),
    };

    CalculatorOutput {
        result: Some(result),
        error: None,
        chart: def
            .chart
            .as_ref()
            .map(|spec| metrics::resolve(spec, &binding, result)),
        projection: def.projection.as_ref().map(|spec| (spec.rows)(&binding, result)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreakdownDef, ChartSpec, FieldDef};
    use approx::assert_relative_eq;

    fn fd_def() -> CalculatorDef {
        CalculatorDef {
            id: "fixed-deposit",
            title: "Fixed Deposit Calculator",
            description: "Maturity value of a fixed deposit.",
            fields: vec![
                FieldDef::input("P", "Principal Amount"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 15.0, 0.1),
                FieldDef::slider("T", "Tenure", 1.0, 20.0, 1.0),
            ],
            computation: Computation::Expression("P * pow((1 + R/100), T)"),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Maturity Value",
            chart: Some(ChartSpec {
                total: "result",
                slices: &[
                    BreakdownDef {
                        name: "Principal",
                        value: "P",
                        color: "#0ea5e9",
                    },
                    BreakdownDef {
                        name: "Interest",
                        value: "result - P",
                        color: "#22c55e",
                    },
                ],
            }),
            projection: None,
        }
    }

    fn emi_def() -> CalculatorDef {
        CalculatorDef {
            id: "emi",
            title: "EMI Calculator",
            description: "Equated Monthly Installment for a loan.",
            fields: vec![
                FieldDef::input("P", "Loan Amount"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 25.0, 0.1),
                FieldDef::slider("N", "Loan Tenure", 1.0, 40.0, 1.0),
            ],
            computation: Computation::Expression(
                "(P * (R/1200) * pow(1 + (R/1200), N*12)) / (pow(1 + (R/1200), N*12) - 1)",
            ),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Monthly EMI Payment",
            chart: None,
            projection: None,
        }
    }

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ready_binding(def: &CalculatorDef, entries: &[(&str, &str)]) -> Binding {
        match bind(&def.fields, &raw(entries)) {
            BindingOutcome::Ready(binding) => binding,
            BindingOutcome::NotReady => panic!("expected ready binding"),
        }
    }

    #[test]
    fn test_compute_emi() {
        let def = emi_def();
        let binding = ready_binding(&def, &[("P", "1000000"), ("R", "8.5"), ("N", "20")]);
        let result = compute(&def, &binding).unwrap();
        assert_relative_eq!(result, 8678.23, epsilon = 0.01);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let def = emi_def();
        let binding = ready_binding(&def, &[("P", "1000000"), ("R", "8.5"), ("N", "20")]);
        let first = compute(&def, &binding).unwrap();
        let second = compute(&def, &binding).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compute_zero_rate_is_error_not_nan() {
        // With R=0 the EMI closed form divides by zero. That must surface as
        // a computation error; NaN and infinities never leave the core.
        let def = emi_def();
        let binding = ready_binding(&def, &[("P", "1000000"), ("R", "0"), ("N", "20")]);
        let result = compute(&def, &binding);
        assert_eq!(result, Err(ComputeError::NonFinite));
    }

    #[test]
    fn test_compute_routine_dispatch() {
        fn double_p(binding: &Binding) -> Result<f64, ComputeError> {
            use crate::models::BindingExt;
            Ok(binding.number("P")? * 2.0)
        }

        let mut def = fd_def();
        def.computation = Computation::Routine(double_p);
        let binding = ready_binding(&def, &[("P", "100"), ("R", "1"), ("T", "1")]);
        assert_eq!(compute(&def, &binding).unwrap(), 200.0);
    }

    #[test]
    fn test_compute_routine_non_finite_rejected() {
        fn bad(_: &Binding) -> Result<f64, ComputeError> {
            Ok(f64::NAN)
        }

        let mut def = fd_def();
        def.computation = Computation::Routine(bad);
        let binding = ready_binding(&def, &[("P", "100"), ("R", "1"), ("T", "1")]);
        assert_eq!(compute(&def, &binding), Err(ComputeError::NonFinite));
    }

    #[test]
    fn test_derive_output_not_ready() {
        let def = emi_def();
        let output = derive_output(&def, &raw(&[("P", ""), ("R", "8.5"), ("N", "20")]));
        assert_eq!(output, CalculatorOutput::default());

        // Negative input is the same silent reset, not an error
        let output = derive_output(&def, &raw(&[("P", "-5"), ("R", "8.5"), ("N", "20")]));
        assert!(output.result.is_none());
        assert!(output.error.is_none());
    }

    #[test]
    fn test_derive_output_success_with_chart() {
        let def = fd_def();
        let output = derive_output(&def, &raw(&[("P", "100000"), ("R", "6.5"), ("T", "5")]));

        let result = output.result.unwrap();
        assert_relative_eq!(result, 137_008.67, epsilon = 0.01);
        assert!(output.error.is_none());

        let chart = output.chart.unwrap();
        assert_relative_eq!(chart.total, result, max_relative = 1e-6);
        let sum: f64 = chart.slices.iter().map(|s| s.value).sum();
        assert_relative_eq!(sum, chart.total, max_relative = 1e-6);
    }

    #[test]
    fn test_derive_output_error_clears_result() {
        let def = emi_def();
        let output = derive_output(&def, &raw(&[("P", "1000000"), ("R", "0"), ("N", "20")]));
        assert!(output.result.is_none());
        assert_eq!(
            output.error.as_deref(),
            Some("computation produced a non-numeric or unbounded result")
        );
        assert!(output.chart.is_none());
        assert!(output.projection.is_none());
    }

    #[test]
    fn test_derive_output_idempotent() {
        let def = fd_def();
        let values = raw(&[("P", "100000"), ("R", "6.5"), ("T", "5")]);
        assert_eq!(derive_output(&def, &values), derive_output(&def, &values));
    }

    #[test]
    fn test_output_serializes_for_presentation() {
        let def = fd_def();
        let output = derive_output(&def, &raw(&[("P", "100000"), ("R", "6.5"), ("T", "5")]));
        let json = serde_json::to_value(&output).unwrap();
        assert!(json["result"].is_f64());
        assert!(json["error"].is_null());
        assert_eq!(json["chart"]["slices"][0]["name"], "Principal");
    }
}
