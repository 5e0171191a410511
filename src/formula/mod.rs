//! Formula engine for calculator expressions.
//!
//! This module provides parsing, validation, and evaluation of the arithmetic
//! expressions that calculator definitions use for their primary formulas and
//! chart breakdowns. The grammar is deliberately closed: configuration data
//! can describe arithmetic over named inputs, never executable code.
//!
//! # Supported Grammar
//!
//! - Arithmetic: `+ - * / ( )` and unary minus
//! - Functions: `pow(base, exponent)`, `log(x)` (natural logarithm)
//! - Numeric literals and variables named after input fields
//!
//! # Example
//!
//! ```
//! use fincalc_compute::formula::{validate, compute};
//!
//! // Validate a formula
//! let formula = "P * pow(1 + R/100, T)";
//! validate(formula).expect("Formula should be valid");
//!
//! // Compute with variables
//! let vars = |name: &str| match name {
//!     "P" => Some(100000.0),
//!     "R" => Some(6.5),
//!     "T" => Some(5.0),
//!     _ => None,
//! };
//! let result = compute(formula, &vars).expect("Should compute");
//! assert!((result - 137008.66).abs() < 0.01);
//! ```

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use evaluator::{evaluate, supported_functions, FunctionInfo, VariableProvider};
pub use parser::parse;

use crate::error::FormulaError;

/// Validate a formula expression without evaluating it.
///
/// This checks that the formula parses correctly but does not validate
/// that all variables exist (as that depends on context).
pub fn validate(expression: &str) -> Result<(), FormulaError> {
    parse(expression)?;
    Ok(())
}

/// Validate a formula and check that all variables are available.
pub fn validate_with_variables(expression: &str, available: &[&str]) -> Result<(), FormulaError> {
    let ast = parse(expression)?;
    for name in ast.variables() {
        if !available.contains(&name) {
            return Err(FormulaError::UnknownVariable(name.to_string()));
        }
    }
    Ok(())
}

/// Compute a formula's numeric result given a variable provider.
pub fn compute<V: VariableProvider>(expression: &str, vars: &V) -> Result<f64, FormulaError> {
    let ast = parse(expression)?;
    evaluate(&ast, vars)
}
