use crate::error::FormulaError;
use crate::formula::ast::{BinaryOp, Expr, UnaryOp};

/// Trait for providing variable values during evaluation.
pub trait VariableProvider {
    fn get(&self, name: &str) -> Option<f64>;
}

impl<F> VariableProvider for F
where
    F: Fn(&str) -> Option<f64>,
{
    fn get(&self, name: &str) -> Option<f64> {
        self(name)
    }
}

/// Evaluate an expression with the given variable provider.
///
/// Arithmetic is double-precision IEEE-754 throughout. Division by zero and
/// domain violations in `log`/`pow` are not errors here: they yield infinities
/// or NaN, and rejecting those is the caller's responsibility. An unbound
/// variable or a malformed function call is an error, since both indicate a
/// configuration mistake rather than a numeric edge case.
pub fn evaluate<V: VariableProvider>(expr: &Expr, vars: &V) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Variable(name) => vars
            .get(name)
            .ok_or_else(|| FormulaError::UnknownVariable(name.clone())),
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, vars)?;
            let r = evaluate(right, vars)?;
            Ok(evaluate_binary(*op, l, r))
        }
        Expr::Unary { op, expr } => {
            let v = evaluate(expr, vars)?;
            Ok(evaluate_unary(*op, v))
        }
        Expr::FunctionCall { name, args } => {
            let arg_values: Result<Vec<f64>, _> = args.iter().map(|a| evaluate(a, vars)).collect();
            evaluate_function(name, arg_values?)
        }
    }
}

fn evaluate_binary(op: BinaryOp, left: f64, right: f64) -> f64 {
    match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
    }
}

fn evaluate_unary(op: UnaryOp, val: f64) -> f64 {
    match op {
        UnaryOp::Neg => -val,
    }
}

fn evaluate_function(name: &str, args: Vec<f64>) -> Result<f64, FormulaError> {
    match name.to_lowercase().as_str() {
        "pow" => {
            if args.len() != 2 {
                return Err(FormulaError::InvalidArgCount {
                    function: "pow".to_string(),
                    expected: 2,
                    got: args.len(),
                });
            }
            Ok(args[0].powf(args[1]))
        }
        "log" => {
            if args.len() != 1 {
                return Err(FormulaError::InvalidArgCount {
                    function: "log".to_string(),
                    expected: 1,
                    got: args.len(),
                });
            }
            Ok(args[0].ln())
        }
        _ => Err(FormulaError::UnknownFunction(name.to_string())),
    }
}

/// Information about a supported function.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub signature: String,
    pub description: String,
    pub arg_count: u32,
}

/// List of supported built-in functions.
pub fn supported_functions() -> Vec<FunctionInfo> {
    vec![
        FunctionInfo {
            name: "pow".to_string(),
            signature: "pow(base, exponent)".to_string(),
            description: "Raises base to the given exponent".to_string(),
            arg_count: 2,
        },
        FunctionInfo {
            name: "log".to_string(),
            signature: "log(x)".to_string(),
            description: "Returns the natural logarithm of x".to_string(),
            arg_count: 1,
        },
    ]
}
