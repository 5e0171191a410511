use thiserror::Error;

/// Error type for formula parsing and evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("parse error at position {position}: {message}")]
    ParseError { position: usize, message: String },

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("invalid argument count for {function}: expected {expected}, got {got}")]
    InvalidArgCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("empty expression")]
    EmptyExpression,
}

/// Error type for running a calculator's computation against a binding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// The formula or routine produced NaN or an infinity. The message is what
    /// the presentation layer shows the user.
    #[error("computation produced a non-numeric or unbounded result")]
    NonFinite,

    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// A custom routine asked the binding for a field it does not contain.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A custom routine asked for a field with the wrong value kind
    /// (e.g. a number where the binding holds a date).
    #[error("field {0} has the wrong value kind")]
    WrongKind(String),
}

/// Error type for validating calculator definitions at registry construction.
///
/// These are configuration-author mistakes. They are reported once, when the
/// registry is built, and can never surface during user interaction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("duplicate calculator id: {0}")]
    DuplicateCalculator(String),

    #[error("calculator {calculator}: duplicate field name: {field}")]
    DuplicateField { calculator: String, field: String },

    #[error("calculator {calculator}: invalid field name: {field}")]
    InvalidFieldName { calculator: String, field: String },

    #[error("calculator {calculator}: field name {field} is reserved")]
    ReservedFieldName { calculator: String, field: String },

    #[error("calculator {calculator}: formula calculators cannot declare date field {field}")]
    DateFieldInFormula { calculator: String, field: String },

    #[error("calculator {calculator}: invalid expression {expression:?}: {source}")]
    InvalidExpression {
        calculator: String,
        expression: String,
        source: FormulaError,
    },
}
