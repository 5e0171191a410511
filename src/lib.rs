//! Stateless compute core for declarative financial calculators.
//!
//! Calculator definitions are static configuration: input fields, a formula
//! expression (or a custom routine), and optional chart and projection hints.
//! The core turns raw field text into a validated binding, evaluates the
//! computation, and hands the presentation layer a result, an error message,
//! or nothing at all — plus chart breakdowns and per-period projection rows
//! where the definition asks for them. No I/O, no shared state, no widgets.

pub mod binding;
pub mod catalog;
pub mod compute;
pub mod error;
pub mod formula;
pub mod metrics;
pub mod models;
pub mod projection;
pub mod registry;

pub use binding::{bind, default_raw_values, BindingOutcome};
pub use compute::{compute, derive_output, CalculatorOutput};
pub use error::{ComputeError, DefinitionError, FormulaError};
pub use metrics::{ChartData, ChartSlice};
pub use models::{
    Binding, BindingExt, BreakdownDef, CalculatorDef, ChartSpec, ColumnDef, Computation,
    ControlKind, FieldDef, FieldValue, ProjectionSpec, ValueKind,
};
pub use projection::ProjectionRow;
pub use registry::Registry;
