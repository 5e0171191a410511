//! Per-period projection tables.
//!
//! Projections are iterative forward simulations (amortization schedules,
//! year-by-year compounding) and so are generated by per-calculator routines
//! rather than by the closed expression grammar. This module holds the row
//! type and the simulation loops the built-in catalog shares.

use serde::Serialize;

/// Hard ceiling on generated rows, above any declared field maximum
/// (40 years of months, with headroom).
pub const MAX_PERIODS: usize = 1200;

/// One row of a projection table: ordered (column key, formatted value) cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionRow(Vec<(&'static str, String)>);

impl ProjectionRow {
    pub fn new() -> Self {
        ProjectionRow(Vec::new())
    }

    pub fn cell(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fixed two-decimal display formatting for monetary cells.
pub fn amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Month-by-month loan amortization at a fixed payment.
///
/// Each row splits the payment into interest accrued on the outstanding
/// balance and the principal component, then reduces the balance. The final
/// balance is clamped at zero so rounding in the last period never shows a
/// negative residual.
pub fn amortization_rows(
    principal: f64,
    annual_rate_pct: f64,
    months: usize,
    payment: f64,
) -> Vec<ProjectionRow> {
    let monthly_rate = annual_rate_pct / 1200.0;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(months.min(MAX_PERIODS));

    for month in 1..=months.min(MAX_PERIODS) {
        let interest = balance * monthly_rate;
        let principal_paid = payment - interest;
        balance = (balance - principal_paid).max(0.0);

        rows.push(
            ProjectionRow::new()
                .cell("month", month.to_string())
                .cell("principal", amount(principal_paid))
                .cell("interest", amount(interest))
                .cell("balance", amount(balance)),
        );
    }

    rows
}

/// Year-by-year compounding of a lump sum.
pub fn compound_growth_rows(
    principal: f64,
    annual_rate_pct: f64,
    years: usize,
) -> Vec<ProjectionRow> {
    let rate = annual_rate_pct / 100.0;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(years.min(MAX_PERIODS));

    for year in 1..=years.min(MAX_PERIODS) {
        let opening = balance;
        let interest = opening * rate;
        balance = opening + interest;

        rows.push(
            ProjectionRow::new()
                .cell("year", year.to_string())
                .cell("opening", amount(opening))
                .cell("interest", amount(interest))
                .cell("closing", amount(balance)),
        );
    }

    rows
}

/// Year-by-year growth of a recurring monthly contribution, compounded
/// monthly with the contribution made at the start of each month.
pub fn contribution_growth_rows(
    monthly_contribution: f64,
    annual_rate_pct: f64,
    years: usize,
) -> Vec<ProjectionRow> {
    let monthly_rate = annual_rate_pct / 1200.0;
    let mut value = 0.0_f64;
    let mut invested = 0.0_f64;
    let mut rows = Vec::with_capacity(years.min(MAX_PERIODS));

    for year in 1..=years.min(MAX_PERIODS) {
        for _ in 0..12 {
            invested += monthly_contribution;
            value = (value + monthly_contribution) * (1.0 + monthly_rate);
        }

        rows.push(
            ProjectionRow::new()
                .cell("year", year.to_string())
                .cell("invested", amount(invested))
                .cell("value", amount(value))
                .cell("gain", amount(value - invested)),
        );
    }

    rows
}
