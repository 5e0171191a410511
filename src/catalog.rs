//! The built-in calculator catalog.
//!
//! Pure configuration data plus the custom routines for results the closed
//! expression grammar cannot express (slab lookups, date arithmetic,
//! iterative accumulation). The registry validates everything here at
//! construction.

use crate::error::ComputeError;
use crate::models::{
    Binding, BindingExt, BreakdownDef, CalculatorDef, ChartSpec, ColumnDef, Computation, FieldDef,
    ProjectionSpec,
};
use crate::projection::{
    amortization_rows, amount, compound_growth_rows, contribution_growth_rows, ProjectionRow,
    MAX_PERIODS,
};

const EMI_COLUMNS: &[ColumnDef] = &[
    ColumnDef { key: "month", label: "Month" },
    ColumnDef { key: "principal", label: "Principal Paid" },
    ColumnDef { key: "interest", label: "Interest Paid" },
    ColumnDef { key: "balance", label: "Outstanding Balance" },
];

const GROWTH_COLUMNS: &[ColumnDef] = &[
    ColumnDef { key: "year", label: "Year" },
    ColumnDef { key: "opening", label: "Opening Balance" },
    ColumnDef { key: "interest", label: "Interest Earned" },
    ColumnDef { key: "closing", label: "Closing Balance" },
];

const SIP_COLUMNS: &[ColumnDef] = &[
    ColumnDef { key: "year", label: "Year" },
    ColumnDef { key: "invested", label: "Amount Invested" },
    ColumnDef { key: "value", label: "Projected Value" },
    ColumnDef { key: "gain", label: "Estimated Gains" },
];

const RETIREMENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef { key: "year", label: "Year" },
    ColumnDef { key: "opening", label: "Opening Corpus" },
    ColumnDef { key: "invested", label: "Total Contributed" },
    ColumnDef { key: "closing", label: "Closing Corpus" },
];

/// Income tax slabs as (width, rate) bands over annual income, topped by an
/// unbounded band, plus the health and education cess applied on the total.
const TAX_SLABS: &[(f64, f64)] = &[
    (300_000.0, 0.0),
    (300_000.0, 0.05),
    (300_000.0, 0.10),
    (300_000.0, 0.15),
    (300_000.0, 0.20),
    (f64::INFINITY, 0.30),
];
const CESS_RATE: f64 = 0.04;

fn emi_schedule(binding: &Binding, result: f64) -> Vec<ProjectionRow> {
    let (Ok(p), Ok(r), Ok(n)) = (
        binding.number("P"),
        binding.number("R"),
        binding.number("N"),
    ) else {
        return Vec::new();
    };
    // Tenure slider tops out at 40 years
    let months = ((n * 12.0).round() as usize).min(480);
    amortization_rows(p, r, months, result)
}

fn fixed_deposit_growth(binding: &Binding, _result: f64) -> Vec<ProjectionRow> {
    let (Ok(p), Ok(r), Ok(t)) = (
        binding.number("P"),
        binding.number("R"),
        binding.number("T"),
    ) else {
        return Vec::new();
    };
    compound_growth_rows(p, r, (t.round() as usize).min(20))
}

fn sip_growth(binding: &Binding, _result: f64) -> Vec<ProjectionRow> {
    let (Ok(i), Ok(r), Ok(n)) = (
        binding.number("I"),
        binding.number("R"),
        binding.number("N"),
    ) else {
        return Vec::new();
    };
    contribution_growth_rows(i, r, (n.round() as usize).min(40))
}

fn retirement_schedule(binding: &Binding, _result: f64) -> Vec<ProjectionRow> {
    let (Ok(ca), Ok(ra), Ok(s), Ok(c), Ok(r)) = (
        binding.number("CA"),
        binding.number("RA"),
        binding.number("S"),
        binding.number("C"),
        binding.number("R"),
    ) else {
        return Vec::new();
    };
    let years = ((ra - ca).round().max(0.0) as usize).min(MAX_PERIODS);
    let monthly_rate = r / 1200.0;
    let mut corpus = s;
    let mut invested = 0.0_f64;
    let mut rows = Vec::with_capacity(years);

    for year in 1..=years {
        let opening = corpus;
        for _ in 0..12 {
            invested += c;
            corpus = (corpus + c) * (1.0 + monthly_rate);
        }
        rows.push(
            ProjectionRow::new()
                .cell("year", year.to_string())
                .cell("opening", amount(opening))
                .cell("invested", amount(invested))
                .cell("closing", amount(corpus)),
        );
    }

    rows
}

/// Corpus accumulated by retirement: current savings plus a fixed monthly
/// contribution, compounded monthly until retirement age.
fn retirement_corpus(binding: &Binding) -> Result<f64, ComputeError> {
    let ca = binding.number("CA")?;
    let ra = binding.number("RA")?;
    let s = binding.number("S")?;
    let c = binding.number("C")?;
    let r = binding.number("R")?;

    let months = (((ra - ca) * 12.0).round().max(0.0) as usize).min(MAX_PERIODS);
    let monthly_rate = r / 1200.0;
    let mut corpus = s;
    for _ in 0..months {
        corpus = (corpus + c) * (1.0 + monthly_rate);
    }
    Ok(corpus)
}

/// Slab-wise annual income tax plus cess. A piecewise rate table is not
/// expressible in the closed grammar, hence a routine.
fn income_tax(binding: &Binding) -> Result<f64, ComputeError> {
    let gross = binding.number("GROSS")?;

    let mut remaining = gross;
    let mut tax = 0.0;
    for (width, rate) in TAX_SLABS {
        let taxable = remaining.min(*width);
        tax += taxable * rate;
        remaining -= taxable;
        if remaining <= 0.0 {
            break;
        }
    }
    Ok(tax * (1.0 + CESS_RATE))
}

/// Day count between two calendar dates. Negative when the end precedes the
/// start; the presentation layer decides how to show that.
fn investment_duration(binding: &Binding) -> Result<f64, ComputeError> {
    let start = binding.date("start_date")?;
    let end = binding.date("end_date")?;
    Ok(end.signed_duration_since(start).num_days() as f64)
}

/// The full built-in catalog, in navigation order.
pub fn definitions() -> Vec<CalculatorDef> {
    vec![
        CalculatorDef {
            id: "emi",
            title: "EMI Calculator",
            description: "Calculate your Equated Monthly Installment (EMI) for a loan.",
            fields: vec![
                FieldDef::input("P", "Loan Amount")
                    .description("The total principal loan amount.")
                    .default_value("1000000"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 25.0, 0.1)
                    .description("The annual rate of interest.")
                    .default_value("8.5")
                    .unit("%"),
                FieldDef::slider("N", "Loan Tenure", 1.0, 40.0, 1.0)
                    .description("The duration of the loan in years.")
                    .default_value("20")
                    .unit("Years"),
            ],
            computation: Computation::Expression(
                "(P * (R/1200) * pow(1 + (R/1200), N*12)) / (pow(1 + (R/1200), N*12) - 1)",
            ),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Monthly EMI Payment",
            chart: Some(ChartSpec {
                total: "result * N * 12",
                slices: &[
                    BreakdownDef {
                        name: "Principal",
                        value: "P",
                        color: "#0ea5e9",
                    },
                    BreakdownDef {
                        name: "Total Interest",
                        value: "result * N * 12 - P",
                        color: "#f97316",
                    },
                ],
            }),
            projection: Some(ProjectionSpec {
                columns: EMI_COLUMNS,
                rows: emi_schedule,
            }),
        },
        CalculatorDef {
            id: "fixed-deposit",
            title: "Fixed Deposit Calculator",
            description: "Calculate the maturity value of your fixed deposit investment.",
            fields: vec![
                FieldDef::input("P", "Principal Amount")
                    .description("The initial amount of your investment.")
                    .default_value("100000"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 15.0, 0.1)
                    .description("The annual rate of interest.")
                    .default_value("6.5")
                    .unit("%"),
                FieldDef::slider("T", "Tenure", 1.0, 20.0, 1.0)
                    .description("The investment duration in years.")
                    .default_value("5")
                    .unit("Years"),
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
            projection: Some(ProjectionSpec {
                columns: GROWTH_COLUMNS,
                rows: fixed_deposit_growth,
            }),
        },
        CalculatorDef {
            id: "recurring-deposit",
            title: "Recurring Deposit Calculator",
            description: "Calculate the maturity value of your recurring deposit investment.",
            fields: vec![
                FieldDef::input("I", "Monthly Installment")
                    .description("The amount you invest each month.")
                    .default_value("5000"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 15.0, 0.1)
                    .description("The annual rate of interest.")
                    .default_value("7")
                    .unit("%"),
                FieldDef::slider("N", "Tenure", 1.0, 20.0, 1.0)
                    .description("The investment duration in years.")
                    .default_value("10")
                    .unit("Years"),
            ],
            computation: Computation::Expression(
                "I * ((pow(1 + R/1200, N*12) - 1) / (R/1200))",
            ),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Maturity Value",
            chart: Some(ChartSpec {
                total: "result",
                slices: &[
                    BreakdownDef {
                        name: "Invested",
                        value: "I * N * 12",
                        color: "#0ea5e9",
                    },
                    BreakdownDef {
                        name: "Interest",
                        value: "result - I * N * 12",
                        color: "#22c55e",
                    },
                ],
            }),
            projection: None,
        },
        CalculatorDef {
            id: "loan-eligibility",
            title: "Loan Eligibility Calculator",
            description: "Estimate the loan amount you may be eligible for.",
            fields: vec![
                FieldDef::input("I", "Monthly Income")
                    .description("Your gross monthly income.")
                    .default_value("50000"),
                FieldDef::input("E", "Monthly Expenses")
                    .description("Your total monthly expenses.")
                    .default_value("20000"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 25.0, 0.1)
                    .description("The expected annual interest rate.")
                    .default_value("10")
                    .unit("%"),
                FieldDef::slider("N", "Loan Tenure", 1.0, 40.0, 1.0)
                    .description("The desired loan tenure in years.")
                    .default_value("20")
                    .unit("Years"),
                FieldDef::slider("EMI_PERCENT", "Affordable EMI Percentage", 1.0, 80.0, 1.0)
                    .description(
                        "The percentage of your disposable income you want to use for the EMI.",
                    )
                    .default_value("50")
                    .unit("%"),
            ],
            computation: Computation::Expression(
                "(((I - E) * (EMI_PERCENT/100)) * (pow(1 + (R/1200), N*12) - 1)) / ((R/1200) * pow(1 + (R/1200), N*12))",
            ),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Eligible Loan Amount",
            chart: None,
            projection: None,
        },
        CalculatorDef {
            id: "sip",
            title: "SIP Calculator",
            description: "Project the future value of a monthly systematic investment plan.",
            fields: vec![
                FieldDef::input("I", "Monthly Investment")
                    .description("The amount you invest each month.")
                    .default_value("5000"),
                FieldDef::slider("R", "Expected Annual Return", 1.0, 30.0, 0.5)
                    .description("The expected annual rate of return.")
                    .default_value("12")
                    .unit("%"),
                FieldDef::slider("N", "Investment Period", 1.0, 40.0, 1.0)
                    .description("How long you plan to keep investing.")
                    .default_value("10")
                    .unit("Years"),
            ],
            computation: Computation::Expression(
                "I * ((pow(1 + R/1200, N*12) - 1) / (R/1200)) * (1 + R/1200)",
            ),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Projected Value",
            chart: Some(ChartSpec {
                total: "result",
                slices: &[
                    BreakdownDef {
                        name: "Invested",
                        value: "I * N * 12",
                        color: "#0ea5e9",
                    },
                    BreakdownDef {
                        name: "Estimated Gains",
                        value: "result - I * N * 12",
                        color: "#8b5cf6",
                    },
                ],
            }),
            projection: Some(ProjectionSpec {
                columns: SIP_COLUMNS,
                rows: sip_growth,
            }),
        },
        CalculatorDef {
            id: "simple-interest",
            title: "Simple Interest Calculator",
            description: "Calculate the maturity amount on a simple-interest deposit or loan.",
            fields: vec![
                FieldDef::input("P", "Principal Amount")
                    .description("The initial amount.")
                    .default_value("10000"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 25.0, 0.1)
                    .description("The annual rate of interest.")
                    .default_value("6")
                    .unit("%"),
                FieldDef::slider("T", "Period", 1.0, 30.0, 1.0)
                    .description("The duration in years.")
                    .default_value("3")
                    .unit("Years"),
            ],
            computation: Computation::Expression("P + (P * R * T / 100)"),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Maturity Amount",
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
        },
        CalculatorDef {
            id: "debt-payoff",
            title: "Debt Payoff Calculator",
            description: "Find out how many months it takes to clear a debt at a fixed payment.",
            fields: vec![
                FieldDef::input("P", "Outstanding Balance")
                    .description("The amount you currently owe.")
                    .default_value("100000"),
                FieldDef::slider("R", "Annual Interest Rate", 1.0, 36.0, 0.1)
                    .description("The annual rate of interest on the debt.")
                    .default_value("18")
                    .unit("%"),
                FieldDef::input("M", "Monthly Payment")
                    .description("The fixed amount you pay each month.")
                    .default_value("5000"),
            ],
            computation: Computation::Expression(
                "log(M / (M - P * (R/1200))) / log(1 + R/1200)",
            ),
            result_prefix: None,
            result_suffix: Some(" Months"),
            result_description: "Time to Debt Freedom",
            chart: Some(ChartSpec {
                total: "M * result",
                slices: &[
                    BreakdownDef {
                        name: "Principal",
                        value: "P",
                        color: "#0ea5e9",
                    },
                    BreakdownDef {
                        name: "Interest",
                        value: "M * result - P",
                        color: "#ef4444",
                    },
                ],
            }),
            projection: None,
        },
        CalculatorDef {
            id: "retirement-corpus",
            title: "Retirement Corpus Calculator",
            description: "Project the corpus your savings and contributions grow to by retirement.",
            fields: vec![
                FieldDef::slider("CA", "Current Age", 18.0, 65.0, 1.0)
                    .description("Your age today.")
                    .default_value("30")
                    .unit("Years"),
                FieldDef::slider("RA", "Retirement Age", 30.0, 75.0, 1.0)
                    .description("The age you plan to retire at.")
                    .default_value("60")
                    .unit("Years"),
                FieldDef::input("S", "Current Savings")
                    .description("What you have saved so far.")
                    .default_value("500000"),
                FieldDef::input("C", "Monthly Contribution")
                    .description("The amount you add each month.")
                    .default_value("10000"),
                FieldDef::slider("R", "Expected Annual Return", 1.0, 20.0, 0.5)
                    .description("The expected annual rate of return on the corpus.")
                    .default_value("10")
                    .unit("%"),
            ],
            computation: Computation::Routine(retirement_corpus),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Corpus at Retirement",
            chart: None,
            projection: Some(ProjectionSpec {
                columns: RETIREMENT_COLUMNS,
                rows: retirement_schedule,
            }),
        },
        CalculatorDef {
            id: "income-tax",
            title: "Income Tax Calculator",
            description: "Estimate your annual income tax under slab rates.",
            fields: vec![FieldDef::input("GROSS", "Annual Income")
                .description("Your gross annual taxable income.")
                .default_value("1200000")],
            computation: Computation::Routine(income_tax),
            result_prefix: Some("₹"),
            result_suffix: None,
            result_description: "Annual Income Tax",
            chart: Some(ChartSpec {
                total: "GROSS",
                slices: &[
                    BreakdownDef {
                        name: "Tax Payable",
                        value: "result",
                        color: "#ef4444",
                    },
                    BreakdownDef {
                        name: "Take-home",
                        value: "GROSS - result",
                        color: "#22c55e",
                    },
                ],
            }),
            projection: None,
        },
        CalculatorDef {
            id: "investment-duration",
            title: "Investment Duration Calculator",
            description: "Count the days between an investment's start and maturity dates.",
            fields: vec![
                FieldDef::date("start_date", "Start Date")
                    .description("The date the investment begins.")
                    .default_value("2024-01-01"),
                FieldDef::date("end_date", "Maturity Date")
                    .description("The date the investment matures.")
                    .default_value("2025-01-01"),
            ],
            computation: Computation::Routine(investment_duration),
            result_prefix: None,
            result_suffix: Some(" Days"),
            result_description: "Investment Period",
            chart: None,
            projection: None,
        },
    ]
}
