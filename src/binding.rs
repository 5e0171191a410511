//! Raw form input to validated binding conversion.
//!
//! A binding is only produced when every field is ready; anything less is a
//! `NotReady`, which the orchestrator treats as a silent reset rather than an
//! error. This mirrors real-time form entry, where half-typed or cleared
//! fields are the normal state, not a fault.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{Binding, FieldDef, FieldValue, ValueKind};

/// Outcome of binding raw field text against a calculator's field definitions.
#[derive(Clone, Debug, PartialEq)]
pub enum BindingOutcome {
    /// Every field parsed and passed its domain checks.
    Ready(Binding),
    /// At least one field is empty, unparsable, or out of domain.
    NotReady,
}

impl BindingOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, BindingOutcome::Ready(_))
    }
}

/// Build a validated binding from the raw text of every field.
///
/// A number field is ready iff its trimmed text is non-empty and parses to a
/// finite, non-negative value. A date field is ready iff its trimmed text
/// parses as an ISO calendar date (`YYYY-MM-DD`).
pub fn bind(fields: &[FieldDef], raw: &HashMap<String, String>) -> BindingOutcome {
    let mut binding = Binding::with_capacity(fields.len());

    for field in fields {
        let text = match raw.get(field.name) {
            Some(text) => text.trim(),
            None => return BindingOutcome::NotReady,
        };
        if text.is_empty() {
            return BindingOutcome::NotReady;
        }

        let value = match field.kind {
            ValueKind::Number => match text.parse::<f64>() {
                Ok(n) if n.is_finite() && n >= 0.0 => FieldValue::Number(n),
                _ => return BindingOutcome::NotReady,
            },
            ValueKind::Date => match text.parse::<NaiveDate>() {
                Ok(d) => FieldValue::Date(d),
                Err(_) => return BindingOutcome::NotReady,
            },
        };
        binding.insert(field.name, value);
    }

    BindingOutcome::Ready(binding)
}

/// Seed the raw value map from field defaults, as the presentation layer does
/// when switching calculators. Fields without a default start empty.
pub fn default_raw_values(fields: &[FieldDef]) -> HashMap<String, String> {
    fields
        .iter()
        .map(|f| {
            (
                f.name.to_string(),
                f.default_value.unwrap_or("").to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BindingExt;
    use rstest::rstest;

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::input("P", "Loan Amount").default_value("1000000"),
            FieldDef::slider("R", "Annual Interest Rate", 1.0, 25.0, 0.1).default_value("8.5"),
        ]
    }

    fn raw(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bind_ready() {
        let outcome = bind(&fields(), &raw(&[("P", "1000000"), ("R", "8.5")]));
        let binding = match outcome {
            BindingOutcome::Ready(binding) => binding,
            BindingOutcome::NotReady => panic!("expected ready binding"),
        };
        assert_eq!(binding.number("P").unwrap(), 1_000_000.0);
        assert_eq!(binding.number("R").unwrap(), 8.5);
    }

    #[test]
    fn test_bind_trims_whitespace() {
        let outcome = bind(&fields(), &raw(&[("P", "  500 "), ("R", "8.5")]));
        assert!(outcome.is_ready());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("abc")]
    #[case("-1")]
    #[case("NaN")]
    #[case("inf")]
    fn test_bind_not_ready_on_bad_number(#[case] bad: &str) {
        let outcome = bind(&fields(), &raw(&[("P", bad), ("R", "8.5")]));
        assert_eq!(outcome, BindingOutcome::NotReady);
    }

    #[test]
    fn test_bind_not_ready_on_missing_field() {
        let outcome = bind(&fields(), &raw(&[("P", "1000000")]));
        assert_eq!(outcome, BindingOutcome::NotReady);
    }

    #[test]
    fn test_bind_zero_is_ready() {
        // Zero passes the non-negativity check; whether it is computable is
        // the orchestrator's concern.
        let outcome = bind(&fields(), &raw(&[("P", "1000000"), ("R", "0")]));
        assert!(outcome.is_ready());
    }

    #[test]
    fn test_bind_date_field() {
        let date_fields = vec![
            FieldDef::date("start_date", "Start Date"),
            FieldDef::date("end_date", "End Date"),
        ];

        let outcome = bind(
            &date_fields,
            &raw(&[("start_date", "2024-01-01"), ("end_date", "2024-12-31")]),
        );
        let binding = match outcome {
            BindingOutcome::Ready(binding) => binding,
            BindingOutcome::NotReady => panic!("expected ready binding"),
        };
        assert_eq!(
            binding.date("start_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );

        let outcome = bind(
            &date_fields,
            &raw(&[("start_date", "01/01/2024"), ("end_date", "2024-12-31")]),
        );
        assert_eq!(outcome, BindingOutcome::NotReady);
    }

    #[test]
    fn test_default_raw_values() {
        let defaults = default_raw_values(&fields());
        assert_eq!(defaults.get("P").map(String::as_str), Some("1000000"));
        assert_eq!(defaults.get("R").map(String::as_str), Some("8.5"));

        let no_default = vec![FieldDef::input("X", "X")];
        let defaults = default_raw_values(&no_default);
        assert_eq!(defaults.get("X").map(String::as_str), Some(""));
    }
}
