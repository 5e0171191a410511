use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize, value},
    multi::separated_list0,
    number::complete::recognize_float,
    sequence::delimited,
    IResult, Parser,
};

use crate::error::FormulaError;
use crate::formula::ast::{BinaryOp, Expr, UnaryOp};

/// Parse a formula expression string into an AST.
pub fn parse(input: &str) -> Result<Expr, FormulaError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormulaError::EmptyExpression);
    }

    match parse_expr(input) {
        Ok((remaining, expr)) => {
            let remaining = remaining.trim();
            if remaining.is_empty() {
                Ok(expr)
            } else {
                Err(FormulaError::ParseError {
                    position: input.len() - remaining.len(),
                    message: format!("unexpected characters: '{}'", remaining),
                })
            }
        }
        Err(e) => Err(FormulaError::ParseError {
            position: 0,
            message: format!("parse error: {:?}", e),
        }),
    }
}

fn ws<'a, F>(inner: F) -> impl Parser<&'a str, Output = F::Output, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn parse_expr(input: &str) -> IResult<&str, Expr> {
    parse_additive(input)
}

fn parse_additive(input: &str) -> IResult<&str, Expr> {
    let (input, left) = parse_multiplicative(input)?;
    parse_binary_chain(input, left, parse_additive_op, parse_multiplicative)
}

fn parse_additive_op(input: &str) -> IResult<&str, BinaryOp> {
    ws(alt((
        value(BinaryOp::Add, char('+')),
        value(BinaryOp::Sub, char('-')),
    )))
    .parse(input)
}

fn parse_multiplicative(input: &str) -> IResult<&str, Expr> {
    let (input, left) = parse_unary(input)?;
    parse_binary_chain(input, left, parse_multiplicative_op, parse_unary)
}

fn parse_multiplicative_op(input: &str) -> IResult<&str, BinaryOp> {
    ws(alt((
        value(BinaryOp::Mul, char('*')),
        value(BinaryOp::Div, char('/')),
    )))
    .parse(input)
}

fn parse_binary_chain<'a, F, G>(
    mut input: &'a str,
    mut left: Expr,
    mut op_parser: F,
    mut expr_parser: G,
) -> IResult<&'a str, Expr>
where
    F: FnMut(&'a str) -> IResult<&'a str, BinaryOp>,
    G: FnMut(&'a str) -> IResult<&'a str, Expr>,
{
    loop {
        match op_parser(input) {
            Ok((remaining, op)) => {
                let (remaining, right) = expr_parser(remaining)?;
                left = Expr::binary(op, left, right);
                input = remaining;
            }
            Err(_) => return Ok((input, left)),
        }
    }
}

fn parse_unary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;

    // Try negation
    if let Ok((input, _)) = char::<&str, nom::error::Error<&str>>('-').parse(input) {
        let (input, _) = multispace0(input)?;
        let (input, expr) = parse_unary(input)?;
        return Ok((input, Expr::unary(UnaryOp::Neg, expr)));
    }

    parse_primary(input)
}

fn parse_primary(input: &str) -> IResult<&str, Expr> {
    let (input, _) = multispace0(input)?;

    alt((
        parse_parenthesized,
        parse_function_call,
        parse_number,
        parse_variable,
    ))
    .parse(input)
}

fn parse_parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(
        (char('('), multispace0),
        parse_expr,
        (multispace0, char(')')),
    )
    .parse(input)
}

fn parse_number(input: &str) -> IResult<&str, Expr> {
    map(recognize_float, |s: &str| {
        Expr::Number(s.parse().unwrap_or(0.0))
    })
    .parse(input)
}

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        opt(take_while1(|c: char| c.is_alphanumeric() || c == '_')),
    ))
    .parse(input)
}

fn parse_variable(input: &str) -> IResult<&str, Expr> {
    map(parse_identifier, |s: &str| Expr::Variable(s.to_string())).parse(input)
}

fn parse_function_call(input: &str) -> IResult<&str, Expr> {
    let (input, name) = parse_identifier(input)?;

    // Must have opening parenthesis after the name (with optional whitespace)
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(').parse(input)?;
    let (input, _) = multispace0(input)?;

    let (input, args) =
        separated_list0((multispace0, char(','), multispace0), parse_expr).parse(input)?;

    let (input, _) = multispace0(input)?;
    let (input, _) = char(')').parse(input)?;

    Ok((input, Expr::function_call(name, args)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        let expr = parse("42").unwrap();
        assert!(matches!(expr, Expr::Number(n) if (n - 42.0).abs() < f64::EPSILON));

        let expr = parse("3.5").unwrap();
        assert!(matches!(expr, Expr::Number(n) if (n - 3.5).abs() < f64::EPSILON));

        let expr = parse("-5").unwrap();
        assert!(matches!(
            expr,
            Expr::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse("EMI_PERCENT").unwrap();
        assert!(matches!(expr, Expr::Variable(ref s) if s == "EMI_PERCENT"));

        let expr = parse("P").unwrap();
        assert!(matches!(expr, Expr::Variable(ref s) if s == "P"));
    }

    #[test]
    fn test_parse_binary_ops() {
        let expr = parse("1 + 2").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));

        let expr = parse("a - b").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Sub,
                ..
            }
        ));

        let expr = parse("x * y").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));

        let expr = parse("a / b").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Div,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_precedence() {
        // Multiplication binds tighter than addition
        let expr = parse("1 + 2 * 3").unwrap();
        if let Expr::Binary { op, left, right } = expr {
            assert_eq!(op, BinaryOp::Add);
            assert!(matches!(*left, Expr::Number(_)));
            assert!(matches!(
                *right,
                Expr::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let expr = parse("(1 + 2) * 3").unwrap();
        if let Expr::Binary { op, left, .. } = expr {
            assert_eq!(op, BinaryOp::Mul);
            assert!(matches!(
                *left,
                Expr::Binary {
                    op: BinaryOp::Add,
                    ..
                }
            ));
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_parse_function_call() {
        let expr = parse("pow(a, b)").unwrap();
        if let Expr::FunctionCall { name, args } = expr {
            assert_eq!(name, "pow");
            assert_eq!(args.len(), 2);
        } else {
            panic!("Expected function call");
        }

        let expr = parse("log(x)").unwrap();
        if let Expr::FunctionCall { name, args } = expr {
            assert_eq!(name, "log");
            assert_eq!(args.len(), 1);
        } else {
            panic!("Expected function call");
        }
    }

    #[test]
    fn test_parse_nested_functions() {
        let expr = parse("log(pow(a, b))").unwrap();
        if let Expr::FunctionCall { name, args } = expr {
            assert_eq!(name, "log");
            assert_eq!(args.len(), 1);
            assert!(matches!(args[0], Expr::FunctionCall { .. }));
        } else {
            panic!("Expected function call");
        }
    }

    #[test]
    fn test_parse_emi_formula() {
        // The EMI closed form, exactly as the catalog declares it.
        let expr = parse(
            "(P * (R/1200) * pow(1 + (R/1200), N*12)) / (pow(1 + (R/1200), N*12) - 1)",
        )
        .unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Div,
                ..
            }
        ));
        assert_eq!(expr.variables(), vec!["P", "R", "N"]);
    }

    #[test]
    fn test_parse_result_reference() {
        let expr = parse("result - P").unwrap();
        if let Expr::Binary { op, left, right } = expr {
            assert_eq!(op, BinaryOp::Sub);
            assert!(matches!(*left, Expr::Variable(ref s) if s == "result"));
            assert!(matches!(*right, Expr::Variable(ref s) if s == "P"));
        } else {
            panic!("Expected binary expression");
        }
    }

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(matches!(result, Err(FormulaError::EmptyExpression)));

        let result = parse("   ");
        assert!(matches!(result, Err(FormulaError::EmptyExpression)));
    }

    #[test]
    fn test_parse_error() {
        let result = parse("1 +");
        assert!(result.is_err());

        let result = parse("1 + 2 @");
        assert!(result.is_err());

        let result = parse("((1 + 2)");
        assert!(result.is_err());
    }
}
