//! turns a String expression into a symbolic expression
//!
//! The parser is a recursive descent over a closed grammar. Identifiers are resolved
//! against the whitelist the moment they are read, so a name that is not one of
//! `x, sin, cos, tan, exp, log, sqrt, pi, abs, pow` stops the parse with
//! `EvaluationError::UnknownIdentifier`. Nothing in the input is ever looked up or
//! executed; the output is a plain `Expr` tree.
//!
//!# Example
//! ```
//! use RustedLagrange::symbolic::symbolic_engine::Expr;
//! let parsed_expression = Expr::parse_expression("sin(x) + 0.5*x**2").unwrap();
//! println!(" parsed_expression {}", parsed_expression);
//! assert!(Expr::parse_expression("__import__('os')").is_err());
//! ```
//
//                  precedence, loosest first
//                |  expression   term (('+'|'-') term)*          |
//                |  term         unary (('*'|'/') unary)*         |
//                |  unary        ('+'|'-') unary | power          |
//                |  power        primary (('**'|'^') unary)?      |
//                |  primary      number | '(' expression ')'      |
//                |               | x | pi | name '(' args ')'      |
//
// '**' is right associative and binds tighter than unary minus: -x**2 == -(x**2), 2**-1 == 0.5
use crate::symbolic::evaluation_error::EvaluationError;
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{cut, opt, recognize},
    error::{ErrorKind, ParseError},
    multi::{fold_many0, many0},
    number::complete::recognize_float,
    sequence::{pair, preceded, terminated},
};
use std::f64::consts::PI;

/// longer inputs are rejected before parsing, the descent is recursive
pub const MAX_EXPRESSION_LENGTH: usize = 1024;
/// maximal depth of nested brackets
pub const MAX_NESTING: usize = 64;

const UNARY_FUNCTIONS: [&str; 7] = ["sin", "cos", "tan", "exp", "log", "sqrt", "abs"];

/// internal error of the nom parsers, turned into EvaluationError at the top
#[derive(Debug, Clone, PartialEq)]
enum ExprParseError<'a> {
    Nom { input: &'a str, kind: ErrorKind },
    Expected { input: &'a str, what: String },
    UnknownIdentifier(String),
}

impl<'a> ParseError<&'a str> for ExprParseError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        ExprParseError::Nom { input, kind }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ExprParseError<'a> {
    fn into_evaluation_error(self, source: &str) -> EvaluationError {
        match self {
            ExprParseError::Nom { input, .. } => EvaluationError::syntax(
                char_position(source, input),
                if input.trim().is_empty() {
                    "unexpected end of expression".to_string()
                } else {
                    format!(
                        "expected a number, x, pi, a function call or '(' but found '{}'",
                        input.trim()
                    )
                },
            ),
            ExprParseError::Expected { input, what } => {
                EvaluationError::syntax(char_position(source, input), format!("expected {}", what))
            }
            ExprParseError::UnknownIdentifier(name) => EvaluationError::UnknownIdentifier(name),
        }
    }
}

type PResult<'a, T> = IResult<&'a str, T, ExprParseError<'a>>;

/// char offset of the suffix `rest` inside `source`
fn char_position(source: &str, rest: &str) -> usize {
    let consumed = source.len().saturating_sub(rest.len());
    source
        .get(..consumed)
        .map(|s| s.chars().count())
        .unwrap_or(0)
}

fn spaces<'a>(input: &'a str) -> PResult<'a, &'a str> {
    multispace0(input)
}

fn sym<'a>(c: char) -> impl Parser<&'a str, Output = char, Error = ExprParseError<'a>> {
    preceded(spaces, char(c))
}

fn op<'a>(t: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = ExprParseError<'a>> {
    preceded(spaces, tag(t))
}

/// turns a recoverable error of `parser` into a hard failure with a readable message
fn expect<'a, O, F>(mut parser: F, what: String) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    F: Parser<&'a str, Output = O, Error = ExprParseError<'a>>,
{
    move |input: &'a str| match parser.parse(input) {
        Err(nom::Err::Error(_)) => Err(nom::Err::Failure(ExprParseError::Expected {
            input,
            what: what.clone(),
        })),
        other => other,
    }
}

/// unsigned decimal literal: 2, 2.5, .5, 2., 1e-3. Signs are left to `unary`
fn number<'a>(input: &'a str) -> PResult<'a, Expr> {
    if !input.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Err(nom::Err::Error(ExprParseError::from_error_kind(
            input,
            ErrorKind::Float,
        )));
    }
    let (rest, text) = recognize_float::<_, ExprParseError>(input)?;
    match text.parse::<f64>() {
        Ok(value) => Ok((rest, Expr::Const(value))),
        Err(_) => Err(nom::Err::Failure(ExprParseError::Expected {
            input,
            what: "a valid number".to_string(),
        })),
    }
}

/// word characters, same shape as a task file key
fn identifier<'a>(input: &'a str) -> PResult<'a, &'a str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// '(' arg (',' arg)* ')' with exactly `arity` arguments
fn call_arguments<'a>(input: &'a str, name: &str, arity: usize) -> PResult<'a, Vec<Expr>> {
    let (mut input, _) = expect(sym('('), format!("'(' after '{}'", name))(input)?;
    let mut args = Vec::with_capacity(arity);
    for i in 0..arity {
        if i > 0 {
            let (rest, _) = expect(
                sym(','),
                format!("',' followed by argument {} of '{}'", i + 1, name),
            )(input)?;
            input = rest;
        }
        let (rest, arg) = cut(expression).parse(input)?;
        args.push(arg);
        input = rest;
    }
    let closing = if arity == 1 {
        format!("')' closing '{}' which takes one argument", name)
    } else {
        format!("')' closing '{}' which takes {} arguments", name, arity)
    };
    let (input, _) = expect(sym(')'), closing)(input)?;
    Ok((input, args))
}

/// x, pi or a call of a whitelisted function; any other name fails the whole parse
fn named<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (rest, name) = identifier(input)?;
    match name {
        "x" => Ok((rest, Expr::x())),
        "pi" => Ok((rest, Expr::Const(PI))),
        "pow" => {
            let (rest, mut args) = call_arguments(rest, name, 2)?;
            let exponent = args.pop().unwrap_or(Expr::Const(1.0));
            let base = args.pop().unwrap_or(Expr::Const(1.0));
            Ok((rest, base.pow(exponent)))
        }
        f if UNARY_FUNCTIONS.contains(&f) => {
            let (rest, mut args) = call_arguments(rest, name, 1)?;
            let arg = args.pop().unwrap_or(Expr::Const(0.0)).boxed();
            let expr = match f {
                "sin" => Expr::sin(arg),
                "cos" => Expr::cos(arg),
                "tan" => Expr::tg(arg),
                "exp" => Expr::Exp(arg),
                "log" => Expr::Ln(arg),
                "sqrt" => Expr::Sqrt(arg),
                _ => Expr::Abs(arg),
            };
            Ok((rest, expr))
        }
        _ => Err(nom::Err::Failure(ExprParseError::UnknownIdentifier(
            name.to_string(),
        ))),
    }
}

fn parenthesised<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (input, _) = sym('(').parse(input)?;
    let (input, inner) = cut(expression).parse(input)?;
    let (input, _) = expect(sym(')'), "')'".to_string())(input)?;
    Ok((input, inner))
}

fn primary<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (input, _) = spaces(input)?;
    alt((number, parenthesised, named)).parse(input)
}

/// any run of leading '+'/'-'; true when the minus signs do not cancel out
fn signs<'a>(input: &'a str) -> PResult<'a, bool> {
    let (input, signs) = many0(preceded(spaces, one_of("+-"))).parse(input)?;
    let negative = signs.iter().filter(|sign| **sign == '-').count() % 2 == 1;
    Ok((input, negative))
}

fn negate_if(negative: bool, expr: Expr) -> Expr {
    match (negative, expr) {
        (false, expr) => expr,
        (true, Expr::Const(value)) => Expr::Const(-value),
        (true, expr) => -expr,
    }
}

/// primary ('**' signs primary)*, folded from the right; no recursion per operator
fn power<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (mut input, base) = primary(input)?;
    let mut exponents: Vec<(bool, Expr)> = Vec::new();
    loop {
        let (rest, power_op) = opt(alt((op("**"), op("^")))).parse(input)?;
        if power_op.is_none() {
            break;
        }
        let (rest, negative) = signs(rest)?;
        let (rest, operand) = cut(primary).parse(rest)?;
        exponents.push((negative, operand));
        input = rest;
    }
    let exponent = exponents
        .into_iter()
        .rev()
        .fold(None, |acc: Option<Expr>, (negative, operand)| {
            let operand = match acc {
                Some(exponent) => operand.pow(exponent),
                None => operand,
            };
            Some(negate_if(negative, operand))
        });
    match exponent {
        Some(exponent) => Ok((input, base.pow(exponent))),
        None => Ok((input, base)),
    }
}

fn unary<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (rest, negative) = signs(input)?;
    if rest.len() == input.len() {
        return power(input);
    }
    let (rest, operand) = cut(power).parse(rest)?;
    Ok((rest, negate_if(negative, operand)))
}

fn term<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (input, init) = unary(input)?;
    fold_many0(
        pair(preceded(spaces, one_of("*/")), cut(unary)),
        move || init.clone(),
        |acc, (op, rhs)| if op == '*' { acc * rhs } else { acc / rhs },
    )
    .parse(input)
}

fn expression<'a>(input: &'a str) -> PResult<'a, Expr> {
    let (input, init) = term(input)?;
    fold_many0(
        pair(preceded(spaces, one_of("+-")), cut(term)),
        move || init.clone(),
        |acc, (op, rhs)| if op == '+' { acc + rhs } else { acc - rhs },
    )
    .parse(input)
}

/// rejects inputs the recursive descent should not even start on
fn check_limits(input: &str) -> Result<(), EvaluationError> {
    if input.trim().is_empty() {
        return Err(EvaluationError::syntax(0, "empty expression"));
    }
    let length = input.chars().count();
    if length > MAX_EXPRESSION_LENGTH {
        return Err(EvaluationError::syntax(
            MAX_EXPRESSION_LENGTH,
            format!(
                "expression is {} characters long, at most {} are accepted",
                length, MAX_EXPRESSION_LENGTH
            ),
        ));
    }
    let mut depth = 0usize;
    for (i, c) in input.chars().enumerate() {
        match c {
            '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(EvaluationError::syntax(
                        i,
                        format!("brackets nested deeper than {}", MAX_NESTING),
                    ));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Parses the whole input into an expression tree; trailing input is an error.
pub fn parse_expression_func(input: &str) -> Result<Expr, EvaluationError> {
    check_limits(input)?;
    match terminated(expression, spaces).parse(input) {
        Ok(("", expr)) => {
            debug!("parsed '{}' into {}", input, expr);
            Ok(expr)
        }
        Ok((rest, _)) => Err(EvaluationError::syntax(
            char_position(input, rest),
            format!("unexpected input '{}'", rest),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.into_evaluation_error(input)),
        Err(nom::Err::Incomplete(_)) => Err(EvaluationError::syntax(
            input.chars().count(),
            "unexpected end of expression",
        )),
    }
}

impl Expr {
    /// Parses a whitelisted expression string, see the module docs for the grammar.
    pub fn parse_expression(input: &str) -> Result<Expr, EvaluationError> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Box<Expr> {
        Box::new(Expr::x())
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("42").unwrap(), Expr::Const(42.0));
        assert_eq!(parse_expression_func("2.5e-1").unwrap(), Expr::Const(0.25));
        assert_eq!(parse_expression_func(".5").unwrap(), Expr::Const(0.5));
        assert_eq!(parse_expression_func("pi").unwrap(), Expr::Const(PI));
        assert_eq!(parse_expression_func("2.").unwrap(), Expr::Const(2.0));
        assert_eq!(parse_expression_func("1e-3").unwrap(), Expr::Const(1e-3));
        assert!(parse_expression_func("1e").is_err());
    }

    #[test]
    fn test_decimal_as_last_token_keeps_its_fraction() {
        let half = Box::new(Expr::Const(0.5));
        assert_eq!(parse_expression_func("0.5").unwrap(), Expr::Const(0.5));
        assert_eq!(
            parse_expression_func("x + 0.5").unwrap(),
            Expr::Add(x(), half.clone())
        );
        assert_eq!(
            parse_expression_func("x**0.5").unwrap(),
            Expr::Pow(x(), half.clone())
        );
        assert_eq!(
            parse_expression_func("x**-0.5").unwrap(),
            Expr::Pow(x(), Box::new(Expr::Const(-0.5)))
        );
        assert_eq!(
            parse_expression_func("1 + 2.75").unwrap(),
            Expr::Add(Box::new(Expr::Const(1.0)), Box::new(Expr::Const(2.75)))
        );
        assert_eq!(
            parse_expression_func("(x*2.5)").unwrap(),
            Expr::Mul(x(), Box::new(Expr::Const(2.5)))
        );
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_expression_func("x").unwrap(), Expr::x());
        assert_eq!(parse_expression_func("  x  ").unwrap(), Expr::x());
    }

    #[test]
    fn test_parse_addition_is_left_associative() {
        let expr = parse_expression_func("x - 2 - 1").unwrap();
        assert_eq!(
            expr,
            Expr::Sub(
                Box::new(Expr::Sub(x(), Box::new(Expr::Const(2.0)))),
                Box::new(Expr::Const(1.0))
            )
        );
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse_expression_func("sin(x) + 0.5*x").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::sin(x())),
                Box::new(Expr::Mul(Box::new(Expr::Const(0.5)), x()))
            )
        );
    }

    #[test]
    fn test_parse_power_both_notations() {
        let expected = Expr::Pow(x(), Box::new(Expr::Const(2.0)));
        assert_eq!(parse_expression_func("x**2").unwrap(), expected);
        assert_eq!(parse_expression_func("x^2").unwrap(), expected);
        assert_eq!(parse_expression_func("pow(x, 2)").unwrap(), expected);
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_minus() {
        let expr = parse_expression_func("2**3**2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Const(2.0)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Const(3.0)),
                    Box::new(Expr::Const(2.0))
                ))
            )
        );
        let expr = parse_expression_func("-x**2").unwrap();
        assert_eq!(expr, -Expr::Pow(x(), Box::new(Expr::Const(2.0))));
        let expr = parse_expression_func("2**-x").unwrap();
        assert_eq!(expr, Expr::Pow(Box::new(Expr::Const(2.0)), Box::new(-Expr::x())));
    }

    #[test]
    fn test_parse_all_functions() {
        for (input, expected) in [
            ("sin(x)", Expr::sin(x())),
            ("cos(x)", Expr::cos(x())),
            ("tan(x)", Expr::tg(x())),
            ("exp(x)", Expr::Exp(x())),
            ("log(x)", Expr::Ln(x())),
            ("sqrt(x)", Expr::Sqrt(x())),
            ("abs(x)", Expr::Abs(x())),
        ] {
            assert_eq!(parse_expression_func(input).unwrap(), expected, "{}", input);
        }
    }

    #[test]
    fn test_parse_nested() {
        let expr = parse_expression_func("sin(cos(x))").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::cos(x()))));
        let expr = parse_expression_func("(x + 1) * (x - 1)").unwrap();
        assert_eq!(
            expr,
            Expr::Mul(
                Box::new(Expr::Add(x(), Box::new(Expr::Const(1.0)))),
                Box::new(Expr::Sub(x(), Box::new(Expr::Const(1.0))))
            )
        );
    }

    #[test]
    fn test_display_parses_back() {
        let expr = parse_expression_func("-x**2 + pow(abs(x), 0.5) / exp(-x)").unwrap();
        let printed = expr.to_string();
        assert_eq!(parse_expression_func(&printed).unwrap(), expr);
    }

    #[test]
    fn test_unknown_identifiers_are_rejected() {
        for input in ["__import__('os')", "open", "y", "Sin(x)", "sinx", "e", "os.system"] {
            let err = parse_expression_func(input).unwrap_err();
            assert!(
                matches!(err, EvaluationError::UnknownIdentifier(_)),
                "{} -> {:?}",
                input,
                err
            );
        }
        assert_eq!(
            parse_expression_func("x + open(x)").unwrap_err(),
            EvaluationError::UnknownIdentifier("open".to_string())
        );
    }

    #[test]
    fn test_attribute_and_item_access_are_syntax_errors() {
        for input in ["x.real", "x[0]", "x; x", "'x'", "x(2)", "pi(1)", "lambda: x"] {
            let err = parse_expression_func(input).unwrap_err();
            assert!(
                matches!(
                    err,
                    EvaluationError::Syntax { .. } | EvaluationError::UnknownIdentifier(_)
                ),
                "{} -> {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_invalid_expression() {
        assert!(matches!(
            parse_expression_func("(x +"),
            Err(EvaluationError::Syntax { .. })
        ));
        assert!(parse_expression_func("(x + 1").is_err());
        assert!(parse_expression_func("x + 1)").is_err());
        assert!(parse_expression_func("").is_err());
        assert!(parse_expression_func("   ").is_err());
        assert!(parse_expression_func("2x").is_err());
        assert!(parse_expression_func("x * * 2").is_err());
    }

    #[test]
    fn test_wrong_arity() {
        let err = parse_expression_func("sin(x, 1)").unwrap_err();
        match err {
            EvaluationError::Syntax { position, message } => {
                assert_eq!(position, 5);
                assert!(message.contains("sin"), "{}", message);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(parse_expression_func("pow(x)").is_err());
        assert!(parse_expression_func("sin").is_err());
        assert!(parse_expression_func("sin()").is_err());
    }

    #[test]
    fn test_limits() {
        let deep = format!("{}x{}", "(".repeat(MAX_NESTING + 1), ")".repeat(MAX_NESTING + 1));
        assert!(parse_expression_func(&deep).is_err());
        let ok = format!("{}x{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(parse_expression_func(&ok).unwrap(), Expr::x());
        let long = "x+".repeat(MAX_EXPRESSION_LENGTH) + "x";
        assert!(parse_expression_func(&long).is_err());
    }

    #[test]
    fn test_long_runs_of_signs_and_powers_stay_within_the_stack() {
        // test threads get a 2 MB stack; every one of these fits the length limit
        let even = "-".repeat(1000) + "x";
        assert_eq!(parse_expression_func(&even).unwrap(), Expr::x());
        let odd = "- ".repeat(501) + "x";
        assert_eq!(parse_expression_func(&odd).unwrap(), -Expr::x());
        let mixed = "+-".repeat(500) + "3";
        assert_eq!(parse_expression_func(&mixed).unwrap(), Expr::Const(3.0));
        let tower = "x".to_string() + &"**-1".repeat(250);
        assert!(parse_expression_func(&tower).is_ok());
    }

    #[test]
    fn test_signs_fold_into_the_operand() {
        assert_eq!(parse_expression_func("--x").unwrap(), Expr::x());
        assert_eq!(parse_expression_func("+x").unwrap(), Expr::x());
        assert_eq!(parse_expression_func("-3").unwrap(), Expr::Const(-3.0));
        assert_eq!(parse_expression_func("- -3").unwrap(), Expr::Const(3.0));
        assert_eq!(
            parse_expression_func("2*-x").unwrap(),
            Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(-Expr::x()))
        );
        assert_eq!(
            parse_expression_func("2**-3**2").unwrap(),
            Expr::Const(2.0).pow(-Expr::Const(3.0).pow(Expr::Const(2.0)))
        );
        assert!(parse_expression_func("x - -").is_err());
        assert!(parse_expression_func("x**-").is_err());
    }
}
