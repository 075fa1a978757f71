/// a module turns a String expression into a symbolic expression.
/// Only the free variable x, numbers, + - * / ** ^ and the functions
/// sin, cos, tan, exp, log, sqrt, abs, pow(base, exponent) and the constant pi are understood,
/// anything else is rejected before evaluation.
///
///# Example
/// ```
/// use RustedLagrange::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("sin(x) + 0.5*x").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert!(Expr::parse_expression("__import__('os')").is_err());
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) holds the expression tree of a function of x
/// 2) turns a symbolic expression into a string expression for printing and control results
///# Example
/// ```
/// use RustedLagrange::symbolic::symbolic_engine::Expr;
/// let f = Expr::x().pow(Expr::Const(2.0)) + Expr::Const(1.0);
/// assert_eq!(f.to_string(), "((x ^ 2) + 1)");
/// assert!(f.contains_variable("x"));
/// ```
pub mod symbolic_engine;
/// turns a symbolic expression into a checked Rust closure of x: a domain error
/// (log of a non-positive number, square root of a negative one, division by zero)
/// is reported as an error instead of NaN or infinity
///# Example
/// ```
/// use RustedLagrange::symbolic::symbolic_lambdify::compile;
/// let f = compile("sqrt(x)").unwrap();
/// assert_eq!(f.eval(4.0).unwrap(), 2.0);
/// assert!(f.eval(-4.0).is_err());
/// ```
pub mod symbolic_lambdify;
/// errors of parsing and evaluating an expression
pub mod evaluation_error;
