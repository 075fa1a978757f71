//! # Symbolic Engine Module
//!
//! The expression tree every user-supplied function is turned into before it is evaluated.
//!
//! ## Purpose
//!
//! The tree only has variants for the whitelisted vocabulary, so an `Expr` produced by
//! the parser can never refer to anything else:
//! - **Variable**: `Var(String)` - the free variable, always "x" when it comes from the parser
//! - **Constants**: `Const(f64)` - numbers and `pi`
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `Sqrt`, `Abs`
//!
//! ## Interesting Code Features
//!
//! 1. **Recursive Expression Tree**: Uses Box<Expr> for nested expressions
//!
//! 2. **Operator Overloading**: Implements std::ops traits (Add, Sub, Mul, Div, Neg) so
//!    trees can be written as `x.clone() * x + Expr::Const(1.0)` in tests and examples
//!
//! 3. **Non-standard Function Names**: Uses mathematical notation (tg) instead
//!    of programming convention (tan) for the tangent variant; the parser accepts `tan`

#![allow(non_camel_case_types)]

use std::f64::consts::PI;
use std::fmt;

/// Core symbolic expression enum representing a function of one variable as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent (also written base ** exponent or pow(base, exponent))
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm, written log(x) in the input
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x)
    tg(Box<Expr>),
    /// Square root: sqrt(x)
    Sqrt(Box<Expr>),
    /// Absolute value: abs(x)
    Abs(Box<Expr>),
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Every binary operation is wrapped in parentheses so the printed form
/// parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) if *val == PI => write!(f, "pi"),
            Expr::Const(val) if *val < 0.0 => write!(f, "({})", val),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "log({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tan({})", expr),
            Expr::Sqrt(expr) => write!(f, "sqrt({})", expr),
            Expr::Abs(expr) => write!(f, "abs({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks whether the variable occurs anywhere in the tree.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::Sqrt(expr)
            | Expr::Abs(expr) => expr.contains_variable(var_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_overloading() {
        let x = Expr::x();
        let expr = x.clone() * x.clone() + Expr::Const(1.0);
        let expected = Expr::Add(
            Box::new(Expr::Mul(Box::new(x.clone()), Box::new(x))),
            Box::new(Expr::Const(1.0)),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_neg() {
        let neg_expr = -Expr::x();
        let expected = Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(Expr::x()));
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_display() {
        let expr = Expr::sin(Expr::x().boxed()) + Expr::Const(0.5) * Expr::x();
        assert_eq!(expr.to_string(), "(sin(x) + (0.5 * x))");
        let expr = Expr::Const(PI) * Expr::x().pow(Expr::Const(2.0));
        assert_eq!(expr.to_string(), "(pi * (x ^ 2))");
        assert_eq!((-Expr::x()).to_string(), "((-1) * x)");
    }

    #[test]
    fn test_variables() {
        let expr = Expr::Exp(Expr::x().boxed()) / (Expr::Var("y".to_string()) + Expr::x());
        assert!(expr.contains_variable("y"));
        assert!(expr.contains_variable("x"));
        assert!(!Expr::Abs(Expr::Const(-2.0).boxed()).contains_variable("x"));
    }
}
