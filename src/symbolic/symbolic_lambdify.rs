use crate::symbolic::evaluation_error::EvaluationError;
use crate::symbolic::symbolic_engine::Expr;
use log::info;
use nalgebra::DVector;

/// checked scalar function of the free variable
pub type CheckedFn = Box<dyn Fn(f64) -> Result<f64, EvaluationError> + Send + Sync>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts the expression tree into a closure of `var` that reports domain errors
    /// instead of returning NaN.
    ///
    /// Fails with `UnknownIdentifier` if the tree mentions any variable other than `var`,
    /// so a hand-built tree is held to the same whitelist as a parsed one.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::Ln(Expr::x().boxed()).lambdify_checked("x").unwrap();
    /// assert!(f(-1.0).is_err());
    /// ```
    pub fn lambdify_checked(&self, var: &str) -> Result<CheckedFn, EvaluationError> {
        let func: CheckedFn = match self {
            Expr::Var(name) if name == var => Box::new(|x| Ok(x)),
            Expr::Var(name) => return Err(EvaluationError::UnknownIdentifier(name.clone())),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| Ok(val))
            }
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_checked(var)?;
                let rhs_fn = rhs.lambdify_checked(var)?;
                Box::new(move |x| Ok(lhs_fn(x)? + rhs_fn(x)?))
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_checked(var)?;
                let rhs_fn = rhs.lambdify_checked(var)?;
                Box::new(move |x| Ok(lhs_fn(x)? - rhs_fn(x)?))
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_checked(var)?;
                let rhs_fn = rhs.lambdify_checked(var)?;
                Box::new(move |x| Ok(lhs_fn(x)? * rhs_fn(x)?))
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.lambdify_checked(var)?;
                let rhs_fn = rhs.lambdify_checked(var)?;
                Box::new(move |x| {
                    let denominator = rhs_fn(x)?;
                    if denominator == 0.0 {
                        return Err(EvaluationError::DivisionByZero { x });
                    }
                    Ok(lhs_fn(x)? / denominator)
                })
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.lambdify_checked(var)?;
                let exp_fn = exp.lambdify_checked(var)?;
                Box::new(move |x| {
                    let b = base_fn(x)?;
                    let e = exp_fn(x)?;
                    if b == 0.0 && e < 0.0 {
                        return Err(EvaluationError::DivisionByZero { x });
                    }
                    let value = b.powf(e);
                    if value.is_nan() {
                        return Err(EvaluationError::Domain {
                            function: "pow",
                            argument: b,
                            x,
                        });
                    }
                    Ok(value)
                })
            }
            Expr::Exp(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| Ok(expr_fn(x)?.exp()))
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| {
                    let arg = expr_fn(x)?;
                    if arg <= 0.0 {
                        return Err(EvaluationError::Domain {
                            function: "log",
                            argument: arg,
                            x,
                        });
                    }
                    Ok(arg.ln())
                })
            }
            Expr::sin(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| Ok(expr_fn(x)?.sin()))
            }
            Expr::cos(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| Ok(expr_fn(x)?.cos()))
            }
            Expr::tg(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| Ok(expr_fn(x)?.tan()))
            }
            Expr::Sqrt(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| {
                    let arg = expr_fn(x)?;
                    if arg < 0.0 {
                        return Err(EvaluationError::Domain {
                            function: "sqrt",
                            argument: arg,
                            x,
                        });
                    }
                    Ok(arg.sqrt())
                })
            }
            Expr::Abs(expr) => {
                let expr_fn = expr.lambdify_checked(var)?;
                Box::new(move |x| Ok(expr_fn(x)?.abs()))
            }
        };
        Ok(func)
    }
}

/// A parsed and lambdified expression of `x`, ready to be sampled.
pub struct CompiledExpr {
    source: String,
    expr: Expr,
    func: CheckedFn,
}

impl std::fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpr")
            .field("source", &self.source)
            .field("expr", &self.expr)
            .finish()
    }
}

impl CompiledExpr {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// value at a single point; NaN or infinity is an error
    pub fn eval(&self, x: f64) -> Result<f64, EvaluationError> {
        let value = (self.func)(x)?;
        if !value.is_finite() {
            return Err(EvaluationError::NonFinite { value, x });
        }
        Ok(value)
    }

    /// Batch evaluation: all values or the first error, never a partial result.
    pub fn evaluate(&self, xs: &[f64]) -> Result<Vec<f64>, EvaluationError> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    pub fn evaluate_DVector(&self, xs: &DVector<f64>) -> Result<DVector<f64>, EvaluationError> {
        Ok(DVector::from_vec(self.evaluate(xs.as_slice())?))
    }
}

/// Parses and lambdifies `expression` as a function of `x`.
///# Example
/// ```
/// use RustedLagrange::symbolic::symbolic_lambdify::compile;
/// let f = compile("pow(x, 2) + 1").unwrap();
/// assert_eq!(f.eval(3.0).unwrap(), 10.0);
/// assert_eq!(f.evaluate(&[0.0, 1.0]).unwrap(), vec![1.0, 2.0]);
/// ```
pub fn compile(expression: &str) -> Result<CompiledExpr, EvaluationError> {
    let expr = Expr::parse_expression(expression)?;
    let func = expr.lambdify_checked("x")?;
    info!("compiled f(x) = {}", expr);
    Ok(CompiledExpr {
        source: expression.to_string(),
        expr,
        func,
    })
}

/// one-shot batch evaluation of an expression string
pub fn evaluate(expression: &str, xs: &[f64]) -> Result<Vec<f64>, EvaluationError> {
    compile(expression)?.evaluate(xs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_scalar_and_batch_agree() {
        let f = compile("sin(x) + 0.5*x").unwrap();
        let xs = [0.0, 1.0, 2.5, 6.0];
        let batch = f.evaluate(&xs).unwrap();
        for (x, y) in xs.iter().zip(batch.iter()) {
            assert_relative_eq!(f.eval(*x).unwrap(), *y, epsilon = 1e-15);
            assert_relative_eq!(*y, x.sin() + 0.5 * x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_whitelisted_functions() {
        let x = 0.7_f64;
        let cases = [
            ("cos(x)", x.cos()),
            ("tan(x)", x.tan()),
            ("exp(x)", x.exp()),
            ("log(x)", x.ln()),
            ("sqrt(x)", x.sqrt()),
            ("abs(-x)", x),
            ("pow(x, 3)", x.powi(3)),
            ("x**3", x.powi(3)),
            ("pi*x", PI * x),
            ("(x + 1) / (x - 1)", (x + 1.0) / (x - 1.0)),
        ];
        for (input, expected) in cases {
            assert_relative_eq!(
                compile(input).unwrap().eval(x).unwrap(),
                expected,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_negative_base_with_integer_exponent() {
        let f = compile("x**2").unwrap();
        assert_relative_eq!(f.eval(-3.0).unwrap(), 9.0);
        let f = compile("-x**2").unwrap();
        assert_relative_eq!(f.eval(3.0).unwrap(), -9.0);
    }

    #[test]
    fn test_domain_errors() {
        assert_eq!(
            compile("log(x)").unwrap().eval(-1.0).unwrap_err(),
            EvaluationError::Domain {
                function: "log",
                argument: -1.0,
                x: -1.0
            }
        );
        assert!(matches!(
            compile("log(x)").unwrap().eval(0.0),
            Err(EvaluationError::Domain { .. })
        ));
        assert!(matches!(
            compile("sqrt(x)").unwrap().eval(-4.0),
            Err(EvaluationError::Domain { function: "sqrt", .. })
        ));
        assert!(matches!(
            compile("x**0.5").unwrap().eval(-4.0),
            Err(EvaluationError::Domain { function: "pow", .. })
        ));
        assert_eq!(
            compile("1/x").unwrap().eval(0.0).unwrap_err(),
            EvaluationError::DivisionByZero { x: 0.0 }
        );
        assert!(matches!(
            compile("x**-1").unwrap().eval(0.0),
            Err(EvaluationError::DivisionByZero { .. })
        ));
        assert!(matches!(
            compile("exp(x)").unwrap().eval(1000.0),
            Err(EvaluationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_batch_fails_as_a_whole() {
        let f = compile("sqrt(x)").unwrap();
        let err = f.evaluate(&[4.0, 1.0, -1.0, 9.0]).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Domain {
                function: "sqrt",
                argument: -1.0,
                x: -1.0
            }
        );
    }

    #[test]
    fn test_hand_built_tree_is_held_to_whitelist() {
        let expr = Expr::Var("y".to_string()) + Expr::x();
        assert!(matches!(
            expr.lambdify_checked("x"),
            Err(EvaluationError::UnknownIdentifier(name)) if name == "y"
        ));
    }

    #[test]
    fn test_constant_expression() {
        let f = compile("2*pi").unwrap();
        assert!(!f.expr().contains_variable("x"));
        let ys = f.evaluate_DVector(&DVector::from_vec(vec![0.0, 1.0, 2.0])).unwrap();
        assert!(ys.iter().all(|y| (*y - 2.0 * PI).abs() < 1e-15));
        assert_eq!(f.source(), "2*pi");
    }

    #[test]
    fn test_one_shot_evaluate() {
        assert_eq!(evaluate("2*x + 1", &[0.0, 1.0, 2.0]).unwrap(), vec![1.0, 3.0, 5.0]);
        assert!(evaluate("open(x)", &[0.0]).is_err());
    }
}
