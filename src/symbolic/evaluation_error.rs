//! Error type shared by the expression parser and the compiled expression.
use std::fmt;

/// Everything that can go wrong between the raw expression text and a number.
///
/// Parse-time variants (`Syntax`, `UnknownIdentifier`) are produced before any sample
/// point is touched; run-time variants carry the sample point `x` that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// malformed text: position is a char offset into the source string
    Syntax { position: usize, message: String },
    /// a name outside the whitelist
    UnknownIdentifier(String),
    DivisionByZero { x: f64 },
    /// function applied outside of its domain, e.g. log(-1)
    Domain {
        function: &'static str,
        argument: f64,
        x: f64,
    },
    /// NaN or infinity in the final value (overflow, pole of tan, ...)
    NonFinite { value: f64, x: f64 },
}

impl EvaluationError {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        EvaluationError::Syntax {
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvaluationError::Syntax { position, message } => {
                write!(f, "syntax error at position {}: {}", position, message)
            }
            EvaluationError::UnknownIdentifier(name) => write!(
                f,
                "unknown identifier '{}'; allowed names are x, sin, cos, tan, exp, log, sqrt, pi, abs, pow",
                name
            ),
            EvaluationError::DivisionByZero { x } => write!(f, "division by zero at x = {}", x),
            EvaluationError::Domain {
                function,
                argument,
                x,
            } => write!(
                f,
                "math domain error: {}({}) is undefined (at x = {})",
                function, argument, x
            ),
            EvaluationError::NonFinite { value, x } => {
                write!(f, "expression is not finite at x = {} (got {})", x, value)
            }
        }
    }
}

impl std::error::Error for EvaluationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        let err = EvaluationError::Domain {
            function: "log",
            argument: -1.0,
            x: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "math domain error: log(-1) is undefined (at x = -1)"
        );
        let err = EvaluationError::UnknownIdentifier("open".to_string());
        assert!(err.to_string().contains("'open'"));
    }
}
