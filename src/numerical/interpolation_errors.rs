use crate::symbolic::evaluation_error::EvaluationError;
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Coarse classification of a failed interpolation request, for the caller that
/// only needs to decide what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ErrorKind {
    InvalidInterval,
    Evaluation,
    Degenerate,
}

/// Error types of an interpolation request
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// start of the interval is not strictly below its end, a bound is not finite,
    /// or the length b - a overflows
    InvalidInterval { a: f64, b: f64 },
    Evaluation(EvaluationError),
    /// node abscissas do not define a unique polynomial
    DegenerateNodes(String),
}

impl InterpolationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InterpolationError::InvalidInterval { .. } => ErrorKind::InvalidInterval,
            InterpolationError::Evaluation(_) => ErrorKind::Evaluation,
            InterpolationError::DegenerateNodes(_) => ErrorKind::Degenerate,
        }
    }
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InterpolationError::InvalidInterval { a, b } if !a.is_finite() || !b.is_finite() => {
                write!(f, "interval bounds must be finite numbers, got [{}, {}]", a, b)
            }
            InterpolationError::InvalidInterval { a, b } if a < b => write!(
                f,
                "the interval [{}, {}] is too wide, its length is not a finite number",
                a, b
            ),
            InterpolationError::InvalidInterval { a, b } => write!(
                f,
                "the start of the interval must be less than its end, got [{}, {}]",
                a, b
            ),
            InterpolationError::Evaluation(err) => write!(f, "cannot evaluate f(x): {}", err),
            InterpolationError::DegenerateNodes(msg) => {
                write!(f, "degenerate interpolation nodes: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterpolationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InterpolationError::Evaluation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EvaluationError> for InterpolationError {
    fn from(err: EvaluationError) -> Self {
        InterpolationError::Evaluation(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kinds() {
        let errors = [
            InterpolationError::InvalidInterval { a: 5.0, b: 2.0 },
            InterpolationError::Evaluation(EvaluationError::UnknownIdentifier("y".to_string())),
            InterpolationError::DegenerateNodes("x[0] == x[1]".to_string()),
        ];
        let kinds: Vec<ErrorKind> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, ErrorKind::iter().collect::<Vec<_>>());
        assert_eq!(ErrorKind::InvalidInterval.to_string(), "InvalidInterval");
    }

    #[test]
    fn test_evaluation_error_is_the_source() {
        let err: InterpolationError = EvaluationError::DivisionByZero { x: 0.0 }.into();
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "cannot evaluate f(x): division by zero at x = 0"
        );
        let err = InterpolationError::InvalidInterval { a: 5.0, b: 5.0 };
        assert!(err.to_string().contains("[5, 5]"));
        let err = InterpolationError::InvalidInterval { a: f64::NAN, b: 1.0 };
        assert!(err.to_string().contains("finite"));
    }
}
