/// # Lagrange interpolation
/// classic Lagrange polynomial through a set of nodes, evaluated point by point
///# Example
/// ```
/// use RustedLagrange::numerical::lagrange::lagrange_interpolate;
/// use nalgebra::DVector;
/// let x_vals = DVector::from_vec(vec![0.0, 1.0, 2.0]);
/// let y_vals = DVector::from_vec(vec![1.0, 3.0, 5.0]);
/// let y = lagrange_interpolate(0.5, &x_vals, &y_vals).unwrap();
/// assert!((y - 2.0).abs() < 1e-12);
/// ```
pub mod lagrange;
/// one interpolation request from interval and expression text to the output series,
/// plus `LagrangeTask`, the solver-like driver with logging and postprocessing
///# Example
/// ```
/// use RustedLagrange::numerical::interpolation_api::evaluate_interpolation;
/// let result = evaluate_interpolation(0.0, 6.0, "sin(x) + 0.5*x").unwrap();
/// println!("max error {}", result.max_abs_error());
/// assert!(evaluate_interpolation(5.0, 2.0, "x").is_err());
/// ```
pub mod interpolation_api;
/// error taxonomy of an interpolation request
pub mod interpolation_errors;
/// task file settings of a `LagrangeTask`
pub mod task_parser_lagrange;
/// plot the original function, the interpolating polynomial and the nodes
pub mod plots;
