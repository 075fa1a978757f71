//! Lagrange interpolating polynomial in its classic (non-barycentric) form
//!
//! L(x) = Σ y_i * Π_{j≠i} (x - x_j) / (x_i - x_j)
//!
//! Every call is independent: nothing is precomputed or cached between target points.
use crate::numerical::interpolation_errors::InterpolationError;
use nalgebra::DVector;

fn check_nodes(x_vals: &DVector<f64>, y_vals: &DVector<f64>) -> Result<(), InterpolationError> {
    if x_vals.len() != y_vals.len() {
        return Err(InterpolationError::DegenerateNodes(format!(
            "{} abscissas but {} ordinates",
            x_vals.len(),
            y_vals.len()
        )));
    }
    if x_vals.len() < 2 {
        return Err(InterpolationError::DegenerateNodes(format!(
            "at least 2 nodes are needed, got {}",
            x_vals.len()
        )));
    }
    Ok(())
}

/// Value of the polynomial through (x_vals[i], y_vals[i]) at `x`.
///
/// Coinciding abscissas are reported as `DegenerateNodes` instead of dividing by zero.
pub fn lagrange_interpolate(
    x: f64,
    x_vals: &DVector<f64>,
    y_vals: &DVector<f64>,
) -> Result<f64, InterpolationError> {
    check_nodes(x_vals, y_vals)?;
    let n = x_vals.len();
    let mut result = 0.0;

    for i in 0..n {
        let mut basis = 1.0;
        for j in 0..n {
            if i != j {
                let denominator = x_vals[i] - x_vals[j];
                if denominator == 0.0 {
                    return Err(InterpolationError::DegenerateNodes(format!(
                        "nodes {} and {} share the abscissa {}",
                        i, j, x_vals[i]
                    )));
                }
                basis *= (x - x_vals[j]) / denominator;
            }
        }
        result += y_vals[i] * basis;
    }

    Ok(result)
}

/// Polynomial values on every grid point, in grid order.
pub fn lagrange_on_grid(
    grid: &DVector<f64>,
    x_vals: &DVector<f64>,
    y_vals: &DVector<f64>,
) -> Result<DVector<f64>, InterpolationError> {
    let values = grid
        .iter()
        .map(|&x| lagrange_interpolate(x, x_vals, y_vals))
        .collect::<Result<Vec<f64>, InterpolationError>>()?;
    Ok(DVector::from_vec(values))
}
