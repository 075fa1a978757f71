use crate::numerical::interpolation_api::InterpolationResult;
use gnuplot::{
    AxesCommon, Caption, Color as GColor, DashType, Figure, LineStyle, LineWidth, PointSymbol,
    RGBString,
};
use log::info;
use plotters::prelude::*;
use std::error::Error;

const WIDTH: u32 = 900;
const HEIGHT: u32 = 600;

/// y range covering every series with a 5% margin; a flat function still gets a non-empty range
fn y_range(result: &InterpolationResult) -> (f64, f64) {
    let series = [&result.y_original, &result.y_interpolated, &result.nodes_y];
    let y_min = series.iter().map(|s| s.min()).fold(f64::INFINITY, f64::min);
    let y_max = series.iter().map(|s| s.max()).fold(f64::NEG_INFINITY, f64::max);
    let margin = if y_max > y_min {
        0.05 * (y_max - y_min)
    } else {
        0.5 * y_max.abs().max(1.0)
    };
    (y_min - margin, y_max + margin)
}

/// Original function (solid), Lagrange polynomial (dashed) and the nodes (crosses) in one png.
pub fn plots(
    result: &InterpolationResult,
    expression: &str,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let x = &result.grid_x;
    let x_min = x[0];
    let x_max = x[x.len() - 1];
    let (y_min, y_max) = y_range(result);

    let root_area = BitMapBackend::new(filename, (WIDTH, HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .caption("Interpolation result", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("X")
        .y_desc("Y")
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let original: Vec<(f64, f64)> = x
        .iter()
        .zip(result.y_original.iter())
        .map(|(&x, &y)| (x, y))
        .collect();
    let original_color = RGBColor(0x1f, 0x77, 0xb4);
    chart
        .draw_series(LineSeries::new(original, original_color.stroke_width(2)))?
        .label(format!("f(x) = {}", expression))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], original_color));

    let interpolated: Vec<(f64, f64)> = x
        .iter()
        .zip(result.y_interpolated.iter())
        .map(|(&x, &y)| (x, y))
        .collect();
    let lagrange_color = RGBColor(0xff, 0x7f, 0x0e);
    chart
        .draw_series(DashedLineSeries::new(
            interpolated,
            8,
            5,
            lagrange_color.stroke_width(2),
        ))?
        .label("L(x) - Lagrange")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], lagrange_color));

    chart
        .draw_series(
            result
                .nodes_x
                .iter()
                .zip(result.nodes_y.iter())
                .map(|(&x, &y)| Cross::new((x, y), 6, BLACK.stroke_width(2))),
        )?
        .label("nodes")
        .legend(|(x, y)| Cross::new((x + 10, y), 6, BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root_area.present()?;
    info!("plot saved to {}", filename);
    Ok(())
}

/// Same picture through gnuplot; needs the gnuplot executable at runtime.
pub fn plots_gnulot(
    result: &InterpolationResult,
    expression: &str,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut fg = Figure::new();
    let original_caption = format!("f(x) = {}", expression);
    fg.axes2d()
        .set_title("Interpolation result", &[])
        .set_x_label("X", &[])
        .set_y_label("Y", &[])
        .lines(
            result.grid_x.as_slice(),
            result.y_original.as_slice(),
            &[
                Caption(original_caption.as_str()),
                GColor(RGBString("#1f77b4")),
                LineWidth(2.0),
            ],
        )
        .lines(
            result.grid_x.as_slice(),
            result.y_interpolated.as_slice(),
            &[
                Caption("L(x) - Lagrange"),
                GColor(RGBString("#ff7f0e")),
                LineStyle(DashType::Dash),
                LineWidth(2.0),
            ],
        )
        .points(
            result.nodes_x.as_slice(),
            result.nodes_y.as_slice(),
            &[
                Caption("nodes"),
                GColor(RGBString("black")),
                PointSymbol('x'),
            ],
        );
    fg.save_to_png(filename, WIDTH, HEIGHT)
        .map_err(|e| format!("gnuplot failed: {:?}", e))?;
    info!("gnuplot figure saved to {}", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::interpolation_api::evaluate_interpolation;

    #[test]
    fn test_y_range_covers_all_series() {
        let result = evaluate_interpolation(-1.0, 1.0, "abs(x)").unwrap();
        let (lo, hi) = y_range(&result);
        assert!(lo < result.y_interpolated.min());
        assert!(hi > result.y_original.max());
    }

    #[test]
    fn test_y_range_of_constant_function() {
        let result = evaluate_interpolation(0.0, 1.0, "2").unwrap();
        let (lo, hi) = y_range(&result);
        assert!(lo < 2.0 && hi > 2.0);
    }

    #[test]
    fn test_plot_is_written_to_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runge.png");
        let filename = path.to_str().unwrap();
        let result = evaluate_interpolation(-5.0, 5.0, "1/(1 + x**2)").unwrap();
        plots(&result, "1/(1 + x**2)", filename).unwrap();
        let written = std::fs::metadata(&path).unwrap();
        assert!(written.len() > 0);
    }
}
