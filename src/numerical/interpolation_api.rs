//! # Interpolation API
//!
//! Drives one interpolation request from the raw inputs to the five output series.
//!
//! ## Main Structures
//! - `InterpolationRequest` - immutable input: interval start, interval end, expression text
//! - `InterpolationResult` - immutable output: nodes, evaluation grid, original and interpolated values
//! - `LagrangeTask` - solver-like wrapper holding a request plus run options
//!   (log level, postprocessing) and the outcome of the last `solve()`
//!
//! ## Example
//! ```
//! use RustedLagrange::numerical::interpolation_api::evaluate_interpolation;
//! let result = evaluate_interpolation(0.0, 6.0, "sin(x) + 0.5*x").unwrap();
//! assert_eq!(result.nodes_x.len(), 11);
//! assert_eq!(result.grid_x.len(), 400);
//! assert_eq!(result.nodes_x[5], 3.0);
//! ```
use crate::numerical::interpolation_errors::InterpolationError;
use crate::numerical::lagrange::lagrange_on_grid;
use crate::numerical::plots::{plots, plots_gnulot};
use crate::Utils::logger::{
    save_nodes_to_csv, save_nodes_to_file, save_result_to_csv, save_result_to_file,
};
use crate::symbolic::symbolic_lambdify::compile;
use chrono::Local;
use log::{info, warn};
use nalgebra::DVector;
use simplelog::*;
use std::fs::File;
use std::time::Instant;
use tabled::{builder::Builder, settings::Style};

/// number of interpolation nodes (10 equal sub-intervals)
pub const NODE_COUNT: usize = 11;
/// number of points of the evaluation grid used for the smooth curves
pub const GRID_DENSITY: usize = 400;

pub const DEFAULT_A: f64 = 0.0;
pub const DEFAULT_B: f64 = 6.0;
pub const DEFAULT_EXPRESSION: &str = "sin(x) + 0.5*x";

/// `num_values` equally spaced points; the first is exactly `start`, the last exactly `end`
pub fn linspace(start: f64, end: f64, num_values: usize) -> DVector<f64> {
    match num_values {
        0 => DVector::zeros(0),
        1 => DVector::from_element(1, start),
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            DVector::from_fn(num_values, |i, _| {
                if i == num_values - 1 {
                    end
                } else {
                    start + i as f64 * step
                }
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationRequest {
    pub a: f64,
    pub b: f64,
    pub expression: String,
}

impl Default for InterpolationRequest {
    fn default() -> Self {
        InterpolationRequest::new(DEFAULT_A, DEFAULT_B, DEFAULT_EXPRESSION)
    }
}

impl InterpolationRequest {
    pub fn new(a: f64, b: f64, expression: &str) -> Self {
        InterpolationRequest {
            a,
            b,
            expression: expression.to_string(),
        }
    }

    /// a < b with both bounds and the length b - a finite
    pub fn validate(&self) -> Result<(), InterpolationError> {
        // linspace steps by (b - a) / (n - 1), so the length must not overflow either
        if !self.a.is_finite()
            || !self.b.is_finite()
            || self.a >= self.b
            || !(self.b - self.a).is_finite()
        {
            return Err(InterpolationError::InvalidInterval {
                a: self.a,
                b: self.b,
            });
        }
        Ok(())
    }

    /// Runs the whole request: all five series or an error, never a partial result.
    pub fn run(&self) -> Result<InterpolationResult, InterpolationError> {
        self.validate()?;
        let f = compile(&self.expression)?;

        let nodes_x = linspace(self.a, self.b, NODE_COUNT);
        let nodes_y = f.evaluate_DVector(&nodes_x)?;

        let grid_x = linspace(self.a, self.b, GRID_DENSITY);
        let y_original = f.evaluate_DVector(&grid_x)?;
        let y_interpolated = lagrange_on_grid(&grid_x, &nodes_x, &nodes_y)?;

        Ok(InterpolationResult {
            nodes_x,
            nodes_y,
            grid_x,
            y_original,
            y_interpolated,
        })
    }
}

/// Output series handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    pub nodes_x: DVector<f64>,
    pub nodes_y: DVector<f64>,
    pub grid_x: DVector<f64>,
    pub y_original: DVector<f64>,
    pub y_interpolated: DVector<f64>,
}

impl InterpolationResult {
    /// max |f(x) - L(x)| over the evaluation grid
    pub fn max_abs_error(&self) -> f64 {
        (&self.y_original - &self.y_interpolated).amax()
    }

    /// nodes as a pretty table for the log
    pub fn nodes_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["i", "x", "f(x)"]);
        for (i, (x, y)) in self.nodes_x.iter().zip(self.nodes_y.iter()).enumerate() {
            builder.push_record([i.to_string(), format!("{:.6}", x), format!("{:.6}", y)]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

/// Core operation: interval start, interval end, expression text in; result or error out.
pub fn evaluate_interpolation(
    a: f64,
    b: f64,
    expression: &str,
) -> Result<InterpolationResult, InterpolationError> {
    InterpolationRequest::new(a, b, expression).run()
}

/// What to do with a successful result
#[derive(Debug, Clone, PartialEq)]
pub struct Postprocessing {
    /// png through plotters
    pub plot: bool,
    /// png through gnuplot (needs gnuplot installed)
    pub gnuplot: bool,
    /// tab separated text files
    pub save: bool,
    pub save_to_csv: bool,
    /// base name of the produced files, extensions are appended
    pub filename: String,
}

impl Default for Postprocessing {
    fn default() -> Self {
        Postprocessing {
            plot: true,
            gnuplot: false,
            save: false,
            save_to_csv: false,
            filename: "lagrange_result".to_string(),
        }
    }
}

/// One interpolation run with its settings, in the manner of the solver structs:
/// `new()`, setters, `solve()`, `get_result()`.
///
/// ```
/// use RustedLagrange::numerical::interpolation_api::LagrangeTask;
/// let mut task = LagrangeTask::new();
/// task.set_request(-1.0, 1.0, "abs(x)");
/// task.set_loglevel(Some("off".to_string()));
/// task.solve().unwrap();
/// assert!(task.get_result().unwrap().max_abs_error() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LagrangeTask {
    pub request: InterpolationRequest,
    pub loglevel: Option<String>,
    /// also write the log into log_<date>.txt
    pub save_log: bool,
    pub postprocessing: Postprocessing,
    result: Option<InterpolationResult>,
}

impl Default for LagrangeTask {
    fn default() -> Self {
        LagrangeTask::new()
    }
}

impl LagrangeTask {
    pub fn new() -> LagrangeTask {
        LagrangeTask {
            request: InterpolationRequest::default(),
            loglevel: Some("info".to_string()),
            save_log: false,
            postprocessing: Postprocessing::default(),
            result: None,
        }
    }
    ////////////////////////////SETTERS///////////////////////////////////////////////////////////////////
    pub fn set_request(&mut self, a: f64, b: f64, expression: &str) {
        self.request = InterpolationRequest::new(a, b, expression);
        self.result = None;
    }

    pub fn set_loglevel(&mut self, loglevel: Option<String>) {
        self.loglevel = loglevel;
    }

    pub fn set_postprocessing(&mut self, postprocessing: Postprocessing) {
        self.postprocessing = postprocessing;
    }

    pub fn get_result(&self) -> Option<&InterpolationResult> {
        self.result.as_ref()
    }

    /// runs the request without touching the logger setup
    pub fn solver(&mut self) -> Result<(), InterpolationError> {
        let begin = Instant::now();
        info!(
            "interpolating f(x) = {} on [{}, {}] with {} nodes, {} grid points",
            self.request.expression, self.request.a, self.request.b, NODE_COUNT, GRID_DENSITY
        );
        self.result = None;
        // a failure is reported once, by whoever handles the returned error
        match self.request.run() {
            Ok(result) => {
                info!("\n \n NODES \n \n {}", result.nodes_table());
                info!(
                    "max |f(x) - L(x)| on the grid: {:e}, time elapsed {:?}",
                    result.max_abs_error(),
                    begin.elapsed()
                );
                self.result = Some(result);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn log_option(&self) -> Option<LevelFilter> {
        match self.loglevel.as_deref() {
            None => Some(LevelFilter::Info),
            Some("off") | Some("none") => None,
            Some("debug") => Some(LevelFilter::Debug),
            Some("info") => Some(LevelFilter::Info),
            Some("warn") => Some(LevelFilter::Warn),
            Some("error") => Some(LevelFilter::Error),
            Some(other) => {
                eprintln!("unknown loglevel '{}', falling back to info", other);
                Some(LevelFilter::Info)
            }
        }
    }

    fn result_or_err(&self) -> Result<&InterpolationResult, String> {
        self.result
            .as_ref()
            .ok_or_else(|| "no result to postprocess, call solve() first".to_string())
    }

    pub fn plot_result(&self) -> Result<String, String> {
        let result = self.result_or_err()?;
        let name = format!("{}.png", self.postprocessing.filename);
        plots(result, &self.request.expression, &name).map_err(|e| e.to_string())?;
        Ok(name)
    }

    pub fn gnuplot_result(&self) -> Result<String, String> {
        let result = self.result_or_err()?;
        let name = format!("{}_gnuplot.png", self.postprocessing.filename);
        plots_gnulot(result, &self.request.expression, &name).map_err(|e| e.to_string())?;
        Ok(name)
    }

    /// grid and nodes as tab separated <filename>.txt and <filename>_nodes.txt
    pub fn save_to_file(&self) -> Result<Vec<String>, String> {
        let result = self.result_or_err()?;
        let name = format!("{}.txt", self.postprocessing.filename);
        let nodes_name = format!("{}_nodes.txt", self.postprocessing.filename);
        save_result_to_file(result, &name).map_err(|e| format!("cannot write {}: {}", name, e))?;
        save_nodes_to_file(result, &nodes_name)
            .map_err(|e| format!("cannot write {}: {}", nodes_name, e))?;
        Ok(vec![name, nodes_name])
    }

    pub fn save_to_csv(&self) -> Result<Vec<String>, String> {
        let result = self.result_or_err()?;
        let name = format!("{}.csv", self.postprocessing.filename);
        let nodes_name = format!("{}_nodes.csv", self.postprocessing.filename);
        save_result_to_csv(result, &name).map_err(|e| format!("cannot write {}: {}", name, e))?;
        save_nodes_to_csv(result, &nodes_name)
            .map_err(|e| format!("cannot write {}: {}", nodes_name, e))?;
        Ok(vec![name, nodes_name])
    }

    /// Runs every enabled postprocessing step and returns the names of the produced files.
    /// Stops at the first failing step.
    pub fn postprocess(&self) -> Result<Vec<String>, String> {
        let mut produced = Vec::new();
        if self.postprocessing.plot {
            produced.push(self.plot_result()?);
        }
        if self.postprocessing.gnuplot {
            produced.push(self.gnuplot_result()?);
        }
        if self.postprocessing.save {
            produced.extend(self.save_to_file()?);
        }
        if self.postprocessing.save_to_csv {
            produced.extend(self.save_to_csv()?);
        }
        for name in &produced {
            info!("written {}", name);
        }
        Ok(produced)
    }

    // wrapper around solver function to implement logging
    pub fn solve(&mut self) -> Result<(), InterpolationError> {
        let Some(log_option) = self.log_option() else {
            return self.solver();
        };
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            log_option,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];
        if self.save_log {
            let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
            let name = format!("log_{}.txt", date_and_time);
            match File::create(&name) {
                Ok(file) => loggers.push(WriteLogger::new(log_option, Config::default(), file)),
                Err(e) => eprintln!("cannot create log file {}: {}", name, e),
            }
        }
        // a logger installed by an earlier run stays in place
        if CombinedLogger::init(loggers).is_err() {
            warn!("logger already initialized");
        }
        let res = self.solver();
        info!(" \n \n Program ended");
        res
    }
}
