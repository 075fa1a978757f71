#![allow(non_snake_case)]
//! lagrange_plot: interpolates f(x) on [a, b] with a Lagrange polynomial through 11 equally
//! spaced nodes, logs the nodes and plots/saves the result.
//!
//! ```text
//! lagrange_plot                       # sin(x) + 0.5*x on [0, 6]
//! lagrange_plot task.txt              # settings from a task file
//! lagrange_plot -a -1 -b 1 -e "abs(x)"
//! lagrange_plot --template task.txt   # write a commented task file and exit
//! ```
use RustedLagrange::numerical::interpolation_api::LagrangeTask;
use RustedLagrange::numerical::task_parser_lagrange::{TaskConfig, create_template_file};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

/// Lagrange interpolation of a user-supplied function
#[derive(Parser)]
#[command(name = "lagrange_plot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Task file with interval, function, postprocessing and logging sections
    task_file: Option<PathBuf>,

    /// Start of the interval (overrides the task file)
    #[arg(short, allow_negative_numbers = true)]
    a: Option<f64>,

    /// End of the interval (overrides the task file)
    #[arg(short, allow_negative_numbers = true)]
    b: Option<f64>,

    /// f(x) (overrides the task file), may start with a minus: -e "-x**2"
    #[arg(short, long, allow_hyphen_values = true)]
    expression: Option<String>,

    /// Write a task file template to this path and exit
    #[arg(long, value_name = "PATH")]
    template: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), String> {
    if let Some(path) = cli.template {
        let path = create_template_file(Some(path)).map_err(|e| e.to_string())?;
        println!("template written to {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.task_file {
        Some(path) => TaskConfig::parse_file(path)?,
        None => TaskConfig::default(),
    };
    if let Some(a) = cli.a {
        config.request.a = a;
    }
    if let Some(b) = cli.b {
        config.request.b = b;
    }
    if let Some(expression) = cli.expression {
        config.request.expression = expression;
    }

    let mut task = LagrangeTask::from_config(config);
    // the solver does not log its failure, it is printed once by main
    task.solve().map_err(|e| e.to_string())?;
    task.postprocess()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
