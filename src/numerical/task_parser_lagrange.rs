//! # Lagrange Task Parser Module
//!
//! Reads the settings of one interpolation run from a task file or a string
//! and turns them into a typed `TaskConfig`.
//!
//! ## Configuration Structure
//!
//! ### interval Section
//! - `a`: start of the interval (number, default 0)
//! - `b`: end of the interval (number, default 6)
//!
//! ### function Section
//! - `expression`: f(x); quote it when it contains spaces or commas (default "sin(x) + 0.5*x")
//!
//! ### postprocessing Section
//! - `plot`: png through plotters (default true)
//! - `gnuplot`: png through gnuplot (default false)
//! - `save`: tab separated text files (default false)
//! - `save_to_csv`: csv files (default false)
//! - `filename`: base name of the produced files (default lagrange_result)
//!
//! ### logging Section
//! - `loglevel`: debug, info, warn, error, or off/none (default info)
//! - `save_log`: also write log_<date>.txt (default false)
//!
//! Every section and key is optional. Unknown sections or keys, more than one value
//! for a key, or a value of the wrong type is a configuration error, reported before
//! anything is computed.
//!
//! ## Example
//! ```
//! use RustedLagrange::numerical::task_parser_lagrange::TaskConfig;
//! let config = TaskConfig::parse_settings_from_str(
//!     "interval\n a: -1\n b: 1\nfunction\n expression: \"pow(x, 3) - x\"\n",
//! ).unwrap();
//! assert_eq!(config.request.a, -1.0);
//! assert_eq!(config.request.expression, "pow(x, 3) - x");
//! assert!(config.postprocessing.plot);
//! ```
use crate::Utils::task_parser::{DocumentMap, SectionMap, Value, parse_document_as, template_from};
use crate::numerical::interpolation_api::{InterpolationRequest, LagrangeTask, Postprocessing};
use std::fs;
use std::path::{Path, PathBuf};

const INTERVAL: &str = "interval";
const FUNCTION: &str = "function";
const POSTPROCESSING: &str = "postprocessing";
const LOGGING: &str = "logging";

const LAYOUT: [(&str, &[&str]); 4] = [
    (INTERVAL, &["a", "b"]),
    (FUNCTION, &["expression"]),
    (
        POSTPROCESSING,
        &["plot", "gnuplot", "save", "save_to_csv", "filename"],
    ),
    (LOGGING, &["loglevel", "save_log"]),
];

/// Settings of one run, every field filled (defaults where the file is silent).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskConfig {
    pub request: InterpolationRequest,
    pub postprocessing: Postprocessing,
    pub loglevel: Option<String>,
    pub save_log: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            request: InterpolationRequest::default(),
            postprocessing: Postprocessing::default(),
            loglevel: Some("info".to_string()),
            save_log: false,
        }
    }
}

/// the single value of a key, None if the key is absent
fn single_value<'a>(
    section: &'a SectionMap,
    title: &str,
    key: &str,
) -> Result<Option<&'a Value>, String> {
    match section.get(key) {
        None | Some(None) => Ok(None),
        Some(Some(values)) if values.len() == 1 => Ok(values.first()),
        Some(Some(values)) => Err(format!(
            "{}: {} expects exactly one value, got {} (quote values containing commas)",
            title,
            key,
            values.len()
        )),
    }
}

fn number(section: &SectionMap, title: &str, key: &str, default: f64) -> Result<f64, String> {
    match single_value(section, title, key)? {
        None => Ok(default),
        Some(value) => value
            .as_number()
            .ok_or_else(|| format!("{}: {} must be a number, got '{}'", title, key, value)),
    }
}

fn boolean(section: &SectionMap, title: &str, key: &str, default: bool) -> Result<bool, String> {
    match single_value(section, title, key)? {
        None => Ok(default),
        Some(value) => value
            .as_boolean()
            .ok_or_else(|| format!("{}: {} must be true or false, got '{}'", title, key, value)),
    }
}

/// any scalar is accepted as text: "filename: 2024" is a valid name
fn text(section: &SectionMap, title: &str, key: &str, default: &str) -> Result<String, String> {
    Ok(single_value(section, title, key)?
        .map(|value| value.to_string())
        .unwrap_or_else(|| default.to_string()))
}

fn check_known_names(doc: &DocumentMap) -> Result<(), String> {
    for (title, section) in doc {
        let Some((_, keys)) = LAYOUT.iter().find(|(name, _)| *name == title.as_str()) else {
            return Err(format!(
                "unknown section '{}', expected one of: interval, function, postprocessing, logging",
                title
            ));
        };
        if let Some(key) = section.keys().find(|key| !keys.contains(&key.as_str())) {
            return Err(format!(
                "unknown key '{}' in section '{}', expected one of: {}",
                key,
                title,
                keys.join(", ")
            ));
        }
    }
    Ok(())
}

impl TaskConfig {
    /// typed settings from a parsed document; the document must contain every title of the layout
    pub fn from_document(doc: &DocumentMap) -> Result<TaskConfig, String> {
        check_known_names(doc)?;
        let section = |title: &str| {
            doc.get(title)
                .ok_or_else(|| format!("section '{}' is missing", title))
        };
        let defaults = TaskConfig::default();

        let interval = section(INTERVAL)?;
        let a = number(interval, INTERVAL, "a", defaults.request.a)?;
        let b = number(interval, INTERVAL, "b", defaults.request.b)?;

        let function = section(FUNCTION)?;
        let expression = text(function, FUNCTION, "expression", &defaults.request.expression)?;

        let post = section(POSTPROCESSING)?;
        let default_post = &defaults.postprocessing;
        let postprocessing = Postprocessing {
            plot: boolean(post, POSTPROCESSING, "plot", default_post.plot)?,
            gnuplot: boolean(post, POSTPROCESSING, "gnuplot", default_post.gnuplot)?,
            save: boolean(post, POSTPROCESSING, "save", default_post.save)?,
            save_to_csv: boolean(post, POSTPROCESSING, "save_to_csv", default_post.save_to_csv)?,
            filename: text(post, POSTPROCESSING, "filename", &default_post.filename)?,
        };

        let logging = section(LOGGING)?;
        let loglevel = text(logging, LOGGING, "loglevel", "info")?.to_lowercase();
        let save_log = boolean(logging, LOGGING, "save_log", defaults.save_log)?;

        Ok(TaskConfig {
            request: InterpolationRequest::new(a, b, &expression),
            postprocessing,
            loglevel: Some(loglevel),
            save_log,
        })
    }

    pub fn parse_settings_from_str(input: &str) -> Result<TaskConfig, String> {
        let template = template_from(&LAYOUT);
        let doc = parse_document_as(input, Some(template))?;
        TaskConfig::from_document(&doc)
    }

    pub fn parse_file(path: &Path) -> Result<TaskConfig, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("cannot read task file {}: {}", path.display(), e))?;
        TaskConfig::parse_settings_from_str(&content)
            .map_err(|e| format!("{}: {}", path.display(), e))
    }
}

impl LagrangeTask {
    pub fn from_config(config: TaskConfig) -> LagrangeTask {
        let mut task = LagrangeTask::new();
        task.apply_config(config);
        task
    }

    pub fn apply_config(&mut self, config: TaskConfig) {
        let TaskConfig {
            request,
            postprocessing,
            loglevel,
            save_log,
        } = config;
        self.set_request(request.a, request.b, &request.expression);
        self.set_postprocessing(postprocessing);
        self.set_loglevel(loglevel);
        self.save_log = save_log;
    }

    pub fn parse_settings_from_str(&mut self, input: &str) -> Result<(), String> {
        self.apply_config(TaskConfig::parse_settings_from_str(input)?);
        Ok(())
    }

    pub fn parse_file(&mut self, path: &Path) -> Result<(), String> {
        self.apply_config(TaskConfig::parse_file(path)?);
        Ok(())
    }
}

const TEMPLATE: &str = r#"// Lagrange interpolation task
// lines starting with //, #, % or ; are comments; every key is optional
interval
    // start and end of the interval, a < b
    a: 0
    b: 6
function
    // f(x): x, numbers, + - * / ** ^, sin cos tan exp log sqrt abs pow(base, exponent), pi
    expression: "sin(x) + 0.5*x"
postprocessing
    // png through plotters
    plot: true
    // png through gnuplot, needs gnuplot installed
    gnuplot: false
    // tab separated <filename>.txt and <filename>_nodes.txt
    save: false
    // <filename>.csv and <filename>_nodes.csv
    save_to_csv: false
    filename: lagrange_result
logging
    // debug, info, warn, error or off
    loglevel: info
    save_log: false
"#;

/// Writes a commented task file with all options at their defaults.
/// Without a path it goes to lagrange_task_template.txt in the current directory.
pub fn create_template_file(path: Option<PathBuf>) -> std::io::Result<PathBuf> {
    let file_path = path.unwrap_or_else(|| {
        let mut default_path =
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        default_path.push("lagrange_task_template.txt");
        default_path
    });
    fs::write(&file_path, TEMPLATE)?;
    Ok(file_path)
}
