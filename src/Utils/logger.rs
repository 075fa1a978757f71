//! tiny module to save an interpolation result into text or csv files
use crate::numerical::interpolation_api::InterpolationResult;
use csv::Writer;
use itertools::izip;
use std::fs::File;
use std::io::{self, Write};

const GRID_HEADERS: [&str; 3] = ["x", "f(x)", "L(x)"];
const NODES_HEADERS: [&str; 2] = ["x", "y"];

fn grid_rows(result: &InterpolationResult) -> Vec<[String; 3]> {
    izip!(
        result.grid_x.iter(),
        result.y_original.iter(),
        result.y_interpolated.iter()
    )
    .map(|(x, f, l)| [x.to_string(), f.to_string(), l.to_string()])
    .collect()
}

fn nodes_rows(result: &InterpolationResult) -> Vec<[String; 2]> {
    izip!(result.nodes_x.iter(), result.nodes_y.iter())
        .map(|(x, y)| [x.to_string(), y.to_string()])
        .collect()
}

fn write_tab_separated<const N: usize>(
    filename: &str,
    headers: [&str; N],
    rows: Vec<[String; N]>,
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(file, "{}", headers.join("\t"))?;
    for row in rows {
        writeln!(file, "{}", row.join("\t"))?;
    }
    Ok(())
}

fn write_csv<const N: usize>(
    filename: &str,
    headers: [&str; N],
    rows: Vec<[String; N]>,
) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// columns x, f(x), L(x) over the evaluation grid, tab separated
pub fn save_result_to_file(result: &InterpolationResult, filename: &str) -> io::Result<()> {
    write_tab_separated(filename, GRID_HEADERS, grid_rows(result))
}

/// columns x, y of the interpolation nodes, tab separated
pub fn save_nodes_to_file(result: &InterpolationResult, filename: &str) -> io::Result<()> {
    write_tab_separated(filename, NODES_HEADERS, nodes_rows(result))
}

pub fn save_result_to_csv(result: &InterpolationResult, filename: &str) -> io::Result<()> {
    write_csv(filename, GRID_HEADERS, grid_rows(result))
}

pub fn save_nodes_to_csv(result: &InterpolationResult, filename: &str) -> io::Result<()> {
    write_csv(filename, NODES_HEADERS, nodes_rows(result))
}
