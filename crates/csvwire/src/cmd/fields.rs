use std::path::Path;

use csvwire_text::{CsvWire, WireConfig};
use serde::Serialize;
use tracing::debug;

use crate::cmd::FieldsArgs;
use crate::exit::{io_error, wire_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, table, OutputFormat};

#[derive(Serialize)]
struct FieldsOutput<'a> {
    path: &'a str,
    header: &'a [String],
    row_count: usize,
    rows: &'a [Vec<String>],
}

pub fn run(args: FieldsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut wire = open(&args.path, args.utf8)?;
    let rows: Vec<Vec<String>> = wire.rows().collect();
    debug!(
        path = %args.path.display(),
        columns = wire.header().len(),
        rows = rows.len(),
        "read csv file"
    );

    match format {
        OutputFormat::Json => {
            let path = args.path.display().to_string();
            print_json(&FieldsOutput {
                path: &path,
                header: wire.header(),
                row_count: rows.len(),
                rows: &rows,
            });
        }
        OutputFormat::Table => {
            let mut out = table(wire.header().iter().map(String::as_str));
            for row in &rows {
                out.add_row(row.iter().map(String::as_str));
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            println!("header: {}", wire.header().join(" | "));
            for (n, row) in rows.iter().enumerate() {
                println!("row {}: {}", n + 1, row.join(" | "));
            }
        }
        OutputFormat::Raw => {
            let mut text = String::new();
            for row in &rows {
                text.push_str(&row.join("\t"));
                text.push('\n');
            }
            print_raw(text.as_bytes());
        }
    }

    Ok(SUCCESS)
}

fn open(path: &Path, utf8: bool) -> CliResult<CsvWire> {
    let context = format!("failed to read {}", path.display());
    if utf8 {
        let data = std::fs::read(path).map_err(|err| io_error(&context, err))?;
        return Ok(CsvWire::from_bytes(data, WireConfig::default()));
    }
    CsvWire::from_file(path).map_err(|err| wire_error(&context, err))
}
