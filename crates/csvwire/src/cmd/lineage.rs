use csvwire_bytes::ByteCursor;
use csvwire_lineage::MessageLineage;
use csvwire_text::CsvWriter;
use serde::Serialize;
use tracing::{info, warn};

use crate::cmd::{LineageDecodeArgs, LineageEncodeArgs};
use crate::exit::{io_error, lineage_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, table, OutputFormat};

#[derive(Serialize)]
struct HopOutput {
    source_id: u32,
    source_index: i64,
}

#[derive(Serialize)]
struct LineageOutput<'a> {
    sources: Vec<HopOutput>,
    timings: &'a [i64],
}

#[derive(Serialize)]
struct EncodeOutput<'a> {
    path: &'a str,
    bytes: usize,
    sources: usize,
    timings: usize,
}

/// Parse `ID:INDEX`, with the index in decimal or `0x` hex.
pub fn parse_hop(value: &str) -> Result<(u32, i64), String> {
    let (id, index) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ID:INDEX, got {value:?}"))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid source id {id:?}: {err}"))?;
    let index = index.trim();
    let parsed = match index
        .strip_prefix("0x")
        .or_else(|| index.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).map(|bits| bits as i64),
        None => index.parse::<i64>(),
    };
    let index = parsed.map_err(|err| format!("invalid source index {index:?}: {err}"))?;
    Ok((id, index))
}

pub fn encode(args: LineageEncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut lineage = MessageLineage::new();
    for (source_id, source_index) in &args.hops {
        lineage
            .add_source(*source_id, *source_index)
            .map_err(|err| lineage_error("failed to add hop", err))?;
    }
    for stamp in &args.timings {
        lineage
            .add_timing(*stamp)
            .map_err(|err| lineage_error("failed to add timing", err))?;
    }

    let encoded = lineage.to_bytes();
    let path = args.output.display().to_string();
    std::fs::write(&args.output, &encoded)
        .map_err(|err| io_error(&format!("failed to write {path}"), err))?;
    info!(path = %path, bytes = encoded.len(), "wrote lineage record");

    let summary = EncodeOutput {
        path: &path,
        bytes: encoded.len(),
        sources: lineage.sources(),
        timings: lineage.timings(),
    };
    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            let mut out = table(["PATH", "BYTES", "SOURCES", "TIMINGS"]);
            out.add_row(vec![
                summary.path.to_string(),
                summary.bytes.to_string(),
                summary.sources.to_string(),
                summary.timings.to_string(),
            ]);
            println!("{out}");
        }
        OutputFormat::Pretty => println!(
            "wrote {} bytes to {} ({} sources, {} timings)",
            summary.bytes, summary.path, summary.sources, summary.timings
        ),
        OutputFormat::Raw => print_raw(&encoded),
    }
    Ok(SUCCESS)
}

pub fn decode(args: LineageDecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let path = args.path.display().to_string();
    let data = std::fs::read(&args.path)
        .map_err(|err| io_error(&format!("failed to read {path}"), err))?;
    let mut cursor = ByteCursor::new(data);
    let lineage = MessageLineage::from_bytes(&mut cursor)
        .map_err(|err| lineage_error(&format!("failed to decode {path}"), err))?;
    if cursor.remaining() > 0 {
        warn!(path = %path, trailing = cursor.remaining(), "ignoring bytes after lineage record");
    }

    if args.text {
        let mut writer = CsvWriter::new();
        lineage.write_marshallable(&mut *writer.start_record());
        print!("{}", writer.finish());
        return Ok(SUCCESS);
    }

    match format {
        OutputFormat::Json => print_json(&LineageOutput {
            sources: lineage
                .hops()
                .map(|(source_id, source_index)| HopOutput {
                    source_id,
                    source_index,
                })
                .collect(),
            timings: lineage.timing_values(),
        }),
        OutputFormat::Table => {
            let mut out = table(["#", "SOURCE ID", "SOURCE INDEX"]);
            for (n, (source_id, source_index)) in lineage.hops().enumerate() {
                out.add_row(vec![
                    n.to_string(),
                    source_id.to_string(),
                    format!("0x{:x}", source_index as u64),
                ]);
            }
            println!("{out}");
            let mut stamps = table(["#", "TIMING"]);
            for (n, stamp) in lineage.timing_values().iter().enumerate() {
                stamps.add_row(vec![n.to_string(), stamp.to_string()]);
            }
            println!("{stamps}");
        }
        OutputFormat::Pretty => {
            for (source_id, source_index) in lineage.hops() {
                println!("source {source_id} index 0x{:x}", source_index as u64);
            }
            for stamp in lineage.timing_values() {
                println!("timing {stamp}");
            }
        }
        OutputFormat::Raw => print_raw(&lineage.to_bytes()),
    }
    Ok(SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_accepts_decimal_and_hex() {
        assert_eq!(parse_hop("1:100"), Ok((1, 100)));
        assert_eq!(parse_hop("2:0xc8"), Ok((2, 200)));
        assert_eq!(parse_hop("3:-1"), Ok((3, -1)));
        assert_eq!(parse_hop("4:0xffffffffffffffff"), Ok((4, -1)));
    }

    #[test]
    fn hop_rejects_malformed() {
        assert!(parse_hop("100").is_err());
        assert!(parse_hop("-1:5").is_err());
        assert!(parse_hop("1:zz").is_err());
    }
}
