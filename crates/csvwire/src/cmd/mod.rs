use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod fields;
pub mod lineage;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the header and rows of a CSV file.
    Fields(FieldsArgs),
    /// Encode or decode binary message lineage records.
    Lineage(LineageArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Fields(args) => fields::run(args, format),
        Command::Lineage(args) => match args.command {
            LineageCommand::Encode(args) => lineage::encode(args, format),
            LineageCommand::Decode(args) => lineage::decode(args, format),
        },
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// CSV file to read.
    pub path: PathBuf,
    /// Decode text as UTF-8 instead of one byte per character.
    #[arg(long)]
    pub utf8: bool,
}

#[derive(Args, Debug)]
pub struct LineageArgs {
    #[command(subcommand)]
    pub command: LineageCommand,
}

#[derive(Subcommand, Debug)]
pub enum LineageCommand {
    /// Write a binary lineage record.
    Encode(LineageEncodeArgs),
    /// Read a binary lineage record.
    Decode(LineageDecodeArgs),
}

#[derive(Args, Debug)]
pub struct LineageEncodeArgs {
    /// Hop as SOURCE_ID:INDEX; the index may be decimal or 0x hex. Repeatable.
    #[arg(long = "hop", value_name = "ID:INDEX", value_parser = lineage::parse_hop)]
    pub hops: Vec<(u32, i64)>,
    /// Timing stamp. Repeatable.
    #[arg(long = "timing", value_name = "N", allow_hyphen_values = true)]
    pub timings: Vec<i64>,
    /// File to write.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct LineageDecodeArgs {
    /// File holding a binary lineage record.
    pub path: PathBuf,
    /// Print the record in its text form instead.
    #[arg(long)]
    pub text: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
