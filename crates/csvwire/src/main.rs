mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "csvwire", version, about = "CSV wire and message lineage CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::LineageCommand;

    #[test]
    fn parses_fields_subcommand() {
        let cli = Cli::try_parse_from(["csvwire", "fields", "/tmp/input.csv", "--utf8"])
            .expect("fields args should parse");
        match cli.command {
            Command::Fields(args) => assert!(args.utf8),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_repeated_hops_and_negative_timings() {
        let cli = Cli::try_parse_from([
            "csvwire",
            "lineage",
            "encode",
            "--hop",
            "1:100",
            "--hop",
            "2:0xc8",
            "--timing",
            "-5",
            "--timing",
            "20",
            "--output",
            "/tmp/lineage.bin",
        ])
        .expect("encode args should parse");

        let Command::Lineage(args) = cli.command else {
            panic!("expected lineage command");
        };
        let LineageCommand::Encode(encode) = args.command else {
            panic!("expected encode");
        };
        assert_eq!(encode.hops, vec![(1, 100), (2, 200)]);
        assert_eq!(encode.timings, vec![-5, 20]);
    }

    #[test]
    fn rejects_malformed_hop() {
        let err = Cli::try_parse_from([
            "csvwire",
            "lineage",
            "encode",
            "--hop",
            "nonsense",
            "--output",
            "/tmp/lineage.bin",
        ])
        .expect_err("malformed hop should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["csvwire", "version", "--format", "json", "--extended"])
            .expect("version args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Version(_)));
    }
}
