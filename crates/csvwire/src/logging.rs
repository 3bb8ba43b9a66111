use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Library crates whose events the CLI surfaces.
const CSVWIRE_TARGETS: [&str; 4] = ["csvwire", "csvwire_bytes", "csvwire_text", "csvwire_lineage"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Filter for the csvwire crates at this level. Anything else only
    /// reports errors.
    pub fn scoped_filter(self) -> String {
        let level = self.directive();
        let mut filter = String::from("error");
        for target in CSVWIRE_TARGETS {
            filter.push_str(&format!(",{target}={level}"));
        }
        filter
    }
}

/// Send library and CLI events to stderr.
///
/// `RUST_LOG`, when set and valid, replaces the filter built from `level`.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.scoped_filter()));
    let verbose = matches!(level, LogLevel::Debug | LogLevel::Trace);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(verbose);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_filter_covers_every_crate() {
        assert_eq!(
            LogLevel::Debug.scoped_filter(),
            "error,csvwire=debug,csvwire_bytes=debug,csvwire_text=debug,csvwire_lineage=debug"
        );
    }

    #[test]
    fn scoped_filter_parses() {
        for level in [LogLevel::Error, LogLevel::Info, LogLevel::Trace] {
            assert!(EnvFilter::try_new(level.scoped_filter()).is_ok());
        }
    }
}
