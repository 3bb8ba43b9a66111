use std::fmt;
use std::io;

use csvwire_lineage::LineageError;
use csvwire_text::WireError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    match err {
        WireError::Io(source) => io_error(context, source),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn lineage_error(context: &str, err: LineageError) -> CliError {
    match err {
        LineageError::Wire(err) => wire_error(context, err),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvwire_lineage::Capacity;

    #[test]
    fn missing_file_is_failure() {
        let err = io_error("open", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
        assert!(err.message.starts_with("open: "));
    }

    #[test]
    fn wire_io_maps_through_io_kind() {
        let err = wire_error(
            "read",
            WireError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }

    #[test]
    fn capacity_is_invalid_data() {
        let err = lineage_error(
            "encode",
            LineageError::CapacityExceeded {
                what: Capacity::Sources,
                capacity: 20,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }
}
