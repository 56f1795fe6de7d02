use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// File open/read failure.
    Read(String),
    /// Malformed tabular content (CSV parse, unreadable sheet).
    Parse(String),
    /// A requested sheet does not exist in the workbook.
    MissingSheet(String),
    /// Output persistence failure.
    Write(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "read error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::MissingSheet(name) => write!(f, "sheet '{name}' not found"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
