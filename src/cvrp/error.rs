use std::{fmt, io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The input path does not exist.
    FileNotFound(PathBuf),
    /// A recognized line (or CSV record) whose content did not parse.
    Parse { line: usize, message: String },
    Io(io::Error),
    /// Statistics and charts need at least one generation.
    EmptyLog,
    /// Node 1 has no coordinate, so no route can be anchored.
    MissingDepot,
    Render(String),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn is_file_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "{} not found", path.display()),
            Self::Parse { line, message } => write!(f, "parse error at line {}: {}", line, message),
            Self::Io(err) => write!(f, "i/o error: {}", err),
            Self::EmptyLog => write!(f, "evolution log has no generations"),
            Self::MissingDepot => write!(f, "depot (node 1) has no coordinate"),
            Self::Render(message) => write!(f, "rendering failed: {}", message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
