use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Degenerate input rejected at setup or event ingestion
    InvalidInput(String),
    /// Palette entry that is not a `#rrggbb` string
    InvalidColor(String),
    /// `populate` called on a world that already has bubbles
    AlreadyPopulated,
    /// Config file could not be read or parsed
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::InvalidColor(color) => write!(f, "invalid color: {:?}", color),
            Error::AlreadyPopulated => write!(f, "world is already populated"),
            Error::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<ron::error::SpannedError> for Error {
    fn from(e: ron::error::SpannedError) -> Self {
        Error::Config(e.to_string())
    }
}
