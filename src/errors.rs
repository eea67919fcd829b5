use std::error::Error as StdError;
use std::fmt;
use std::string::FromUtf8Error;

// type alias for Result for use across the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Source directory or one of its assets could not be read
    Load(String),
    /// Asset content is not well-formed XML
    Parse(String),
    /// Workspace directory or one of its files could not be written
    Write(String),
    /// Stroke outline could not be computed for a path
    Geometry(String),
    Config(String),
    Cli(String),
    /// External font builder failed
    Build(String),
    Io(std::io::Error),
    Other(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load(reason) => write!(f, "Could not load SVG files: {reason}"),
            Error::Parse(reason) => write!(f, "Parse error: {reason}"),
            Error::Write(reason) => write!(f, "Could not write temp files: {reason}"),
            Error::Geometry(reason) => write!(f, "Geometry error: {reason}"),
            Error::Config(reason) => write!(f, "Configuration error: {reason}"),
            Error::Cli(reason) => write!(f, "{reason}"),
            Error::Build(reason) => write!(f, "Font generation failed: {reason}"),
            Error::Io(source) => write!(f, "IO error: {source}"),
            Error::Other(source) => write!(f, "{source}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(source) => Some(source),
            Error::Other(e) => Some(&**e),
            _ => None,
        }
    }
}

impl Error {
    pub fn from_err<T>(err: T) -> Error
    where
        T: StdError + Send + Sync + 'static,
    {
        Error::Other(Box::new(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<FromUtf8Error> for Error {
    fn from(err: FromUtf8Error) -> Error {
        Error::Parse(format!("utf8: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Config(err.to_string())
    }
}
