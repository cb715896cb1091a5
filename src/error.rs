use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt::Result as FmtResult;
use std::fmt::{Display, Formatter};
use std::result::Result as StdResult;

type Source = Option<Box<dyn StdError + Send + Sync + 'static>>;

/// Possible errors that can occur while extracting metadata or running batch jobs.
#[derive(Debug)]
pub enum Error {
    /// The caller supplied no usable input, for example an empty folder path.
    Input { reason: String, source: Source },
    /// The input folder contains no files of the requested format.
    /// Front ends treat this as an informational outcome, not a failure.
    NotFound { reason: String },
    /// Opening or reading a scan file failed.
    /// Typically caused by a corrupt file or an unsupported format.
    Extraction { reason: String, source: Source },
    /// Writing a report file failed.
    Report { reason: String, source: Source },
    /// A configuration file could not be read or parsed.
    Config { reason: String, source: Source },
    /// The external executable could not be started.
    Invoke { reason: String, source: Source },
}

impl Error {
    /// Creates an input error from text.
    pub fn input<T>(reason: &str) -> Result<T> {
        Err(Error::Input {
            reason: reason.to_string(),
            source: None,
        })
    }

    /// Creates a not found error from text.
    pub fn not_found<T>(reason: &str) -> Result<T> {
        Err(Error::NotFound {
            reason: reason.to_string(),
        })
    }

    /// Creates an extraction error from text.
    pub fn extraction<T>(reason: &str) -> Result<T> {
        Err(Error::Extraction {
            reason: reason.to_string(),
            source: None,
        })
    }

    /// Returns true for the informational "nothing to do" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Error::Input { reason, .. } => write!(f, "Invalid input: {reason}"),
            Error::NotFound { reason } => write!(f, "{reason}"),
            Error::Extraction { reason, .. } => write!(f, "Failed to extract metadata: {reason}"),
            Error::Report { reason, .. } => write!(f, "Failed to write report: {reason}"),
            Error::Config { reason, .. } => write!(f, "Invalid configuration: {reason}"),
            Error::Invoke { reason, .. } => write!(f, "Failed to invoke executable: {reason}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let source = match self {
            Error::Input { source, .. } => source,
            Error::NotFound { .. } => return None,
            Error::Extraction { source, .. } => source,
            Error::Report { source, .. } => source,
            Error::Config { source, .. } => source,
            Error::Invoke { source, .. } => source,
        };
        source.as_ref().map(|s| s.as_ref() as &(dyn StdError + 'static))
    }
}

pub type Result<T> = StdResult<T, Error>;

/// Helper trait for types that can be converted into an Error.
pub(crate) trait Converter<T, E> {
    fn input_err<C: Display>(self, context: C) -> Result<T>;
    fn extraction_err<C: Display>(self, context: C) -> Result<T>;
    fn report_err<C: Display>(self, context: C) -> Result<T>;
    fn config_err<C: Display>(self, context: C) -> Result<T>;
    fn invoke_err<C: Display>(self, context: C) -> Result<T>;
}

/// Wraps std errors, keeping them as the error source.
impl<T, E> Converter<T, E> for StdResult<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn input_err<C: Display>(self, reason: C) -> Result<T> {
        self.map_err(|e| Error::Input {
            reason: reason.to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn extraction_err<C: Display>(self, reason: C) -> Result<T> {
        self.map_err(|e| Error::Extraction {
            reason: reason.to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn report_err<C: Display>(self, reason: C) -> Result<T> {
        self.map_err(|e| Error::Report {
            reason: reason.to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn config_err<C: Display>(self, reason: C) -> Result<T> {
        self.map_err(|e| Error::Config {
            reason: reason.to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn invoke_err<C: Display>(self, reason: C) -> Result<T> {
        self.map_err(|e| Error::Invoke {
            reason: reason.to_string(),
            source: Some(Box::new(e)),
        })
    }
}

/// Turns a missing value into an error without source.
impl<T> Converter<T, Infallible> for Option<T> {
    fn input_err<C: Display>(self, reason: C) -> Result<T> {
        self.ok_or_else(|| Error::Input {
            reason: reason.to_string(),
            source: None,
        })
    }

    fn extraction_err<C: Display>(self, reason: C) -> Result<T> {
        self.ok_or_else(|| Error::Extraction {
            reason: reason.to_string(),
            source: None,
        })
    }

    fn report_err<C: Display>(self, reason: C) -> Result<T> {
        self.ok_or_else(|| Error::Report {
            reason: reason.to_string(),
            source: None,
        })
    }

    fn config_err<C: Display>(self, reason: C) -> Result<T> {
        self.ok_or_else(|| Error::Config {
            reason: reason.to_string(),
            source: None,
        })
    }

    fn invoke_err<C: Display>(self, reason: C) -> Result<T> {
        self.ok_or_else(|| Error::Invoke {
            reason: reason.to_string(),
            source: None,
        })
    }
}
