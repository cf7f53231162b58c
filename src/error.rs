use core::fmt;

/// Result alias for `kmeans-quantizer`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering engine and the quantization driver.
#[derive(Debug)]
pub enum Error {
    /// Malformed dataset, or a cluster count incompatible with the sample count.
    InvalidInput(String),

    /// A configuration parameter had the wrong type (e.g. a fractional value
    /// where an integer is required).
    InvalidType {
        /// Parameter name.
        param: &'static str,
        /// What the parameter must be.
        expected: &'static str,
    },

    /// A configuration parameter was well-typed but out of range.
    InvalidValue {
        /// Parameter name.
        param: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Filesystem failure while reading or writing an artifact.
    Io(std::io::Error),

    /// Image decode or encode failure.
    Image(image::ImageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::InvalidType { param, expected } => {
                write!(f, "parameter `{param}` has the wrong type: expected {expected}")
            }
            Error::InvalidValue { param, reason } => {
                write!(f, "invalid value for parameter `{param}`: {reason}")
            }
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err)
    }
}
