//! Errors of this crate.

/// List of features whose non-activation may cause a runtime error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Feature {
    /// Snappy compression
    Snappy,
    /// Gzip compression
    Gzip,
    /// Zstd compression
    Zstd,
}

/// Errors generated by this crate.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ParquetError {
    /// The data or state is not valid against the parquet specification.
    OutOfSpec(String),
    /// The requested operation needs a feature that is not active.
    FeatureNotActive(Feature, String),
    /// The operation is part of the parquet specification but is not
    /// supported by this implementation.
    FeatureNotSupported(String),
    /// A parameter is invalid for the operation, e.g. more rows were
    /// written into a chunk than it was declared with.
    InvalidParameter(String),
    /// An I/O error from the underlying writer.
    Transport(String),
}

impl ParquetError {
    pub(crate) fn oos<I: Into<String>>(message: I) -> Self {
        Self::OutOfSpec(message.into())
    }
}

impl std::error::Error for ParquetError {}

impl std::fmt::Display for ParquetError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ParquetError::OutOfSpec(message) => {
                write!(fmt, "File out of specification: {message}")
            },
            ParquetError::FeatureNotActive(feature, reason) => {
                write!(
                    fmt,
                    "The feature \"{feature:?}\" needs to be active to {reason}"
                )
            },
            ParquetError::FeatureNotSupported(reason) => {
                write!(fmt, "Not yet supported: {reason}")
            },
            ParquetError::InvalidParameter(message) => {
                write!(fmt, "Invalid parameter: {message}")
            },
            ParquetError::Transport(message) => {
                write!(fmt, "Transport error: {message}")
            },
        }
    }
}

impl From<std::num::TryFromIntError> for ParquetError {
    fn from(_: std::num::TryFromIntError) -> ParquetError {
        ParquetError::oos("Number must be zero or positive")
    }
}

impl From<std::io::Error> for ParquetError {
    fn from(e: std::io::Error) -> ParquetError {
        ParquetError::Transport(e.to_string())
    }
}

impl From<crate::thrift_format::thrift::Error> for ParquetError {
    fn from(e: crate::thrift_format::thrift::Error) -> ParquetError {
        ParquetError::OutOfSpec(e.to_string())
    }
}

#[cfg(feature = "snappy")]
impl From<snap::Error> for ParquetError {
    fn from(e: snap::Error) -> ParquetError {
        ParquetError::OutOfSpec(e.to_string())
    }
}

/// A specialized `Result` for errors of this crate.
pub type ParquetResult<T> = std::result::Result<T, ParquetError>;
