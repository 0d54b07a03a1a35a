use core::fmt;
use std::io;

use crate::serializer::ParseError;

/// icuid error
///
/// Every error has a stable numeric code, 0 is reserved for "no error".
#[derive(Clone, PartialEq, Debug)]
pub enum Error {
    /// The processor doesn't support the CPUID instruction
    Unsupported,
    /// A required argument was missing
    NullArgument,
    /// A file couldn't be opened
    OpenFailure(io::ErrorKind),
    /// Raw data couldn't be parsed
    ParseFailure(ParseError),
}

impl Error {
    /// Stable error code
    pub const fn code(&self) -> i32 {
        match self {
            Error::Unsupported     => 1,
            Error::NullArgument    => 2,
            Error::OpenFailure(_)  => 3,
            Error::ParseFailure(_) => 4,
        }
    }

    /// Canonical message of the error, without any details
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::Unsupported     => "CPUID instruction is not supported",
            Error::NullArgument    => "Passed NULL to a parameter which can't be NULL",
            Error::OpenFailure(_)  => "Error opening file",
            Error::ParseFailure(_) => "Error parsing cpuid data from input",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported |
            Error::NullArgument      => f.write_str(self.as_str()),
            Error::OpenFailure(kind) => f.write_fmt(format_args!("{}: {kind}", self.as_str())),
            Error::ParseFailure(err) => f.write_fmt(format_args!("{}: {err}", self.as_str())),
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::ParseFailure(err)
    }
}
