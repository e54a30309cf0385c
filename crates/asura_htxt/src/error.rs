//! Error types that can be emitted from this library
//!

use derive_more::derive::Display;
use miette::Diagnostic;
use thiserror::Error;

/// The textual field of a record or container an error refers to
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    /// The record's localized text
    #[display("text")]
    Text,

    /// The record's internal name
    #[display("name")]
    Name,

    /// The container's file name
    #[display("file name")]
    FileName,

    /// A magic number
    #[display("magic number")]
    MagicNumber,

    /// The container's language id
    #[display("language id")]
    LanguageId,
}

/// Reasons an escaped string can not be turned back into raw code units
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum EscapeError {
    /// A backslash was not followed by enough hexadecimal digits
    #[error("escape at position {position} needs {expected} hex digits")]
    #[diagnostic(help("every backslash starts an escape such as \\00e9 (text) or \\7f (name)"))]
    Malformed {
        /// Character offset of the backslash
        position: usize,
        /// Number of hex digits the escape requires
        expected: usize,
    },

    /// The text holds a zero unit, which is reserved for the terminator
    #[error("nul unit at position {position}")]
    #[diagnostic(help("a zero unit ends the field, remove it from the text"))]
    Nul {
        /// Character offset of the escape or literal
        position: usize,
    },

    /// A literal character has no single code unit representation
    #[error("character {character:?} at position {position} is not representable")]
    Unrepresentable {
        /// Character offset of the literal
        position: usize,
        /// The offending character
        character: char,
    },
}

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent warpper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Transparent warpper for [`polars::error::PolarsError`]
    #[cfg(feature = "polars")]
    #[error(transparent)]
    PolarsError(#[from] polars::error::PolarsError),

    /// File does not start with the HTXT signature
    #[error("file is not an htxt resource")]
    InvalidSignature,

    /// Stream ended before a section was complete
    #[error("unexpected end of file while reading {section}")]
    Truncated {
        /// Section being read when the data ran out
        section: &'static str,
    },

    /// A count stored in the file disagrees with the data that follows it
    #[error("{section} declares {expected} entries but only {found} fit")]
    InconsistentCount {
        /// Section holding the count
        section: &'static str,
        /// Declared count
        expected: u64,
        /// Count actually available
        found: u64,
    },

    /// The stored file name is not 7-bit ASCII
    #[error("stored file name is not ascii")]
    InvalidFileName,

    /// A field could not be converted between escaped and raw form
    #[error("invalid {field} in record {record}")]
    InvalidEscape {
        /// Field holding the bad escape
        field: Field,
        /// Index of the record
        record: usize,
        /// Details on the escape
        #[source]
        #[diagnostic_source]
        source: EscapeError,
    },

    /// The container's file name can not be stored as ascii
    #[error("file name {0:?} must be ascii without nul bytes")]
    NonAsciiFileName(String),

    /// A section grew beyond what a 32-bit size field can describe
    #[error("{0} does not fit in a 32-bit size field")]
    SizeOverflow(&'static str),

    /// A hexadecimal cell of a table could not be parsed
    #[error("invalid {field} {value:?} in row {row}")]
    #[diagnostic(help("expected up to 8 hexadecimal digits such as 0000abcd"))]
    InvalidHex {
        /// Column holding the value
        field: Field,
        /// Row of the table, the info row is 0
        row: usize,
        /// Cell content
        value: String,
    },

    /// A numeric cell of a table is missing or not a number
    #[error("invalid {column} cell in row {row}")]
    InvalidCell {
        /// Column holding the cell
        column: &'static str,
        /// Row of the table, the info row is 0
        row: usize,
    },

    /// The data sheet has fewer rows than the info sheet announces
    #[error("table announces {expected} records but has {found} rows")]
    MissingRows {
        /// Value of the record count cell
        expected: usize,
        /// Rows present
        found: usize,
    },
}

impl Error {
    pub(crate) fn truncated(section: &'static str) -> impl FnOnce(std::io::Error) -> Error {
        move |e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::Truncated { section },
            _ => Error::IOError(e),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
