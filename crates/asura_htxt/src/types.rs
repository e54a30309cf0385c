//! Base types for structure of HTXT file.

use binrw::{BinRead, BinWrite};
use derive_more::derive::{Constructor, Deref};

/// Format version written into every header
pub const FORMAT_VERSION: u32 = 3;

/// Size of the header words counted by [`HtxtHeader::content_size`]: the format tag plus seven u32s
pub const HEADER_TAIL_SIZE: u32 = 32;

/// Size of the magic number and character count that precede every text
pub const RECORD_HEADER_SIZE: u32 = 8;

/// Size of the zeroed trailer closing the file
pub const TRAILER_SIZE: usize = 16;

/// HTXT file header
///
/// Every file starts with "Asura   " followed by the "HTXT" tag. All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"Asura   HTXT", little)]
pub struct HtxtHeader {
    /// Size of everything from the format tag up to the end of the names blob
    pub content_size: u32,

    /// Format version, always [`FORMAT_VERSION`]
    pub version: u32,

    /// Unused, always zero
    pub reserved: u32,

    /// The number of records stored in the file
    pub records: u32,

    /// Identifier of the whole resource
    pub magic_number: u32,

    /// Size in bytes of all texts including their terminators
    pub text_size: u32,

    /// Identifier of the language of the texts
    pub language_id: u32,
}

impl Default for HtxtHeader {
    fn default() -> Self {
        Self {
            content_size: HEADER_TAIL_SIZE,
            version: FORMAT_VERSION,
            reserved: 0,
            records: Default::default(),
            magic_number: Default::default(),
            language_id: Default::default(),
            text_size: Default::default(),
        }
    }
}

/// A localized text entry
#[derive(Constructor, Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Identifier of the entry
    pub magic_number: u32,

    /// Internal name, escaped with two digit escapes
    pub name: String,

    /// Localized text, escaped with four digit escapes
    pub text: String,
}

/// A decoded HTXT resource
///
/// Dereferences to its records, whose order matches the file.
#[derive(Constructor, Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Container {
    /// Identifier of the whole resource
    pub magic_number: u32,

    /// Identifier of the language of the texts
    pub language_id: u32,

    /// File name stored inside the resource
    pub file_name: String,

    /// The text entries
    #[deref]
    pub records: Vec<Record>,
}
