//! This library handles reading from and creating **HTXT** text resources used by the *Asura* engine.
//!
//! # HTXT Format Documentation
//!
//! HTXT files hold the localized texts of games built on the *Asura* engine, such as the
//! `*.asr_en` files of *Sniper Elite 4*. Each file stores a list of records, every record pairing an
//! identifier and an internal name with a UTF-16 text.
//!
//! ## File Structure
//!
//! A HTXT file consists of a header, followed by the text table, the file name, the names blob and
//! a zeroed trailer.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Signature              | 8 bytes: "Asura   "                                        |
//! | 0x0008         | Format Tag             | 4 bytes: "HTXT"                                            |
//! | 0x000C         | Content Size           | 4 bytes: Size from the format tag to the end of the names  |
//! | 0x0010         | Version                | 4 bytes: Fixed value 0x00000003                            |
//! | 0x0014         | Reserved               | 4 bytes: Always zero                                       |
//! | 0x0018         | Record Count           | 4 bytes: Number of records in the file                     |
//! | 0x001C         | Magic Number           | 4 bytes: Identifier of the resource                        |
//! | 0x0020         | Text Size              | 4 bytes: Size in bytes of all texts                        |
//! | 0x0024         | Language Id            | 4 bytes: Identifier of the language                        |
//!
//! ### Text Table
//!
//! After the header, the texts are stored sequentially, one per record:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Magic Number           | 4 bytes: Identifier of the record                       |
//! | 0x0004         | Characters             | 4 bytes: Number of UTF-16 units, including the null     |
//! | 0x0008         | Data                   | (Characters * 2) bytes: null terminated UTF-16 string   |
//!
//! ### File Name
//!
//! The name of the resource as a null terminated ASCII string, padded with zeros to a multiple of
//! four bytes.
//!
//! ### Names Blob
//!
//! A 4 byte size followed by the names of all records as null terminated byte strings, in the
//! same order as the text table. Names are matched to texts purely by position.
//!
//! ### Trailer
//!
//! 16 zero bytes.
//!
//! ## Escaped Form
//!
//! Texts and names are exposed as printable strings, see [`escape`] for the escaping rules.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.asr_en` (and other `.asr_*` language suffixes)
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod error;
pub mod escape;
pub mod read;
#[cfg(feature = "serde")]
pub mod table;
pub mod types;
pub mod write;

pub use read::HtxtReader;
pub use types::{Container, Record};
pub use write::{encode, HtxtWriter};
