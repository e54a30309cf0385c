//! Types for writing HTXT files
//!

use binrw::BinWrite;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Cursor, Write};
use tracing::{debug, instrument};
use widestring::U16String;

use crate::error::{Error, Field, Result};
use crate::escape::{unescape_ascii, unescape_utf16, unescaped_len};
use crate::types::{
    Container, HtxtHeader, FORMAT_VERSION, HEADER_TAIL_SIZE, RECORD_HEADER_SIZE, TRAILER_SIZE,
};

/// Size of the file name region: the name, its terminator, and zero padding up to a multiple of four
pub const fn file_name_region_size(len: usize) -> usize {
    (len + 1).next_multiple_of(4)
}

#[derive(Debug, Clone, PartialEq)]
struct RawRecord {
    magic_number: u32,
    text: U16String,
    name: Vec<u8>,
}

impl RawRecord {
    /// Stored character count, which includes the terminator
    fn char_count(&self) -> usize {
        self.text.len() + 1
    }
}

/// Every size field of a container, computed once from the raw payloads that are later emitted
#[derive(Debug, Clone, PartialEq)]
pub struct Layout<'a> {
    container: &'a Container,
    records: Vec<RawRecord>,

    /// Bytes of all texts including terminators
    pub text_size: u32,

    /// Bytes of the names blob including terminators
    pub name_size: u32,

    /// Bytes of the file name, its terminator and padding
    pub file_name_region: u32,

    /// Value of the header's content size field
    pub content_size: u32,
}

fn to_u32(value: usize, what: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::SizeOverflow(what))
}

impl<'a> Layout<'a> {
    /// Unescape every field of the container and derive the header sizes from the result.
    pub fn compute(container: &'a Container) -> Result<Self> {
        let file_name = &container.file_name;
        if !file_name.is_ascii() || file_name.contains('\0') {
            return Err(Error::NonAsciiFileName(file_name.clone()));
        }

        let records = container
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let text = unescape_utf16(&record.text).map_err(|source| Error::InvalidEscape {
                    field: Field::Text,
                    record: index,
                    source,
                })?;
                debug_assert_eq!(text.len() + 1, unescaped_len(&record.text));

                let name = unescape_ascii(&record.name).map_err(|source| Error::InvalidEscape {
                    field: Field::Name,
                    record: index,
                    source,
                })?;

                Ok(RawRecord {
                    magic_number: record.magic_number,
                    text,
                    name,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let text_size: usize = records.iter().map(|r| 2 * r.char_count()).sum();
        let name_size: usize = records.iter().map(|r| r.name.len() + 1).sum();
        let file_name_region = file_name_region_size(file_name.len());
        let content_size = HEADER_TAIL_SIZE as usize
            + RECORD_HEADER_SIZE as usize * records.len()
            + text_size
            + file_name_region
            + 4
            + name_size;

        Ok(Layout {
            container,
            records,
            text_size: to_u32(text_size, "text size")?,
            name_size: to_u32(name_size, "names blob")?,
            file_name_region: to_u32(file_name_region, "file name")?,
            content_size: to_u32(content_size, "content size")?,
        })
    }

    /// Total size of the encoded file
    pub fn file_size(&self) -> usize {
        // signature and trailer are outside of the content size
        8 + self.content_size as usize + TRAILER_SIZE
    }

    fn emit(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::with_capacity(self.file_size()));

        HtxtHeader {
            content_size: self.content_size,
            version: FORMAT_VERSION,
            reserved: 0,
            records: to_u32(self.records.len(), "record count")?,
            magic_number: self.container.magic_number,
            text_size: self.text_size,
            language_id: self.container.language_id,
        }
        .write(&mut out)?;

        for record in &self.records {
            out.write_u32::<LittleEndian>(record.magic_number)?;
            out.write_u32::<LittleEndian>(record.char_count() as u32)?;
            for unit in record.text.as_slice() {
                out.write_u16::<LittleEndian>(*unit)?;
            }
            out.write_u16::<LittleEndian>(0)?;
        }

        let file_name = self.container.file_name.as_bytes();
        out.write_all(file_name)?;
        out.write_all(&vec![0u8; self.file_name_region as usize - file_name.len()])?;

        out.write_u32::<LittleEndian>(self.name_size)?;
        for record in &self.records {
            out.write_all(&record.name)?;
            out.write_u8(0)?;
        }

        out.write_all(&[0u8; TRAILER_SIZE])?;

        Ok(out.into_inner())
    }
}

/// HTXT file generator
///
/// The whole file is rendered in memory before anything reaches the inner writer, so a failed
/// encode never leaves a partial file behind.
///
/// ```
/// # fn doit() -> asura_htxt::error::Result<()>
/// # {
/// use asura_htxt::{Container, HtxtWriter, Record};
///
/// let container = Container::new(
///     0x1a2b3c4d,
///     0x00000001,
///     "menu".into(),
///     vec![Record::new(1, "MENU_START".into(), "Start Game".into())],
/// );
///
/// let mut buf = Vec::new();
/// HtxtWriter::new(&mut buf).write(&container)?;
/// assert_eq!(&buf[..12], b"Asura   HTXT");
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct HtxtWriter<W: Write> {
    inner: W,
}

impl<W: Write> HtxtWriter<W> {
    /// Wrap the writer receiving the encoded file.
    pub fn new(inner: W) -> HtxtWriter<W> {
        HtxtWriter { inner }
    }

    /// Encode the container and write it out.
    #[instrument(skip_all, err, fields(records = container.len()))]
    pub fn write(mut self, container: &Container) -> Result<W> {
        let data = encode(container)?;
        self.inner.write_all(&data)?;
        self.inner.flush()?;

        Ok(self.inner)
    }
}

/// Encode the container into a new buffer.
pub fn encode(container: &Container) -> Result<Vec<u8>> {
    let layout = Layout::compute(container)?;
    debug!(
        content_size = layout.content_size,
        text_size = layout.text_size,
        name_size = layout.name_size,
        "computed layout"
    );

    layout.emit()
}

#[cfg(test)]
mod test {
    use pretty_assertions::{assert_eq, assert_str_eq};
    use tracing_test::traced_test;

    use crate::error::{EscapeError, Error, Field, Result};
    use crate::read::HtxtReader;
    use crate::types::{Container, Record, HEADER_TAIL_SIZE};
    use crate::write::{encode, file_name_region_size, HtxtWriter, Layout};

    #[test]
    fn file_name_padding() {
        assert_eq!(file_name_region_size(0), 4);
        assert_eq!(file_name_region_size(3), 4);
        assert_eq!(file_name_region_size(4), 8);
        assert_eq!(file_name_region_size(7), 8);
        assert_eq!(file_name_region_size(8), 12);
    }

    #[test]
    fn empty_content_size() -> Result<()> {
        let container = Container::new(0, 0, "hud_text".into(), vec![]);
        let layout = Layout::compute(&container)?;

        assert_eq!(layout.content_size, HEADER_TAIL_SIZE + 12 + 4);
        assert_eq!(layout.file_size(), 8 + 48 + 16);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn htxt_empty_write() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // Header
            0x41, 0x73, 0x75, 0x72, 0x61, 0x20, 0x20, 0x20,
            0x48, 0x54, 0x58, 0x54,
            0x28, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x44, 0x33, 0x22, 0x11,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00, 0x00, 0x00,
            // File name
            0x61, 0x62, 0x63, 0x00,
            // Names
            0x00, 0x00, 0x00, 0x00,
            // Trailer
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let container = Container::new(0x11223344, 0x09, "abc".into(), vec![]);
        let actual = encode(&container)?;

        assert_eq!(actual.len(), expected.len());
        assert_str_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));

        Ok(())
    }

    #[traced_test]
    #[test]
    fn htxt_single_record_write() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // Header
            0x41, 0x73, 0x75, 0x72, 0x61, 0x20, 0x20, 0x20,
            0x48, 0x54, 0x58, 0x54,
            0x3A, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x44, 0x33, 0x22, 0x11,
            0x04, 0x00, 0x00, 0x00,
            0x09, 0x00, 0x00, 0x00,
            // Record
            0x07, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x41, 0x00, 0x00, 0x00,
            // File name
            0x61, 0x62, 0x63, 0x64, 0x00, 0x00, 0x00, 0x00,
            // Names
            0x02, 0x00, 0x00, 0x00,
            0x4E, 0x00,
            // Trailer
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let container = Container::new(
            0x11223344,
            0x09,
            "abcd".into(),
            vec![Record::new(7, "N".into(), "A".into())],
        );
        let actual = encode(&container)?;

        assert_eq!(actual.len(), expected.len());
        assert_str_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));

        Ok(())
    }

    #[test]
    fn htxt_escaped_fields_write() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // Header
            0x41, 0x73, 0x75, 0x72, 0x61, 0x20, 0x20, 0x20,
            0x48, 0x54, 0x58, 0x54,
            0x3E, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            // Record
            0x01, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0x5C, 0x00, 0xE9, 0x00, 0x42, 0x30, 0x00, 0x00,
            // File name
            0x00, 0x00, 0x00, 0x00,
            // Names
            0x06, 0x00, 0x00, 0x00,
            0x41, 0x5C, 0x7F, 0x42, 0x43, 0x00,
            // Trailer
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];

        let container = Container::new(
            0,
            0,
            "".into(),
            vec![Record::new(1, "A\\5c\\7fBC".into(), "\\005c\\00e9あ".into())],
        );
        let actual = encode(&container)?;

        assert_str_eq!(format!("{:02X?}", actual), format!("{:02X?}", expected));

        Ok(())
    }

    #[test]
    fn htxt_write_is_deterministic() -> Result<()> {
        let container = Container::new(
            0xcafe,
            0x2,
            "menu_text".into(),
            vec![
                Record::new(1, "A".into(), "first".into()),
                Record::new(2, "B".into(), "second\\000aline".into()),
            ],
        );

        assert_eq!(encode(&container)?, encode(&container)?);

        Ok(())
    }

    #[test]
    fn htxt_round_trip() -> Result<()> {
        let container = Container::new(
            0xdeadbeef,
            0x0000000c,
            "ui".into(),
            vec![
                Record::new(0x10, "TITLE".into(), "タイトル".into()),
                Record::new(0x11, "EMPTY".into(), "".into()),
                Record::new(0x12, "ODD\\01".into(), "\\005c\\ffff\\0001".into()),
            ],
        );

        let encoded = encode(&container)?;
        assert_eq!(HtxtReader::from_bytes(&encoded)?, container);

        Ok(())
    }

    #[test]
    fn htxt_writer_passes_through_inner() -> Result<()> {
        let container = Container::new(1, 2, "abc".into(), vec![]);
        let buffer = HtxtWriter::new(Vec::new()).write(&container)?;

        assert_eq!(buffer, encode(&container)?);

        Ok(())
    }

    #[test]
    fn htxt_invalid_text_escape() {
        let container = Container::new(
            0,
            0,
            "abc".into(),
            vec![
                Record::new(1, "OK".into(), "fine".into()),
                Record::new(2, "BAD".into(), "broken \\12".into()),
            ],
        );

        let result = encode(&container);
        assert!(matches!(
            result,
            Err(Error::InvalidEscape {
                field: Field::Text,
                record: 1,
                source: EscapeError::Malformed {
                    position: 7,
                    expected: 4
                },
            })
        ));
    }

    #[test]
    fn htxt_surrogate_pair_text() {
        let container = Container::new(
            0,
            0,
            "abc".into(),
            vec![Record::new(1, "A".into(), "😀".into())],
        );

        let result = encode(&container);
        assert!(matches!(
            result,
            Err(Error::InvalidEscape {
                field: Field::Text,
                record: 0,
                source: EscapeError::Unrepresentable { .. },
            })
        ));
    }

    #[test]
    fn htxt_non_ascii_name() {
        let container = Container::new(
            0,
            0,
            "abc".into(),
            vec![Record::new(1, "né".into(), "".into())],
        );

        let result = encode(&container);
        assert!(matches!(
            result,
            Err(Error::InvalidEscape {
                field: Field::Name,
                record: 0,
                ..
            })
        ));
    }

    #[test]
    fn htxt_nul_in_name() {
        let container = Container::new(
            0,
            0,
            "abc".into(),
            vec![
                Record::new(1, "A\\00B".into(), "x".into()),
                Record::new(2, "C".into(), "y".into()),
            ],
        );

        let result = encode(&container);
        assert!(matches!(
            result,
            Err(Error::InvalidEscape {
                field: Field::Name,
                record: 0,
                source: EscapeError::Nul { position: 1 },
            })
        ));
    }

    #[test]
    fn htxt_nul_in_text() {
        let container = Container::new(
            0,
            0,
            "abc".into(),
            vec![
                Record::new(1, "A".into(), "x".into()),
                Record::new(2, "B".into(), "ab\\0000cd".into()),
            ],
        );

        let result = encode(&container);
        assert!(matches!(
            result,
            Err(Error::InvalidEscape {
                field: Field::Text,
                record: 1,
                source: EscapeError::Nul { position: 2 },
            })
        ));
    }

    #[test]
    fn htxt_non_ascii_file_name() {
        let container = Container::new(0, 0, "menü".into(), vec![]);

        let result = encode(&container);
        assert!(matches!(result, Err(Error::NonAsciiFileName(_))));
    }
}
