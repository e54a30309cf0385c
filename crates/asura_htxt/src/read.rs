//! Types for reading HTXT files
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use tracing::{debug, instrument, trace, warn};
use widestring::U16Str;

use crate::error::{Error, Result};
use crate::escape::{escape_ascii, escape_u16str};
use crate::types::{Container, HtxtHeader, Record, RECORD_HEADER_SIZE};

/// HTXT file reader
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_entries(reader: impl Read + Seek) -> asura_htxt::error::Result<()> {
///     let htxt = asura_htxt::HtxtReader::decode(reader)?;
///
///     for record in htxt.iter() {
///         println!("{:08x} {}: {}", record.magic_number, &record.name, &record.text);
///     }
///
///     Ok(())
/// }
/// ```
pub struct HtxtReader;

impl HtxtReader {
    /// Read a HTXT file and parse it's records.
    ///
    /// The reader is consumed from its current position up to the end of the stream.
    #[instrument(skip_all, err)]
    pub fn decode<R: Read + Seek>(mut reader: R) -> Result<Container> {
        let start = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(start))?;

        Decoder { reader, end }.read_container()
    }

    /// Decode a HTXT file held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Container> {
        Self::decode(Cursor::new(data))
    }
}

struct Decoder<R> {
    reader: R,
    end: u64,
}

impl<R: Read + Seek> Decoder<R> {
    fn remaining(&mut self) -> Result<u64> {
        Ok(self.end.saturating_sub(self.reader.stream_position()?))
    }

    fn read_container(&mut self) -> Result<Container> {
        let header = HtxtHeader::read(&mut self.reader).map_err(header_error)?;
        debug!(
            records = header.records,
            content_size = header.content_size,
            text_size = header.text_size,
            "read header"
        );

        let count = header.records as u64;
        let remaining = self.remaining()?;
        if count * RECORD_HEADER_SIZE as u64 > remaining {
            return Err(Error::InconsistentCount {
                section: "record table",
                expected: count,
                found: remaining / RECORD_HEADER_SIZE as u64,
            });
        }

        let mut records = Vec::with_capacity(count as usize);
        for index in 0..header.records as usize {
            let magic_number = self
                .reader
                .read_u32::<LittleEndian>()
                .map_err(Error::truncated("record table"))?;
            let text = self.read_text(index)?;
            records.push(Record::new(magic_number, String::new(), text));
        }

        let file_name = self.read_file_name()?;
        debug!(file_name = %file_name, "read file name");

        self.read_names(&mut records)?;

        Ok(Container::new(
            header.magic_number,
            header.language_id,
            file_name,
            records,
        ))
    }

    fn read_text(&mut self, index: usize) -> Result<String> {
        let units = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(Error::truncated("record table"))? as u64;

        let remaining = self.remaining()?;
        if units * 2 > remaining {
            return Err(Error::InconsistentCount {
                section: "record text",
                expected: units,
                found: remaining / 2,
            });
        }

        let mut buffer = vec![0u16; units as usize];
        self.reader
            .read_u16_into::<LittleEndian>(&mut buffer)
            .map_err(Error::truncated("record text"))?;

        match buffer.iter().position(|u| *u == 0) {
            Some(terminator) if terminator + 1 < buffer.len() => warn!(
                record = index,
                discarded = buffer.len() - terminator - 1,
                "ignoring units after text terminator"
            ),
            None => warn!(record = index, "text has no terminator"),
            _ => {}
        }

        let text = escape_u16str(U16Str::from_slice(&buffer));
        trace!(record = index, units, text = %text, "read text");

        Ok(text)
    }

    fn read_file_name(&mut self) -> Result<String> {
        let mut name = Vec::new();
        loop {
            let mut chunk = [0u8; 4];
            self.reader
                .read_exact(&mut chunk)
                .map_err(Error::truncated("file name"))?;

            name.extend(chunk.iter().take_while(|b| **b != 0));
            if chunk[3] == 0 {
                break;
            }
        }

        if !name.is_ascii() {
            return Err(Error::InvalidFileName);
        }

        String::from_utf8(name).map_err(|_| Error::InvalidFileName)
    }

    fn read_names(&mut self, records: &mut [Record]) -> Result<()> {
        let size = self
            .reader
            .read_u32::<LittleEndian>()
            .map_err(Error::truncated("names blob"))? as u64;

        if size > self.remaining()? {
            return Err(Error::Truncated {
                section: "names blob",
            });
        }

        let mut blob = vec![0u8; size as usize];
        self.reader
            .read_exact(&mut blob)
            .map_err(Error::truncated("names blob"))?;

        let mut names = blob.split(|b| *b == 0);
        let expected = records.len() as u64;
        for (index, record) in records.iter_mut().enumerate() {
            let name = names.next().ok_or(Error::InconsistentCount {
                section: "names blob",
                expected,
                found: index as u64,
            })?;
            record.name = escape_ascii(name.iter().copied()).collect();
        }

        Ok(())
    }
}

fn header_error(error: binrw::Error) -> Error {
    if error.is_eof() {
        return Error::Truncated { section: "header" };
    }

    match error.root_cause() {
        binrw::Error::BadMagic { .. } => Error::InvalidSignature,
        _ => Error::BinRWError(error),
    }
}
