//! Tabular form of a container, for editing the texts in a spreadsheet like tool.
//!
//! A [`Workbook`] has two sheets. The `info` sheet holds a single row describing the resource and the
//! `data` sheet holds one row per record. Identifiers are shown as 8 digit lowercase hex strings and
//! every text cell holds escaped text, so cells never need any special formatting.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Field, Result};
use crate::types::{Container, Record};

/// Header row of the `info` sheet
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InfoSheet {
    pub magic_number: String,
    pub language_id: String,
    pub file_name: String,
    pub number_of_records: u32,
}

/// A row of the `data` sheet
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DataRow {
    pub magic_number: String,
    pub name: String,

    /// The text as it was exported, kept for reference
    #[serde(default)]
    pub source: String,

    /// The text written back on import, an empty cell stands for an empty text
    #[serde(default)]
    pub text: Option<String>,
}

/// Both sheets of an exported container
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Workbook {
    pub info: InfoSheet,
    pub data: Vec<DataRow>,
}

fn to_hex(value: u32) -> String {
    format!("{:08x}", value)
}

fn from_hex(value: &str, field: Field, row: usize) -> Result<u32> {
    let digits = value.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);

    u32::from_str_radix(digits, 16).map_err(|_| Error::InvalidHex {
        field,
        row,
        value: value.to_owned(),
    })
}

impl From<&Container> for Workbook {
    fn from(value: &Container) -> Self {
        Workbook {
            info: InfoSheet {
                magic_number: to_hex(value.magic_number),
                language_id: to_hex(value.language_id),
                file_name: value.file_name.clone(),
                number_of_records: value.len() as u32,
            },
            data: value
                .iter()
                .map(|record| DataRow {
                    magic_number: to_hex(record.magic_number),
                    name: record.name.clone(),
                    source: record.text.clone(),
                    text: Some(record.text.clone()),
                })
                .collect(),
        }
    }
}

impl TryFrom<Workbook> for Container {
    type Error = Error;

    fn try_from(value: Workbook) -> Result<Self> {
        let expected = value.info.number_of_records as usize;
        if value.data.len() < expected {
            return Err(Error::MissingRows {
                expected,
                found: value.data.len(),
            });
        }

        let records = value
            .data
            .into_iter()
            .take(expected)
            .enumerate()
            .map(|(index, row)| {
                Ok(Record {
                    magic_number: from_hex(&row.magic_number, Field::MagicNumber, index + 1)?,
                    name: row.name,
                    text: row.text.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Container {
            magic_number: from_hex(&value.info.magic_number, Field::MagicNumber, 0)?,
            language_id: from_hex(&value.info.language_id, Field::LanguageId, 0)?,
            file_name: value.info.file_name,
            records,
        })
    }
}

impl Workbook {
    /// Write the workbook as a JSON document.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Read a workbook from a JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Workbook> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(feature = "polars")]
mod frames {
    use polars::prelude::*;

    use super::{DataRow, InfoSheet, Workbook};
    use crate::error::{Error, Result};

    fn cell(frame: &DataFrame, column: &str, row: usize) -> Result<Option<String>> {
        Ok(frame
            .column(column)?
            .get(row)?
            .get_str()
            .map(str::to_owned))
    }

    impl Workbook {
        /// Convert both sheets into data frames, `(info, data)`.
        pub fn to_data_frames(&self) -> Result<(DataFrame, DataFrame)> {
            let info = df!(
                "magic_number" => [self.info.magic_number.as_str()],
                "language_id" => [self.info.language_id.as_str()],
                "file_name" => [self.info.file_name.as_str()],
                "number_of_records" => [self.info.number_of_records],
            )?;

            let data = df!(
                "magic_number" => self.data.iter().map(|r| r.magic_number.as_str()).collect::<Vec<_>>(),
                "name" => self.data.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
                "source" => self.data.iter().map(|r| r.source.as_str()).collect::<Vec<_>>(),
                "text" => self.data.iter().map(|r| r.text.as_deref()).collect::<Vec<_>>(),
            )?;

            Ok((info, data))
        }

        /// Rebuild a workbook from the frames produced by [`Workbook::to_data_frames`].
        pub fn from_data_frames(info: &DataFrame, data: &DataFrame) -> Result<Workbook> {
            if info.height() == 0 {
                return Err(Error::MissingRows {
                    expected: 1,
                    found: 0,
                });
            }

            let number_of_records = info
                .column("number_of_records")?
                .get(0)?
                .extract::<u32>()
                .ok_or(Error::InvalidCell {
                    column: "number_of_records",
                    row: 0,
                })?;

            let rows = (0..data.height())
                .map(|row| {
                    Ok(DataRow {
                        magic_number: cell(data, "magic_number", row)?.unwrap_or_default(),
                        name: cell(data, "name", row)?.unwrap_or_default(),
                        source: cell(data, "source", row)?.unwrap_or_default(),
                        text: cell(data, "text", row)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Workbook {
                info: InfoSheet {
                    magic_number: cell(info, "magic_number", 0)?.unwrap_or_default(),
                    language_id: cell(info, "language_id", 0)?.unwrap_or_default(),
                    file_name: cell(info, "file_name", 0)?.unwrap_or_default(),
                    number_of_records,
                },
                data: rows,
            })
        }
    }
}
