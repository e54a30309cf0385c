//! Conversion between raw code units and their printable escaped form.
//!
//! Text stored in an HTXT file is UTF-16LE and record names are bytes. Both are exposed as strings
//! in which every code unit outside a small safe set is written as a backslash followed by a fixed
//! number of lowercase hex digits, four for text (`\00e9`) and two for names (`\7f`). A backslash is
//! never a literal, so the escaped form maps back to the exact same code units.

use widestring::{U16Str, U16String};

use crate::error::EscapeError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A storage unit that can be escaped
pub trait CodeUnit: Copy + Into<u32> {
    /// Number of hex digits following the backslash of an escape
    const DIGITS: usize;

    /// Whether the unit is written as its own character instead of an escape
    fn is_plain(self) -> bool;

    /// Build a unit from the value of a complete escape
    fn from_escape(value: u32) -> Self;

    /// The unit representing a literal character, if there is exactly one
    fn from_literal(c: char) -> Option<Self>;
}

impl CodeUnit for u16 {
    const DIGITS: usize = 4;

    fn is_plain(self) -> bool {
        self != 0x005c
            && matches!(self,
                0x0020..=0x007e // printable ascii
                | 0x3040..=0x309f // hiragana
                | 0x30a0..=0x30ff // katakana
                | 0x3400..=0x9fff // cjk ideographs
            )
    }

    fn from_escape(value: u32) -> Self {
        value as u16
    }

    fn from_literal(c: char) -> Option<Self> {
        u16::try_from(u32::from(c)).ok()
    }
}

impl CodeUnit for u8 {
    const DIGITS: usize = 2;

    fn is_plain(self) -> bool {
        self != 0x5c && (0x20..=0x7e).contains(&self)
    }

    fn from_escape(value: u32) -> Self {
        value as u8
    }

    fn from_literal(c: char) -> Option<Self> {
        c.is_ascii().then_some(c as u8)
    }
}

/// Iterator over the escaped characters of a sequence of code units.
///
/// Stops at the first zero unit or when the units run out.
#[derive(Debug, Clone)]
pub struct Escape<I> {
    units: I,
    pending: [u8; 5],
    cursor: usize,
    len: usize,
    terminated: bool,
}

impl<I> Escape<I> {
    fn new(units: I) -> Self {
        Escape {
            units,
            pending: [0; 5],
            cursor: 0,
            len: 0,
            terminated: false,
        }
    }
}

impl<I> Iterator for Escape<I>
where
    I: Iterator,
    I::Item: CodeUnit,
{
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.cursor < self.len {
            let c = self.pending[self.cursor] as char;
            self.cursor += 1;
            return Some(c);
        }

        if self.terminated {
            return None;
        }

        let unit = self.units.next()?;
        let value: u32 = unit.into();
        if value == 0 {
            self.terminated = true;
            return None;
        }

        if unit.is_plain() {
            // plain ranges never contain surrogates
            return char::from_u32(value);
        }

        let digits = <I::Item as CodeUnit>::DIGITS;
        for i in 0..digits {
            self.pending[digits - i] = HEX_DIGITS[((value >> (4 * i)) & 0xf) as usize];
        }
        self.len = digits + 1;
        self.cursor = 1;

        Some('\\')
    }
}

/// Escape UTF-16 code units, used for record text
pub fn escape_utf16<I: IntoIterator<Item = u16>>(units: I) -> Escape<I::IntoIter> {
    Escape::new(units.into_iter())
}

/// Escape bytes, used for record names
pub fn escape_ascii<I: IntoIterator<Item = u8>>(bytes: I) -> Escape<I::IntoIter> {
    Escape::new(bytes.into_iter())
}

/// Escape a complete UTF-16 string
pub fn escape_u16str(text: &U16Str) -> String {
    escape_utf16(text.as_slice().iter().copied()).collect()
}

enum ScanState {
    Literal,
    Escape { start: usize, value: u32, digits: usize },
}

fn unescape<U: CodeUnit>(text: &str) -> Result<Vec<U>, EscapeError> {
    let mut units = Vec::with_capacity(text.len());
    let mut state = ScanState::Literal;

    for (position, c) in text.chars().enumerate() {
        state = match state {
            ScanState::Literal if c == '\\' => ScanState::Escape {
                start: position,
                value: 0,
                digits: 0,
            },
            ScanState::Literal => {
                let unit = U::from_literal(c).ok_or(EscapeError::Unrepresentable {
                    position,
                    character: c,
                })?;
                if Into::<u32>::into(unit) == 0 {
                    return Err(EscapeError::Nul { position });
                }
                units.push(unit);
                ScanState::Literal
            }
            ScanState::Escape {
                start,
                value,
                digits,
            } => {
                let digit = c.to_digit(16).ok_or(EscapeError::Malformed {
                    position: start,
                    expected: U::DIGITS,
                })?;
                let value = value << 4 | digit;
                if digits + 1 == U::DIGITS {
                    // a zero unit would end the field early once stored
                    if value == 0 {
                        return Err(EscapeError::Nul { position: start });
                    }
                    units.push(U::from_escape(value));
                    ScanState::Literal
                } else {
                    ScanState::Escape {
                        start,
                        value,
                        digits: digits + 1,
                    }
                }
            }
        };
    }

    match state {
        ScanState::Literal => Ok(units),
        ScanState::Escape { start, .. } => Err(EscapeError::Malformed {
            position: start,
            expected: U::DIGITS,
        }),
    }
}

/// Turn escaped text back into UTF-16 code units, without a terminator
pub fn unescape_utf16(text: &str) -> Result<U16String, EscapeError> {
    unescape::<u16>(text).map(U16String::from_vec)
}

/// Turn an escaped name back into bytes, without a terminator
pub fn unescape_ascii(text: &str) -> Result<Vec<u8>, EscapeError> {
    unescape::<u8>(text)
}

/// Number of UTF-16 units escaped text is stored as, including the terminating null unit.
///
/// Only meaningful for text in canonical escaped form.
pub fn unescaped_len(text: &str) -> usize {
    let escapes = text.chars().filter(|c| *c == '\\').count();
    text.chars().count().saturating_sub(4 * escapes) + 1
}
