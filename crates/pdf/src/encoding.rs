//! Text encodings
//!
//! Two single-byte encodings matter when writing PDF files by hand:
//!
//! - *PDFDocEncoding* for text strings outside of content streams
//!   (e.g. the `/Info` dictionary)
//! - *WinAnsiEncoding* for the bytes shown with the standard Type 1 fonts

use std::{error::Error, fmt};

#[derive(Debug)]
/// Codepoint U+{0:04x} is not valid in PDFDocEncoding
#[allow(clippy::upper_case_acronyms)]
pub struct PDFDocEncodingError(char);

impl Error for PDFDocEncodingError {}
impl fmt::Display for PDFDocEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Codepoint U+{:04x} is not valid in PDFDocEncoding",
            self.0 as u32
        )
    }
}

fn pdf_char_encode(chr: char) -> Result<u8, PDFDocEncodingError> {
    match u32::from(chr) {
        0x09 | 0x0A | 0x0D | 0x20..=0x7E | 0xA1..=0xff => Ok(chr as u8),

        0x02D8 => Ok(0x18),
        0x02C7 => Ok(0x19),
        0x02C6 => Ok(0x1A),
        0x02D9 => Ok(0x1B),
        0x02DD => Ok(0x1C),
        0x02DB => Ok(0x1D),
        0x02DA => Ok(0x1E),
        0x02DC => Ok(0x1F),
        0x2022 => Ok(0x80),
        0x2020 => Ok(0x81),
        0x2021 => Ok(0x82),
        0x2026 => Ok(0x83),
        0x2014 => Ok(0x84),
        0x2013 => Ok(0x85),
        0x0192 => Ok(0x86),
        0x2044 => Ok(0x87),
        0x2039 => Ok(0x88),
        0x203A => Ok(0x89),
        0x2212 => Ok(0x8A),
        0x2030 => Ok(0x8B),
        0x201E => Ok(0x8C),
        0x201C => Ok(0x8D),
        0x201D => Ok(0x8E),
        0x2018 => Ok(0x8F),
        0x2019 => Ok(0x90),
        0x201A => Ok(0x91),
        0x2122 => Ok(0x92),
        0xFB01 => Ok(0x93),
        0xFB02 => Ok(0x94),
        0x0141 => Ok(0x95),
        0x0152 => Ok(0x96),
        0x0160 => Ok(0x97),
        0x0178 => Ok(0x98),
        0x017D => Ok(0x99),
        0x0131 => Ok(0x9A),
        0x0142 => Ok(0x9B),
        0x0153 => Ok(0x9C),
        0x0161 => Ok(0x9D),
        0x017e => Ok(0x9E),
        0x20AC => Ok(0xA0),

        _ => Err(PDFDocEncodingError(chr)),
    }
}

/// Encode a string as PDFDocEncoding
pub fn pdf_doc_encode(input: &str) -> Result<Vec<u8>, PDFDocEncodingError> {
    input.chars().map(pdf_char_encode).collect()
}

/// Encode a text string as UTF-16BE with a leading byte order mark
///
/// This is the fallback for text strings that contain characters
/// outside of PDFDocEncoding.
pub fn utf16_be_encode(input: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + input.len() * 2);
    out.extend_from_slice(&[0xFE, 0xFF]);
    for unit in input.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// The byte that is shown instead of characters WinAnsiEncoding can't represent
pub const WIN_ANSI_REPLACEMENT: u8 = b'?';

/// Look up the WinAnsiEncoding code of a single character
pub fn win_ansi_byte(chr: char) -> Option<u8> {
    match u32::from(chr) {
        0x20..=0x7E | 0xA0..=0xFF => Some(chr as u8),

        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),

        _ => None,
    }
}

/// Encode a string as WinAnsiEncoding, replacing unknown characters with `?`
pub fn win_ansi_encode_lossy(input: &str) -> Vec<u8> {
    input
        .chars()
        .map(|chr| win_ansi_byte(chr).unwrap_or(WIN_ANSI_REPLACEMENT))
        .collect()
}
