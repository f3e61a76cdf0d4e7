//! Parsing of the fixed-size ASCII header at the start of a GeoDict file.
//!
//! The header is a block of [`HEADER_SIZE`] bytes holding `\r`/`\n` terminated lines.
//! Lines are recognised by prefix:
//!
//! ```text
//! Image1 ...:Names Density
//! Image2 ...:Meaning vector
//! Nx 64
//! Ny 64
//! Nz 32
//! VoxelLength 1e-06,1e-06,1e-06
//! ```
//!
//! Everything else is ignored. An empty line, a NUL byte or the end of the block ends the header.

use std::io::Read;

use bevy::{
    log::{debug, warn},
    math::Vec3,
};

use crate::{
    error::{GeoDictError, HeaderWarning, Result},
    model::{FieldCatalog, FieldDescriptor, GridHeader},
};

/// Size in bytes of the header block. The field payload starts right after it.
pub const HEADER_SIZE: usize = 1024;

/// The result of parsing a header block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedHeader {
    /// Grid dimensions and voxel length, as far as the header set them.
    pub grid: GridHeader,
    /// The declared fields, in payload order.
    pub catalog: FieldCatalog,
    /// Recoverable problems found on individual lines.
    pub warnings: Vec<HeaderWarning>,
}

/// Reads exactly [`HEADER_SIZE`] bytes from `reader` and parses them.
///
/// On success the reader is positioned at the start of the payload.
pub fn read_header<R: Read>(reader: &mut R) -> Result<ParsedHeader> {
    let mut block = Vec::with_capacity(HEADER_SIZE);
    reader
        .by_ref()
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut block)?;
    parse_header(&block)
}

/// Parses the first [`HEADER_SIZE`] bytes of `block`.
///
/// Fails with [`GeoDictError::HeaderTruncated`] if `block` is shorter than that.
pub fn parse_header(block: &[u8]) -> Result<ParsedHeader> {
    if block.len() < HEADER_SIZE {
        return Err(GeoDictError::HeaderTruncated {
            expected: HEADER_SIZE,
            available: block.len(),
        });
    }
    let text = &block[..HEADER_SIZE];
    let text = match text.iter().position(|&b| b == 0) {
        Some(end) => &text[..end],
        None => text,
    };

    let mut parser = HeaderParser::default();
    for line in header_lines(text) {
        if line.is_empty() {
            break;
        }
        parser.parse_line(line);
    }
    let header = parser.header;
    debug!(
        "Parsed GeoDict header: grid {:?}, {} field(s), {} warning(s)",
        header.grid,
        header.catalog.len(),
        header.warnings.len()
    );
    Ok(header)
}

/// Splits `text` into lines terminated by `\r` or `\n`.
///
/// A trailing fragment without a terminator is not a line.
fn header_lines(text: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let end = rest.iter().position(|&b| b == b'\r' || b == b'\n')?;
        let line = &rest[..end];
        rest = &rest[end + 1..];
        Some(line)
    })
}

#[derive(Default)]
struct HeaderParser {
    header: ParsedHeader,
    last_image_number: Option<u32>,
}

impl HeaderParser {
    fn parse_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        if let Some(rest) = raw.strip_prefix(b"Image") {
            self.parse_image_line(&line, rest);
        } else if raw.starts_with(b"Nx") {
            let value = self.parse_dimension(&line, raw, "Nx");
            self.header.grid.nx = value.or(self.header.grid.nx);
        } else if raw.starts_with(b"Ny") {
            let value = self.parse_dimension(&line, raw, "Ny");
            self.header.grid.ny = value.or(self.header.grid.ny);
        } else if raw.starts_with(b"Nz") {
            let value = self.parse_dimension(&line, raw, "Nz");
            self.header.grid.nz = value.or(self.header.grid.nz);
        } else if raw.starts_with(b"VoxelLength") {
            let value = raw.get(12..).map(String::from_utf8_lossy);
            match value.as_deref().and_then(scan_voxel_length) {
                Some(voxel_length) => self.header.grid.voxel_length = Some(voxel_length),
                None => self.warn(HeaderWarning::MalformedDimension {
                    keyword: "VoxelLength",
                    line: line.into_owned(),
                }),
            }
        }
    }

    /// `Image<N> ...:<annotation>`. A new descriptor starts whenever `N` changes.
    fn parse_image_line(&mut self, line: &str, rest: &[u8]) {
        let Some(image_number) = scan_int(&String::from_utf8_lossy(rest))
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0)
        else {
            self.warn(HeaderWarning::MalformedImageNumber {
                line: line.to_string(),
            });
            return;
        };

        if self.last_image_number != Some(image_number) {
            let expected = self.header.catalog.len() as u32 + 1;
            if image_number != expected {
                self.warn(HeaderWarning::NonSequentialImageNumber {
                    expected,
                    found: image_number,
                });
            }
            self.header.catalog.push(FieldDescriptor::new(image_number));
            self.last_image_number = Some(image_number);
        }

        let Some(colon) = rest.iter().position(|&b| b == b':') else {
            return;
        };
        let annotation = &rest[colon + 1..];
        let Some(field) = self.header.catalog.last_mut() else {
            return;
        };
        if annotation.starts_with(b"Names") {
            // byte offset, even if it splits a multi-byte character
            let name = annotation.get(6..).unwrap_or_default();
            field.name = String::from_utf8_lossy(name).into_owned();
        }
        if annotation.starts_with(b"Meaning vector") {
            field.is_vector = true;
        }
    }

    fn parse_dimension(&mut self, line: &str, raw: &[u8], keyword: &'static str) -> Option<u32> {
        let value = raw
            .get(3..)
            .and_then(|value| scan_int(&String::from_utf8_lossy(value)))
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n > 0);
        if value.is_none() {
            self.warn(HeaderWarning::MalformedDimension {
                keyword,
                line: line.to_string(),
            });
        }
        value
    }

    fn warn(&mut self, warning: HeaderWarning) {
        warn!("GeoDict header: {warning}");
        self.header.warnings.push(warning);
    }
}

/// Reads a leading decimal integer the way C's `%d` does: leading whitespace, an optional
/// sign, then digits. Anything after the digits is ignored.
fn scan_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['+', '-']));
    let end = text[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |i| i + digits_start);
    text[..end].parse().ok()
}

/// Reads a leading float, returning it and the text after it.
fn scan_float(text: &str) -> Option<(f32, &str)> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
        .unwrap_or(text.len());
    (1..=end)
        .rev()
        .find_map(|len| text[..len].parse().ok().map(|v| (v, &text[len..])))
}

/// `<sx>,<sy>,<sz>`, all finite and positive.
fn scan_voxel_length(text: &str) -> Option<Vec3> {
    let (x, rest) = scan_float(text)?;
    let (y, rest) = scan_float(rest.strip_prefix(',')?)?;
    let (z, _) = scan_float(rest.strip_prefix(',')?)?;
    let voxel_length = Vec3::new(x, y, z);
    (voxel_length.is_finite() && voxel_length.min_element() > 0.0).then_some(voxel_length)
}
