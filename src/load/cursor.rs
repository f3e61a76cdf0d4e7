use std::io::{self, Read};

use byteorder::{ByteOrder, NativeEndian};

use crate::error::{GeoDictError, Result};

const FLOAT_SIZE: u64 = 4;

/// Sequential reader over the field payload of a GeoDict file.
///
/// Every field block has to be either consumed or skipped in full, in catalogue order,
/// for the following blocks to line up. There is no rewind.
pub struct PayloadCursor<R> {
    reader: R,
    position: u64,
}

impl<R: Read> PayloadCursor<R> {
    /// Wraps a reader positioned at `position` bytes into the file, normally right after the header.
    pub fn new(reader: R, position: u64) -> Self {
        Self { reader, position }
    }

    /// Byte offset into the file of the next unread byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads `count` host-order floats belonging to field `image_number`.
    pub fn consume_floats(&mut self, image_number: u32, count: usize) -> Result<Vec<f32>> {
        let expected = count as u64 * FLOAT_SIZE;
        // the declared size is untrusted, so the buffer only grows with the data actually read
        let mut bytes = Vec::new();
        let available = (&mut self.reader).take(expected).read_to_end(&mut bytes)? as u64;
        self.position += available;
        if available < expected {
            return Err(GeoDictError::ShortRead {
                image_number,
                expected,
                available,
            });
        }
        let mut floats = vec![0.0; count];
        NativeEndian::read_f32_into(&bytes, &mut floats);
        Ok(floats)
    }

    /// Advances past `count` floats belonging to field `image_number` without keeping them.
    pub fn skip_floats(&mut self, image_number: u32, count: usize) -> Result<()> {
        let expected = count as u64 * FLOAT_SIZE;
        let available = io::copy(&mut (&mut self.reader).take(expected), &mut io::sink())?;
        self.position += available;
        if available < expected {
            return Err(GeoDictError::ShortRead {
                image_number,
                expected,
                available,
            });
        }
        Ok(())
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
