//! Error and warning types for GeoDict files.

use thiserror::Error;

/// Errors that stop a header parse or a decode pass.
#[derive(Debug, Error)]
pub enum GeoDictError {
    /// An error originating from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fewer bytes than the fixed header size were available.
    #[error("Header truncated: expected {expected} bytes, but only {available} were available")]
    HeaderTruncated {
        /// The fixed header size.
        expected: usize,
        /// Bytes actually read.
        available: usize,
    },

    /// The header did not set every grid dimension and voxel length.
    #[error("Header is missing grid values: {}", missing.join(", "))]
    IncompleteHeader {
        /// Keywords of the values that were never set.
        missing: Vec<&'static str>,
    },

    /// The number of floats in a field block does not fit in memory addressing.
    #[error("Grid {nx}x{ny}x{nz} is too large to decode")]
    GridTooLarge {
        /// Voxel count along X.
        nx: u32,
        /// Voxel count along Y.
        ny: u32,
        /// Voxel count along Z.
        nz: u32,
    },

    /// The payload ended inside a field block.
    #[error("Short read in field {image_number}: expected {expected} bytes, but only {available} remained")]
    ShortRead {
        /// Image number of the field whose block was cut off.
        image_number: u32,
        /// Size of the field block in bytes.
        expected: u64,
        /// Bytes that were left in the payload.
        available: u64,
    },

    /// A field was handed to the decoder after its data had already been materialized.
    #[error("Field {image_number} has already been read in this session")]
    FieldAlreadyRead {
        /// Image number of the field.
        image_number: u32,
    },
}

/// A convenience `Result` type alias using the crate's [`GeoDictError`] type.
pub type Result<T> = std::result::Result<T, GeoDictError>;

/// Recoverable data-quality issues found while parsing a header.
///
/// Parsing continues past these; the affected value keeps whatever it held before the line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderWarning {
    /// An `Nx`, `Ny`, `Nz` or `VoxelLength` line whose value could not be parsed.
    #[error("could not parse {keyword} from {line:?}")]
    MalformedDimension {
        /// The keyword of the offending line.
        keyword: &'static str,
        /// The full text of the line.
        line: String,
    },
    /// An `Image` line without a usable image number.
    #[error("could not parse an image number from {line:?}")]
    MalformedImageNumber {
        /// The full text of the line.
        line: String,
    },
    /// An image number that breaks the dense, ascending, 1-based numbering the payload relies on.
    #[error("expected image number {expected}, found {found}")]
    NonSequentialImageNumber {
        /// The image number that would keep the catalogue dense.
        expected: u32,
        /// The image number found in the header.
        found: u32,
    },
}
