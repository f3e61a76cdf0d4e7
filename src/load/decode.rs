use std::io::Read;

use bevy::log::debug;

use super::{cursor::PayloadCursor, header::ParsedHeader};
use crate::{
    error::{GeoDictError, HeaderWarning, Result},
    model::{
        ChannelAssignment, ChannelOutputs, DecodedField, FieldCatalog, FieldDescriptor,
        GridDimensions, IndexTransposer,
    },
};

/// The state of one parsed GeoDict header, ready to decode passes over its payload.
///
/// Create a new session whenever the header is parsed again; fields decoded by one pass
/// stay marked as read for the lifetime of the session.
#[derive(Clone, Debug)]
pub struct DecodeSession {
    dimensions: GridDimensions,
    transposer: IndexTransposer,
    catalog: FieldCatalog,
    warnings: Vec<HeaderWarning>,
}

impl DecodeSession {
    /// Starts a session from a parsed header.
    ///
    /// Fails with [`GeoDictError::IncompleteHeader`] unless the header set all grid values,
    /// or with [`GeoDictError::GridTooLarge`] if a field block would not be addressable.
    pub fn new(header: ParsedHeader) -> Result<Self> {
        let dimensions = header.grid.complete()?;
        dimensions.block_floats(true)?;
        Ok(Self {
            dimensions,
            transposer: IndexTransposer::new(&dimensions),
            catalog: header.catalog,
            warnings: header.warnings,
        })
    }

    /// The grid described by the header.
    pub fn dimensions(&self) -> &GridDimensions {
        &self.dimensions
    }

    /// The declared fields, with their read state.
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Recoverable problems found in the header.
    pub fn warnings(&self) -> &[HeaderWarning] {
        &self.warnings
    }

    /// Runs one pass over the payload, decoding the fields selected by `assignment`.
    ///
    /// `cursor` must be positioned at the start of the payload. Fields are visited in
    /// catalogue order; a field is decoded for the lowest-numbered channel that selects it,
    /// provided it has not been read yet in this session, and is skipped otherwise.
    /// A field selected by several channels is delivered only to the first of them.
    ///
    /// On error nothing is delivered and fields decoded during this pass are marked unread again.
    pub fn decode<R: Read>(
        &mut self,
        assignment: &ChannelAssignment,
        cursor: &mut PayloadCursor<R>,
    ) -> Result<ChannelOutputs> {
        let mut outputs = ChannelOutputs::default();
        let mut newly_read = Vec::new();
        let routed = route_fields(
            &mut self.catalog.fields,
            &self.transposer,
            assignment,
            cursor,
            &mut outputs,
            &mut newly_read,
        );
        if let Err(error) = routed {
            for index in newly_read {
                self.catalog.fields[index].read = false;
            }
            return Err(error);
        }
        Ok(outputs)
    }
}

fn route_fields<R: Read>(
    fields: &mut [FieldDescriptor],
    transposer: &IndexTransposer,
    assignment: &ChannelAssignment,
    cursor: &mut PayloadCursor<R>,
    outputs: &mut ChannelOutputs,
    newly_read: &mut Vec<usize>,
) -> Result<()> {
    for (index, field) in fields.iter_mut().enumerate() {
        let target = assignment
            .first_channel_for(field.image_number)
            .filter(|&channel| !field.read && outputs.get(channel).is_none());
        match target {
            Some(channel) => {
                debug!(
                    "Decoding field {} ({:?}) into channel {}",
                    field.image_number,
                    field.name,
                    channel.id()
                );
                let decoded = decode_field(field, transposer, cursor)?;
                newly_read.push(index);
                outputs.insert(channel, decoded);
            }
            None => {
                debug!("Skipping field {} ({:?})", field.image_number, field.name);
                let count = transposer.voxel_count() * field.components();
                cursor.skip_floats(field.image_number, count)?;
            }
        }
    }
    Ok(())
}

/// Reads one field block from `cursor` and reorders it into grid order.
///
/// The field is marked read on success. A truncated block yields
/// [`GeoDictError::ShortRead`] and leaves the field unread.
pub fn decode_field<R: Read>(
    field: &mut FieldDescriptor,
    transposer: &IndexTransposer,
    cursor: &mut PayloadCursor<R>,
) -> Result<DecodedField> {
    if field.read {
        return Err(GeoDictError::FieldAlreadyRead {
            image_number: field.image_number,
        });
    }
    let count = transposer.voxel_count() * field.components();
    let staging = cursor.consume_floats(field.image_number, count)?;
    let decoded = if field.is_vector {
        let [x, y, z] = transposer.transpose_vector(&staging);
        DecodedField::Vector3(x, y, z)
    } else {
        DecodedField::Scalar(transposer.transpose_scalar(&staging))
    };
    field.read = true;
    Ok(decoded)
}
