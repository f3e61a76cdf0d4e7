use bevy::{asset::Asset, math::Vec3, reflect::TypePath};
#[cfg(feature = "field_images")]
use bevy::{asset::Handle, image::Image};

pub use self::{
    catalog::{CHANNEL_COUNT, Channel, ChannelAssignment, FieldCatalog, FieldDescriptor, NONE_CHOICE},
    grid::{GridDimensions, GridHeader, IndexTransposer},
};
use crate::error::HeaderWarning;

mod catalog;
mod grid;
#[cfg(feature = "field_images")]
pub(super) mod image;

/// The values of one field at every voxel, in grid order (Z fastest).
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedField {
    /// One value per voxel.
    Scalar(Vec<f32>),
    /// One array per component (x, y, z), each with one value per voxel.
    Vector3(Vec<f32>, Vec<f32>, Vec<f32>),
}

impl DecodedField {
    /// Number of voxels the field covers.
    pub fn len(&self) -> usize {
        match self {
            DecodedField::Scalar(values) => values.len(),
            DecodedField::Vector3(x, _, _) => x.len(),
        }
    }

    /// True if the field covers no voxels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for 3-component fields.
    pub fn is_vector(&self) -> bool {
        matches!(self, DecodedField::Vector3(..))
    }
}

/// The decoded field, if any, delivered to each channel by one decode pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelOutputs {
    fields: [Option<DecodedField>; CHANNEL_COUNT],
}

impl ChannelOutputs {
    /// The field delivered to `channel`.
    pub fn get(&self, channel: Channel) -> Option<&DecodedField> {
        self.fields[channel.index()].as_ref()
    }

    /// Iterates the channels that received data, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &DecodedField)> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.get(channel).map(|field| (channel, field)))
    }

    /// Number of channels that received data.
    pub fn len(&self) -> usize {
        self.fields.iter().flatten().count()
    }

    /// True if no channel received data.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, channel: Channel, field: DecodedField) {
        self.fields[channel.index()] = Some(field);
    }
}

/// A GeoDict volume: the grid, the fields the file declares, and the fields that were decoded.
///
/// Loaded from `.vap` / `.GeoDict` files by the asset loader registered by [`crate::GeoDictPlugin`].
#[derive(Asset, TypePath, Debug)]
pub struct VoxelVolume {
    /// Voxel counts and voxel size.
    pub dimensions: GridDimensions,
    /// Physical size of the volume, which spans `[0, extent]` along each axis.
    pub extent: Vec3,
    /// Every field declared by the header.
    pub catalog: FieldCatalog,
    /// Recoverable problems found in the header.
    pub warnings: Vec<HeaderWarning>,
    /// Decoded fields, by channel, in grid order.
    pub channels: ChannelOutputs,
    /// A 3D texture for each channel that received data.
    ///
    /// Texture width, height and depth run along grid Z, Y and X respectively.
    #[cfg(feature = "field_images")]
    pub images: [Option<Handle<Image>>; CHANNEL_COUNT],
}
