use std::io::Read;

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    log::info,
};
use serde::{Deserialize, Serialize};

pub use self::{
    cursor::PayloadCursor,
    decode::{DecodeSession, decode_field},
    header::{HEADER_SIZE, ParsedHeader, parse_header, read_header},
};
use crate::{
    error::GeoDictError,
    model::{ChannelAssignment, ChannelOutputs, VoxelVolume},
};

mod cursor;
mod decode;
mod header;

/// Factor applied to `N * VoxelLength` to get the extent of a loaded [`VoxelVolume`].
///
/// Carried over unchanged from earlier GeoDict readers; what unit conversion it stands for is
/// not documented by the format.
pub const DEFAULT_EXTENT_SCALE: f32 = 1_000_000.0;

/// Settings for the GeoDict loader.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GeoDictLoaderSettings {
    /// The field each output channel is filled from.
    /// Defaults to image number `n` for channel `n`.
    pub channels: ChannelAssignment,
    /// Multiplier for the physical extent of the volume. Defaults to [`DEFAULT_EXTENT_SCALE`].
    pub extent_scale: f32,
}

impl Default for GeoDictLoaderSettings {
    fn default() -> Self {
        Self {
            channels: ChannelAssignment::sequential(),
            extent_scale: DEFAULT_EXTENT_SCALE,
        }
    }
}

/// Parses the header of a complete GeoDict file from `reader` and runs one decode pass.
///
/// Returns the session, which keeps the read state of each field, together with the
/// decoded channels.
pub fn decode_geodict<R: Read>(
    mut reader: R,
    assignment: &ChannelAssignment,
) -> crate::Result<(DecodeSession, ChannelOutputs)> {
    let header = read_header(&mut reader)?;
    let mut session = DecodeSession::new(header)?;
    let mut cursor = PayloadCursor::new(reader, HEADER_SIZE as u64);
    let outputs = session.decode(assignment, &mut cursor)?;
    Ok((session, outputs))
}

#[derive(Default)]
pub(crate) struct GeoDictLoader;

impl AssetLoader for GeoDictLoader {
    type Asset = VoxelVolume;
    type Settings = GeoDictLoaderSettings;
    type Error = GeoDictError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        settings: &GeoDictLoaderSettings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<VoxelVolume, GeoDictError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let (session, channels) = decode_geodict(bytes.as_slice(), &settings.channels)?;
        let dimensions = *session.dimensions();
        info!(
            "Loaded GeoDict volume {}: {} voxels, {} field(s), {} channel(s) filled",
            load_context.path().display(),
            dimensions.size,
            session.catalog().len(),
            channels.len()
        );

        #[cfg(feature = "field_images")]
        let images = {
            let mut images: [Option<bevy::asset::Handle<bevy::image::Image>>; crate::CHANNEL_COUNT] =
                Default::default();
            for (channel, field) in channels.iter() {
                let image = crate::model::image::create_field_image(field, &dimensions);
                images[channel.index()] = Some(
                    load_context.add_labeled_asset(format!("channel{}", channel.id()), image),
                );
            }
            images
        };

        Ok(VoxelVolume {
            dimensions,
            extent: dimensions.extent(settings.extent_scale),
            catalog: session.catalog().clone(),
            warnings: session.warnings().to_vec(),
            channels,
            #[cfg(feature = "field_images")]
            images,
        })
    }

    fn extensions(&self) -> &[&str] {
        &["vap", "geodict", "GeoDict"]
    }
}
