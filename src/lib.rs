#![forbid(missing_docs, unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
//! A plugin for the Bevy engine which allows loading GeoDict voxel files as [`VoxelVolume`] assets.
//!
//!```no_run
//!use bevy::prelude::*;
//!use bevy_geodict::{GeoDictPlugin, VoxelVolume};
//!
//!fn main() {
//!    App::new()
//!    .add_plugins((
//!        DefaultPlugins,
//!        GeoDictPlugin,
//!    ))
//!    .add_systems(Startup, setup)
//!    .run();
//!}
//!
//!#[derive(Resource)]
//!struct Sample(Handle<VoxelVolume>);
//!
//!fn setup(
//!    mut commands: Commands,
//!    assets: Res<AssetServer>,
//!) {
//!    // Decodes image numbers 1 to 5 into channels 1 to 5
//!    commands.insert_resource(Sample(assets.load("sample.vap")));
//!}
//!```
//!
//! The decoder can also be used without an [`bevy::app::App`]:
//!
//!```no_run
//!use std::{fs::File, io::BufReader};
//!use bevy_geodict::{decode_geodict, Channel, ChannelAssignment};
//!
//!# fn main() -> bevy_geodict::Result<()> {
//!let file = BufReader::new(File::open("sample.vap")?);
//!let mut assignment = ChannelAssignment::default();
//!assignment.select(Channel::new(1).unwrap(), Some(2));
//!let (session, outputs) = decode_geodict(file, &assignment)?;
//!println!("{:?}", session.dimensions());
//!# Ok(())
//!# }
//!```

use bevy::{
    app::{App, Plugin},
    asset::AssetApp,
};

mod error;
mod load;
mod model;


pub use error::{GeoDictError, HeaderWarning, Result};
use load::GeoDictLoader;
pub use load::{
    DEFAULT_EXTENT_SCALE, DecodeSession, GeoDictLoaderSettings, HEADER_SIZE, ParsedHeader,
    PayloadCursor, decode_field, decode_geodict, parse_header, read_header,
};
pub use model::{
    CHANNEL_COUNT, Channel, ChannelAssignment, ChannelOutputs, DecodedField, FieldCatalog,
    FieldDescriptor, GridDimensions, GridHeader, IndexTransposer, NONE_CHOICE, VoxelVolume,
};

/// Plugin adding functionality for loading GeoDict files.
///
/// Registers an [`bevy::asset::AssetLoader`] capable of loading `.vap` and `.GeoDict` files as [`VoxelVolume`]s.
pub struct GeoDictPlugin;

impl Plugin for GeoDictPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<VoxelVolume>()
            .register_asset_loader(GeoDictLoader);
    }
}
