use bevy::{
    asset::RenderAssetUsages,
    image::{Image, ImageAddressMode, ImageFilterMode, ImageSampler, ImageSamplerDescriptor},
    render::render_resource::{Extent3d, TextureDimension, TextureFormat},
};

use super::{DecodedField, GridDimensions};

/// Packs a grid-ordered field into a 3D float texture.
///
/// Grid order has Z fastest, so the texture's width runs along Z and its depth along X.
/// Vector fields are stored as RGBA with alpha set to zero.
pub(crate) fn create_field_image(field: &DecodedField, dimensions: &GridDimensions) -> Image {
    let image_size = Extent3d {
        width: dimensions.size.z,
        height: dimensions.size.y,
        depth_or_array_layers: dimensions.size.x,
    };
    let (data, format) = match field {
        DecodedField::Scalar(values) => (
            values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            TextureFormat::R32Float,
        ),
        DecodedField::Vector3(x, y, z) => (
            x.iter()
                .zip(y)
                .zip(z)
                .flat_map(|((x, y), z)| [*x, *y, *z, 0.0])
                .flat_map(|v| v.to_le_bytes())
                .collect(),
            TextureFormat::Rgba32Float,
        ),
    };
    let mut image = Image::new(
        image_size,
        TextureDimension::D3,
        data,
        format,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        address_mode_w: ImageAddressMode::ClampToEdge,
        mag_filter: ImageFilterMode::Nearest,
        min_filter: ImageFilterMode::Nearest,
        mipmap_filter: ImageFilterMode::Nearest,
        ..Default::default()
    });
    image
}
