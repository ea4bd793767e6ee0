use super::face::TextureType;
use enumflags2::{bitflags, BitFlags};

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CubeMapFlag {
    // create color cube texture
    ColorTexture = 1 << 0,
    // create depth cube texture
    DepthTexture = 1 << 1,
    // Build the full mip chain for the color texture. Without this only level 0 exists.
    BuildMipmap = 1 << 3,
}

pub type CubeMapFlags = BitFlags<CubeMapFlag>;

pub fn default_flags() -> CubeMapFlags {
    CubeMapFlag::ColorTexture.into()
}

pub fn has_texture(flags: CubeMapFlags, texture_type: TextureType) -> bool {
    match texture_type {
        TextureType::Color => flags.contains(CubeMapFlag::ColorTexture),
        TextureType::Depth => flags.contains(CubeMapFlag::DepthTexture),
    }
}

// Mipmaps are only ever built for color.
pub fn builds_color_mipmap(flags: CubeMapFlags) -> bool {
    flags.contains(CubeMapFlag::ColorTexture | CubeMapFlag::BuildMipmap)
}

pub fn mip_level_count(image_size: u32, flags: CubeMapFlags, texture_type: TextureType) -> u32 {
    match texture_type {
        TextureType::Color if flags.contains(CubeMapFlag::BuildMipmap) => 32 - image_size.leading_zeros(),
        _ => 1,
    }
}

// Panics if the instance was created without the given texture type.
pub fn check_texture_type(flags: CubeMapFlags, texture_type: TextureType, operation: &str) {
    assert!(
        has_texture(flags, texture_type),
        "{} instance was not created with {} texture output enabled.",
        operation,
        texture_type
    );
}
