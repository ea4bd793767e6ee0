use strum_macros::{AsRefStr, Display, EnumCount, EnumIter};

// The six faces of a cube texture in array layer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display, AsRefStr)]
pub enum CubeFace {
    #[strum(serialize = "+X")]
    PositiveX,
    #[strum(serialize = "-X")]
    NegativeX,
    #[strum(serialize = "+Y")]
    PositiveY,
    #[strum(serialize = "-Y")]
    NegativeY,
    #[strum(serialize = "+Z")]
    PositiveZ,
    #[strum(serialize = "-Z")]
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn from_index(index: usize) -> CubeFace {
        assert_lt!(index, CubeFace::ALL.len(), "CubeFace::from_index(): the index of the cube side {} is illegal.", index);
        CubeFace::ALL[index]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    // Array layer of this face in a wgpu cube texture.
    pub fn layer(self) -> u32 {
        self as u32
    }

    pub fn direction(self) -> cgmath::Vector3<f32> {
        match self {
            CubeFace::PositiveX => cgmath::Vector3::unit_x(),
            CubeFace::NegativeX => -cgmath::Vector3::unit_x(),
            CubeFace::PositiveY => cgmath::Vector3::unit_y(),
            CubeFace::NegativeY => -cgmath::Vector3::unit_y(),
            CubeFace::PositiveZ => cgmath::Vector3::unit_z(),
            CubeFace::NegativeZ => -cgmath::Vector3::unit_z(),
        }
    }

    // Up vector for rendering this face so that the image matches the cube sampling convention
    // (paired with a mirrored x axis in the face projection).
    pub fn up(self) -> cgmath::Vector3<f32> {
        match self {
            CubeFace::PositiveY => -cgmath::Vector3::unit_z(),
            CubeFace::NegativeY => cgmath::Vector3::unit_z(),
            _ => cgmath::Vector3::unit_y(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TextureType {
    Color,
    Depth,
    // TODO: object id output once drawables can write it (needs a second color attachment, see CubeFramebuffer::map_for_draw)
}

impl TextureType {
    // Tag used in face image file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            TextureType::Color => "rgba",
            TextureType::Depth => "depth",
        }
    }

    // Extension written by save_texture.
    pub fn save_extension(self) -> &'static str {
        match self {
            TextureType::Color => "png",
            TextureType::Depth => "hdr",
        }
    }

    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            TextureType::Color => wgpu::TextureFormat::Rgba8Unorm,
            TextureType::Depth => wgpu::TextureFormat::Depth32Float,
        }
    }

    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureType::Color => 4,
            TextureType::Depth => std::mem::size_of::<f32>() as u32,
        }
    }

    pub fn aspect(self) -> wgpu::TextureAspect {
        match self {
            TextureType::Color => wgpu::TextureAspect::All,
            TextureType::Depth => wgpu::TextureAspect::DepthOnly,
        }
    }
}
