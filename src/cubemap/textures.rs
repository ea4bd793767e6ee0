use super::face::{CubeFace, TextureType};
use super::flags::{has_texture, mip_level_count, CubeMapFlags};

pub struct CubeTexture {
    texture: wgpu::Texture,
    cube_view: wgpu::TextureView,
}

impl CubeTexture {
    fn new(device: &wgpu::Device, image_size: u32, flags: CubeMapFlags, texture_type: TextureType) -> Self {
        let usage = match texture_type {
            TextureType::Color => {
                wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST
            }
            TextureType::Depth => {
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_SRC
            }
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("Texture: CubeMap {}", texture_type)),
            size: wgpu::Extent3d {
                width: image_size,
                height: image_size,
                depth_or_array_layers: 6,
            },
            mip_level_count: mip_level_count(image_size, flags, texture_type),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_type.format(),
            usage,
            view_formats: &[],
        });
        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(&format!("TextureView: CubeMap {}", texture_type)),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        CubeTexture { texture, cube_view }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    // View over all six faces and mip levels, for sampling as texture_cube.
    pub fn cube_view(&self) -> &wgpu::TextureView {
        &self.cube_view
    }

    pub fn mip_level_count(&self) -> u32 {
        self.texture.mip_level_count()
    }

    pub fn size(&self) -> u32 {
        self.texture.width()
    }

    // Single face, single mip level. Usable as render attachment.
    pub fn face_view(&self, face: CubeFace, mip_level: u32) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("TextureView: CubeMap face"),
            dimension: Some(wgpu::TextureViewDimension::D2),
            base_mip_level: mip_level,
            mip_level_count: Some(1),
            base_array_layer: face.layer(),
            array_layer_count: Some(1),
            ..Default::default()
        })
    }
}

// One slot per texture type, filled if the type is enabled.
pub struct CubeMapTextures {
    color: Option<CubeTexture>,
    depth: Option<CubeTexture>,
}

impl CubeMapTextures {
    pub fn new(device: &wgpu::Device, image_size: u32, flags: CubeMapFlags) -> Self {
        let create = |texture_type| {
            if has_texture(flags, texture_type) {
                Some(CubeTexture::new(device, image_size, flags, texture_type))
            } else {
                None
            }
        };
        CubeMapTextures {
            color: create(TextureType::Color),
            depth: create(TextureType::Depth),
        }
    }

    pub fn get(&self, texture_type: TextureType) -> Option<&CubeTexture> {
        match texture_type {
            TextureType::Color => self.color.as_ref(),
            TextureType::Depth => self.depth.as_ref(),
        }
    }

    pub fn color(&self) -> Option<&CubeTexture> {
        self.color.as_ref()
    }

    pub fn depth(&self) -> Option<&CubeTexture> {
        self.depth.as_ref()
    }
}
