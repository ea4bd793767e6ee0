mod face;
mod flags;
mod framebuffer;
mod persistence;
mod textures;

pub use face::{CubeFace, TextureType};
pub use flags::{builds_color_mipmap, check_texture_type, default_flags, has_texture, mip_level_count, CubeMapFlag, CubeMapFlags};
pub use framebuffer::{CubeFramebuffer, DepthAttachment, FramebufferStatus};
pub use persistence::face_image_path;
pub use textures::{CubeMapTextures, CubeTexture};

use crate::camera::CubeMapCamera;
use crate::scene::{DrawFlags, SceneGraph};
use crate::wgpu_utils::{
    cube_face_reader::{CubeFaceReader, CubeSource},
    depth_upload::DepthUploader,
    mipmap::MipmapGenerator,
};

// Offscreen target rendering into the six faces of a color and/or depth cube texture.
//
// All GPU work is submitted in order on the given queue, face by face. The target exclusively owns its
// textures and attachments; drawables only get to record draw calls into the face passes.
pub struct CubeMap {
    flags: CubeMapFlags,
    image_size: u32,
    textures: CubeMapTextures,
    framebuffer: CubeFramebuffer,
    mipmap_generator: Option<MipmapGenerator>,
    depth_uploader: Option<DepthUploader>,
    color_reader: Option<CubeFaceReader>,
    depth_reader: Option<CubeFaceReader>,
}

// Panics for an empty target.
pub fn check_image_size(image_size: u32, operation: &str) {
    assert_gt!(image_size, 0, "{} image size {} is illegal.", operation, image_size);
}

impl CubeMap {
    pub fn new(device: &wgpu::Device, image_size: u32, flags: CubeMapFlags) -> Self {
        check_image_size(image_size, "CubeMap::new():");

        let mipmap_generator = if builds_color_mipmap(flags) {
            Some(MipmapGenerator::new(device, TextureType::Color.format()))
        } else {
            None
        };
        let with_color = has_texture(flags, TextureType::Color);
        let with_depth = has_texture(flags, TextureType::Depth);
        let depth_uploader = if with_depth {
            Some(DepthUploader::new(device, TextureType::Depth.format()))
        } else {
            None
        };
        let color_reader = if with_color {
            Some(CubeFaceReader::new(device, CubeSource::Color(TextureType::Color.format())))
        } else {
            None
        };
        let depth_reader = if with_depth {
            Some(CubeFaceReader::new(device, CubeSource::Depth))
        } else {
            None
        };

        let (textures, framebuffer) = Self::create_targets(device, image_size, flags);
        CubeMap {
            flags,
            image_size,
            textures,
            framebuffer,
            mipmap_generator,
            depth_uploader,
            color_reader,
            depth_reader,
        }
    }

    // Returns true if the size changed and all GPU resources were recreated.
    pub fn resize(&mut self, device: &wgpu::Device, image_size: u32) -> bool {
        if self.image_size == image_size {
            return false;
        }
        check_image_size(image_size, "CubeMap::resize():");

        let (textures, framebuffer) = Self::create_targets(device, image_size, self.flags);
        self.image_size = image_size;
        self.textures = textures;
        self.framebuffer = framebuffer;
        true
    }

    // Textures are never resized in place, everything is created from scratch.
    // Depth texture faces are not attached here since they need to be bound for every face that is drawn.
    fn create_targets(device: &wgpu::Device, image_size: u32, flags: CubeMapFlags) -> (CubeMapTextures, CubeFramebuffer) {
        let textures = CubeMapTextures::new(device, image_size, flags);
        let with_depth_texture = has_texture(flags, TextureType::Depth);
        let mut framebuffer = CubeFramebuffer::new(device, image_size, !with_depth_texture);

        if let Some(color) = textures.color() {
            framebuffer.attach_color_faces(color);
        }
        if !with_depth_texture {
            framebuffer.attach_fallback_depth();
        }
        (textures, framebuffer)
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn flags(&self) -> CubeMapFlags {
        self.flags
    }

    pub fn texture(&self, texture_type: TextureType) -> &CubeTexture {
        check_texture_type(self.flags, texture_type, "CubeMap::texture():");
        match self.textures.get(texture_type) {
            Some(texture) => texture,
            None => unreachable!("CubeMap::texture(): enabled texture type {} has no texture", texture_type),
        }
    }

    // Formats drawables have to render to, see ColorBox::new.
    pub fn color_format(&self) -> Option<wgpu::TextureFormat> {
        self.textures.color().map(|_| TextureType::Color.format())
    }

    pub fn depth_format(&self) -> wgpu::TextureFormat {
        if has_texture(self.flags, TextureType::Depth) {
            TextureType::Depth.format()
        } else {
            CubeFramebuffer::FALLBACK_DEPTH_FORMAT
        }
    }

    pub fn framebuffer(&self) -> &CubeFramebuffer {
        &self.framebuffer
    }

    // Renders the scene once per face, looking along the face direction relative to the camera's current transform.
    //
    // The camera's projection inputs (viewport, clip planes) are set by the caller, we only check them.
    // Mipmaps are rebuilt afterwards if the instance was created with BuildMipmap.
    pub fn render_to_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &CubeMapCamera,
        scene_graph: &mut dyn SceneGraph,
        draw_flags: DrawFlags,
    ) {
        assert!(
            camera.is_in_scene_graph(&*scene_graph),
            "CubeMap::render_to_texture(): camera is NOT attached to the current scene graph."
        );
        assert_eq!(
            camera.viewport(),
            (self.image_size, self.image_size),
            "CubeMap::render_to_texture(): the image size within the CubeMapCamera, which is {:?} compared to {} is not correct.",
            camera.viewport(),
            self.image_size
        );

        let base_transform = camera.base_transform();
        for face in CubeFace::ALL.iter().copied() {
            let face_camera = camera.face_camera(&base_transform, face);
            self.prepare_to_draw(face);

            for group in scene_graph.drawable_groups_mut().iter_mut() {
                group.prepare_for_draw(queue, &face_camera);
            }

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder: CubeMap face"),
            });
            {
                let mut rpass = self.framebuffer.begin_render_pass(&mut encoder);
                for group in scene_graph.drawable_groups().iter() {
                    group.draw(&mut rpass, draw_flags);
                }
            }
            queue.submit(Some(encoder.finish()));
        }

        self.generate_mipmap(device, queue);
    }

    fn prepare_to_draw(&mut self, face: CubeFace) {
        self.framebuffer.map_for_draw(face);
        // Unlike the color faces, the depth texture face has to be attached again for every face.
        if let Some(depth) = self.textures.depth() {
            self.framebuffer.attach_depth_face(depth, face);
        }
        self.framebuffer.check_status();
    }

    fn face_reader(&self, texture_type: TextureType) -> Option<&CubeFaceReader> {
        match texture_type {
            TextureType::Color => self.color_reader.as_ref(),
            TextureType::Depth => self.depth_reader.as_ref(),
        }
    }

    // Color texture only, never depth.
    fn generate_mipmap(&self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if let (Some(generator), Some(color)) = (&self.mipmap_generator, self.textures.color()) {
            generator.generate(device, queue, color.texture());
        }
    }
}
