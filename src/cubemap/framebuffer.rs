use super::face::CubeFace;
use super::textures::CubeTexture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    // No face was selected with map_for_draw.
    NoDrawFace,
    // Neither color nor depth is attached.
    MissingAttachment,
    // The attached depth texture face is not the face being drawn.
    StaleDepthAttachment,
}

// Where the depth output currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthAttachment {
    None,
    FallbackBuffer,
    TextureFace(CubeFace),
}

// Attachment state of the offscreen target the cube faces are rendered through.
//
// Color faces and the fallback depth buffer are attached once after (re)creation.
// A depth texture face has to be attached again for every face that is drawn.
pub struct CubeFramebuffer {
    image_size: u32,
    color_faces: Option<Vec<wgpu::TextureView>>,
    fallback_depth: Option<(wgpu::Texture, wgpu::TextureView)>,
    depth_face_view: Option<wgpu::TextureView>,
    depth_attachment: DepthAttachment,
    draw_face: Option<CubeFace>,
}

impl CubeFramebuffer {
    // Differs from the depth texture format (32 bit float).
    pub const FALLBACK_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    pub fn new(device: &wgpu::Device, image_size: u32, with_fallback_depth: bool) -> Self {
        let fallback_depth = if with_fallback_depth {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Texture: CubeMap fallback depth"),
                size: wgpu::Extent3d {
                    width: image_size,
                    height: image_size,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: Self::FALLBACK_DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = texture.create_view(&Default::default());
            Some((texture, view))
        } else {
            None
        };

        CubeFramebuffer {
            image_size,
            color_faces: None,
            fallback_depth,
            depth_face_view: None,
            depth_attachment: DepthAttachment::None,
            draw_face: None,
        }
    }

    pub fn attach_color_faces(&mut self, color: &CubeTexture) {
        assert_eq!(color.size(), self.image_size, "CubeFramebuffer::attach_color_faces(): size mismatch");
        self.color_faces = Some(CubeFace::ALL.iter().map(|face| color.face_view(*face, 0)).collect());
    }

    pub fn attach_fallback_depth(&mut self) {
        assert!(
            self.fallback_depth.is_some(),
            "CubeFramebuffer::attach_fallback_depth(): created without fallback depth buffer."
        );
        self.depth_attachment = DepthAttachment::FallbackBuffer;
    }

    pub fn attach_depth_face(&mut self, depth: &CubeTexture, face: CubeFace) {
        assert_eq!(depth.size(), self.image_size, "CubeFramebuffer::attach_depth_face(): size mismatch");
        self.depth_face_view = Some(depth.face_view(face, 0));
        self.depth_attachment = DepthAttachment::TextureFace(face);
    }

    // Routes the single color output to the given face.
    pub fn map_for_draw(&mut self, face: CubeFace) {
        self.draw_face = Some(face);
    }

    pub fn draw_face(&self) -> Option<CubeFace> {
        self.draw_face
    }

    pub fn depth_attachment(&self) -> DepthAttachment {
        self.depth_attachment
    }

    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        match self.depth_attachment {
            DepthAttachment::None => None,
            DepthAttachment::FallbackBuffer => Some(Self::FALLBACK_DEPTH_FORMAT),
            DepthAttachment::TextureFace(_) => Some(super::face::TextureType::Depth.format()),
        }
    }

    pub fn status(&self) -> FramebufferStatus {
        attachment_status(self.draw_face, self.color_faces.is_some(), self.depth_attachment)
    }

    pub fn check_status(&self) {
        let status = self.status();
        assert_eq!(
            status,
            FramebufferStatus::Complete,
            "CubeFramebuffer: framebuffer is not complete for draw face {:?}",
            self.draw_face
        );
    }

    // Pass for the current draw face, depth cleared to 1.0 and color attachment 0 to zero.
    pub fn begin_render_pass<'a>(&'a self, encoder: &'a mut wgpu::CommandEncoder) -> wgpu::RenderPass<'a> {
        self.check_status();
        let color_attachment = match (&self.color_faces, self.draw_face) {
            (Some(color_faces), Some(face)) => Some(wgpu::RenderPassColorAttachment {
                view: &color_faces[face.index()],
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            }),
            _ => None,
        };
        let depth_view = match self.depth_attachment {
            DepthAttachment::None => None,
            DepthAttachment::FallbackBuffer => self.fallback_depth.as_ref().map(|(_, view)| view),
            DepthAttachment::TextureFace(_) => self.depth_face_view.as_ref(),
        };
        let color_attachments = [color_attachment];
        let color_attachments: &[Option<wgpu::RenderPassColorAttachment>] =
            if color_attachments[0].is_some() { &color_attachments } else { &[] };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("CubeMap face"),
            color_attachments,
            depth_stencil_attachment: depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }
}

fn attachment_status(draw_face: Option<CubeFace>, has_color: bool, depth_attachment: DepthAttachment) -> FramebufferStatus {
    let draw_face = match draw_face {
        Some(face) => face,
        None => return FramebufferStatus::NoDrawFace,
    };
    match depth_attachment {
        DepthAttachment::TextureFace(depth_face) if depth_face != draw_face => FramebufferStatus::StaleDepthAttachment,
        DepthAttachment::None if !has_color => FramebufferStatus::MissingAttachment,
        _ => FramebufferStatus::Complete,
    }
}
