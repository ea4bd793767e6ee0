use super::binding_builder::*;
use super::binding_types;
use super::readback::{read_texture_layer, TextureLayer};
use super::uniformbuffer::UniformBuffer;
use std::error::Error;

// What kind of cube texture a CubeFaceReader samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeSource {
    // Filterable float formats, read back as the staging format given here.
    Color(wgpu::TextureFormat),
    // Any depth format, read back as raw f32 bits.
    Depth,
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FaceUniformBufferContent {
    layer: u32,
    padding: [u32; 3],
}

// Reads single faces of a cube texture back to the host.
//
// Faces aren't copied out of the cube directly: depth textures can only be copied as a whole, and some backends
// can't copy cube faces to buffers at all. Instead the face is sampled through the cube view into a plain
// 2D staging texture of the same size, which is then read back.
pub struct CubeFaceReader {
    bind_group_layout: BindGroupLayoutWithDesc,
    pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    face_ubo: UniformBuffer<FaceUniformBufferContent>,
    staging_format: wgpu::TextureFormat,
}

impl CubeFaceReader {
    pub fn new(device: &wgpu::Device, source: CubeSource) -> Self {
        let (texture_binding, staging_format, shader) = match source {
            CubeSource::Color(format) => (
                binding_types::textureCube(),
                format,
                device.create_shader_module(wgpu::include_wgsl!("../../shader/read_color_face.wgsl")),
            ),
            CubeSource::Depth => (
                binding_types::textureCube_depth(),
                wgpu::TextureFormat::R32Uint,
                device.create_shader_module(wgpu::include_wgsl!("../../shader/read_depth_face.wgsl")),
            ),
        };

        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(texture_binding)
            .next_binding_fragment(binding_types::sampler_nonfiltering())
            .next_binding_fragment(binding_types::uniform())
            .create(device, "BindGroupLayout: CubeFaceReader");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("CubeFaceReader Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout.layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("CubeFaceReader: Copy face"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: staging_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        // Sampling at texel centers with nearest filtering returns exact texel values.
        let sampler = device.create_sampler(&simple_sampler(
            wgpu::AddressMode::ClampToEdge,
            wgpu::FilterMode::Nearest,
            "Sampler: CubeFaceReader",
        ));

        CubeFaceReader {
            bind_group_layout,
            pipeline,
            sampler,
            face_ubo: UniformBuffer::new(device),
            staging_format,
        }
    }

    // Returns mip level 0 of the given face (array layer), tightly packed, 4 bytes per texel.
    pub fn read_face(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cube_view: &wgpu::TextureView,
        size: u32,
        layer: u32,
    ) -> Result<Vec<u8>, Box<dyn Error>> {
        assert_lt!(layer, 6, "CubeFaceReader::read_face(): cube layer {} is illegal.", layer);

        let staging_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Texture: Cube face readback staging"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.staging_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let staging_view = staging_texture.create_view(&Default::default());

        self.face_ubo.update_content(queue, FaceUniformBufferContent { layer, padding: [0; 3] });
        let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
            .texture(cube_view)
            .sampler(&self.sampler)
            .buffer(self.face_ubo.buffer())
            .create(device, "BindGroup: CubeFaceReader");

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Encoder: Cube face readback"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube face readback"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &staging_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        queue.submit(Some(encoder.finish()));

        read_texture_layer(
            device,
            queue,
            TextureLayer {
                texture: &staging_texture,
                layer: 0,
                mip_level: 0,
                aspect: wgpu::TextureAspect::All,
                bytes_per_pixel: 4,
            },
        )
    }
}
