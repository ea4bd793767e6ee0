use super::binding_builder::*;
use super::binding_types;

// Depth formats can't be a copy destination, so depth images get uploaded to a R32Float staging texture
// and then rasterized into the depth attachment with frag_depth.
pub struct DepthUploader {
    bind_group_layout: BindGroupLayoutWithDesc,
    pipeline: wgpu::RenderPipeline,
}

impl DepthUploader {
    const STAGING_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

    pub fn new(device: &wgpu::Device, depth_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture2D_unfilterable())
            .create(device, "BindGroupLayout: DepthUploader");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("DepthUploader Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout.layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::include_wgsl!("../../shader/depth_upload.wgsl"));
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("DepthUploader: Write depth"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[],
            }),
            multiview: None,
        });

        DepthUploader {
            bind_group_layout,
            pipeline,
        }
    }

    // Overwrites every texel of `target` (a single layer depth view of size width x height) with `depth`.
    pub fn upload(&self, device: &wgpu::Device, queue: &wgpu::Queue, target: &wgpu::TextureView, width: u32, height: u32, depth: &[f32]) {
        assert_eq!(depth.len(), width as usize * height as usize, "DepthUploader::upload(): depth data size mismatch");

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let staging_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Texture: Depth upload staging"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::STAGING_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &staging_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(depth),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * std::mem::size_of::<f32>() as u32),
                rows_per_image: Some(height),
            },
            size,
        );
        let staging_view = staging_texture.create_view(&Default::default());
        let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
            .texture(&staging_view)
            .create(device, "BindGroup: DepthUploader");

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Encoder: Depth upload"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Depth upload"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: target,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        queue.submit(Some(encoder.finish()));
    }
}
