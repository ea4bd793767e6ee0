use super::binding_builder::*;
use super::binding_types;

// Rebuilds the mip chain of a layered texture by successive bilinear downsampling.
// Every level is produced from the previous one, layer by layer.
pub struct MipmapGenerator {
    bind_group_layout: BindGroupLayoutWithDesc,
    pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
}

impl MipmapGenerator {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture2D())
            .next_binding_fragment(binding_types::sampler())
            .create(device, "BindGroupLayout: MipmapGenerator");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("MipmapGenerator Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout.layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::include_wgsl!("../../shader/mipmap_blit.wgsl"));
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("MipmapGenerator: Blit"),
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
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let sampler = device.create_sampler(&simple_sampler(
            wgpu::AddressMode::ClampToEdge,
            wgpu::FilterMode::Linear,
            "Sampler: MipmapGenerator",
        ));

        MipmapGenerator {
            bind_group_layout,
            pipeline,
            sampler,
            format,
        }
    }

    pub fn generate(&self, device: &wgpu::Device, queue: &wgpu::Queue, texture: &wgpu::Texture) {
        assert_eq!(texture.format(), self.format, "MipmapGenerator::generate(): texture format mismatch");
        let mip_level_count = texture.mip_level_count();
        if mip_level_count < 2 {
            return;
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Encoder: Generate mipmaps"),
        });
        for layer in 0..texture.depth_or_array_layers() {
            let level_views: Vec<wgpu::TextureView> = (0..mip_level_count)
                .map(|mip_level| {
                    texture.create_view(&wgpu::TextureViewDescriptor {
                        label: Some("TextureView: Mip level"),
                        dimension: Some(wgpu::TextureViewDimension::D2),
                        base_mip_level: mip_level,
                        mip_level_count: Some(1),
                        base_array_layer: layer,
                        array_layer_count: Some(1),
                        ..Default::default()
                    })
                })
                .collect();

            for target_level in 1..mip_level_count as usize {
                let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
                    .texture(&level_views[target_level - 1])
                    .sampler(&self.sampler)
                    .create(device, "BindGroup: MipmapGenerator");

                let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Generate mip level"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &level_views[target_level],
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
        }
        queue.submit(Some(encoder.finish()));
    }
}
