use super::{DrawFlag, DrawFlags, DrawableGroup};
use crate::camera::FaceCamera;
use crate::cubemap::CubeFace;
use crate::wgpu_utils::{binding_builder::*, binding_types, uniformbuffer::UniformBuffer};
use serde::Deserialize;
use wgpu::util::DeviceExt;

// Axis aligned box seen from the inside, one flat color per side.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColorBoxConfig {
    pub center: cgmath::Point3<f32>,
    pub half_extent: f32,
    // Side colors (rgba, 0-1) in cube face order +X, -X, +Y, -Y, +Z, -Z.
    pub side_colors: [[f32; 4]; 6],
}

impl Default for ColorBoxConfig {
    fn default() -> Self {
        ColorBoxConfig {
            center: cgmath::Point3::new(0.0, 0.0, 0.0),
            half_extent: 1.0,
            side_colors: [
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
                [1.0, 1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0, 1.0],
                [0.0, 1.0, 1.0, 1.0],
            ],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniformBufferContent {
    view_projection: [[f32; 4]; 4],
}

// Two triangles per side, side order as in CubeFace.
fn box_vertices(config: &ColorBoxConfig) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(36);
    for face in CubeFace::ALL.iter() {
        let normal = face.direction();
        let up = face.up();
        let tangent = normal.cross(up);
        let side_center = config.center + normal * config.half_extent;
        let corner = |s: f32, t: f32| {
            let p = side_center + (tangent * s + up * t) * config.half_extent;
            Vertex {
                position: [p.x, p.y, p.z],
                color: config.side_colors[face.index()],
            }
        };
        vertices.extend_from_slice(&[
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ]);
    }
    vertices
}

pub struct ColorBox {
    vertex_buffer: wgpu::Buffer,
    num_vertices: u32,
    camera_ubo: UniformBuffer<CameraUniformBufferContent>,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl ColorBox {
    // Pipeline matches the target's outputs: no color target for depth only rendering.
    pub fn new(
        device: &wgpu::Device,
        config: &ColorBoxConfig,
        color_format: Option<wgpu::TextureFormat>,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        let vertices = box_vertices(config);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("VertexBuffer: ColorBox"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let camera_ubo = UniformBuffer::new(device);
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "BindGroupLayout: ColorBox");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .buffer(camera_ubo.buffer())
            .create(device, "BindGroup: ColorBox");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ColorBox Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout.layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::include_wgsl!("../../shader/color_box.wgsl"));
        let color_targets = [color_format.map(|format| wgpu::ColorTargetState {
            format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ColorBox"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            // culling none, the mirrored face projection flips winding
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
                format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: color_format.map(|_| wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &color_targets,
            }),
            multiview: None,
        });

        ColorBox {
            vertex_buffer,
            num_vertices: vertices.len() as u32,
            camera_ubo,
            bind_group,
            pipeline,
        }
    }
}

impl DrawableGroup for ColorBox {
    fn prepare_for_draw(&mut self, queue: &wgpu::Queue, camera: &FaceCamera) {
        self.camera_ubo.update_content(
            queue,
            CameraUniformBufferContent {
                view_projection: camera.view_projection().into(),
            },
        );
    }

    fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, flags: DrawFlags) {
        // The box is the environment, not an object.
        if flags.contains(DrawFlag::ObjectsOnly) {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.num_vertices, 0..1);
    }
}
