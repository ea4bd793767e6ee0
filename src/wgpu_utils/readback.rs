use std::error::Error;
use std::sync::mpsc::channel;

pub fn round_to_multiple(value: usize, multiple: usize) -> usize {
    (value + multiple - 1) / multiple * multiple
}

pub fn bytes_per_padded_row(width: u32, bytes_per_pixel: u32) -> usize {
    round_to_multiple(
        width as usize * bytes_per_pixel as usize,
        wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize,
    )
}

// Layer of a texture to read back, always the full mip level.
pub struct TextureLayer<'a> {
    pub texture: &'a wgpu::Texture,
    pub layer: u32,
    pub mip_level: u32,
    pub aspect: wgpu::TextureAspect,
    pub bytes_per_pixel: u32,
}

// Copies a texture layer into host memory, blocking until the GPU is done.
// Returned data is tightly packed (row padding removed).
pub fn read_texture_layer(device: &wgpu::Device, queue: &wgpu::Queue, source: TextureLayer) -> Result<Vec<u8>, Box<dyn Error>> {
    let width = (source.texture.width() >> source.mip_level).max(1);
    let height = (source.texture.height() >> source.mip_level).max(1);
    let padded_row_size = bytes_per_padded_row(width, source.bytes_per_pixel);
    let row_size = width as usize * source.bytes_per_pixel as usize;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Buffer: Texture readback"),
        size: padded_row_size as u64 * height as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Encoder: Texture readback"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture: source.texture,
            mip_level: source.mip_level,
            origin: wgpu::Origin3d {
                x: 0,
                y: 0,
                z: source.layer,
            },
            aspect: source.aspect,
        },
        wgpu::ImageCopyBuffer {
            buffer: &buffer,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(padded_row_size as u32),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(Some(encoder.finish()));

    let (sender, receiver) = channel();
    let buffer_slice = buffer.slice(..);
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = sender.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    receiver.recv()??;

    let data = {
        let padded_buffer = buffer_slice.get_mapped_range();
        let mut data = Vec::with_capacity(row_size * height as usize);
        for row in padded_buffer.chunks(padded_row_size) {
            data.extend_from_slice(&row[..row_size]);
        }
        data
    };
    buffer.unmap();

    Ok(data)
}
