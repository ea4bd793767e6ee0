pub mod binding_builder;
#[allow(non_snake_case)]
pub mod binding_types;
pub mod cube_face_reader;
pub mod depth_upload;
pub mod mipmap;
pub mod readback;
pub mod uniformbuffer;

use std::error::Error;

// Device without any surface, all output goes to offscreen targets.
pub async fn request_headless_device() -> Result<(wgpu::Device, wgpu::Queue), Box<dyn Error>> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        })
        .await
        .ok_or("no suitable graphics adapter found")?;
    info!("Using adapter {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Device: cubecapture"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
            },
            None,
        )
        .await?;
    Ok((device, queue))
}
