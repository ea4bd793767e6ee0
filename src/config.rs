use crate::camera::CubeMapCamera;
use crate::cubemap::{CubeMapFlag, CubeMapFlags};
use crate::scene::ColorBoxConfig;
use serde::Deserialize;
use std::{error, fs::File, io::BufReader, path::Path};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: cgmath::Point3<f32>,
    // rotation around the world up axis (+Y)
    pub yaw_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            position: cgmath::Point3::new(0.0, 0.0, 0.0),
            yaw_degrees: 0.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

// Data describing a cube capture.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub depth: bool,
    #[serde(default)]
    pub build_mipmap: bool,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: ColorBoxConfig,
    // Face images go to {output_prefix}.{rgba|depth}.{face}.{png|hdr}
    pub output_prefix: String,
}

fn default_image_size() -> u32 {
    256
}

fn default_true() -> bool {
    true
}

impl CaptureConfig {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn error::Error>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: CaptureConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }

    pub fn with_output_prefix(output_prefix: &str) -> Self {
        CaptureConfig {
            image_size: default_image_size(),
            color: true,
            depth: false,
            build_mipmap: false,
            camera: Default::default(),
            scene: Default::default(),
            output_prefix: output_prefix.to_owned(),
        }
    }

    pub fn flags(&self) -> CubeMapFlags {
        let mut flags = CubeMapFlags::empty();
        if self.color {
            flags |= CubeMapFlag::ColorTexture;
        }
        if self.depth {
            flags |= CubeMapFlag::DepthTexture;
        }
        if self.build_mipmap {
            flags |= CubeMapFlag::BuildMipmap;
        }
        flags
    }

    pub fn camera(&self) -> CubeMapCamera {
        let mut camera = CubeMapCamera::new(self.image_size, self.camera.near, self.camera.far);
        camera.set_transform(
            cgmath::Matrix4::from_translation(cgmath::Vector3::new(
                self.camera.position.x,
                self.camera.position.y,
                self.camera.position.z,
            )) * cgmath::Matrix4::from_angle_y(cgmath::Deg(self.camera.yaw_degrees)),
        );
        camera
    }
}
