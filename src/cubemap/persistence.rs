use super::face::{CubeFace, TextureType};
use super::flags::check_texture_type;
use super::CubeMap;
use image::codecs::hdr::HdrEncoder;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

// {prefix}.{rgba|depth}.{+X|-X|+Y|-Y|+Z|-Z}.{extension}
pub fn face_image_path(prefix: &str, texture_type: TextureType, face: CubeFace, extension: &str) -> PathBuf {
    PathBuf::from(format!("{}.{}.{}.{}", prefix, texture_type.file_tag(), face, extension))
}

// Fails if the image crate was built without a codec for this file extension.
fn image_format_for(extension: &str, writing: bool) -> Result<image::ImageFormat, Box<dyn Error>> {
    let format = image::ImageFormat::from_extension(extension)
        .ok_or_else(|| format!("no image codec known for file extension \"{}\"", extension))?;
    let available = if writing { format.writing_enabled() } else { format.reading_enabled() };
    if !available {
        return Err(format!(
            "image codec {:?} is not available for {}",
            format,
            if writing { "writing" } else { "reading" }
        )
        .into());
    }
    Ok(format)
}

// Loaded face, either RGBA8 pixels or single channel depth.
enum FaceImage {
    Color(image::RgbaImage),
    Depth { size: u32, depth: Vec<f32> },
}

impl FaceImage {
    fn load(path: &Path, texture_type: TextureType) -> Result<(Self, u32, u32), Box<dyn Error>> {
        let decoded = image::open(path)?;
        let (width, height) = (decoded.width(), decoded.height());
        let face_image = match texture_type {
            TextureType::Color => FaceImage::Color(decoded.into_rgba8()),
            // Depth files carry the value in all three channels, keep only the first.
            TextureType::Depth => FaceImage::Depth {
                size: width,
                depth: decoded.into_rgb32f().pixels().map(|pixel| pixel[0]).collect(),
            },
        };
        Ok((face_image, width, height))
    }
}

// Depth is stored as 3 channel float hdr with the value replicated, since hdr has no single channel variant.
fn write_depth_hdr(path: &Path, size: u32, depth: &[f32]) -> Result<(), Box<dyn Error>> {
    let pixels: Vec<image::Rgb<f32>> = depth.iter().map(|&d| image::Rgb([d, d, d])).collect();
    let writer = BufWriter::new(File::create(path)?);
    HdrEncoder::new(writer).encode(&pixels, size as usize, size as usize)?;
    Ok(())
}

impl CubeMap {
    // Writes all six faces of the given texture to `{prefix}.{type}.{face}.png|hdr`.
    //
    // Stops at the first face that fails; faces written before stay on disk.
    pub fn save_texture(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_type: TextureType,
        image_file_prefix: &str,
    ) -> Result<(), Box<dyn Error>> {
        check_texture_type(self.flags, texture_type, "CubeMap::save_texture():");
        let extension = texture_type.save_extension();
        let format = image_format_for(extension, true).map_err(|err| {
            warn!("CubeMap::save_texture(): {}", err);
            err
        })?;

        let size = self.image_size;
        for face in CubeFace::ALL.iter().copied() {
            let data = self.read_face(device, queue, texture_type, face)?;

            let filename = face_image_path(image_file_prefix, texture_type, face, extension);
            match texture_type {
                TextureType::Color => {
                    let image = image::RgbaImage::from_raw(size, size, data).ok_or("CubeMap::save_texture(): readback size mismatch")?;
                    image.save_with_format(&filename, format)?;
                }
                TextureType::Depth => {
                    let depth: Vec<f32> = data
                        .chunks_exact(std::mem::size_of::<f32>())
                        .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
                        .collect();
                    write_depth_hdr(&filename, size, &depth)?;
                }
            }
            info!("Saved cubemap face {} to {:?}", face.index(), filename);
        }

        Ok(())
    }

    // Mip level 0 of one face, tightly packed rows, 4 bytes per texel (RGBA8 or f32 depth).
    pub fn read_face(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_type: TextureType,
        face: CubeFace,
    ) -> Result<Vec<u8>, Box<dyn Error>> {
        let texture = self.texture(texture_type);
        match self.face_reader(texture_type) {
            Some(reader) => reader.read_face(device, queue, texture.cube_view(), texture.size(), face.layer()),
            None => unreachable!("CubeMap::read_face(): enabled texture type {} has no reader", texture_type),
        }
    }

    // Loads all six faces of the given texture from `{prefix}.{type}.{face}.{extension}`.
    //
    // Every image has to be square and of the same size, otherwise this panics. If the first face's size differs
    // from the current size the whole cube map is resized first. Faces uploaded before a failing one keep their new content.
    pub fn load_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture_type: TextureType,
        image_file_prefix: &str,
        image_file_extension: &str,
    ) -> Result<(), Box<dyn Error>> {
        check_texture_type(self.flags, texture_type, "CubeMap::load_texture():");
        image_format_for(image_file_extension, false).map_err(|err| {
            warn!("CubeMap::load_texture(): {}", err);
            err
        })?;

        let mut image_size = 0;
        for face in CubeFace::ALL.iter().copied() {
            let filename = face_image_path(image_file_prefix, texture_type, face, image_file_extension);
            let (face_image, width, height) = FaceImage::load(&filename, texture_type)?;

            assert_eq!(width, height, "CubeMap::load_texture(): each texture image must be a square, {:?} is {}x{}.", filename, width, height);
            if face == CubeFace::PositiveX {
                image_size = width;
                if self.resize(device, image_size) {
                    info!("CubeMap::load_texture(): resized to {} to match {:?}", image_size, filename);
                }
            } else {
                assert_eq!(
                    width, image_size,
                    "CubeMap::load_texture(): texture images must have the same size, {:?} is {} instead of {}.",
                    filename, width, image_size
                );
            }

            self.upload_face(device, queue, face, face_image);
            info!("Loaded cubemap face {} from {:?}", face.index(), filename);
        }

        self.generate_mipmap(device, queue);
        Ok(())
    }

    fn upload_face(&self, device: &wgpu::Device, queue: &wgpu::Queue, face: CubeFace, face_image: FaceImage) {
        match face_image {
            FaceImage::Color(image) => {
                let texture = self.texture(TextureType::Color);
                queue.write_texture(
                    wgpu::ImageCopyTexture {
                        texture: texture.texture(),
                        mip_level: 0,
                        origin: wgpu::Origin3d {
                            x: 0,
                            y: 0,
                            z: face.layer(),
                        },
                        aspect: wgpu::TextureAspect::All,
                    },
                    image.as_raw(),
                    wgpu::ImageDataLayout {
                        offset: 0,
                        bytes_per_row: Some(TextureType::Color.bytes_per_pixel() * image.width()),
                        rows_per_image: Some(image.height()),
                    },
                    wgpu::Extent3d {
                        width: image.width(),
                        height: image.height(),
                        depth_or_array_layers: 1,
                    },
                );
            }
            FaceImage::Depth { size, depth } => {
                let texture = self.texture(TextureType::Depth);
                if let Some(depth_uploader) = &self.depth_uploader {
                    depth_uploader.upload(device, queue, &texture.face_view(face, 0), size, size, &depth);
                }
            }
        }
    }
}
