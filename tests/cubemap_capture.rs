mod common;

use cubecapture::{
    camera::CubeMapCamera,
    cubemap::{face_image_path, CubeFace, CubeMap, CubeMapFlag, CubeMapFlags, DepthAttachment, TextureType},
    scene::{ColorBox, ColorBoxConfig, DrawFlag, DrawFlags, DrawableScene},
};

fn box_scene(device: &wgpu::Device, cubemap: &CubeMap, config: &ColorBoxConfig) -> DrawableScene {
    let mut scene = DrawableScene::new();
    scene.add_group(Box::new(ColorBox::new(
        device,
        config,
        cubemap.color_format(),
        Some(cubemap.depth_format()),
    )));
    scene
}

fn camera_for(cubemap: &CubeMap, scene: &DrawableScene) -> CubeMapCamera {
    let mut camera = CubeMapCamera::new(cubemap.image_size(), 0.01, 100.0);
    camera.attach_to(scene);
    camera
}

fn read_face(device: &wgpu::Device, queue: &wgpu::Queue, cubemap: &CubeMap, texture_type: TextureType, face: CubeFace) -> Vec<u8> {
    cubemap.read_face(device, queue, texture_type, face).unwrap()
}

fn read_depth_face(device: &wgpu::Device, queue: &wgpu::Queue, cubemap: &CubeMap, face: CubeFace) -> Vec<f32> {
    read_face(device, queue, cubemap, TextureType::Depth, face)
        .chunks_exact(4)
        .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

// Distinct value for every texel of every face, so flipped or swapped faces show up.
fn face_pattern(face: CubeFace, size: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(size, size, |x, y| image::Rgba([(x * 8) as u8, (y * 8) as u8, face.index() as u8 * 40, 255]))
}

fn write_face_images(prefix: &str, sizes: [(u32, u32); 6]) {
    for (face, (width, height)) in CubeFace::ALL.iter().zip(sizes.iter()) {
        let image = image::RgbaImage::from_pixel(*width, *height, image::Rgba([10, 20, 30, 255]));
        image.save(face_image_path(prefix, TextureType::Color, *face, "png")).unwrap();
    }
}

fn assert_flat_face(pixels: &[u8], expected: [u8; 4], face: CubeFace) {
    for (i, pixel) in pixels.chunks_exact(4).enumerate() {
        assert_eq!(pixel, &expected[..], "face {} pixel {}", face, i);
    }
}

#[test]
fn resize_to_same_size_keeps_resources() {
    let (device, _queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let mut cubemap = CubeMap::new(&device, 16, CubeMapFlag::ColorTexture | CubeMapFlag::DepthTexture);
    let color_id = cubemap.texture(TextureType::Color).texture().global_id();
    let depth_id = cubemap.texture(TextureType::Depth).texture().global_id();

    assert!(!cubemap.resize(&device, 16));
    assert_eq!(cubemap.texture(TextureType::Color).texture().global_id(), color_id);
    assert_eq!(cubemap.texture(TextureType::Depth).texture().global_id(), depth_id);

    assert!(cubemap.resize(&device, 32));
    assert_eq!(cubemap.image_size(), 32);
    assert_eq!(cubemap.texture(TextureType::Color).size(), 32);
    assert_eq!(cubemap.texture(TextureType::Depth).size(), 32);
    assert_ne!(cubemap.texture(TextureType::Color).texture().global_id(), color_id);
}

#[test]
fn mipmaps_only_for_color() {
    let (device, _queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let cubemap = CubeMap::new(
        &device,
        64,
        CubeMapFlag::ColorTexture | CubeMapFlag::DepthTexture | CubeMapFlag::BuildMipmap,
    );
    assert_eq!(cubemap.texture(TextureType::Color).mip_level_count(), 7);
    assert_eq!(cubemap.texture(TextureType::Depth).mip_level_count(), 1);

    let without_mipmaps = CubeMap::new(&device, 64, CubeMapFlag::ColorTexture.into());
    assert_eq!(without_mipmaps.texture(TextureType::Color).mip_level_count(), 1);
}

#[test]
fn fallback_depth_without_depth_texture() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let mut cubemap = CubeMap::new(&device, 8, CubeMapFlag::ColorTexture.into());
    assert_eq!(cubemap.framebuffer().depth_attachment(), DepthAttachment::FallbackBuffer);
    assert_eq!(cubemap.depth_format(), wgpu::TextureFormat::Depth24Plus);

    let mut scene = box_scene(&device, &cubemap, &ColorBoxConfig::default());
    let camera = camera_for(&cubemap, &scene);
    cubemap.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlags::empty());
    assert_eq!(cubemap.framebuffer().draw_face(), Some(CubeFace::NegativeZ));
    assert_eq!(cubemap.framebuffer().depth_attachment(), DepthAttachment::FallbackBuffer);

    let mut with_depth = CubeMap::new(&device, 8, CubeMapFlag::ColorTexture | CubeMapFlag::DepthTexture);
    assert_eq!(with_depth.framebuffer().depth_attachment(), DepthAttachment::None);
    let mut scene = box_scene(&device, &with_depth, &ColorBoxConfig::default());
    let camera = camera_for(&with_depth, &scene);
    with_depth.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlags::empty());
    assert_eq!(
        with_depth.framebuffer().depth_attachment(),
        DepthAttachment::TextureFace(CubeFace::NegativeZ)
    );
}

#[test]
fn render_save_and_load_color() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("color");
    let prefix = directory.join("test").to_str().unwrap().to_owned();

    let config = ColorBoxConfig::default();
    let mut cubemap = CubeMap::new(&device, 64, CubeMapFlag::ColorTexture.into());
    let mut scene = box_scene(&device, &cubemap, &config);
    let mut camera = camera_for(&cubemap, &scene);
    camera.set_transform(cgmath::Matrix4::from_translation(cgmath::Vector3::new(0.1, -0.2, 0.05)));
    let transform_before = *camera.transform();

    cubemap.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlags::empty());
    assert_eq!(*camera.transform(), transform_before);

    for face in CubeFace::ALL.iter().copied() {
        let pixels = read_face(&device, &queue, &cubemap, TextureType::Color, face);
        assert_eq!(pixels.len(), 64 * 64 * 4);
        assert_flat_face(&pixels, common::to_rgba8(config.side_colors[face.index()]), face);
    }

    cubemap.save_texture(&device, &queue, TextureType::Color, &prefix).unwrap();
    for face in CubeFace::ALL.iter().copied() {
        let path = face_image_path(&prefix, TextureType::Color, face, "png");
        let image = image::open(&path).unwrap().into_rgba8();
        assert_eq!(image.dimensions(), (64, 64));
        assert_flat_face(image.as_raw(), common::to_rgba8(config.side_colors[face.index()]), face);
    }

    let mut loaded = CubeMap::new(&device, 64, CubeMapFlag::ColorTexture.into());
    loaded.load_texture(&device, &queue, TextureType::Color, &prefix, "png").unwrap();
    for face in CubeFace::ALL.iter().copied() {
        assert_eq!(
            read_face(&device, &queue, &loaded, TextureType::Color, face),
            read_face(&device, &queue, &cubemap, TextureType::Color, face),
            "face {}",
            face
        );
    }

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn objects_only_skips_environment() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let mut cubemap = CubeMap::new(&device, 8, CubeMapFlag::ColorTexture.into());
    let mut scene = box_scene(&device, &cubemap, &ColorBoxConfig::default());
    let camera = camera_for(&cubemap, &scene);
    cubemap.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlag::ObjectsOnly.into());
    for face in CubeFace::ALL.iter().copied() {
        assert_flat_face(&read_face(&device, &queue, &cubemap, TextureType::Color, face), [0, 0, 0, 0], face);
    }
}

#[test]
fn load_resizes_to_image_size() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("resize");
    let prefix = directory.join("small").to_str().unwrap().to_owned();

    let config = ColorBoxConfig::default();
    let mut small = CubeMap::new(&device, 32, CubeMapFlag::ColorTexture.into());
    let mut scene = box_scene(&device, &small, &config);
    let camera = camera_for(&small, &scene);
    small.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlags::empty());
    small.save_texture(&device, &queue, TextureType::Color, &prefix).unwrap();

    let mut cubemap = CubeMap::new(&device, 64, CubeMapFlag::ColorTexture | CubeMapFlag::BuildMipmap);
    cubemap.load_texture(&device, &queue, TextureType::Color, &prefix, "png").unwrap();
    assert_eq!(cubemap.image_size(), 32);
    assert_eq!(cubemap.texture(TextureType::Color).size(), 32);
    assert_eq!(cubemap.texture(TextureType::Color).mip_level_count(), 6);
    for face in CubeFace::ALL.iter().copied() {
        assert_flat_face(
            &read_face(&device, &queue, &cubemap, TextureType::Color, face),
            common::to_rgba8(config.side_colors[face.index()]),
            face,
        );
    }

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn load_missing_files_fails() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("missing");
    let prefix = directory.join("nothing").to_str().unwrap().to_owned();

    let mut cubemap = CubeMap::new(&device, 16, CubeMapFlag::ColorTexture.into());
    assert!(cubemap.load_texture(&device, &queue, TextureType::Color, &prefix, "png").is_err());
    // codec not compiled in
    assert!(cubemap.load_texture(&device, &queue, TextureType::Color, &prefix, "jpg").is_err());
    assert_eq!(cubemap.image_size(), 16);

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn depth_save_and_load() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("depth");
    let prefix = directory.join("depth").to_str().unwrap().to_owned();

    let mut cubemap = CubeMap::new(&device, 16, CubeMapFlag::DepthTexture.into());
    assert_eq!(cubemap.color_format(), None);
    let mut scene = box_scene(&device, &cubemap, &ColorBoxConfig::default());
    let camera = camera_for(&cubemap, &scene);
    cubemap.render_to_texture(&device, &queue, &camera, &mut scene, DrawFlags::empty());

    let rendered: Vec<Vec<f32>> = CubeFace::ALL
        .iter()
        .map(|face| read_depth_face(&device, &queue, &cubemap, *face))
        .collect();
    for (face, depth) in CubeFace::ALL.iter().zip(rendered.iter()) {
        assert_eq!(depth.len(), 16 * 16);
        // the box is everywhere in front of the cleared far plane
        assert!(depth.iter().all(|d| *d > 0.0 && *d < 1.0), "face {}", face);
    }

    cubemap.save_texture(&device, &queue, TextureType::Depth, &prefix).unwrap();
    for face in CubeFace::ALL.iter() {
        assert!(face_image_path(&prefix, TextureType::Depth, *face, "hdr").exists());
    }

    let mut loaded = CubeMap::new(&device, 16, CubeMapFlag::DepthTexture.into());
    loaded.load_texture(&device, &queue, TextureType::Depth, &prefix, "hdr").unwrap();
    for (face, expected) in CubeFace::ALL.iter().zip(rendered.iter()) {
        let actual = read_depth_face(&device, &queue, &loaded, *face);
        for (e, a) in expected.iter().zip(actual.iter()) {
            // rgbe keeps 8 bits of mantissa
            assert!((e - a).abs() <= e / 64.0, "face {}: {} vs {}", face, e, a);
        }
    }

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn load_and_read_back_keep_texel_layout() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("layout");
    let prefix = directory.join("pattern").to_str().unwrap().to_owned();
    for face in CubeFace::ALL.iter().copied() {
        face_pattern(face, 16)
            .save(face_image_path(&prefix, TextureType::Color, face, "png"))
            .unwrap();
    }

    let mut cubemap = CubeMap::new(&device, 16, CubeMapFlag::ColorTexture.into());
    cubemap.load_texture(&device, &queue, TextureType::Color, &prefix, "png").unwrap();
    for face in CubeFace::ALL.iter().copied() {
        assert_eq!(
            read_face(&device, &queue, &cubemap, TextureType::Color, face),
            face_pattern(face, 16).into_raw(),
            "face {}",
            face
        );
    }

    let saved_prefix = directory.join("saved").to_str().unwrap().to_owned();
    cubemap.save_texture(&device, &queue, TextureType::Color, &saved_prefix).unwrap();
    for face in CubeFace::ALL.iter().copied() {
        let saved = image::open(face_image_path(&saved_prefix, TextureType::Color, face, "png")).unwrap().into_rgba8();
        assert_eq!(saved, face_pattern(face, 16), "face {}", face);
    }

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn load_rejects_non_square_face() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("non-square");
    let prefix = directory.join("faces").to_str().unwrap().to_owned();
    write_face_images(&prefix, [(8, 4), (8, 8), (8, 8), (8, 8), (8, 8), (8, 8)]);

    let mut cubemap = CubeMap::new(&device, 16, CubeMapFlag::ColorTexture.into());
    common::assert_panics_with(
        || {
            let _ = cubemap.load_texture(&device, &queue, TextureType::Color, &prefix, "png");
        },
        "each texture image must be a square",
    );
    // rejected before the target was resized to the face size
    assert_eq!(cubemap.image_size(), 16);

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn load_rejects_faces_of_different_size() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    let directory = common::output_directory("size-mismatch");
    let prefix = directory.join("faces").to_str().unwrap().to_owned();
    write_face_images(&prefix, [(8, 8), (8, 8), (8, 8), (4, 4), (8, 8), (8, 8)]);

    let mut cubemap = CubeMap::new(&device, 16, CubeMapFlag::ColorTexture.into());
    common::assert_panics_with(
        || {
            let _ = cubemap.load_texture(&device, &queue, TextureType::Color, &prefix, "png");
        },
        "texture images must have the same size",
    );
    assert_eq!(cubemap.image_size(), 8);
    // faces before the mismatching one were uploaded, the mismatching one was not
    assert_flat_face(&read_face(&device, &queue, &cubemap, TextureType::Color, CubeFace::PositiveY), [10, 20, 30, 255], CubeFace::PositiveY);
    assert_flat_face(&read_face(&device, &queue, &cubemap, TextureType::Color, CubeFace::NegativeY), [0, 0, 0, 0], CubeFace::NegativeY);

    std::fs::remove_dir_all(&directory).unwrap();
}

fn check_gated_operations(device: &wgpu::Device, queue: &wgpu::Queue, flags: CubeMapFlags, missing: TextureType) {
    let expected = format!("not created with {} texture output enabled", missing);
    let mut cubemap = CubeMap::new(device, 8, flags);
    common::assert_panics_with(
        || {
            cubemap.texture(missing);
        },
        &expected,
    );
    common::assert_panics_with(
        || {
            let _ = cubemap.save_texture(device, queue, missing, "never-written");
        },
        &expected,
    );
    common::assert_panics_with(
        || {
            let _ = cubemap.load_texture(device, queue, missing, "never-read", missing.save_extension());
        },
        &expected,
    );
    common::assert_panics_with(
        || {
            let _ = cubemap.read_face(device, queue, missing, CubeFace::PositiveX);
        },
        &expected,
    );
}

#[test]
fn operations_need_enabled_texture_type() {
    let (device, queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    check_gated_operations(&device, &queue, CubeMapFlag::DepthTexture.into(), TextureType::Color);
    check_gated_operations(&device, &queue, CubeMapFlag::ColorTexture | CubeMapFlag::BuildMipmap, TextureType::Depth);
}

#[test]
fn empty_image_size_is_rejected() {
    let (device, _queue) = match common::gpu() {
        Some(gpu) => gpu,
        None => return,
    };
    common::assert_panics_with(
        || {
            CubeMap::new(&device, 0, CubeMapFlag::ColorTexture.into());
        },
        "CubeMap::new(): image size 0 is illegal.",
    );

    let mut cubemap = CubeMap::new(&device, 8, CubeMapFlag::ColorTexture.into());
    common::assert_panics_with(
        || {
            cubemap.resize(&device, 0);
        },
        "CubeMap::resize(): image size 0 is illegal.",
    );
    assert_eq!(cubemap.image_size(), 8);
}
