use crate::cubemap::CubeFace;
use crate::scene::{SceneGraph, SceneGraphId};
use cgmath::{EuclideanSpace, SquareMatrix};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// Cube textures are addressed in a left handed frame, rendering with a right handed view needs a mirrored x axis.
#[rustfmt::skip]
const MIRROR_X_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    -1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
);

// Camera for rendering all six directions from one point.
//
// The projection is fixed to a 90 degree square frustum; what the user controls is the viewport,
// the clip planes and the camera node's transform (camera to world).
#[derive(Debug, Clone)]
pub struct CubeMapCamera {
    viewport: (u32, u32),
    near: f32,
    far: f32,
    transform: cgmath::Matrix4<f32>,
    scene_graph: Option<SceneGraphId>,
}

// Per-face view and projection, as handed to drawables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceCamera {
    pub face: CubeFace,
    pub view: cgmath::Matrix4<f32>,
    pub projection: cgmath::Matrix4<f32>,
    pub position: cgmath::Point3<f32>,
}

impl FaceCamera {
    pub fn view_projection(&self) -> cgmath::Matrix4<f32> {
        self.projection * self.view
    }
}

impl CubeMapCamera {
    pub fn new(image_size: u32, near: f32, far: f32) -> Self {
        assert_gt!(near, 0.0, "CubeMapCamera::new(): near plane must be positive");
        assert_gt!(far, near, "CubeMapCamera::new(): far plane must be behind the near plane");
        CubeMapCamera {
            viewport: (image_size, image_size),
            near,
            far,
            transform: cgmath::Matrix4::identity(),
            scene_graph: None,
        }
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        self.viewport = viewport;
    }

    pub fn transform(&self) -> &cgmath::Matrix4<f32> {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: cgmath::Matrix4<f32>) {
        self.transform = transform;
    }

    pub fn attach_to(&mut self, scene_graph: &dyn SceneGraph) {
        self.scene_graph = Some(scene_graph.id());
    }

    pub fn is_in_scene_graph(&self, scene_graph: &dyn SceneGraph) -> bool {
        self.scene_graph == Some(scene_graph.id())
    }

    // Reference frame for all six face rotations. Captures whatever transform the user applied last.
    pub fn base_transform(&self) -> cgmath::Matrix4<f32> {
        self.transform
    }

    pub fn projection(&self) -> cgmath::Matrix4<f32> {
        let aspect_ratio = self.viewport.0 as f32 / self.viewport.1.max(1) as f32;
        OPENGL_TO_WGPU_MATRIX * MIRROR_X_MATRIX * cgmath::perspective(cgmath::Deg(90.0), aspect_ratio, self.near, self.far)
    }

    // Depends only on the base transform and the face, never on previous faces.
    pub fn face_camera(&self, base_transform: &cgmath::Matrix4<f32>, face: CubeFace) -> FaceCamera {
        let local_view = cgmath::Matrix4::look_to_rh(cgmath::Point3::origin(), face.direction(), face.up());
        let world_to_camera = base_transform.invert().unwrap_or_else(|| {
            warn!("CubeMapCamera: camera transform is not invertible, using identity");
            cgmath::Matrix4::identity()
        });
        FaceCamera {
            face,
            view: local_view * world_to_camera,
            projection: self.projection(),
            position: cgmath::Point3::from_vec(base_transform.w.truncate()),
        }
    }
}
