pub mod color_box;

use crate::camera::FaceCamera;
use enumflags2::{bitflags, BitFlags};
use std::sync::atomic::{AtomicU64, Ordering};

pub use color_box::{ColorBox, ColorBoxConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneGraphId(u64);

impl SceneGraphId {
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        SceneGraphId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// Passed through to drawables untouched.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawFlag {
    FrustumCulling = 1 << 0,
    ObjectsOnly = 1 << 1,
}

pub type DrawFlags = BitFlags<DrawFlag>;

// A set of things that are drawn together.
pub trait DrawableGroup {
    // Called once per face before the face's render pass begins. Uniform updates go through the queue.
    fn prepare_for_draw(&mut self, queue: &wgpu::Queue, camera: &FaceCamera);

    fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, flags: DrawFlags);
}

pub trait SceneGraph {
    fn id(&self) -> SceneGraphId;
    fn drawable_groups(&self) -> &[Box<dyn DrawableGroup>];
    fn drawable_groups_mut(&mut self) -> &mut [Box<dyn DrawableGroup>];
}

// Scene graph that is nothing but a list of drawable groups.
pub struct DrawableScene {
    id: SceneGraphId,
    groups: Vec<Box<dyn DrawableGroup>>,
}

impl DrawableScene {
    pub fn new() -> Self {
        DrawableScene {
            id: SceneGraphId::next(),
            groups: Vec::new(),
        }
    }

    pub fn add_group(&mut self, group: Box<dyn DrawableGroup>) {
        self.groups.push(group);
    }
}

impl Default for DrawableScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for DrawableScene {
    fn id(&self) -> SceneGraphId {
        self.id
    }

    fn drawable_groups(&self) -> &[Box<dyn DrawableGroup>] {
        &self.groups
    }

    fn drawable_groups_mut(&mut self) -> &mut [Box<dyn DrawableGroup>] {
        &mut self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CubeMapCamera;

    #[test]
    fn scene_ids_are_unique() {
        let a = DrawableScene::new();
        let b = DrawableScene::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn camera_attachment() {
        let scene = DrawableScene::new();
        let other_scene = DrawableScene::new();
        let mut camera = CubeMapCamera::new(8, 0.1, 10.0);
        assert!(!camera.is_in_scene_graph(&scene));
        camera.attach_to(&scene);
        assert!(camera.is_in_scene_graph(&scene));
        assert!(!camera.is_in_scene_graph(&other_scene));
    }
}
