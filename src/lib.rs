#[macro_use]
extern crate log;
#[macro_use]
extern crate more_asserts;

pub mod camera;
pub mod config;
pub mod cubemap;
pub mod scene;
pub mod wgpu_utils;
