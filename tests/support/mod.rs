#![allow(dead_code)]

use std::sync::Arc;

use target_lines::{ConfigSnapshot, FrameOutput, Overlay, SimScene};

pub const RULES_AB: &str = include_str!("../data/rules_ab.json");
pub const SCENE_LIFECYCLE: &str = include_str!("../data/scene_lifecycle.json");

pub fn snapshot(json: &str) -> Arc<ConfigSnapshot> {
    ConfigSnapshot::from_json_str(json).unwrap()
}

pub fn scene(json: &str) -> SimScene {
    SimScene::from_json_str(json).unwrap()
}

/// Drive `frames` frames starting at `start`, applying scripted events first. Returns every
/// frame's output.
pub fn drive(overlay: &mut Overlay, scene: &mut SimScene, start: u64, frames: u64) -> Vec<FrameOutput> {
    (start..start + frames)
        .map(|frame| {
            scene.apply_events(frame);
            let dt = scene.dt();
            overlay.frame(&*scene, dt)
        })
        .collect()
}
