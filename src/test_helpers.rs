//! Shared test utilities for the picturebook test suite.
//!
//! Provides story fixtures and scene builders used across the module test
//! suites, so every test doesn't hand-roll the same four-scene story.

use crate::types::{ImageFile, Scene, SceneNumber, Story};

/// A story with defaults every assertion can rely on: prompt "A test",
/// model "test-model", a fixed timestamp.
pub fn story_with(scenes: Vec<Scene>) -> Story {
    Story {
        scenes,
        generated_at: "2025-06-07T18:33:12.123456".to_string(),
        model: "test-model".to_string(),
        original_prompt: "A test".to_string(),
        num_scenes: 2,
        total_parts: 0,
    }
}

/// Two full scenes (text + image each) plus one overflow fragment — the
/// canonical fixture for renderer and extraction tests.
pub fn sample_story() -> Story {
    let mut story = story_with(vec![
        text_scene(
            1,
            "Scene 1: A **brave** fox sets out.\n\nThe morning was cold.",
        ),
        image_scene(1, "scene_01.png"),
        text_scene(2, "The fox meets a crow."),
        image_scene(2, "scene_02.png"),
        Scene::text(SceneNumber::Additional, "And they lived happily."),
    ]);
    story.total_parts = 5;
    story
}

pub fn text_scene(number: u32, content: impl Into<String>) -> Scene {
    Scene::text(SceneNumber::Number(number), content)
}

pub fn image_scene(number: u32, filename: &str) -> Scene {
    Scene::image(
        SceneNumber::Number(number),
        ImageFile {
            filename: filename.to_string(),
            path: None,
            dimensions: Some((2, 2)),
        },
    )
}

/// A real 2x2 PNG payload for ingest tests.
pub fn tiny_png() -> Vec<u8> {
    let pixels = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 120, 40, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("in-memory png encoding");
    bytes
}
