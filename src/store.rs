//! Story persistence and recovery.
//!
//! The preferred source of truth for a story directory is its
//! `story_metadata.json` snapshot, written once after ingest. Everything
//! else exists for directories that lost it.
//!
//! ## Recovery priority
//!
//! [`recover_story`] resolves a story from the first available source:
//!
//! 1. **Metadata snapshot** — exact, lossless.
//! 2. **Reverse extraction** from the display HTML artifact
//!    ([`crate::extract`]) — best-effort, text normalized.
//! 3. **Image-directory reconstruction** — `scene_*.png` files become
//!    image-only scenes numbered by sorted position, the prompt is guessed
//!    from the directory name, text is gone.
//!
//! A corrupt snapshot degrades to the next source instead of failing: the
//! user asked for their story back, and a half-recovered story beats an
//! error. Only a directory yielding nothing at all is an error.

use crate::extract;
use crate::ingest;
use crate::naming;
use crate::types::{ImageFile, Scene, SceneNumber, Story};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no recoverable story data in {0}")]
    NoStoryData(PathBuf),
}

/// Write the canonical metadata snapshot into a story directory.
pub fn save_metadata(story: &Story, dir: &Path) -> Result<PathBuf, StoreError> {
    let path = dir.join(naming::METADATA_FILE);
    let json = serde_json::to_string_pretty(story)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Load the metadata snapshot. `Ok(None)` when the file does not exist;
/// parse failures are errors for the caller to downgrade.
pub fn load_metadata(dir: &Path) -> Result<Option<Story>, StoreError> {
    let path = dir.join(naming::METADATA_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Resolve a story from a directory, first available source wins.
pub fn recover_story(dir: &Path) -> Result<Story, StoreError> {
    match load_metadata(dir) {
        Ok(Some(story)) => return Ok(story),
        Ok(None) => {}
        Err(err) => log::warn!(
            "unreadable {} in {}: {err}; falling back to HTML extraction",
            naming::METADATA_FILE,
            dir.display()
        ),
    }

    if let Some(story) = story_from_html(dir) {
        return Ok(story);
    }

    story_from_images(dir)
}

/// Second source: reverse-extract the display artifact.
fn story_from_html(dir: &Path) -> Option<Story> {
    let html_path = display_html_in(dir)?;
    let content = match fs::read_to_string(&html_path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("cannot read {}: {err}", html_path.display());
            return None;
        }
    };
    let story = extract::extract_story(&content);
    if story.is_none() {
        log::warn!(
            "extraction from {} recovered nothing usable",
            html_path.display()
        );
    }
    story
}

/// First non-print HTML file in name order — the display artifact, unless
/// the directory only holds a print variant.
fn display_html_in(dir: &Path) -> Option<PathBuf> {
    let mut html_files: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("html"))
                .unwrap_or(false)
        })
        .collect();
    html_files.sort();
    html_files
        .iter()
        .find(|p| {
            !p.file_name()
                .map(|n| n.to_string_lossy().ends_with("_print.html"))
                .unwrap_or(false)
        })
        .or_else(|| html_files.first())
        .cloned()
}

/// Last resort: rebuild from the scene images alone. Scenes are numbered by
/// sorted position (not by parsing the `NN` out of the name), text is
/// empty, and the prompt is guessed from the directory name.
fn story_from_images(dir: &Path) -> Result<Story, StoreError> {
    let mut image_paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .map(|n| {
                    let name = n.to_string_lossy();
                    name.starts_with("scene_") && name.ends_with(".png")
                })
                .unwrap_or(false)
        })
        .collect();
    image_paths.sort();

    if image_paths.is_empty() {
        return Err(StoreError::NoStoryData(dir.to_path_buf()));
    }

    let scenes: Vec<Scene> = image_paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            Scene::image(
                SceneNumber::Number(i as u32 + 1),
                ImageFile {
                    filename: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    path: Some(path.clone()),
                    dimensions: None,
                },
            )
        })
        .collect();

    let num_scenes = scenes.len() as u32;
    Ok(Story {
        scenes,
        generated_at: ingest::now_timestamp(),
        model: crate::config::DEFAULT_MODEL.to_string(),
        original_prompt: prompt_from_dir_name(dir),
        num_scenes,
        total_parts: 0,
    })
}

/// `story_20250607_183300` → `20250607 183300`; arbitrary names pass
/// through with underscores spaced.
fn prompt_from_dir_name(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stripped = name.strip_prefix("story_").unwrap_or(&name);
    stripped.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::render_display;
    use crate::naming::METADATA_FILE;
    use crate::test_helpers::sample_story;
    use tempfile::TempDir;

    #[test]
    fn metadata_round_trips_through_disk() {
        let tmp = TempDir::new().unwrap();
        let story = sample_story();
        let path = save_metadata(&story, tmp.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), METADATA_FILE);

        let loaded = load_metadata(tmp.path()).unwrap().unwrap();
        assert_eq!(loaded, story);
    }

    #[test]
    fn load_metadata_absent_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(load_metadata(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn recover_prefers_metadata() {
        let tmp = TempDir::new().unwrap();
        let story = sample_story();
        save_metadata(&story, tmp.path()).unwrap();
        // A decoy HTML file that would recover differently.
        fs::write(tmp.path().join("Other_story.html"), "<h2>decoy</h2>").unwrap();

        let recovered = recover_story(tmp.path()).unwrap();
        assert_eq!(recovered, story);
    }

    #[test]
    fn recover_falls_back_to_html_extraction() {
        let tmp = TempDir::new().unwrap();
        let story = sample_story();
        fs::write(
            tmp.path().join("A_test_story.html"),
            render_display(&story),
        )
        .unwrap();

        let recovered = recover_story(tmp.path()).unwrap();
        assert_eq!(recovered.original_prompt, story.original_prompt);
        assert_eq!(recovered.model, story.model);
        assert_eq!(recovered.image_count(), story.image_count());
    }

    #[test]
    fn recover_skips_print_artifacts() {
        let tmp = TempDir::new().unwrap();
        let story = sample_story();
        // Only a print artifact and a display artifact; name order would
        // pick the print file first without the filter.
        fs::write(
            tmp.path().join("A_test_print.html"),
            "<div class=\"scene\"><div class=\"scene-number\">Scene 9</div>\
             <div class=\"scene-text\">print variant</div></div>",
        )
        .unwrap();
        fs::write(
            tmp.path().join("B_test_story.html"),
            render_display(&story),
        )
        .unwrap();

        let recovered = recover_story(tmp.path()).unwrap();
        assert_eq!(recovered.original_prompt, story.original_prompt);
    }

    #[test]
    fn corrupt_metadata_degrades_to_html() {
        let tmp = TempDir::new().unwrap();
        let story = sample_story();
        fs::write(tmp.path().join(METADATA_FILE), "{ not json").unwrap();
        fs::write(
            tmp.path().join("A_test_story.html"),
            render_display(&story),
        )
        .unwrap();

        let recovered = recover_story(tmp.path()).unwrap();
        assert_eq!(recovered.original_prompt, story.original_prompt);
    }

    #[test]
    fn image_directory_is_the_last_resort() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("story_dragons_and_castles");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("scene_01.png"), b"png bytes").unwrap();
        fs::write(dir.join("scene_02.png"), b"png bytes").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let story = recover_story(&dir).unwrap();
        assert_eq!(story.original_prompt, "dragons and castles");
        assert_eq!(story.num_scenes, 2);
        assert_eq!(story.image_count(), 2);
        assert!(story.scenes.iter().all(|s| s.is_image()));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = recover_story(tmp.path()).unwrap_err();
        assert!(matches!(err, StoreError::NoStoryData(_)));
    }
}
