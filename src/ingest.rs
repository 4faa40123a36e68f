//! Generation-output ingestion.
//!
//! Converts the raw part list coming out of a generation producer into a
//! [`Story`], persisting image payloads along the way. This is the only
//! pipeline component with filesystem write side effects apart from the
//! metadata snapshot in [`crate::store`].
//!
//! ## Scene counting
//!
//! The producer interleaves text and image parts with no guaranteed order
//! beyond convention: narrative text precedes the image that concludes its
//! scene. A single counter, starting at 1, tracks the scene currently being
//! filled:
//!
//! - **Text part** — labelled with the current counter while it is within
//!   the requested quota, otherwise routed to the "additional" bucket. Text
//!   never advances the counter.
//! - **Image part** — decoded, saved as `scene_{NN}.png`, labelled with the
//!   current counter (its true value, even past the quota), and only then
//!   the counter advances.
//!
//! The asymmetry — overflow text goes to a sentinel, overflow images keep
//! real numbers — is observed behavior that persisted stories depend on, not
//! an accident to unify.
//!
//! ## Partial failure
//!
//! One bad part must not discard the batch. Parts with no usable payload are
//! logged and skipped; an image that fails to decode or save is logged and
//! skipped without advancing the counter, so the next image reclaims the
//! slot. Only a batch where nothing ingests at all is an error.

use crate::naming;
use crate::types::{ImageFile, Scene, SceneContent, SceneNumber, Story};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no generation part produced any scene content")]
    NoUsableParts,
}

/// One raw part from the generation producer.
///
/// The contract says a part carries either text or image bytes, never both —
/// but producers misbehave, so both payloads are optional and classification
/// happens here (text wins if a part somehow carries both).
#[derive(Debug, Clone, Default)]
pub struct GeneratedPart {
    pub text: Option<String>,
    pub data: Option<Vec<u8>>,
}

impl GeneratedPart {
    pub fn text(content: impl Into<String>) -> Self {
        GeneratedPart {
            text: Some(content.into()),
            data: None,
        }
    }

    pub fn image(bytes: Vec<u8>) -> Self {
        GeneratedPart {
            text: None,
            data: Some(bytes),
        }
    }

    /// A part with no payload at all — the Malformed-Part case.
    pub fn empty() -> Self {
        GeneratedPart::default()
    }
}

/// Ingest a part list into a [`Story`], writing scene images into
/// `output_dir` (created if absent).
pub fn ingest(
    parts: Vec<GeneratedPart>,
    prompt: &str,
    num_scenes: u32,
    model: &str,
    output_dir: &Path,
) -> Result<Story, IngestError> {
    fs::create_dir_all(output_dir)?;

    let total_parts = parts.len();
    let mut scenes = Vec::new();
    let mut counter: u32 = 1;

    for (index, part) in parts.into_iter().enumerate() {
        if let Some(content) = part.text {
            let scene_number = if counter <= num_scenes {
                SceneNumber::Number(counter)
            } else {
                SceneNumber::Additional
            };
            scenes.push(Scene {
                scene_number,
                part_index: Some(index),
                content: SceneContent::Text { content },
            });
        } else if let Some(bytes) = part.data {
            match save_scene_image(&bytes, counter, output_dir) {
                Ok(image) => {
                    scenes.push(Scene {
                        scene_number: SceneNumber::Number(counter),
                        part_index: Some(index),
                        content: SceneContent::Image(image),
                    });
                    counter += 1;
                }
                Err(err) => {
                    // Counter stays put: the slot is still open for the
                    // next image.
                    log::error!("failed to save image for scene {counter}: {err}");
                }
            }
        } else {
            log::warn!("skipping malformed part {index}: no text or image payload");
        }
    }

    if scenes.is_empty() {
        return Err(IngestError::NoUsableParts);
    }

    Ok(Story {
        scenes,
        generated_at: now_timestamp(),
        model: model.to_string(),
        original_prompt: prompt.to_string(),
        num_scenes,
        total_parts,
    })
}

/// Decode an image payload and persist it as `scene_{NN}.png`.
fn save_scene_image(
    bytes: &[u8],
    counter: u32,
    output_dir: &Path,
) -> Result<ImageFile, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let filename = naming::scene_image_name(counter);
    let path = output_dir.join(&filename);
    decoded.save_with_format(&path, image::ImageFormat::Png)?;
    Ok(ImageFile {
        filename,
        path: Some(path),
        dimensions: Some((decoded.width(), decoded.height())),
    })
}

/// Local time in the ISO-8601 form persisted metadata uses.
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Human-readable classification of a generation failure, surfaced with
/// user-visible errors so the remediation path is obvious. Remediation
/// itself (retry, key rotation) is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    RateLimit,
    Auth,
    Malformed,
    Unknown,
}

impl FailureCategory {
    /// Classify a producer error message by its wording.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("quota") || lower.contains("rate") {
            FailureCategory::RateLimit
        } else if lower.contains("401") || lower.contains("unauthorized") {
            FailureCategory::Auth
        } else if lower.contains("malformed") || lower.contains("no generation part") {
            FailureCategory::Malformed
        } else {
            FailureCategory::Unknown
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            FailureCategory::RateLimit => {
                "rate limit: wait and retry, or request fewer scenes"
            }
            FailureCategory::Auth => "auth: the API key looks invalid or expired",
            FailureCategory::Malformed => {
                "malformed: the producer returned no usable parts"
            }
            FailureCategory::Unknown => "unknown failure: inspect the logs",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureCategory::RateLimit => "rate-limit",
            FailureCategory::Auth => "auth",
            FailureCategory::Malformed => "malformed",
            FailureCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
