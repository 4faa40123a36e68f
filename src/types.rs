//! Shared story model types.
//!
//! These types are the canonical in-memory representation of a story and are
//! serialized to `story_metadata.json` (see [`crate::store`]). The JSON shape
//! is load-bearing: previously generated story directories must keep loading,
//! so field names match the persisted format exactly.
//!
//! # Arrival order vs. numeric view
//!
//! A [`Story`] keeps its scenes in **raw arrival order** — the order parts
//! came out of the generation producer. That order is never mutated. Every
//! consumer that needs "scene 1, scene 2, …" derives a [`NumericView`] on
//! demand via [`Story::numeric_view`]: the sorted set of distinct integer
//! scene numbers, each mapped to its (optional) image and its text fragments
//! in arrival order. A map keyed directly by number would silently collapse
//! duplicate text fragments for the same scene, so the list + derived view
//! split is deliberate.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Serialized form of the overflow sentinel.
pub const ADDITIONAL_LABEL: &str = "additional";

/// A scene label: either an integer position in the story, or the sentinel
/// bucket for text that arrives after the requested scene quota is filled.
///
/// Only integer numbers participate in ordering; the additional bucket always
/// renders last. Images never land in the additional bucket — an image beyond
/// the quota keeps its true counter value (see [`crate::ingest`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneNumber {
    Number(u32),
    Additional,
}

impl fmt::Display for SceneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneNumber::Number(n) => write!(f, "{n}"),
            SceneNumber::Additional => f.write_str(ADDITIONAL_LABEL),
        }
    }
}

// The persisted format stores scene_number as either an integer or the
// string "additional", so (de)serialization is hand-written.
impl Serialize for SceneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SceneNumber::Number(n) => serializer.serialize_u32(*n),
            SceneNumber::Additional => serializer.serialize_str(ADDITIONAL_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for SceneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SceneNumberVisitor;

        impl Visitor<'_> for SceneNumberVisitor {
            type Value = SceneNumber;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a positive integer or the string \"{ADDITIONAL_LABEL}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<SceneNumber, E> {
                u32::try_from(v)
                    .map(SceneNumber::Number)
                    .map_err(|_| E::custom(format!("scene number {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<SceneNumber, E> {
                u32::try_from(v)
                    .map(SceneNumber::Number)
                    .map_err(|_| E::custom(format!("scene number {v} out of range")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<SceneNumber, E> {
                if v == ADDITIONAL_LABEL {
                    Ok(SceneNumber::Additional)
                } else {
                    Err(E::custom(format!("unknown scene number label: {v:?}")))
                }
            }
        }

        deserializer.deserialize_any(SceneNumberVisitor)
    }
}

/// A persisted image belonging to one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFile {
    /// Relative name, unique within a story directory (`scene_01.png`).
    pub filename: String,
    /// Absolute storage location. Absent for stories reconstructed from
    /// HTML, where only the relative reference survives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Pixel dimensions `(width, height)`, recorded at ingest time.
    #[serde(rename = "image_size", default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<(u32, u32)>,
}

/// What a scene holds: a text fragment or an image reference.
///
/// A tagged union rather than a struct with optional fields — a scene is
/// always exactly one of the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneContent {
    Text { content: String },
    Image(ImageFile),
}

/// The atomic unit of story content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_number: SceneNumber,
    /// Arrival position within the producer's part list. Informational;
    /// absent for scenes reconstructed from HTML.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_index: Option<usize>,
    #[serde(flatten)]
    pub content: SceneContent,
}

impl Scene {
    pub fn text(scene_number: SceneNumber, content: impl Into<String>) -> Self {
        Scene {
            scene_number,
            part_index: None,
            content: SceneContent::Text {
                content: content.into(),
            },
        }
    }

    pub fn image(scene_number: SceneNumber, image: ImageFile) -> Self {
        Scene {
            scene_number,
            part_index: None,
            content: SceneContent::Image(image),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, SceneContent::Image(_))
    }
}

/// The story aggregate: scenes in raw arrival order plus generation metadata.
///
/// Immutable after ingest — renderers and extractors never mutate a story,
/// they derive views or build new instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub scenes: Vec<Scene>,
    /// ISO-8601 local timestamp, kept as text so rendering stays pure.
    pub generated_at: String,
    pub model: String,
    pub original_prompt: String,
    /// Requested scene count (N). Actual content may exceed it.
    pub num_scenes: u32,
    /// Raw part count from the producer, before classification.
    #[serde(default)]
    pub total_parts: usize,
}

impl Story {
    /// Derive the numeric view: distinct integer scene numbers in ascending
    /// order, each with its optional image and text fragments in arrival
    /// order, plus the additional bucket.
    ///
    /// When two images claim the same number the later arrival wins; text
    /// fragments are never collapsed. Images labelled "additional" cannot be
    /// produced by ingest and are ignored if present in hand-edited metadata.
    pub fn numeric_view(&self) -> NumericView<'_> {
        let mut view = NumericView::default();
        for scene in &self.scenes {
            match (scene.scene_number, &scene.content) {
                (SceneNumber::Number(n), SceneContent::Text { content }) => {
                    view.groups.entry(n).or_default().texts.push(content);
                }
                (SceneNumber::Number(n), SceneContent::Image(image)) => {
                    view.groups.entry(n).or_default().image = Some(image);
                }
                (SceneNumber::Additional, SceneContent::Text { content }) => {
                    view.additional.push(content);
                }
                (SceneNumber::Additional, SceneContent::Image(_)) => {}
            }
        }
        view
    }

    /// Count of image scenes, used as the fallback for `num_scenes` when
    /// reconstructing a story without metadata.
    pub fn image_count(&self) -> usize {
        self.scenes.iter().filter(|s| s.is_image()).count()
    }
}

/// One integer scene number's worth of content.
#[derive(Debug, Default)]
pub struct SceneGroup<'a> {
    pub image: Option<&'a ImageFile>,
    /// Text fragments in arrival order. Concatenation (with paragraph
    /// breaks) happens at render time, never in the model.
    pub texts: Vec<&'a str>,
}

impl SceneGroup<'_> {
    /// True when there is nothing to render: no image and no non-blank text.
    pub fn is_blank(&self) -> bool {
        self.image.is_none() && self.texts.iter().all(|t| t.trim().is_empty())
    }
}

/// Sorted projection of a [`Story`], the contract every renderer consumes.
#[derive(Debug, Default)]
pub struct NumericView<'a> {
    /// Integer scene numbers in ascending order.
    pub groups: BTreeMap<u32, SceneGroup<'a>>,
    /// Overflow text, rendered after every integer scene.
    pub additional: Vec<&'a str>,
}

impl<'a> NumericView<'a> {
    /// Integer scenes worth rendering, ascending. Numbers with neither an
    /// image nor any non-blank text are skipped.
    pub fn renderable(&self) -> impl Iterator<Item = (u32, &SceneGroup<'a>)> {
        self.groups
            .iter()
            .filter(|(_, group)| !group.is_blank())
            .map(|(n, group)| (*n, group))
    }
}
