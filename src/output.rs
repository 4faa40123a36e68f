//! CLI output formatting.
//!
//! Output is information-centric, not file-centric: the primary display for
//! a story is its semantic shape — scene numbers, what each scene holds —
//! with filenames as indented `Source:` context lines.
//!
//! ```text
//! Story: A Cat's Grand Adventure
//!     Model: gemini-2.0-flash-preview-image-generation
//!     Generated: 2025-06-07 18:33:12
//! 001 Scene 1 (image + 2 texts)
//!     Source: scene_01.png
//! 002 Scene 2 (image + 1 text)
//!     Source: scene_02.png
//! Additional: 1 overflow fragment
//! ```
//!
//! Each concern has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::types::Story;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{pos:0>3}")
}

/// Indentation: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Summarize a story: header lines plus one entry per numbered scene.
pub fn format_story_summary(story: &Story) -> Vec<String> {
    let mut lines = vec![
        format!("Story: {}", story.original_prompt),
        format!("{}Model: {}", indent(1), story.model),
        format!("{}Generated: {}", indent(1), story.generated_at),
    ];

    let view = story.numeric_view();
    for (position, (number, group)) in view.renderable().enumerate() {
        let mut parts = Vec::new();
        if group.image.is_some() {
            parts.push("image".to_string());
        }
        if !group.texts.is_empty() {
            parts.push(plural(group.texts.len(), "text"));
        }
        lines.push(format!(
            "{} Scene {} ({})",
            format_index(position + 1),
            number,
            parts.join(" + ")
        ));
        if let Some(image) = group.image {
            lines.push(format!("{}Source: {}", indent(1), image.filename));
        }
    }

    if !view.additional.is_empty() {
        lines.push(format!(
            "Additional: {}",
            plural(view.additional.len(), "overflow fragment")
        ));
    }

    lines
}

/// List the artifact files a pipeline run produced.
pub fn format_artifacts(written: &[&Path]) -> Vec<String> {
    let mut lines = vec!["Artifacts".to_string()];
    for path in written {
        lines.push(format!("{}{}", indent(1), path.display()));
    }
    lines
}

/// One line per story directory for the `list` subcommand.
pub fn format_list_line(index: usize, name: &str, images: usize, has_metadata: bool) -> String {
    let metadata = if has_metadata { "" } else { "  [no metadata]" };
    format!(
        "{} {} ({}){}",
        format_index(index),
        name,
        plural(images, "image"),
        metadata
    )
}

pub fn print_story_summary(story: &Story) {
    for line in format_story_summary(story) {
        println!("{line}");
    }
}

pub fn print_artifacts(written: &[&Path]) {
    for line in format_artifacts(written) {
        println!("{line}");
    }
}
