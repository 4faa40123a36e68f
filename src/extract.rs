//! Reverse extraction: display HTML back into a [`Story`].
//!
//! Invoked when a story directory has lost (or never had) its
//! `story_metadata.json`. The display artifact is the only remaining
//! structured record, so this module scrapes it — resiliently, because the
//! file may come from an older renderer version or a hand edit.
//!
//! ## Degradation ladder
//!
//! Every extraction step is independently skippable:
//!
//! - prompt, model, timestamp, and scene count fall back to defaults when
//!   their markup is missing
//! - a scene container whose number label does not parse is skipped, the
//!   rest continue (this also skips "Additional Content" containers)
//! - scene text is recovered through an ordered chain of independent
//!   heuristics, first success wins: the dedicated `scene-text` elements,
//!   then the block around emphasis markup, then raw leaf text minus label
//!   and attribute-echo lines
//!
//! Only a document with zero parseable scenes is unrecoverable: the result
//! is `None` and the caller falls back to reconstructing from the image
//! files on disk ([`crate::store`]). Nothing in here panics on foreign
//! input.
//!
//! Parsing uses html5ever's full DOM (as lenient as a browser), not string
//! matching, so attribute order, whitespace, and unclosed tags don't matter.

use crate::ingest;
use crate::text;
use crate::types::{ImageFile, Scene, SceneContent, SceneNumber, Story};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Model recorded when the source markup carries none.
const UNKNOWN_MODEL: &str = "Unknown";

/// Reconstruct a story from display-artifact HTML.
///
/// Returns `None` when nothing scene-shaped can be recovered.
pub fn extract_story(html: &str) -> Option<Story> {
    let dom = parse_dom(html)?;
    let root = &dom.document;

    let scenes = extract_scenes(root);
    if scenes.is_empty() {
        log::warn!("no parseable scene containers in source HTML");
        return None;
    }

    let original_prompt = first_element(root, |n| is_named(n, "h2"))
        .map(|h| text_content(&h).trim().trim_matches('"').to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| "Unknown Story".to_string());

    let footer_lines = first_element(root, |n| has_class(n, "generated-info"))
        .map(|f| block_lines(&f))
        .unwrap_or_default();
    let model =
        labelled_value(&footer_lines, "Model:").unwrap_or_else(|| UNKNOWN_MODEL.to_string());
    let generated_at =
        labelled_value(&footer_lines, "Generated on:").unwrap_or_else(ingest::now_timestamp);
    let total_parts = labelled_value(&footer_lines, "Total Parts:")
        .and_then(|v| v.parse().ok())
        .unwrap_or(scenes.len());

    let image_count = scenes.iter().filter(|s| s.is_image()).count() as u32;
    let num_scenes = first_element(root, |n| has_class(n, "story-info"))
        .and_then(|info| labelled_value(&block_lines(&info), "Scenes Requested:"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(image_count);

    Some(Story {
        scenes,
        generated_at,
        model,
        original_prompt,
        num_scenes,
        total_parts,
    })
}

fn parse_dom(html: &str) -> Option<RcDom> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .ok()
}

// ============================================================================
// Scene recovery
// ============================================================================

fn extract_scenes(root: &Handle) -> Vec<Scene> {
    let mut scenes = Vec::new();
    for container in elements(root, |n| has_class(n, "scene")) {
        scenes.extend(extract_scene(&container));
    }
    scenes
}

/// Recover the scenes of one container. An unparseable number label skips
/// the whole container.
fn extract_scene(container: &Handle) -> Vec<Scene> {
    let Some(number) = first_element(container, |n| has_class(n, "scene-number"))
        .and_then(|label| parse_scene_number(&text_content(&label)))
    else {
        log::debug!("skipping scene container with unparseable number label");
        return Vec::new();
    };

    let mut scenes = Vec::new();

    if let Some(src) = first_element(container, |n| {
        is_named(n, "img") && has_class(n, "scene-image")
    })
    .and_then(|img| attr(&img, "src"))
    {
        scenes.push(Scene::image(
            SceneNumber::Number(number),
            ImageFile {
                filename: src,
                path: None,
                dimensions: None,
            },
        ));
    }

    let recovered = text_from_scene_divs(container)
        .or_else(|| text_from_emphasis(container))
        .or_else(|| text_from_leaf_lines(container, number))
        .map(|t| text::strip_scene_label(&t, number).to_string())
        .filter(|t| !t.is_empty());
    if let Some(content) = recovered {
        scenes.push(Scene {
            scene_number: SceneNumber::Number(number),
            part_index: None,
            content: SceneContent::Text { content },
        });
    }

    scenes
}

/// Parse the numeric suffix of a label like `Scene 12`.
fn parse_scene_number(label: &str) -> Option<u32> {
    let trimmed = label.trim();
    let rest = trimmed.strip_prefix("Scene").unwrap_or(trimmed);
    rest.trim().parse().ok()
}

/// Primary heuristic: the dedicated `scene-text` elements, one per
/// paragraph, rejoined with paragraph breaks. When the elements exist but
/// are empty this still wins the chain — the renderer wrote them, there is
/// just no text.
fn text_from_scene_divs(container: &Handle) -> Option<String> {
    let divs = elements(container, |n| has_class(n, "scene-text"));
    if divs.is_empty() {
        return None;
    }
    let paragraphs: Vec<String> = divs
        .iter()
        .map(|d| text_content(d).trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    Some(paragraphs.join("\n\n"))
}

/// Secondary heuristic for older markup: the block element around the first
/// emphasis tag.
fn text_from_emphasis(container: &Handle) -> Option<String> {
    let strong = first_element(container, |n| is_named(n, "strong"))?;
    let parent = parent_of(&strong).filter(|p| is_named(p, "div"))?;
    let content = text_content(&parent).trim().to_string();
    (!content.is_empty()).then_some(content)
}

/// Last resort: every leaf text line except the scene label and attribute
/// echoes.
fn text_from_leaf_lines(container: &Handle, number: u32) -> Option<String> {
    let label = format!("Scene {number}");
    let text = text_content(container);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with(&label)
                && !line.starts_with("alt=")
                && !line.starts_with("Image size")
        })
        .collect();
    let joined = lines.join(" ");
    (!joined.is_empty()).then_some(joined)
}

// ============================================================================
// DOM helpers
// ============================================================================

fn walk(node: &Handle, visit: &mut impl FnMut(&Handle)) {
    visit(node);
    for child in node.children.borrow().iter() {
        walk(child, visit);
    }
}

/// Elements matching a predicate, in document order.
fn elements(root: &Handle, pred: impl Fn(&Handle) -> bool) -> Vec<Handle> {
    let mut found = Vec::new();
    walk(root, &mut |node| {
        if matches!(node.data, NodeData::Element { .. }) && pred(node) {
            found.push(node.clone());
        }
    });
    found
}

fn first_element(root: &Handle, pred: impl Fn(&Handle) -> bool) -> Option<Handle> {
    elements(root, pred).into_iter().next()
}

fn is_named(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn has_class(node: &Handle, class: &str) -> bool {
    attr(node, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    node.parent.set(weak);
    parent
}

fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// "Lines" of a block: the text of each `p`/`li` descendant, or raw text
/// lines when the block has no such children. Compact renderer output has
/// no newlines between tags, so label matching keys on elements first.
fn block_lines(node: &Handle) -> Vec<String> {
    let blocks = elements(node, |n| is_named(n, "p") || is_named(n, "li"));
    if blocks.is_empty() {
        text_content(node)
            .lines()
            .map(|l| l.trim().to_string())
            .collect()
    } else {
        blocks
            .iter()
            .map(|b| text_content(b).trim().to_string())
            .collect()
    }
}

/// First line containing `label`, with everything after the label returned
/// trimmed.
fn labelled_value(lines: &[String], label: &str) -> Option<String> {
    lines
        .iter()
        .find_map(|line| {
            line.find(label)
                .map(|pos| line[pos + label.len()..].trim().to_string())
        })
        .filter(|v| !v.is_empty())
}
