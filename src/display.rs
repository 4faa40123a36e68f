//! Interactive HTML rendering — the display artifact.
//!
//! Serializes a [`Story`] into a single self-contained HTML document for
//! browser viewing: header, story-details block, one container per integer
//! scene number (ascending), the additional bucket last, and a footer with
//! the generation facts. CSS is embedded at compile time.
//!
//! Rendering is pure: the same story always produces byte-identical output.
//! The structure is also a contract — [`crate::extract`] reconstructs
//! stories from these documents, keyed on the `scene` / `scene-number` /
//! `scene-image` / `scene-text` / `generated-info` classes and the literal
//! `Model:` / `Generated on:` footer labels. Change markup here and the
//! extractor's heuristics must keep degrading gracefully.
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/): compile-time
//! checked templates with auto-escaped interpolation, so prompt or model
//! text can never inject markup.

use crate::text::{self, Emphasis};
use crate::types::{SceneGroup, Story};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/display.css");

/// Render the display artifact for a story.
pub fn render_display(story: &Story) -> String {
    document(story).into_string()
}

fn document(story: &Story) -> Markup {
    let view = story.numeric_view();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Custom AI Story - " (story.original_prompt) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.header {
                    h1 { "Custom AI Story" }
                    h2 { "\"" (story.original_prompt) "\"" }
                }
                (story_info(story))
                @for (number, group) in view.renderable() {
                    (scene_block(number, group))
                }
                @for content in view.additional.iter() {
                    (additional_block(content))
                }
                (footer_block(story))
            }
        }
    }
}

fn story_info(story: &Story) -> Markup {
    html! {
        div.story-info {
            h3 { "Story Details:" }
            ul {
                li { strong { "Original Prompt:" } " " (story.original_prompt) }
                li { strong { "Scenes Requested:" } " " (story.num_scenes) }
                li { strong { "Total Parts Generated:" } " " (story.total_parts) }
                li { strong { "Generated:" } " " (story.generated_at) }
                li { strong { "Model:" } " " (story.model) }
            }
        }
    }
}

fn scene_block(number: u32, group: &SceneGroup) -> Markup {
    html! {
        div.scene {
            div.scene-number { "Scene " (number) }
            @if let Some(image) = group.image {
                img.scene-image src=(image.filename) alt={ "Scene " (number) };
                @if let Some((width, height)) = image.dimensions {
                    div.debug-info { "Image size: " (width) "x" (height) }
                }
            }
            @for fragment in &group.texts {
                @for paragraph in text::split_paragraphs(fragment) {
                    (paragraph_block(number, paragraph))
                }
            }
        }
    }
}

/// One paragraph: scene-label echo stripped, first `**…**` pair rendered as
/// emphasis, anything else literal.
fn paragraph_block(number: u32, paragraph: &str) -> Markup {
    let cleaned = text::strip_scene_label(paragraph, number);
    if cleaned.is_empty() {
        return html! {};
    }
    match text::first_bold(cleaned) {
        Emphasis::Plain(content) => html! {
            div.scene-text { (content) }
        },
        Emphasis::Bold {
            before,
            bold,
            after,
        } => html! {
            div.scene-text { (before) strong { (bold) } (after) }
        },
    }
}

/// Overflow text keeps one container per fragment, after every numbered
/// scene.
fn additional_block(content: &str) -> Markup {
    html! {
        div.scene {
            div.scene-number { "Additional Content" }
            div.scene-text { (content) }
        }
    }
}

fn footer_block(story: &Story) -> Markup {
    html! {
        div.generated-info {
            p { "Generated on: " (story.generated_at) }
            p { "Model: " (story.model) }
            p { "Total Parts: " (story.total_parts) }
            p { "Created with Google Gemini AI" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{image_scene, sample_story, story_with, text_scene};
    use crate::types::{Scene, SceneNumber};

    fn scene_container_count(html: &str) -> usize {
        html.matches("<div class=\"scene\">").count()
    }

    #[test]
    fn rendering_is_deterministic() {
        let story = sample_story();
        assert_eq!(render_display(&story), render_display(&story));
    }

    #[test]
    fn scenes_group_into_numbered_containers() {
        let story = story_with(vec![
            text_scene(1, "Scene 1 intro"),
            image_scene(1, "scene_01.png"),
            text_scene(2, "Scene 2 intro"),
            image_scene(2, "scene_02.png"),
        ]);
        let html = render_display(&story);
        assert_eq!(scene_container_count(&html), 2);
        assert!(html.contains("Scene 1"));
        assert!(html.contains("Scene 2"));
        assert!(html.contains("src=\"scene_01.png\""));
        assert!(html.contains("src=\"scene_02.png\""));
    }

    #[test]
    fn scene_order_is_numeric_not_arrival() {
        let story = story_with(vec![
            text_scene(3, "third"),
            text_scene(1, "first"),
            text_scene(2, "second"),
        ]);
        let html = render_display(&story);
        let first = html.find("first").unwrap();
        let second = html.find("second").unwrap();
        let third = html.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn additional_content_renders_after_numbered_scenes() {
        let story = story_with(vec![
            Scene::text(SceneNumber::Additional, "the epilogue"),
            text_scene(1, "the opening"),
        ]);
        let html = render_display(&story);
        let opening = html.find("the opening").unwrap();
        let epilogue = html.find("the epilogue").unwrap();
        assert!(opening < epilogue);
        assert!(html.contains("Additional Content"));
    }

    #[test]
    fn paragraphs_become_separate_text_blocks() {
        let story = story_with(vec![text_scene(1, "First paragraph.\n\nSecond paragraph.")]);
        let html = render_display(&story);
        assert_eq!(html.matches("class=\"scene-text\"").count(), 2);
    }

    #[test]
    fn first_bold_pair_becomes_emphasis() {
        let story = story_with(vec![text_scene(1, "A **brave** fox met **another** fox.")]);
        let html = render_display(&story);
        assert!(html.contains("<strong>brave</strong>"));
        // Only the first pair converts; later markers stay literal.
        assert!(html.contains("**another**"));
    }

    #[test]
    fn scene_label_echo_is_stripped() {
        let story = story_with(vec![text_scene(2, "**Scene 2:** The chase begins.")]);
        let html = render_display(&story);
        assert!(html.contains("The chase begins."));
        assert!(!html.contains("<strong>Scene 2:</strong>"));
    }

    #[test]
    fn image_dimensions_appear_as_debug_info() {
        let story = sample_story();
        let html = render_display(&story);
        assert!(html.contains("class=\"debug-info\""));
        assert!(html.contains("Image size: 2x2"));
    }

    #[test]
    fn story_details_and_footer_carry_metadata_labels() {
        let story = sample_story();
        let html = render_display(&story);
        assert!(html.contains("Scenes Requested:"));
        assert!(html.contains("Generated on: "));
        assert!(html.contains(&format!("Model: {}", story.model)));
    }

    #[test]
    fn prompt_markup_is_escaped() {
        let mut story = sample_story();
        story.original_prompt = "<script>alert('x')</script>".to_string();
        let html = render_display(&story);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn blank_scene_is_not_rendered() {
        let story = story_with(vec![text_scene(1, "real"), text_scene(5, "   ")]);
        let html = render_display(&story);
        assert_eq!(scene_container_count(&html), 1);
        assert!(!html.contains("Scene 5"));
    }
}
