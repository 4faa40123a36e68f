//! Pagination-aware HTML rendering — the print artifact.
//!
//! Serializes a [`Story`] into the second, structurally different HTML
//! variant that a downstream fixed-layout engine (see [`crate::pdf`])
//! converts to paged output. Differences from the display artifact:
//!
//! - a cover page and a story-info page, each forced onto its own page
//! - a table of contents when the numeric view holds more than 3 scenes
//! - one scene per page via `page-break-before`
//! - bold markers stripped entirely (print styling is typographic, not
//!   inline markup)
//! - timestamps shortened to whole seconds
//!
//! ## TOC page numbers are estimates
//!
//! Each entry's page is computed as cover + info + TOC + position
//! (`3 + index + 1`) and is never reconciled with the engine's actual
//! layout; a scene spilling over one physical page shifts everything after
//! it. Accepted approximation — do not "fix" it here, the fix belongs to a
//! layout engine that can report real page numbers back.

use crate::text;
use crate::types::{SceneGroup, Story};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = include_str!("../static/print.css");

/// Scenes needed before a table of contents is worth a page.
const TOC_THRESHOLD: usize = 3;

/// Render the print artifact for a story.
pub fn render_print(story: &Story) -> String {
    document(story).into_string()
}

fn document(story: &Story) -> Markup {
    let view = story.numeric_view();
    let scenes: Vec<(u32, &SceneGroup)> = view.renderable().collect();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (story.original_prompt) }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.header {
                    h1 { "AI Generated Story" }
                    h2 { "\"" (story.original_prompt) "\"" }
                }
                (story_info(story))
                @if scenes.len() > TOC_THRESHOLD {
                    (table_of_contents(&scenes))
                }
                @for (number, group) in &scenes {
                    (scene_page(*number, group))
                }
                @if !view.additional.is_empty() {
                    (additional_page(&view.additional))
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
                li { strong { "Title:" } " " (story.original_prompt) }
                li { strong { "Scenes:" } " " (story.num_scenes) }
                li { strong { "Generated:" } " " (short_timestamp(&story.generated_at)) }
                li { strong { "Model:" } " " (story.model) }
            }
        }
    }
}

fn table_of_contents(scenes: &[(u32, &SceneGroup)]) -> Markup {
    html! {
        div.toc {
            h2 { "Table of Contents" }
            @for (index, (number, group)) in scenes.iter().enumerate() {
                // Cover, info, and TOC each take one page; scenes follow.
                @let page = 3 + index + 1;
                div.toc-item {
                    span.toc-title { (toc_title(*number, group)) }
                    span.toc-page { (page) }
                }
            }
        }
    }
}

/// `Scene {n}` plus a cleaned preview of the scene's first text fragment.
fn toc_title(number: u32, group: &SceneGroup) -> String {
    let mut title = format!("Scene {number}");
    if let Some(first) = group.texts.first() {
        let cleaned = text::strip_bold_markers(text::strip_scene_label(first, number));
        let head = text::truncate_chars(&cleaned, 50).trim();
        let preview = if head.chars().count() > 30 {
            format!("{}...", text::truncate_chars(head, 30))
        } else {
            head.to_string()
        };
        title.push_str(": ");
        title.push_str(&preview);
    }
    title
}

fn scene_page(number: u32, group: &SceneGroup) -> Markup {
    html! {
        div.scene {
            div.scene-number { "Scene " (number) }
            @if let Some(image) = group.image {
                img.scene-image src=(image.filename) alt={ "Scene " (number) };
            }
            @for fragment in &group.texts {
                @for paragraph in text::split_paragraphs(fragment) {
                    @let cleaned = clean_paragraph(number, paragraph);
                    @if !cleaned.is_empty() {
                        div.scene-text { (cleaned) }
                    }
                }
            }
        }
    }
}

/// Print cleanup: drop every bold marker, then the scene-label echo.
fn clean_paragraph(number: u32, paragraph: &str) -> String {
    let unmarked = text::strip_bold_markers(paragraph);
    text::strip_scene_label(&unmarked, number).to_string()
}

/// Overflow text shares a single trailing page.
fn additional_page(additional: &[&str]) -> Markup {
    html! {
        div.scene {
            div.scene-number { "Additional Content" }
            @for content in additional {
                div.scene-text { (content) }
            }
        }
    }
}

fn footer_block(story: &Story) -> Markup {
    html! {
        div.generated-info {
            p { "Generated on: " (short_timestamp(&story.generated_at)) }
            p { "Model: " (story.model) }
            p { "Created with Google Gemini AI" }
        }
    }
}

/// Clip an ISO-8601 timestamp to whole seconds, with the `T` separator
/// shown as a space.
fn short_timestamp(generated_at: &str) -> String {
    text::truncate_chars(generated_at, 19).replace('T', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_story, story_with, text_scene};
    use crate::types::{Scene, SceneNumber};

    fn story_with_n_scenes(n: u32) -> Story {
        let scenes = (1..=n)
            .map(|i| text_scene(i, format!("Scene {i} happens here.")))
            .collect();
        story_with(scenes)
    }

    #[test]
    fn rendering_is_deterministic() {
        let story = sample_story();
        assert_eq!(render_print(&story), render_print(&story));
    }

    #[test]
    fn toc_requires_more_than_three_scenes() {
        let three = render_print(&story_with_n_scenes(3));
        assert!(!three.contains("Table of Contents"));

        let four = render_print(&story_with_n_scenes(4));
        assert!(four.contains("Table of Contents"));

        let five = render_print(&story_with_n_scenes(5));
        assert!(five.contains("Table of Contents"));
    }

    #[test]
    fn toc_pages_start_after_front_matter() {
        let html = render_print(&story_with_n_scenes(4));
        // First scene lands on page 4: cover, info, and TOC come first.
        assert!(html.contains("<span class=\"toc-page\">4</span>"));
        assert!(html.contains("<span class=\"toc-page\">7</span>"));
        assert!(!html.contains("<span class=\"toc-page\">8</span>"));
    }

    #[test]
    fn toc_titles_preview_first_text() {
        let mut story = story_with_n_scenes(4);
        story.scenes[0] = text_scene(
            1,
            "**Scene 1:** A very long opening line that should be clipped for the contents",
        );
        let html = render_print(&story);
        assert!(html.contains("Scene 1: A very long opening line that ..."));
    }

    #[test]
    fn bold_markers_are_stripped_not_converted() {
        let story = story_with(vec![text_scene(1, "A **brave** fox.")]);
        let html = render_print(&story);
        assert!(html.contains("A brave fox."));
        assert!(!html.contains("<strong>brave</strong>"));
        assert!(!html.contains("**"));
    }

    #[test]
    fn scene_label_echo_is_stripped() {
        let story = story_with(vec![text_scene(3, "Scene 3: The chase begins.")]);
        let html = render_print(&story);
        assert!(html.contains("The chase begins."));
        assert!(!html.contains("Scene 3: The chase"));
    }

    #[test]
    fn additional_content_shares_one_trailing_container() {
        let story = story_with(vec![
            text_scene(1, "opening"),
            Scene::text(SceneNumber::Additional, "first extra"),
            Scene::text(SceneNumber::Additional, "second extra"),
        ]);
        let html = render_print(&story);
        assert_eq!(html.matches("Additional Content").count(), 1);
        let first = html.find("first extra").unwrap();
        let second = html.find("second extra").unwrap();
        let opening = html.find("opening").unwrap();
        assert!(opening < first && first < second);
    }

    #[test]
    fn timestamps_are_shortened() {
        let mut story = sample_story();
        story.generated_at = "2025-06-07T18:33:12.123456".to_string();
        let html = render_print(&story);
        assert!(html.contains("2025-06-07 18:33:12"));
        assert!(!html.contains("123456"));
    }

    #[test]
    fn cover_and_info_sections_present() {
        let html = render_print(&sample_story());
        assert!(html.contains("AI Generated Story"));
        assert!(html.contains("Story Details:"));
        assert!(html.contains("class=\"story-info\""));
    }

    #[test]
    fn print_differs_structurally_from_display() {
        let story = sample_story();
        let print = render_print(&story);
        assert!(print.contains("page-break-before"));
        assert!(!print.contains("debug-info"));
    }
}
