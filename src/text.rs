//! Centralized story-text cleanup.
//!
//! Both renderers apply the same fragment rules — paragraph splitting on
//! blank lines, scene-label stripping, and the lightweight `**bold**` marker
//! convention — so the rules live in one place and the renderers only differ
//! in what they do with the result (display converts the first bold pair to
//! emphasis, print strips the markers entirely).
//!
//! The bold handling is deliberately **not** a markdown processor: exactly
//! one well-formed `**…**` pair per paragraph is recognized, everything else
//! passes through untouched.

/// Split a text fragment into non-blank paragraphs on blank-line breaks.
pub fn split_paragraphs(content: &str) -> impl Iterator<Item = &str> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Strip a redundant scene label from the start of a paragraph.
///
/// The model sometimes echoes its own scene heading (`Scene 3: …` or
/// `**Scene 3:** …`) inside the fragment text; the renderers emit their own
/// label, so the echo is removed. Only an exact label for the paragraph's own
/// scene number is stripped.
pub fn strip_scene_label(paragraph: &str, number: u32) -> &str {
    let paragraph = paragraph.trim();
    let bold_label = format!("**Scene {number}:**");
    if let Some(rest) = paragraph.strip_prefix(&bold_label) {
        return rest.trim_start();
    }
    let label = format!("Scene {number}:");
    if let Some(rest) = paragraph.strip_prefix(&label) {
        return rest.trim_start();
    }
    paragraph
}

/// A paragraph with its first well-formed bold pair located.
#[derive(Debug, PartialEq, Eq)]
pub enum Emphasis<'a> {
    /// No complete `**…**` pair; the text is emitted as-is (including any
    /// unpaired marker).
    Plain(&'a str),
    /// First pair split out. Later markers stay literal.
    Bold {
        before: &'a str,
        bold: &'a str,
        after: &'a str,
    },
}

/// Locate the first well-formed `**…**` pair in a paragraph.
pub fn first_bold(paragraph: &str) -> Emphasis<'_> {
    let Some(open) = paragraph.find("**") else {
        return Emphasis::Plain(paragraph);
    };
    let inner_start = open + 2;
    let Some(close_rel) = paragraph[inner_start..].find("**") else {
        return Emphasis::Plain(paragraph);
    };
    let close = inner_start + close_rel;
    Emphasis::Bold {
        before: &paragraph[..open],
        bold: &paragraph[inner_start..close],
        after: &paragraph[close + 2..],
    }
}

/// Remove every `**` marker. Print output relies on typographic conventions
/// instead of inline emphasis markup.
pub fn strip_bold_markers(paragraph: &str) -> String {
    paragraph.replace("**", "")
}

/// Truncate to at most `max` characters without splitting a multi-byte char.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
