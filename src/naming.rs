//! Centralized artifact naming for story directories.
//!
//! Every file a story produces derives its name here, from one of two roots:
//!
//! - The **prompt base**: the user's story prompt reduced to a
//!   filesystem-safe token ([`safe_prompt_base`]), shared by the display
//!   HTML, print HTML, and PDF artifacts.
//! - The **scene counter**: zero-padded image names ([`scene_image_name`]).
//!
//! ## Prompt sanitization
//!
//! The prompt is clipped to its first 30 characters, characters outside
//! alphanumerics/space/hyphen/underscore are dropped, space runs collapse to
//! one, trailing whitespace is trimmed, and spaces become underscores:
//!
//! - `"A Cat's : Grand Adventure!!"` → `A_Cats_Grand_Adventure`
//! - `"A robot learning to paint"` → `A_robot_learning_to_paint`
//!
//! The derivation is idempotent (already-sanitized input is a fixed point).
//! Distinct prompts sharing a 30-character prefix collide — accepted, the
//! story directory disambiguates.

/// Canonical metadata file name inside a story directory.
pub const METADATA_FILE: &str = "story_metadata.json";

/// Reduce a story prompt to a filesystem-safe artifact base.
///
/// Falls back to `story` when nothing survives sanitization.
pub fn safe_prompt_base(prompt: &str) -> String {
    let kept: String = prompt
        .chars()
        .take(30)
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    // Collapse space runs left behind by dropped characters.
    let mut collapsed = String::with_capacity(kept.len());
    let mut prev_space = false;
    for c in kept.chars() {
        if c == ' ' {
            if !prev_space {
                collapsed.push(' ');
            }
            prev_space = true;
        } else {
            collapsed.push(c);
            prev_space = false;
        }
    }

    let base = collapsed.trim_end().replace(' ', "_");
    if base.is_empty() {
        "story".to_string()
    } else {
        base
    }
}

/// `{safe_prompt}_story.html` — the display artifact.
pub fn display_html_name(prompt: &str) -> String {
    format!("{}_story.html", safe_prompt_base(prompt))
}

/// `{safe_prompt}_print.html` — the print artifact.
pub fn print_html_name(prompt: &str) -> String {
    format!("{}_print.html", safe_prompt_base(prompt))
}

/// `{safe_prompt}_print.pdf` — the paginated artifact.
pub fn print_pdf_name(prompt: &str) -> String {
    format!("{}_print.pdf", safe_prompt_base(prompt))
}

/// `scene_{NN}.png` — zero-padded to keep lexical and numeric order aligned
/// for the first 99 scenes.
pub fn scene_image_name(number: u32) -> String {
    format!("scene_{number:02}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_stripped_and_spaces_collapse() {
        assert_eq!(
            safe_prompt_base("A Cat's : Grand Adventure!!"),
            "A_Cats_Grand_Adventure"
        );
    }

    #[test]
    fn plain_prompt_keeps_words() {
        assert_eq!(
            safe_prompt_base("A robot learning to paint"),
            "A_robot_learning_to_paint"
        );
    }

    #[test]
    fn prompt_is_clipped_to_thirty_chars() {
        let base = safe_prompt_base("A brave explorer discovering magical creatures");
        assert_eq!(base, "A_brave_explorer_discovering_m");
        assert!(base.chars().count() <= 30);
    }

    #[test]
    fn derivation_is_idempotent() {
        let once = safe_prompt_base("A Cat's : Grand Adventure!!");
        assert_eq!(safe_prompt_base(&once), once);

        let plain = safe_prompt_base("dragons and castles");
        assert_eq!(safe_prompt_base(&plain), plain);
    }

    #[test]
    fn hyphens_and_underscores_survive() {
        assert_eq!(safe_prompt_base("sci-fi_story one"), "sci-fi_story_one");
    }

    #[test]
    fn empty_sanitization_falls_back() {
        assert_eq!(safe_prompt_base("!!!???"), "story");
        assert_eq!(safe_prompt_base(""), "story");
    }

    #[test]
    fn unicode_letters_are_kept() {
        assert_eq!(safe_prompt_base("日本の物語"), "日本の物語");
    }

    #[test]
    fn artifact_names_share_the_base() {
        let prompt = "A Cat's : Grand Adventure!!";
        assert_eq!(
            display_html_name(prompt),
            "A_Cats_Grand_Adventure_story.html"
        );
        assert_eq!(
            print_html_name(prompt),
            "A_Cats_Grand_Adventure_print.html"
        );
        assert_eq!(print_pdf_name(prompt), "A_Cats_Grand_Adventure_print.pdf");
    }

    #[test]
    fn scene_names_are_zero_padded() {
        assert_eq!(scene_image_name(1), "scene_01.png");
        assert_eq!(scene_image_name(42), "scene_42.png");
        assert_eq!(scene_image_name(120), "scene_120.png");
    }
}
