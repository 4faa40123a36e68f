//! # Picturebook
//!
//! Turns AI-generated story output — an interleaved stream of narrative
//! text and image parts — into a persistent story document, renders it as
//! shareable HTML and PDF artifacts, and can reconstruct the document from
//! those artifacts when the canonical metadata is lost.
//!
//! # Architecture: One Model, Two Renderers, One Extractor
//!
//! ```text
//! producer parts ─▶ ingest ─▶ Story ─┬─▶ display ─▶ {prompt}_story.html
//!                     │              └─▶ print ───▶ {prompt}_print.html ─▶ pdf
//!                     ▼
//!              scene_{NN}.png, story_metadata.json
//!
//! legacy HTML ─▶ extract ─▶ Story            (metadata lost)
//! scene_*.png ─▶ store    ─▶ Story            (everything else lost)
//! ```
//!
//! The [`types::Story`] model is the hinge: ingest builds it, both
//! renderers consume it through the same derived numeric view, and the
//! extractor rebuilds it from display HTML. Keeping the model as a raw
//! arrival-order list with an on-demand sorted projection (rather than a
//! map keyed by scene number) preserves duplicate text fragments per scene
//! — collapsing them would silently lose content.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Scene/Story model and the numeric view every renderer consumes |
//! | [`ingest`] | Producer part list → Story, persisting scene images |
//! | [`display`] | Story → interactive HTML artifact |
//! | [`print`] | Story → pagination-aware HTML artifact |
//! | [`extract`] | Display HTML → Story, resilient scraping with fallbacks |
//! | [`text`] | Centralized paragraph/bold/scene-label cleanup shared by the renderers |
//! | [`naming`] | Safe-filename derivation and artifact names |
//! | [`store`] | Metadata snapshot persistence + layered story recovery |
//! | [`pdf`] | External layout-engine seam (WeasyPrint behind a trait) |
//! | [`config`] | `config.toml` loading and validation |
//! | [`output`] | CLI output formatting — pure `format_*` functions |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! Both artifacts are generated with [Maud](https://maud.lambda.xyz/):
//! malformed HTML is a build error, template variables are Rust
//! expressions, and interpolation is auto-escaped — prompts and model
//! output can never inject markup. There is no template directory to ship
//! or drift out of sync with the extractor.
//!
//! ## Two Renderers, Not One With Flags
//!
//! The display and print artifacts differ structurally (cover page, TOC,
//! per-page scenes, bold handling), not just in styling. A single renderer
//! with a mode flag would braid the differences through every function;
//! two small renderers over one shared cleanup module ([`text`]) keeps
//! each readable and lets them evolve independently while the fragment
//! rules stay consistent by construction.
//!
//! ## Scraping as a First-Class Citizen
//!
//! Stories outlive their metadata: directories get copied around, JSON
//! files get deleted, old renderer versions produced slightly different
//! markup. The extractor therefore treats every recovery step as optional
//! and layers heuristics (dedicated elements → emphasis blocks → leaf
//! text) instead of asserting one true shape. The last-resort
//! reconstruction from bare image files lives in [`store`], not in the
//! extractor — it isn't extraction, it's salvage.
//!
//! ## External Pagination
//!
//! PDF layout is hard and solved elsewhere. The print renderer guarantees
//! a CSS contract (forced page breaks, image height bounds, serif print
//! font) and [`pdf`] hands the artifact to a WeasyPrint subprocess behind
//! a trait. No engine installed means HTML-only output, not failure.

pub mod config;
pub mod display;
pub mod extract;
pub mod ingest;
pub mod naming;
pub mod output;
pub mod pdf;
pub mod print;
pub mod store;
pub mod text;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
