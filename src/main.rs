use clap::{Parser, Subcommand};
use picturebook::ingest::{FailureCategory, GeneratedPart};
use picturebook::types::Story;
use picturebook::{config, display, extract, ingest, naming, output, pdf, print, store};
use serde::Deserialize;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "picturebook")]
#[command(about = "Turn AI-generated story output into picture-book artifacts")]
#[command(long_about = "\
Turn AI-generated story output into picture-book artifacts

A story directory is the unit of work. Ingestion creates one from a
generation parts file; every other command recovers the story from
whatever the directory still holds, preferring the metadata snapshot:

  generated_stories/story_20250607_183300/
  ├── story_metadata.json            # Canonical snapshot (source of truth)
  ├── scene_01.png                   # Scene images, in counter order
  ├── scene_02.png
  ├── A_robot_learning_story.html    # Display artifact (browser)
  ├── A_robot_learning_print.html    # Print artifact (paginated)
  └── A_robot_learning_print.pdf     # Via the external layout engine

Recovery priority when the snapshot is missing:
  story_metadata.json → display HTML extraction → scene images only

Run 'picturebook gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a generation parts file into a new story directory
    Ingest(IngestArgs),
    /// Re-render both HTML artifacts for an existing story directory
    Render {
        /// Story directory to render
        story_dir: PathBuf,
    },
    /// Regenerate print artifacts (HTML + PDF), recovering the story first
    Regenerate {
        /// Story directory to regenerate
        story_dir: PathBuf,
    },
    /// Reverse-extract story metadata from a display HTML artifact
    Extract {
        /// Display HTML file to parse
        html_file: PathBuf,
        /// Where to write the recovered metadata (default: alongside the HTML)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List story directories under the output root
    List {
        /// Stories root (default: output_root from config)
        root: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct IngestArgs {
    /// JSON parts file: an array of {"text": ...} / {"image": "<path>"} entries
    #[arg(long)]
    parts: PathBuf,

    /// The story prompt the parts were generated from
    #[arg(long)]
    prompt: String,

    /// Requested scene count (default: num_scenes from config)
    #[arg(long)]
    scenes: Option<u32>,

    /// Story directory (default: timestamped directory under output_root)
    #[arg(long)]
    out: Option<PathBuf>,
}

/// One entry of the parts file. Both fields optional so malformed producer
/// output stays representable and flows through ingest's skip handling.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PartSpec {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config_dir)?;

    match cli.command {
        Command::Ingest(args) => run_ingest(args, &cfg),
        Command::Render { story_dir } => run_render(&story_dir),
        Command::Regenerate { story_dir } => run_regenerate(&story_dir, &cfg),
        Command::Extract { html_file, out } => run_extract(&html_file, out),
        Command::List { root } => run_list(root.as_deref().unwrap_or(&cfg.output_root)),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    }
}

fn run_ingest(args: IngestArgs, cfg: &config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let parts = load_parts(&args.parts)?;
    let num_scenes = args.scenes.unwrap_or(cfg.num_scenes);
    let story_dir = args.out.unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        cfg.output_root.join(format!("story_{stamp}"))
    });

    let story = match ingest::ingest(parts, &args.prompt, num_scenes, &cfg.model, &story_dir) {
        Ok(story) => story,
        Err(err) => {
            let category = FailureCategory::classify(&err.to_string());
            eprintln!("Ingestion failed ({category}): {}", category.hint());
            return Err(err.into());
        }
    };

    store::save_metadata(&story, &story_dir)?;
    let (display_path, print_path) = write_html_artifacts(&story, &story_dir)?;
    let pdf_path = pdf::write_pdf(
        &pdf::WeasyPrint::new(&cfg.pdf_engine),
        &print_path,
        &story_dir,
        &story.original_prompt,
    )?;

    output::print_story_summary(&story);
    let mut artifacts: Vec<&Path> = vec![display_path.as_path(), print_path.as_path()];
    if let Some(pdf_path) = &pdf_path {
        artifacts.push(pdf_path.as_path());
    }
    output::print_artifacts(&artifacts);
    Ok(())
}

fn run_render(story_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let story = store::recover_story(story_dir)?;
    let (display_path, print_path) = write_html_artifacts(&story, story_dir)?;
    output::print_story_summary(&story);
    output::print_artifacts(&[display_path.as_path(), print_path.as_path()]);
    Ok(())
}

fn run_regenerate(
    story_dir: &Path,
    cfg: &config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let story = store::recover_story(story_dir)?;
    let print_path = story_dir.join(naming::print_html_name(&story.original_prompt));
    fs::write(&print_path, print::render_print(&story))?;
    let pdf_path = pdf::write_pdf(
        &pdf::WeasyPrint::new(&cfg.pdf_engine),
        &print_path,
        story_dir,
        &story.original_prompt,
    )?;

    let mut artifacts: Vec<&Path> = vec![print_path.as_path()];
    if let Some(pdf_path) = &pdf_path {
        artifacts.push(pdf_path.as_path());
    }
    output::print_artifacts(&artifacts);
    Ok(())
}

fn run_extract(html_file: &Path, out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let content = fs::read_to_string(html_file)?;
    let Some(story) = extract::extract_story(&content) else {
        return Err(format!("no parseable scenes in {}", html_file.display()).into());
    };

    let out = out.unwrap_or_else(|| {
        html_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(naming::METADATA_FILE)
    });
    fs::write(&out, serde_json::to_string_pretty(&story)?)?;

    output::print_story_summary(&story);
    output::print_artifacts(&[out.as_path()]);
    Ok(())
}

fn run_list(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut index = 0;
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let dir = entry.path();
        let images = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                name.starts_with("scene_") && name.ends_with(".png")
            })
            .count();
        let has_metadata = dir.join(naming::METADATA_FILE).exists();
        if images == 0 && !has_metadata {
            continue;
        }
        index += 1;
        println!(
            "{}",
            output::format_list_line(
                index,
                &entry.file_name().to_string_lossy(),
                images,
                has_metadata
            )
        );
    }
    if index == 0 {
        println!("No story directories under {}", root.display());
    }
    Ok(())
}

/// Read a parts file into producer parts, inlining referenced image bytes.
fn load_parts(path: &Path) -> Result<Vec<GeneratedPart>, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let entries: Vec<PartSpec> = serde_json::from_str(&content)?;
    let mut parts = Vec::with_capacity(entries.len());
    for entry in entries {
        let part = match (entry.text, entry.image) {
            (Some(text), _) => GeneratedPart::text(text),
            (None, Some(image_path)) => GeneratedPart::image(fs::read(&image_path)?),
            (None, None) => GeneratedPart::empty(),
        };
        parts.push(part);
    }
    Ok(parts)
}

fn write_html_artifacts(
    story: &Story,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), std::io::Error> {
    let display_path = dir.join(naming::display_html_name(&story.original_prompt));
    fs::write(&display_path, display::render_display(story))?;
    let print_path = dir.join(naming::print_html_name(&story.original_prompt));
    fs::write(&print_path, print::render_print(story))?;
    Ok((display_path, print_path))
}
