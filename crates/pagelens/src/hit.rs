use colored::Colorize;
use pagelayout::viewer::{PageViewer, Selection};
use pagelayout::BlockKind;

use crate::input::{load_config, load_document};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct HitOptions {
    /// JSON page dump produced by the rendering service
    pub input: std::path::PathBuf,

    /// Vertical position in display space (top-left origin)
    #[arg(long, allow_hyphen_values = true)]
    pub y: f64,

    /// Page to query (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Display scale (defaults to the configured scale)
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// Run embedded images through tesseract
    #[arg(long)]
    pub ocr: bool,
}

pub fn run(options: HitOptions, global: crate::Global) -> Result<()> {
    let config = load_config(&global)?;
    let doc = load_document(&options.input)?;
    let recognizer = crate::ocr::recognizer(options.ocr)?;

    let mut viewer = PageViewer::new(doc, config, recognizer.as_ref());
    viewer.go_to_page(options.page)?;
    if let Some(scale) = options.scale {
        viewer.set_scale(scale)?;
    }

    if global.verbose {
        eprintln!(
            "Page {} of {} at scale {}",
            viewer.page(),
            viewer.page_count(),
            viewer.scale()
        );
    }

    match viewer.select_at(options.y) {
        Some(selection) => print_selection(&selection),
        None => println!(
            "{}",
            f!("No content at y={} on page {}", options.y, viewer.page()).yellow()
        ),
    }

    Ok(())
}

fn print_selection(selection: &Selection) {
    println!(
        "Detected Content Type: {}",
        kind_label(selection.kind).bold()
    );
    if let Some(font_size) = selection.font_size {
        println!("{}", f!("Font size: {font_size:.1}").dimmed());
    }
    println!();
    println!("{}", selection.text);
}

fn kind_label(kind: BlockKind) -> colored::ColoredString {
    let label = kind.to_string();
    match kind {
        BlockKind::Header => label.magenta(),
        BlockKind::Table => label.cyan(),
        BlockKind::Paragraph => label.green(),
        BlockKind::Text => label.normal(),
        BlockKind::Image => label.blue(),
    }
}
