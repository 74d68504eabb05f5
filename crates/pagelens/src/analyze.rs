use pagelayout::render::markdown::render_page;
use pagelayout::viewer::PageViewer;
use pagelayout::PageResult;

use crate::input::{load_config, load_document};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Format {
    Json,
    Markdown,
}

#[derive(Debug, clap::Args, Clone)]
pub struct AnalyzeOptions {
    /// JSON page dump produced by the rendering service
    pub input: std::path::PathBuf,

    /// Page to analyze (1-indexed); every page when omitted
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Display scale (defaults to the configured scale)
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: Format,

    /// Run embedded images through tesseract
    #[arg(long)]
    pub ocr: bool,
}

pub fn run(options: AnalyzeOptions, global: crate::Global) -> Result<()> {
    let config = load_config(&global)?;
    let doc = load_document(&options.input)?;
    let recognizer = crate::ocr::recognizer(options.ocr)?;

    let pages: Vec<usize> = match options.page {
        Some(page) => vec![page],
        None => (1..=doc.pages.len()).collect(),
    };

    let mut viewer = PageViewer::new(doc, config, recognizer.as_ref());
    if let Some(scale) = options.scale {
        viewer.set_scale(scale)?;
    }

    if global.verbose {
        eprintln!(
            "Analyzing {} of {} pages at scale {}",
            pages.len(),
            viewer.page_count(),
            viewer.scale()
        );
    }

    let results = analyze_pages(&mut viewer, &pages)?;

    match options.format {
        Format::Json => {
            if let [single] = results.as_slice() {
                println!("{}", serde_json::to_string_pretty(single)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        Format::Markdown => println!("{}", markdown(&results)),
    }

    Ok(())
}

/// Analyze each requested page, in order.
fn analyze_pages(viewer: &mut PageViewer<'_>, pages: &[usize]) -> Result<Vec<PageResult>> {
    let mut results = Vec::with_capacity(pages.len());
    for &page in pages {
        viewer.go_to_page(page)?;
        let result = viewer
            .analysis()
            .cloned()
            .ok_or_else(|| eyre!("Page {page} could not be analyzed"))?;
        results.push(result);
    }
    Ok(results)
}

fn markdown(results: &[PageResult]) -> String {
    results
        .iter()
        .map(|page| f!("<!-- page {} -->\n\n{}", page.page_number, render_page(page)))
        .collect::<Vec<_>>()
        .join("\n\n")
}
