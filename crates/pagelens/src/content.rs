use colored::Colorize;
use pagelayout::content::{ContentType, ContentView, PageParagraph};
use pagelayout::images::NoRecognizer;
use pagelayout::process_document;

use crate::input::{load_config, load_document};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct ContentOptions {
    /// JSON page dump produced by the rendering service
    pub input: std::path::PathBuf,

    /// Content to extract: tables, paragraphs or text
    #[arg(long = "type", value_name = "TYPE")]
    pub content_type: ContentType,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(options: ContentOptions, global: crate::Global) -> Result<()> {
    let config = load_config(&global)?;
    let doc = load_document(&options.input)?;

    if global.verbose {
        eprintln!("Extracting {} from {}", options.content_type, options.input.display());
    }

    let result = process_document(&doc, &config, &NoRecognizer);
    let view = ContentView::build(&doc, &result, &config).select(options.content_type);

    if options.json {
        let json = match options.content_type {
            ContentType::Tables => serde_json::to_string_pretty(&view.tables)?,
            ContentType::Paragraphs => serde_json::to_string_pretty(&view.paragraphs)?,
            ContentType::Text => serde_json::to_string_pretty(&view.text)?,
        };
        println!("{json}");
        return Ok(());
    }

    match options.content_type {
        ContentType::Tables => crate::tables::print_tables(&view.tables),
        ContentType::Paragraphs => print_paragraphs(&view.paragraphs),
        ContentType::Text => println!("{}", view.text.trim_end()),
    }

    Ok(())
}

fn print_paragraphs(paragraphs: &[PageParagraph]) {
    if paragraphs.is_empty() {
        println!("{}", "No paragraphs found".yellow());
        return;
    }

    for paragraph in paragraphs {
        println!(
            "{}",
            f!(
                "Page {} (font size {:.1})",
                paragraph.page_number, paragraph.font_size
            )
            .bold()
        );
        println!("{}\n", paragraph.text);
    }
}
