use colored::Colorize;
use pagelayout::content::{ContentView, PageTable};
use pagelayout::images::NoRecognizer;
use pagelayout::process_document;

use crate::input::{load_config, load_document};
use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args, Clone)]
pub struct TablesOptions {
    /// JSON page dump produced by the rendering service
    pub input: std::path::PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(options: TablesOptions, global: crate::Global) -> Result<()> {
    let config = load_config(&global)?;
    let doc = load_document(&options.input)?;

    let result = process_document(&doc, &config, &NoRecognizer);
    let tables = ContentView::build(&doc, &result, &config).tables;

    if global.verbose {
        eprintln!(
            "Scanned {} pages in windows of {} tokens",
            doc.pages.len(),
            config.window_size
        );
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        print_tables(&tables);
    }

    Ok(())
}

/// Print each table under a page/offset caption.
pub fn print_tables(tables: &[PageTable]) {
    if tables.is_empty() {
        println!("{}", "No tables found".yellow());
        return;
    }

    for table in tables {
        let (min, max) = table.grid.column_range();
        let columns = if min == max {
            f!("{max} columns")
        } else {
            f!("{min}-{max} columns")
        };
        println!(
            "{} {}",
            f!("Page {}, token {}:", table.page_number, table.offset).bold(),
            f!("{} rows, {columns}", table.grid.row_count()).dimmed()
        );

        let mut out = new_table();
        for row in &table.grid.rows {
            out.add_row(prettytable::Row::new(
                row.iter().map(|cell| prettytable::Cell::new(cell)).collect(),
            ));
        }
        out.printstd();
        println!();
    }
}
