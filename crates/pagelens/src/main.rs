use crate::prelude::*;
use clap::Parser;

mod analyze;
mod content;
mod error;
mod hit;
mod input;
mod ocr;
mod prelude;
mod tables;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Reconstruct and inspect the layout of rendered document pages"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file overriding the layout heuristics
    #[clap(long, env = "PAGELENS_CONFIG", global = true)]
    config: Option<std::path::PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "PAGELENS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Analyze the layout of one or every page
    #[clap(name = "analyze")]
    Analyze(crate::analyze::AnalyzeOptions),

    /// Scan every page for tables
    #[clap(name = "tables")]
    Tables(crate::tables::TablesOptions),

    /// Extract one type of content from the whole document
    #[clap(name = "content")]
    Content(crate::content::ContentOptions),

    /// Report the block found at a vertical position of a page
    #[clap(name = "hit")]
    Hit(crate::hit::HitOptions),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Analyze(options) => crate::analyze::run(options, app.global),
        SubCommands::Tables(options) => crate::tables::run(options, app.global),
        SubCommands::Content(options) => crate::content::run(options, app.global),
        SubCommands::Hit(options) => crate::hit::run(options, app.global),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
