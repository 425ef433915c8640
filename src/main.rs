//! `hinario` - hymnal lyrics scraper and parser CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use hinario::config::Config;
use hinario::error::{Error, Result};
use hinario::output::RecordWriter;
use hinario::parser::{parse_document, HymnFormat};
use hinario::record::{FieldNames, HymnRecord};
use hinario::scrape::{page_to_hymn, parse_page, SiteClient};

/// Hymnal lyrics scraper and parser producing JSON and Markdown records.
#[derive(Debug, Parser)]
#[command(name = "hinario", version, about)]
struct Cli {
    /// Root directory for generated records (overrides HINARIO_OUTPUT_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Emit legacy `id`/`titulo` field names instead of `no`/`title`
    #[arg(long, global = true)]
    legacy_names: bool,

    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a plain-text hymnal export into per-hymn records
    Parse {
        /// Path to the hymnal export text file
        input: PathBuf,

        /// Which hymnal layout the export uses
        #[arg(long, value_enum, default_value_t = Layout::Cantado)]
        layout: Layout,
    },

    /// Scrape hymn pages from the collection website into records
    Fetch {
        /// Read page links from this JSON file instead of the site menu
        #[arg(long)]
        links: Option<PathBuf>,
    },

    /// Discover hymn page links from the site menu and save them
    Links {
        /// Where to write the discovered links
        #[arg(long, default_value = "links.json")]
        out: PathBuf,
    },
}

/// Supported plain-text export layouts.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    /// `Hino N – Título` headers, no indentation heuristics
    Cantado,
    /// `N Título` headers with hanging-indent chorus detection
    Casteliano,
}

impl Layout {
    fn format(self) -> HymnFormat {
        match self {
            Self::Cantado => HymnFormat::cantado(),
            Self::Casteliano => HymnFormat::casteliano(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    let names = if cli.legacy_names {
        FieldNames::Legacy
    } else {
        FieldNames::Standard
    };

    match cli.command {
        Command::Parse { input, layout } => parse_export(&config, &input, layout, names),
        Command::Fetch { links } => fetch_site(&config, links.as_deref(), names).await,
        Command::Links { out } => save_links(&config, &out).await,
    }
}

/// Parse one plain-text hymnal export and write its records.
fn parse_export(
    config: &Config,
    input: &std::path::Path,
    layout: Layout,
    names: FieldNames,
) -> Result<()> {
    tracing::info!("Reading {}", input.display());
    let document = fs_err::read_to_string(input)
        .map_err(|e| Error::io(e, input.to_path_buf()))?;

    let hymns = parse_document(&document, &layout.format());
    if hymns.is_empty() {
        return Err(Error::parse(
            "No hymn blocks found in document",
            input.to_path_buf(),
        ));
    }

    let mut writer = RecordWriter::new(config.json_dir(), config.markdown_dir(), names)?;
    for hymn in &hymns {
        let record = HymnRecord::from_parsed(hymn);
        match writer.write(&record) {
            Ok(path) => tracing::debug!("Wrote {}", path.display()),
            Err(e) => tracing::warn!("Failed to write hymn {}: {e}", record.no),
        }
    }

    tracing::info!(
        "Exported {} hymns to JSON and Markdown under {}",
        writer.written(),
        config.output_dir.display()
    );
    Ok(())
}

/// Scrape the collection site and write one record per hymn page.
async fn fetch_site(
    config: &Config,
    links_file: Option<&std::path::Path>,
    names: FieldNames,
) -> Result<()> {
    let client = SiteClient::new(config)?;

    let links = match links_file {
        Some(path) => {
            let json = fs_err::read_to_string(path)
                .map_err(|e| Error::io(e, path.to_path_buf()))?;
            serde_json::from_str::<Vec<String>>(&json)?
        }
        None => client.fetch_menu_links().await?,
    };
    if links.is_empty() {
        return Err(Error::Msg("No hymn links to fetch".to_string()));
    }

    let mut writer = RecordWriter::new(config.json_dir(), config.markdown_dir(), names)?;
    for (url, result) in client.fetch_pages(&links).await {
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping {url}: {e}");
                continue;
            }
        };
        let Some(hymn) = parse_page(&page).as_ref().and_then(page_to_hymn) else {
            tracing::warn!("Skipping {url}: not a hymn page");
            continue;
        };
        let record = HymnRecord::from_parsed(&hymn);
        match writer.write(&record) {
            Ok(path) => tracing::debug!("Wrote {}", path.display()),
            Err(e) => tracing::warn!("Failed to write hymn {}: {e}", record.no),
        }
    }

    tracing::info!(
        "Exported {} hymns to JSON and Markdown under {}",
        writer.written(),
        config.output_dir.display()
    );
    Ok(())
}

/// Discover hymn page links and persist them as JSON.
async fn save_links(config: &Config, out: &std::path::Path) -> Result<()> {
    let client = SiteClient::new(config)?;
    let links = client.fetch_menu_links().await?;

    let json = serde_json::to_string_pretty(&links)?;
    fs_err::write(out, json).map_err(|e| Error::io(e, out.to_path_buf()))?;

    tracing::info!("Saved {} links to {}", links.len(), out.display());
    Ok(())
}
