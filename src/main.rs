//! folio - inspect the page model of a TEI facsimile edition

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio::{Book, Page, ParseOptions, UnresolvedPolicy};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Inspect the page model of a TEI facsimile edition", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio book.xml                      Show title, pages and diagnostics
    folio book.xml --page 3             Show the text aligned to page 3
    folio book.xml --page 3 --zone l12  Show one zone on page 3
    folio book.xml --json               Dump the whole model as JSON")]
struct Cli {
    /// Input TEI file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Show a single page
    #[arg(short, long, value_name = "N")]
    page: Option<u32>,

    /// Show a single zone on the selected page
    #[arg(short, long, value_name = "ID", requires = "page")]
    zone: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// What to do with text that aligns to no line zone
    #[arg(long, value_enum, default_value = "drop")]
    unresolved: UnresolvedPolicy,

    /// Log debug output to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress warnings
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "off",
        _ => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let options = ParseOptions::new().with_unresolved(cli.unresolved);
    let book = Book::open_with(&cli.input, &options).map_err(|e| e.to_string())?;

    match (cli.page, cli.zone.as_deref()) {
        (Some(number), Some(zone_id)) => {
            let zone = book
                .zone(number, zone_id)
                .ok_or_else(|| format!("no zone {zone_id} on page {number}"))?;
            if cli.json {
                print_json(zone)?;
            } else {
                println!("Zone: {} ({:?})", zone.id, zone.kind);
                println!(
                    "Box: ({}, {}) - ({}, {})",
                    zone.bbox.ulx, zone.bbox.uly, zone.bbox.lrx, zone.bbox.lry
                );
                let page = book.page(number).ok_or_else(|| format!("no page {number}"))?;
                for segment in page.segments_for_zone(zone_id) {
                    println!("Text: {}", segment.text.trim_end());
                }
            }
        }
        (Some(number), None) => {
            let page = book.page(number).ok_or_else(|| format!("no page {number}"))?;
            if cli.json {
                print_json(page)?;
            } else {
                show_page(page);
            }
        }
        (None, _) => {
            if cli.json {
                print_json(&book)?;
            } else {
                show_info(&cli.input, &book);
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn show_info(path: &str, book: &Book) {
    let meta = book.metadata();
    println!("File: {path}");
    println!("Title: {}", book.title());
    if !meta.source.is_empty() {
        println!("Source: {}", meta.source);
    }
    if !meta.publication_info.is_empty() {
        println!("Publication: {}", meta.publication_info);
    }
    println!("Pages: {}", book.total_pages());

    for page in book.pages() {
        println!(
            "  {:>4}  {}  {} zones, {} segments",
            page.number,
            page.surface.image,
            page.surface.zones.len(),
            page.segments.len()
        );
    }

    if !book.unattached().is_empty() {
        println!("Unattached segments: {}", book.unattached().len());
    }

    if !book.diagnostics().is_empty() {
        println!("Diagnostics:");
        for diagnostic in book.diagnostics() {
            println!("  {diagnostic}");
        }
    }
}

fn show_page(page: &Page) {
    println!("Page {} ({})", page.number, page.surface.id);
    println!(
        "Image: {} ({}x{})",
        page.surface.image, page.surface.width, page.surface.height
    );
    println!();

    let text = page
        .segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    for line in text.lines() {
        let line = line.trim();
        if !line.is_empty() {
            println!("{line}");
        }
    }
}
