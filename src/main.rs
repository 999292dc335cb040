use clap::{Parser, Subcommand};
use satgal::config::{self, Config};
use satgal::dates::MonthKey;
use satgal::filter::{FilterState, Selection};
use satgal::gallery::{DetailView, Gallery, GalleryError};
use satgal::output::{self, TextSink};
use satgal::render::{self, HtmlSink, PageContext};
use satgal::scan;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Filter flags shared by commands that show the gallery.
#[derive(clap::Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Only this satellite (exact name)
    #[arg(long)]
    satellite: Option<String>,
    /// Only this UTC month, as YYYY-MM
    #[arg(long)]
    month: Option<MonthKey>,
    /// Only this event ("General" for images without an event folder)
    #[arg(long)]
    event: Option<String>,
    /// Case-insensitive text matched against satellite, event and date
    #[arg(long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn into_filter_state(self) -> FilterState {
        FilterState {
            satellite: Selection::from(self.satellite),
            month: Selection::from(self.month),
            event: Selection::from(self.event),
            search: self.search,
        }
    }
}

#[derive(Parser)]
#[command(name = "satgal")]
#[command(about = "Index satellite imagery and browse it as a month-grouped gallery")]
#[command(long_about = "\
Index satellite imagery and browse it as a month-grouped gallery

The folder layout is the data source. Each image's satellite and event come
from its folders, its capture time from its filename.

Site structure:

  site/
  ├── config.toml                           # Optional, see 'satgal gen-config'
  ├── data.json                             # Manifest written by 'satgal index'
  └── assets/images/
      ├── ISS/
      │   └── ARISS_Series_23/              # Event folder (underscores → spaces)
      │       └── ISS-2025-04-12_07.09.59.jpg
      └── NOAA-19/
          └── 20250411_1932.png             # No event folder → \"General\"

Capture time (first match wins):
  YYYY-MM-DD_HH.MM[.SS]   SSTV decoder style
  YYYYMMDD_HHMM[SS]       compact style
  file modification time  fallback")]
#[command(version)]
struct Cli {
    /// Site root: holds config.toml, the images folder and data.json
    #[arg(long, default_value = ".", global = true)]
    site_root: PathBuf,

    /// Config file (default: <site-root>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the images folder and write the manifest
    Index,
    /// Show the filtered gallery in batches; Enter loads the next batch
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print every batch without waiting
        #[arg(long)]
        all: bool,
        /// Show the detail view of card N (as numbered in the listing) and exit
        #[arg(long)]
        detail: Option<usize>,
    },
    /// List satellites, months and events with their counts
    Facets,
    /// Write the filtered gallery as a standalone HTML page
    Render {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file (default: render.output from config, under the site root)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&cli.site_root)?,
    };

    match cli.command {
        Command::Index => {
            let result = scan::scan(&cli.site_root, &config.indexer)?;
            let manifest_path = cli.site_root.join(&config.indexer.output);
            scan::write_manifest(&result.records, &manifest_path)?;
            log::info!(
                "Wrote {} records to {}",
                result.records.len(),
                manifest_path.display()
            );
            output::print_scan_output(&result, &manifest_path);
        }
        Command::Browse {
            filters,
            all,
            detail,
        } => {
            let mut gallery = load_gallery(&cli.site_root, &config)?;
            let ops = gallery.apply_filters(filters.into_filter_state());

            if let Some(n) = detail {
                let view = n.checked_sub(1).and_then(|pos| gallery.detail(pos));
                match view {
                    Some(view) => print_lines(output::format_detail(&view)),
                    None => println!("No card {} in this view", n),
                }
                return Ok(());
            }

            if let Some(summary) = gallery.filter().summary() {
                println!("{}", summary);
            }
            let mut sink = TextSink::new();
            Gallery::drive(ops, &mut sink);
            print_lines(sink.take_lines());
            browse_loop(&mut gallery, &mut sink, all)?;
        }
        Command::Facets => {
            let gallery = load_gallery(&cli.site_root, &config)?;
            output::print_facets(gallery.facets());
        }
        Command::Render { filters, out } => {
            let out = out.unwrap_or_else(|| cli.site_root.join(&config.render.output));
            let mut gallery = match load_gallery(&cli.site_root, &config) {
                Ok(gallery) => gallery,
                Err(e) => {
                    let page = render::render_error_page(&config.render.title, &e.to_string());
                    write_page(&out, &page.into_string())?;
                    return Err(e.into());
                }
            };

            let mut sink = HtmlSink::new();
            Gallery::drive(gallery.apply_filters(filters.into_filter_state()), &mut sink);
            while gallery.has_more() {
                Gallery::drive(gallery.on_sentinel_visible(), &mut sink);
            }

            let details: Vec<(usize, DetailView)> = sink
                .card_positions()
                .into_iter()
                .filter_map(|pos| gallery.detail(pos).map(|d| (pos, d)))
                .collect();
            let ctx = PageContext {
                title: &config.render.title,
                facets: gallery.facets(),
                filter: gallery.filter(),
                details: &details,
            };
            let page = render::render_page(&ctx, &sink);
            write_page(&out, &page.into_string())?;
            println!(
                "Rendered {} of {} images → {}",
                gallery.filtered_len(),
                gallery.records().len(),
                out.display()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_gallery(site_root: &Path, config: &Config) -> Result<Gallery, GalleryError> {
    let manifest_path = site_root.join(&config.indexer.output);
    Gallery::load(&manifest_path, config.gallery.batch_size)
}

/// Each line on stdin stands in for the sentinel scrolling into view.
fn browse_loop(gallery: &mut Gallery, sink: &mut TextSink, all: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while gallery.has_more() {
        if !all {
            print!("[Enter] next batch, [q] quit: ");
            io::stdout().flush()?;
            match lines.next() {
                Some(Ok(line)) if line.trim().eq_ignore_ascii_case("q") => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            }
        }
        Gallery::drive(gallery.on_sentinel_visible(), sink);
        print_lines(sink.take_lines());
    }
    Ok(())
}

fn write_page(path: &Path, html: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}
