use chrono::Utc;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use quillfeed::{config, feed, listing, output, scan};
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quillfeed")]
#[command(about = "Content indexer and feed builder for a markdown blog")]
#[command(long_about = "\
Content indexer and feed builder for a markdown blog

Top-level directories under the content root are categories. Markdown files
inside them are articles; their frontmatter supplies title, date, tags,
description and image.

Content structure:

  docs/
  ├── config.toml                  # Site config (optional)
  ├── index.md                     # Home page (ignored)
  ├── .vitepress/                  # Hidden: ignored
  ├── public/                      # In ignore_dirs: ignored
  ├── backend/                     # Category (configured order first)
  │   ├── index.md                 # Category landing page (not an article)
  │   ├── ef-core-tips.md          # Article
  │   └── draft.md                 # No frontmatter: listed under its filename
  └── misc/                        # Unconfigured category: sorted last

Field resolution (first available wins):
  Title:  frontmatter title → filename without .md
  Date:   frontmatter date  → none (kept out of the feed, sorted last)

Run 'quillfeed gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".quillfeed-temp", global = true)]
    temp_dir: PathBuf,

    /// Log debug detail (feed exclusions, per-file decisions)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory into a manifest
    Scan,
    /// Write feed.xml and feed.json
    Feed,
    /// Run the full pipeline: scan → manifest, listing and feeds
    Build,
    /// Report article URLs that collide or are shadowed by rewrites
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Scan => {
            let manifest = scan_source(&cli.source)?;
            write_json(&cli.temp_dir, "manifest.json", &manifest)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Feed => {
            let manifest = scan_source(&cli.source)?;
            let items = feed::assemble_feed(&manifest.index, &manifest.config);
            let channel = feed::FeedChannel::new(&manifest.config, Utc::now());
            let written = feed::write_feed(&cli.output, &channel, &items)?;
            output::print_feed_output(&items, &written);
        }
        Command::Build => {
            let now = Utc::now();

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan_source(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Writing manifest and listing");
            write_json(&cli.output, "manifest.json", &manifest)?;
            let posts = listing::build_listing(
                &manifest.index,
                now,
                manifest.config.listing.new_post_days,
            );
            write_json(&cli.output, listing::POSTS_FILE, &posts)?;

            println!("==> Stage 3: Writing feeds → {}", cli.output.display());
            let items = feed::assemble_feed(&manifest.index, &manifest.config);
            let channel = feed::FeedChannel::new(&manifest.config, now);
            let written = feed::write_feed(&cli.output, &channel, &items)?;
            output::print_feed_output(&items, &written);

            output::print_build_summary(&manifest, items.len(), &posts);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan_source(&cli.source)?;
            let collisions = manifest.url_collisions();
            let shadowed = manifest.shadowed_articles();
            output::print_check_output(&collisions, &shadowed);
            if !collisions.is_empty() || !shadowed.is_empty() {
                return Err(format!(
                    "{} URL collision(s), {} shadowed article(s)",
                    collisions.len(),
                    shadowed.len()
                )
                .into());
            }
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Info by default, Debug with `--verbose`.
fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new().with_level(level).init()
}

/// Load config, size the thread pool from it, then scan.
fn scan_source(source: &Path) -> Result<scan::Manifest, scan::ScanError> {
    let site_config = config::load_config(source)?;
    init_thread_pool(&site_config.processing);
    scan::scan_with_config(source, site_config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn write_json<T: serde::Serialize>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
