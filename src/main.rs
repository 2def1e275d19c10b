use clap::{Parser, Subcommand};
use simple_shelf::{config, generate, load, output, view};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-shelf")]
#[command(about = "Static site generator for paginated book catalogs")]
#[command(long_about = "\
Static site generator for paginated book catalogs

A single JSON file is the data source. Every record becomes a card, every
category becomes a tab, and every tab is split into fixed-size pages.

Content structure:

  content/
  ├── config.toml      # Site config (optional)
  ├── books.json       # Ordered array of book records
  └── welcome.md       # Welcome section on the index page (optional)

Book records (camelCase):
  title, author, pages, rating      Card text and star rating (0-5)
  category                          \"Fiction, Drama\" or [\"Fiction\", \"Drama\"]
  image, description                Cover URL and blurb
  isAdult, isUpcoming               18+ and upcoming badges
  hasMovie + movieLink(s)           Movie links
  hasPdf + telegramMessageId        PDF link (needs links.document_bot)

Run 'simple-shelf gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every category tab and page into the output directory
    Build {
        /// Disable the output cache and rewrite every page
        #[arg(long)]
        no_cache: bool,
    },
    /// Validate the content directory without building
    Check,
    /// Print one catalog page
    Query {
        /// Category label; defaults to the all-books label
        #[arg(long)]
        category: Option<String>,
        /// 1-based page number (clamped to the available pages)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Free-text search over title, author and description
        #[arg(long)]
        search: Option<String>,
        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { no_cache } => {
            println!("==> Stage 1: Loading {}", cli.source.display());
            let catalog = load::load(&cli.source)?;
            print_warnings(&catalog.warnings);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&catalog.config.processing);
            let report = generate::generate(&catalog, &cli.output, !no_cache)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let catalog = load::load(&cli.source)?;
            output::print_check_output(&catalog, &cli.source);
            println!("==> Content is valid");
        }
        Command::Query {
            category,
            page,
            search,
            json,
        } => {
            let catalog = load::load(&cli.source)?;
            let catalog_config = &catalog.config.catalog;
            let label = category.unwrap_or_else(|| catalog_config.all_label.clone());
            let mut query = view::CatalogQuery::category(label).page(page);
            if let Some(term) = search {
                query = query.search(term);
            }
            let catalog_view = view::catalog_view(&catalog.books, &query, catalog_config);
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog_view)?);
            } else {
                output::print_query_output(&catalog_view);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn print_warnings(warnings: &[load::LoadWarning]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
