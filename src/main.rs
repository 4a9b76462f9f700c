use clap::{Parser, Subcommand, ValueEnum};
use lectern::config::{self, SiteConfig, SourceKind};
use lectern::service::{Canon, ScriptureService};
use lectern::source::{self, LocalSource};
use lectern::{generate, output, resolve, routes, scan};
use log::warn;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Scripture lookup and parallel-translation site builder")]
#[command(long_about = "\
Scripture lookup and parallel-translation site builder

Look up verses, chapters and commentary from the command line, or build a
static comparative-religion site from topic files and a scripture source.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── 040-about.md                 # Page (numbered = shown in nav)
  ├── topics/
  │   ├── 010-judaism.toml         # Topic (numbered = shown in nav)
  │   └── drafts.toml              # No number prefix = hidden from nav
  └── scripture/                   # Local dataset ([source] kind = \"local\")
      ├── translations/NIV.json
      ├── commentary.json          # Optional
      └── cross_references.json    # Optional

Run 'lectern gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifests)
    #[arg(long, default_value = ".lectern-temp", global = true)]
    temp_dir: PathBuf,

    /// Which books lookups may resolve
    #[arg(long, value_enum, default_value_t = CanonArg::Bible, global = true)]
    canon: CanonArg,

    /// Log lookups and degraded results
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum CanonArg {
    /// All 66 books
    Bible,
    /// Genesis through Deuteronomy only
    Torah,
}

impl From<CanonArg> for Canon {
    fn from(arg: CanonArg) -> Self {
        match arg {
            CanonArg::Bible => Canon::Bible,
            CanonArg::Torah => Canon::Torah,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print one verse
    Verse {
        /// Reference, e.g. "John 3:16"
        reference: String,
        /// Translation code (defaults to translations.default)
        #[arg(short, long)]
        translation: Option<String>,
    },
    /// Print a whole chapter
    Chapter {
        /// Reference, e.g. "Genesis 1"
        reference: String,
        #[arg(short, long)]
        translation: Option<String>,
    },
    /// Print one verse across several translations
    Parallel {
        reference: String,
        /// Comma-separated codes (defaults to translations.parallel)
        #[arg(short, long, value_delimiter = ',')]
        translations: Vec<String>,
    },
    /// Print commentary on a passage
    Commentary { reference: String },
    /// List the scripture pages the site will contain
    Routes,
    /// Scan content directory into a manifest
    Scan,
    /// Fetch all scripture the site needs
    Resolve,
    /// Produce the final HTML site from the resolved manifest
    Generate,
    /// Run the full pipeline: scan → resolve → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let canon = Canon::from(cli.canon);

    match &cli.command {
        Command::Verse {
            reference,
            translation,
        } => {
            let config = config::load_config(&cli.source)?;
            let source = source::open_source(&config.source, &cli.source)?;
            let service =
                ScriptureService::new(source.as_ref(), &config.translations).with_canon(canon);
            let code = translation.as_deref().unwrap_or(&config.translations.default);
            output::print_verse(&service.get_verse(reference, code)?);
        }
        Command::Chapter {
            reference,
            translation,
        } => {
            let config = config::load_config(&cli.source)?;
            let source = source::open_source(&config.source, &cli.source)?;
            let service =
                ScriptureService::new(source.as_ref(), &config.translations).with_canon(canon);
            let code = translation.as_deref().unwrap_or(&config.translations.default);
            output::print_chapter(&service.get_chapter(reference, code)?);
        }
        Command::Parallel {
            reference,
            translations,
        } => {
            let config = config::load_config(&cli.source)?;
            let source = source::open_source(&config.source, &cli.source)?;
            let service =
                ScriptureService::new(source.as_ref(), &config.translations).with_canon(canon);
            let codes = if translations.is_empty() {
                &config.translations.parallel
            } else {
                translations
            };
            let codes: Vec<&str> = codes.iter().map(String::as_str).collect();
            output::print_parallel(&service.get_parallel_verses(reference, &codes)?);
        }
        Command::Commentary { reference } => {
            let config = config::load_config(&cli.source)?;
            let source = source::open_source(&config.source, &cli.source)?;
            let service =
                ScriptureService::new(source.as_ref(), &config.translations).with_canon(canon);
            output::print_commentary(reference, &service.get_commentary(reference)?);
        }
        Command::Routes => {
            let config = config::load_config(&cli.source)?;
            output::print_routes(&routes::enumerate(&config.routes)?);
        }
        Command::Scan => {
            run_scan(&cli.source, &cli.temp_dir)?;
        }
        Command::Resolve => {
            let scan_manifest_path = cli.temp_dir.join("manifest.json");
            let site_config = read_manifest_config(&scan_manifest_path)?;
            init_thread_pool(&site_config.processing);
            run_resolve(&scan_manifest_path, &cli.source, canon, &cli.temp_dir)?;
        }
        Command::Generate => {
            let resolved_path = cli.temp_dir.join("resolved.json");
            generate::generate(&resolved_path, &cli.output)?;
            let content = std::fs::read_to_string(&resolved_path)?;
            let site: resolve::ResolvedSite = serde_json::from_str(&content)?;
            output::print_generate_output(&site);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = run_scan(&cli.source, &cli.temp_dir)?;
            let scan_manifest_path = cli.temp_dir.join("manifest.json");

            println!("==> Stage 2: Resolving scripture");
            init_thread_pool(&manifest.config.processing);
            let site = run_resolve(&scan_manifest_path, &cli.source, canon, &cli.temp_dir)?;

            println!("==> Stage 3: Generating HTML → {}", cli.output.display());
            generate::write_site(&site, &cli.output)?;
            output::print_generate_output(&site);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            routes::enumerate(&manifest.config.routes)?;
            check_dataset(&manifest.config, &cli.source)?;
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn run_scan(source: &Path, temp_dir: &Path) -> Result<scan::Manifest, Box<dyn Error>> {
    let manifest = scan::scan(source)?;
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    output::print_scan_output(&manifest, source);
    Ok(manifest)
}

/// Resolve with progress printed from a separate thread as routes finish.
fn run_resolve(
    scan_manifest_path: &Path,
    source: &Path,
    canon: Canon,
    temp_dir: &Path,
) -> Result<resolve::ResolvedSite, Box<dyn Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_resolve_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = resolve::resolve(scan_manifest_path, source, canon, Some(tx));
    if printer.join().is_err() {
        warn!("progress printer panicked");
    }
    let site = result?;

    let json = serde_json::to_string_pretty(&site)?;
    std::fs::write(temp_dir.join("resolved.json"), json)?;
    output::print_resolve_summary(&site);
    Ok(site)
}

fn read_manifest_config(manifest_path: &Path) -> Result<SiteConfig, Box<dyn Error>> {
    let content = std::fs::read_to_string(manifest_path)?;
    let manifest: serde_json::Value = serde_json::from_str(&content)?;
    let config = manifest
        .get("config")
        .cloned()
        .ok_or("scan manifest has no config; run 'lectern scan' first")?;
    Ok(serde_json::from_value(config)?)
}

/// Confirm a local dataset carries every supported translation.
fn check_dataset(config: &SiteConfig, root: &Path) -> Result<(), Box<dyn Error>> {
    if config.source.kind != SourceKind::Local {
        println!("    source: {}", config.source.base_url);
        return Ok(());
    }
    let dataset = LocalSource::open(&root.join(&config.source.data_dir))?;
    let available: Vec<&str> = dataset.translations().into_iter().map(|t| t.code()).collect();
    println!("    translations: {}", available.join(", "));
    for code in &config.translations.supported {
        if !available.iter().any(|a| a.eq_ignore_ascii_case(code)) {
            warn!("{code} is supported in config but missing from the dataset");
        }
    }
    Ok(())
}
