use clap::{Parser, Subcommand};
use repo_site::compose::SiteContext;
use repo_site::config::{self, SiteConfig};
use repo_site::skin::TemplateSkin;
use repo_site::snapshot::{RepoId, RepositorySnapshot};
use repo_site::{generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Parser)]
#[command(name = "repo-site")]
#[command(about = "Turn a repository's Markdown documentation into a static website")]
#[command(long_about = "\
Turn a repository's Markdown documentation into a static website

The README becomes the landing page, every other Markdown file becomes a
page under docs/, and images are collected into images/. Links between
documents are rewritten so the site works offline.

Output structure:

  dist/
  ├── index.html                   # README + repository stats
  ├── style.css
  ├── docs/
  │   ├── guide.html               # guide.md
  │   └── api/
  │       └── client.html          # api/client.md
  └── images/
      └── logo.png                 # assets/logo.png (flattened)

Run 'repo-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for intermediate files (the snapshot)
    #[arg(long, default_value = ".repo-site-temp", global = true)]
    temp_dir: PathBuf,

    /// Log debug diagnostics to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Which repository to read and how to name it.
#[derive(clap::Args, Clone)]
struct RepoArgs {
    /// Repository identifier, e.g. acme/widgets
    #[arg(long)]
    repo: RepoId,

    /// Checked-out repository directory
    #[arg(long, default_value = ".")]
    source: PathBuf,

    /// Directory inside the checkout to leave out of the scan (repeatable).
    /// The temp directory, and the output directory on `build`, are always left out.
    #[arg(long)]
    exclude: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a checked-out repository into a snapshot
    Scan(RepoArgs),
    /// Produce the site from a previously written snapshot
    Generate {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Run the full pipeline: scan → generate
    Build {
        #[command(flatten)]
        repo: RepoArgs,
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan(repo) => {
            let (config, _) = load_config(cli.config.as_deref())?;
            let snapshot = run_scan(&repo, &config, &[cli.temp_dir.clone()])?;
            write_snapshot(&snapshot, &cli.temp_dir)?;
            output::print_scan_output(&snapshot);
        }
        Command::Generate { output: out_dir } => {
            let (config, config_dir) = load_config(cli.config.as_deref())?;
            let snapshot = read_snapshot(&cli.temp_dir)?;
            run_generate(&snapshot, &config, &config_dir, &out_dir)?;
        }
        Command::Build {
            repo,
            output: out_dir,
        } => {
            let (config, config_dir) = load_config(cli.config.as_deref())?;

            println!("==> Stage 1: Scanning {}", repo.source.display());
            let snapshot = run_scan(&repo, &config, &[cli.temp_dir.clone(), out_dir.clone()])?;
            write_snapshot(&snapshot, &cli.temp_dir)?;
            output::print_scan_output(&snapshot);

            println!("==> Stage 2: Generating HTML → {}", out_dir.display());
            run_generate(&snapshot, &config, &config_dir, &out_dir)?;

            println!("==> Build complete: {}", out_dir.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--verbose` forces debug, otherwise RUST_LOG decides, defaulting to warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config and return it with the directory template paths resolve against.
fn load_config(explicit: Option<&Path>) -> Result<(SiteConfig, PathBuf), config::ConfigError> {
    match explicit {
        Some(path) => {
            let config = config::load_config_file(path)?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, dir))
        }
        None => Ok((config::load_config(Path::new("."))?, PathBuf::from("."))),
    }
}

fn run_scan(
    repo: &RepoArgs,
    config: &SiteConfig,
    generated: &[PathBuf],
) -> Result<RepositorySnapshot, scan::ScanError> {
    let exclude: Vec<PathBuf> = generated.iter().chain(&repo.exclude).cloned().collect();
    scan::scan(
        &repo.source,
        &repo.repo.owner,
        &repo.repo.name,
        &config.site.host,
        &config.scan,
        &exclude,
    )
}

fn run_generate(
    snapshot: &RepositorySnapshot,
    config: &SiteConfig,
    config_dir: &Path,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    init_thread_pool(&config.processing);
    let skin = TemplateSkin::from_config(&config.templates, config_dir)?;
    let ctx = SiteContext::new(snapshot);
    let result = generate::generate(&ctx, &skin, output_dir)?;
    output::print_generate_output(ctx.navigation(), &result);
    Ok(())
}

fn write_snapshot(
    snapshot: &RepositorySnapshot,
    temp_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)
        .map_err(|e| format!("failed to create {}: {e}", temp_dir.display()))?;
    let path = temp_dir.join(SNAPSHOT_FILE);
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(&path, json)
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
    Ok(())
}

fn read_snapshot(temp_dir: &Path) -> Result<RepositorySnapshot, Box<dyn std::error::Error>> {
    let path = temp_dir.join(SNAPSHOT_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        format!(
            "failed to read {} ({e}); run 'repo-site scan' first",
            path.display()
        )
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Size the global rayon pool used for documentation pages.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
