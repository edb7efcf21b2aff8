use clap::{Parser, Subcommand};
use docs_wiki::{config, generate, output, scan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docs-wiki")]
#[command(about = "Flatten repository markdown docs into a wiki")]
#[command(long_about = "\
Flatten repository markdown docs into a wiki

Markdown files under the documentation directories become flat wiki pages
named after their first `# heading`. Links between documents are rewritten
to the new page names, and an index and sidebar are generated.

Repository structure:

  repo/
  ├── wiki.toml              # Optional config (see 'docs-wiki gen-config')
  ├── docs/                  # Source directory → \"Docs\" section
  │   ├── guide.md           # \"# Getting Started\" → wiki/getting-started.md
  │   ├── _draft.md          # Skipped (\"_\" and \".\" prefixes)
  │   └── api/
  │       └── reference.md   # Listed under **api** in the index
  └── notes/                 # Another section

Output:

  wiki/
  ├── Home.md                # Index of every page by directory
  ├── _Sidebar.md            # Top-level navigation + recently updated
  └── getting-started.md

Set RUST_LOG=info (or debug) for per-file logging.")]
#[command(version)]
struct Cli {
    /// Repository root containing the documentation directories
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file [default: <root>/wiki.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory, overrides `output_dir` from the config
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the wiki pages, index, and sidebar
    Build,
    /// Scan the documentation directories without writing anything
    Check {
        /// Print the scan manifest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock wiki.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            let config = load_config(&cli)?;
            let manifest = scan::scan(&cli.root, &config)?;
            if manifest.is_empty() {
                print_no_sources(&config, &cli.root);
                return Ok(());
            }
            let output_dir = config.output_path(&cli.root);

            println!("==> Scanning {}", cli.root.display());
            output::print_scan_output(&manifest);

            println!("==> Generating wiki \u{2192} {}", output_dir.display());
            let summary = generate::generate(&manifest, &output_dir, &config)?;
            output::print_generate_output(&summary);
        }
        Command::Check { json } => {
            let config = load_config(&cli)?;
            let manifest = scan::scan(&cli.root, &config)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else if manifest.is_empty() {
                print_no_sources(&config, &cli.root);
            } else {
                println!("==> Checking {}", cli.root.display());
                output::print_scan_output(&manifest);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file and apply command-line overrides.
///
/// A relative `--output` is taken relative to the working directory, not the root.
fn load_config(cli: &Cli) -> Result<config::WikiConfig, Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.root.join(config::CONFIG_FILE_NAME));
    let mut config = config::load_config_file(&config_path)?;
    if let Some(output) = &cli.output {
        config.output_dir = std::path::absolute(output)?.to_string_lossy().into_owned();
    }
    Ok(config)
}

fn print_no_sources(config: &config::WikiConfig, root: &Path) {
    println!(
        "No source directories ({}) found in {}. Exiting.",
        config.source_dirs.join(", "),
        root.display()
    );
}
