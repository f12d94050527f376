use clap::{ArgAction, Parser, Subcommand};
use docs_llms::{collect, config, export, generate, output};
use std::path::{Path, PathBuf};

/// Shared flags for commands that write to the output directory.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the write cache: rewrite every file and remove nothing
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docs-llms")]
#[command(about = "llms.txt exports for versioned documentation sites")]
#[command(long_about = "\
llms.txt exports for versioned documentation sites

Reads the content catalog written by your site pipeline and produces
LLM-readable exports: a markdown file per page, plus llms.txt indexes and
llms-full.txt aggregates for the whole site, each component, and each
component version.

Source structure:

  content/
  ├── catalog.json                 # Pages, components, versions (from the site build)
  ├── config.toml                  # Export config (optional)
  └── projects/
      └── h2o-zig/
          └── manifest.edn         # :description → component description

Output structure:

  dist/
  ├── llms.txt                     # Site index (also llm.txt)
  ├── llms-full.txt                # Site aggregate (also llm-full.txt)
  ├── index.md                     # Page export
  └── h2o-zig/
      ├── llms.txt                 # Component index
      ├── llms-full.txt
      └── 0.2/
          ├── llms.txt             # Version index
          └── llms-full.txt

Pages opt out with the page-llms-ignore attribute, or keep their body out
of the aggregates with page-llms-full-ignore.

Run 'docs-llms gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory holding the catalog and config.toml
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (records manifest)
    #[arg(long, default_value = ".docs-llms-temp", global = true)]
    temp_dir: PathBuf,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select exported pages from the catalog into a records manifest
    Collect,
    /// Write llms files and page exports from the records manifest
    Generate(CacheArgs),
    /// Run the full pipeline: collect → generate
    Build(CacheArgs),
    /// Validate the catalog and config without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let skip_dirs = skip_dir_names(&[cli.output.as_path(), cli.temp_dir.as_path()]);
    let skip_dirs: Vec<&str> = skip_dirs.iter().map(String::as_str).collect();
    let records_path = cli.temp_dir.join(collect::RECORDS_FILENAME);

    match cli.command {
        Command::Collect => {
            let config = config::load_config(&cli.source)?;
            let manifest = collect::collect_source(&cli.source, &config, &skip_dirs)?;
            collect::write_manifest(&manifest, &records_path)?;
            output::print_collect_output(&manifest);
        }
        Command::Generate(cache_args) => {
            let report = generate::generate(&records_path, &cli.output, !cache_args.no_cache)?;
            output::print_generate_output(&report);
        }
        Command::Build(cache_args) => {
            println!("==> Stage 1: Collecting {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let manifest = collect::collect_source(&cli.source, &config, &skip_dirs)?;
            collect::write_manifest(&manifest, &records_path)?;
            output::print_collect_output(&manifest);

            println!("==> Stage 2: Generating llms files → {}", cli.output.display());
            let report = generate::generate_from(&manifest, &cli.output, !cache_args.no_cache)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let manifest = collect::collect_source(&cli.source, &config, &skip_dirs)?;
            output::print_collect_output(&manifest);
            let built = export::build(
                &manifest.site.title,
                &manifest.site.url,
                &manifest.components,
                &manifest.descriptions,
                &manifest.records,
            );
            let record_paths = manifest.records.iter().map(|r| &r.output_path);
            for path in built.artifacts.keys().chain(record_paths) {
                generate::check_path(path)?;
            }
            println!("==> Catalog is valid ({} llms files)", built.artifacts.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Directory names that manifest discovery must not enter.
fn skip_dir_names(dirs: &[&Path]) -> Vec<String> {
    dirs.iter()
        .filter_map(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
