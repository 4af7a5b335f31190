//! Header generator binary.
//!
//! Writes `ranmath.h` to the given path, or to stdout when no path is given.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use ranmath_gen::{catalog::Catalog, config::GeneratorConfig, detect, emit, taxonomy::Taxonomy};

#[derive(Parser)]
#[command(name = "ranmath-gen", about = "Generate the ranmath.h C math header", version)]
struct Cli {
    /// Output path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include guard macro.
    #[arg(long, default_value = ranmath_gen::config::DEFAULT_GUARD)]
    guard: String,

    /// File whose text is placed at the top of the header.
    #[arg(long)]
    license_file: Option<PathBuf>,

    /// Print generation statistics to stderr.
    #[arg(long)]
    stats: bool,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = GeneratorConfig::default().with_guard(cli.guard);
    if let Some(path) = &cli.license_file {
        config = config.with_license(fs::read_to_string(path)?);
    }

    let catalog = Catalog::standard()?;
    let taxonomy = Taxonomy::standard();
    let detection = detect::detection_tree();

    let stats = match &cli.output {
        Some(path) => {
            let artifact = emit::generate(&catalog, &taxonomy, &detection, &config)?;
            emit::write_artifact(&artifact, path)?;
            artifact.stats
        }
        None => emit::emit_to(&catalog, &taxonomy, &detection, &config, io::stdout().lock())?,
    };

    if cli.stats {
        eprint!("{}", stats);
    }
    Ok(())
}
