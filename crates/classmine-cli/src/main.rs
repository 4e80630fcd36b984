use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use classmine_core::walker::{FactCounts, JarOutcome};
use classmine_core::{discover_jars, extract_jars, Config};

#[derive(Parser)]
#[command(name = "classmine")]
#[command(about = "Extract entities and relations from Java jar files", long_about = None)]
struct Cli {
    /// Config file (default: ./classmine.toml, then ~/.config/classmine/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract facts from jars, or from every jar under a directory
    Extract {
        /// Jar files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output root; each jar gets its own subdirectory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of jars extracted in parallel (0 = one per core)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Also extract classes under META-INF/
        #[arg(long)]
        include_meta_inf: bool,

        /// Print per-jar summaries as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration
    Config,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
        Commands::Extract {
            paths,
            output,
            jobs,
            include_meta_inf,
            json,
        } => {
            let mut config = match &cli.config {
                Some(path) => Config::from_file(path)?,
                None => Config::load()?,
            };
            if let Some(jobs) = jobs {
                config.extraction.threads = jobs;
            }
            if include_meta_inf {
                config.extraction.skip_meta_inf = false;
            }
            init_logging(&config.logging.level);

            let output_root = output.unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
            run_extract(&paths, output_root, &config, json)
        }
    }
}

fn run_extract(paths: &[PathBuf], output_root: PathBuf, config: &Config, json: bool) -> Result<()> {
    let mut jars = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(eyre!("Path not found: {}", path.display()));
        }
        jars.extend(discover_jars(path, &config.extraction));
    }
    if jars.is_empty() {
        return Err(eyre!("No jar files found"));
    }
    info!(jars = jars.len(), output = %output_root.display(), "Starting extraction");

    let pb = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(jars.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let outcomes = extract_jars(&jars, &output_root, config, |outcome: &JarOutcome| {
        if let Some(name) = outcome.jar.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let mut totals = FactCounts::default();
    for summary in outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
        totals.add(&summary.facts);
    }

    if json {
        let summaries: Vec<_> = outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(summary) => serde_json::json!({
                    "jar": o.jar,
                    "output": o.output_dir,
                    "summary": summary,
                }),
                Err(e) => serde_json::json!({
                    "jar": o.jar,
                    "output": o.output_dir,
                    "error": e.to_string(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(summary) => {
                    println!("{} -> {}", outcome.jar.display(), outcome.output_dir.display());
                    print!("{}", summary);
                }
                Err(e) => eprintln!("{} failed: {}", outcome.jar.display(), e),
            }
        }
        println!(
            "Extracted {} of {} jars ({} facts) into {}",
            outcomes.len() - failed,
            outcomes.len(),
            totals.total(),
            output_root.display()
        );
    }

    if failed > 0 {
        return Err(eyre!("{} of {} jars failed", failed, outcomes.len()));
    }
    Ok(())
}
