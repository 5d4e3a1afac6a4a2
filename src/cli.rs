//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use parquet_assembly::config::AssemblyConfig;
use parquet_assembly::domain::{ArtifactFilter, MarkerNaming, Project, Tag};
use parquet_assembly::services::{distribution_name, LibraryDirectory, ToolLocator};
use parquet_assembly::{AssemblyRequest, OrchestratorSettings, StagingOrchestrator};

/// Prepare an assembly of parquet-tools from apache/parquet-mr.
#[derive(Parser)]
#[command(name = "parquet-assembly", version, long_about = None)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root holding staging/ and lib/ (defaults to the nearest
    /// directory with .parquet-assembly.toml, else the current directory).
    #[arg(long, env = "PARQUET_ASSEMBLY_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Extra configuration file layered over the project and user files.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Clone, build and harvest parquet-tools for a tag.
    Assembly {
        /// Tag for apache/parquet-mr repository, see https://github.com/apache/parquet-mr/tags
        #[arg(short, long)]
        tag: Tag,

        /// Include Hadoop dependencies, otherwise assumed that provided at runtime.
        #[arg(short, long)]
        client: bool,
    },

    /// Print the distribution name recorded in the library directory.
    DistName,

    /// Show staged tags, harvested jars and completion markers.
    Status,
}

pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "parquet_assembly=info",
        1 => "parquet_assembly=debug",
        _ => "parquet_assembly=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Dispatch a parsed command line.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let project = load_project(cli.root, cli.config)?;

    match cli.command {
        Command::Assembly { tag, client } => assembly(&project, tag, client),
        Command::DistName => {
            let name = distribution_name(
                &project.lib_directory,
                &project.config.marker.default_name,
            )?;
            println!("{}", name);
            Ok(())
        }
        Command::Status => status(&project),
    }
}

fn load_project(root: Option<PathBuf>, config: Option<PathBuf>) -> Result<Project> {
    let root = match root {
        Some(root) => root,
        None => match Project::discover(None) {
            Some(root) => root,
            None => std::env::current_dir().context("cannot determine current directory")?,
        },
    };

    let config = AssemblyConfig::load(Some(root.as_path()), config.as_deref())
        .context("failed to load configuration")?;
    Ok(Project::new(root, config))
}

fn assembly(project: &Project, tag: Tag, client: bool) -> Result<()> {
    info!("Using tag {}", tag);
    if client {
        info!("Include Hadoop dependencies");
    } else {
        info!("Exclude Hadoop dependencies");
    }

    let settings = OrchestratorSettings::from_project(project);
    let mut orchestrator = StagingOrchestrator::new(settings, &ToolLocator::new())?;
    let report = orchestrator.run(&AssemblyRequest {
        tag,
        client_mode: client,
    })?;
    tracing::debug!("Finished in phase {}", orchestrator.phase());

    info!(
        "Assembled {} ({} jar(s)) into {}",
        report.tag,
        report.artifacts.len(),
        project.lib_directory.display()
    );
    Ok(())
}

fn status(project: &Project) -> Result<()> {
    let config = &project.config;
    println!("root:    {}", project.root_path.display());

    let staged = project
        .staged_tags()
        .with_context(|| format!("cannot list {}", project.staging_directory.display()))?;
    println!("staged:  {}", join_or_none(&staged));

    match LibraryDirectory::open(&project.lib_directory) {
        Ok(library) => {
            let filter = ArtifactFilter::new(&config.artifact.prefix, &config.artifact.suffix);
            let naming = MarkerNaming::new(&config.marker.prefix, &config.marker.client_suffix);

            println!("jars:    {}", join_or_none(&library.artifacts(&filter)?));
            let markers: Vec<String> = library
                .markers(&naming)?
                .into_iter()
                .map(|m| format!("{} ({})", m.tag, m.mode()))
                .collect();
            println!("markers: {}", join_or_none(&markers));
        }
        Err(_) => println!("lib:     {} (missing)", project.lib_directory.display()),
    }
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
