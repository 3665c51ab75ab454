#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wheelwright_builder::{resolve_interpreter, AmbientEnv};
use wheelwright_config::{ConfigSettings, Setting};
use wheelwright_engine::{BackendContext, EngineError};

type CliResult = Result<(), Box<dyn Error>>;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "WHEELWRIGHT_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "wheelwright",
    about = "A PEP 517 build backend for projects built by an external script"
)]
#[command(version)]
struct Cli {
    /// Project root containing pyproject.toml (defaults to the current directory)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,
    /// Interpreter exported to the build script as PYTHON_BIN
    #[arg(long, global = true)]
    python: Option<PathBuf>,
    /// Frontend config setting as KEY=VALUE (repeatable)
    #[arg(long = "config-setting", short = 'C', global = true, value_name = "KEY=VALUE")]
    config_settings: Vec<Setting>,
    /// Show debug logs
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the project and extract the wheel's .dist-info directory
    PrepareMetadata {
        /// Directory to place the .dist-info directory in
        metadata_directory: PathBuf,
    },
    /// Build the project and copy the selected wheel
    BuildWheel {
        /// Directory to place the wheel in
        wheel_directory: PathBuf,
        /// Metadata directory from an earlier prepare-metadata call
        #[arg(long)]
        metadata_directory: Option<PathBuf>,
    },
    /// Write a source distribution
    BuildSdist {
        /// Directory to place the archive in
        sdist_directory: PathBuf,
    },
    /// Print the PKG-INFO document synthesized from pyproject.toml
    ShowMetadata,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = context(&cli).and_then(|ctx| match cli.command {
        Command::PrepareMetadata { metadata_directory } => {
            cmd_prepare_metadata(&ctx, &metadata_directory)
        }
        Command::BuildWheel {
            wheel_directory,
            metadata_directory,
        } => cmd_build_wheel(&ctx, &wheel_directory, metadata_directory.as_deref()),
        Command::BuildSdist { sdist_directory } => cmd_build_sdist(&ctx, &sdist_directory),
        Command::ShowMetadata => cmd_show_metadata(&ctx),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(exit_code(err.as_ref()));
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// The build script's exit code if it caused the failure, else 1.
fn exit_code(err: &(dyn Error + 'static)) -> i32 {
    err.downcast_ref::<EngineError>()
        .and_then(EngineError::exit_code)
        .unwrap_or(1)
}

fn context(cli: &Cli) -> Result<BackendContext, Box<dyn Error>> {
    let root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(format!("project root {} is not a directory", root.display()).into());
    }

    let ambient = AmbientEnv::capture();
    let interpreter = resolve_interpreter(cli.python.as_deref(), &ambient);
    match &interpreter {
        Some(path) => tracing::debug!(python = %path.display(), "resolved interpreter"),
        None => tracing::debug!("no interpreter found, PYTHON_BIN left unset"),
    }
    let settings: ConfigSettings = cli.config_settings.iter().cloned().collect();

    Ok(BackendContext::new(&root, ambient)
        .with_interpreter(interpreter)
        .with_settings(settings))
}

fn cmd_prepare_metadata(ctx: &BackendContext, metadata_directory: &Path) -> CliResult {
    eprintln!("    Building {} (metadata)", ctx.distribution_name());
    let name = wheelwright_engine::prepare_metadata(ctx, metadata_directory)?;
    eprintln!(
        "    Finished {}",
        metadata_directory.join(&name).display()
    );
    println!("{name}");
    Ok(())
}

fn cmd_build_wheel(
    ctx: &BackendContext,
    wheel_directory: &Path,
    metadata_directory: Option<&Path>,
) -> CliResult {
    eprintln!("    Building {} (wheel)", ctx.distribution_name());
    let name = wheelwright_engine::build_wheel(ctx, wheel_directory, metadata_directory)?;
    eprintln!("    Finished {}", wheel_directory.join(&name).display());
    println!("{name}");
    Ok(())
}

fn cmd_build_sdist(ctx: &BackendContext, sdist_directory: &Path) -> CliResult {
    eprintln!("    Packaging {} (sdist)", ctx.distribution_name());
    let name = wheelwright_engine::build_sdist(ctx, sdist_directory)?;
    eprintln!("     Wrote {}", sdist_directory.join(&name).display());
    println!("{name}");
    Ok(())
}

fn cmd_show_metadata(ctx: &BackendContext) -> CliResult {
    tracing::debug!(
        reader = wheelwright_config::detect_reader().name(),
        "reading pyproject.toml"
    );
    print!("{}", ctx.metadata().render());
    Ok(())
}
