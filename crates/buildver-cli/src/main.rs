mod commands;

use buildver_core::{absolutize, ConfigOverrides, ProjectConfig, Resolver};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use commands::exit_code_for;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(
    name = "buildver",
    version,
    about = "Resolve build and tool versions from manifests, environment overrides, and build descriptors"
)]
struct Cli {
    /// Path to a buildver.toml project config (default: ./buildver.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the values in buildver.toml.
#[derive(Debug, Args)]
struct SourceArgs {
    /// Dependency manifest of key=value lines.
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,
    /// Build descriptor to extract the version token from.
    #[arg(long, global = true)]
    descriptor: Option<PathBuf>,
    /// Literal tag introducing the version in the descriptor (e.g. "FROM golang:").
    #[arg(long, global = true)]
    tag: Option<String>,
    /// Directory handed to collaborators as the build root.
    #[arg(long, global = true)]
    build_root: Option<PathBuf>,
    /// Manifest key holding the version when no descriptor is configured.
    #[arg(long, global = true)]
    version_key: Option<String>,
    /// Lower-case every resolved key.
    #[arg(long, default_value_t = false, global = true)]
    normalize_keys: bool,
    /// Resolution record file.
    #[arg(long, global = true)]
    record: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve manifest defaults with environment overrides.
    Resolve {
        /// Write the resolution to the record file.
        #[arg(long, default_value_t = false)]
        write_record: bool,
    },
    /// Print the version token declared in a build descriptor.
    Extract {
        /// Descriptor file to scan (default: the configured descriptor). Pair with --tag.
        file: Option<PathBuf>,
    },
    /// Print a manifest with every key lower-cased.
    Normalize {
        /// Manifest file (default: the configured manifest).
        file: Option<PathBuf>,
    },
    /// Fail if the current resolution differs from the record file.
    Verify,
    /// Resolve, then run a command with the version and build root exported.
    Run {
        /// Command and arguments to run.
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("BUILDVER_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;
    let result = match cli.command {
        Commands::Resolve { write_record } => build_resolver(cli.config.as_deref(), cli.sources)
            .and_then(|r| commands::resolve::run(&r, write_record, json_output)),
        Commands::Extract { file } => {
            let mut sources = cli.sources;
            sources.descriptor = file.or(sources.descriptor);
            build_resolver(cli.config.as_deref(), sources)
                .and_then(|r| commands::extract::run(&r, json_output))
        }
        Commands::Normalize { file } => {
            let mut sources = cli.sources;
            sources.manifest = file.or(sources.manifest);
            build_resolver(cli.config.as_deref(), sources)
                .and_then(|r| commands::normalize::run(&r.config().manifest, json_output))
        }
        Commands::Verify => build_resolver(cli.config.as_deref(), cli.sources)
            .and_then(|r| commands::verify::run(&r, json_output)),
        Commands::Run { command } => build_resolver(cli.config.as_deref(), cli.sources)
            .and_then(|r| commands::run::run(&r, &command, json_output)),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}

fn cwd() -> Result<PathBuf, String> {
    buildver_core::config::current_dir().map_err(|e| format!("config error: {e}"))
}

fn build_resolver(config: Option<&Path>, sources: SourceArgs) -> Result<Resolver, String> {
    let cwd = cwd()?;
    let config_path = match config {
        Some(p) => Some(absolutize(&cwd, p)),
        None => ProjectConfig::discover(&cwd),
    };
    let project = match &config_path {
        Some(p) => {
            debug!("loading project config {}", p.display());
            ProjectConfig::load(p).map_err(|e| format!("config error: {e}"))?
        }
        None => ProjectConfig::default(),
    };

    let overrides = ConfigOverrides {
        manifest: sources.manifest,
        descriptor: sources.descriptor,
        tag: sources.tag,
        build_root: sources.build_root,
        version_key: sources.version_key,
        normalize_keys: sources.normalize_keys,
        record: sources.record,
    };
    let resolver_config = project
        .with_overrides(overrides, &cwd)
        .into_resolver_config(&cwd)
        .map_err(|e| format!("config error: {e}"))?;
    Ok(Resolver::new(resolver_config))
}
