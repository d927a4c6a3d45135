use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};

use kubedoctor::checkup::{self, Catalog, Outcome};
use kubedoctor::config::Settings;
use kubedoctor::render::Renderer;
use kubedoctor::source::{self, FileSource, KubectlSource, SnapshotSource};

/// Exit status for runs that failed before a report was produced.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(
    name = "kubedoctor",
    about = "Kubedoctor. A program to help diagnose issues with Kubernetes clusters.",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(flatten)]
    checkup: CheckupArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the cluster for known problems (default)
    Checkup(CheckupArgs),

    /// List every known problem
    Problems {
        /// Disable colour output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Args, Default, PartialEq)]
struct CheckupArgs {
    /// Sets the restart threshold for the HighRestarts problem [default: 3]
    #[arg(long, value_name = "N")]
    restart_threshold: Option<u32>,

    /// Settings file (TOML); falls back to $KUBEDOCTOR_CONFIG
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// kubeconfig context to inspect
    #[arg(long)]
    context: Option<String>,

    /// kubectl binary used to list resources
    #[arg(long, value_name = "PATH")]
    kubectl: Option<PathBuf>,

    /// Read pods from a saved `kubectl get pods -A -o json` file
    #[arg(long, value_name = "PATH", requires = "hpas_file")]
    pods_file: Option<PathBuf>,

    /// Read autoscalers from a saved `kubectl get hpa -A -o json` file
    #[arg(long, value_name = "PATH", requires = "pods_file")]
    hpas_file: Option<PathBuf>,

    /// Skip a problem by id (repeatable)
    #[arg(long = "disable", value_name = "ID")]
    disabled: Vec<String>,

    /// Disable colour output
    #[arg(long)]
    no_color: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn renderer(no_color: bool) -> Renderer {
    if no_color {
        Renderer::new(false)
    } else {
        Renderer::for_stdout()
    }
}

async fn run_checkup(args: CheckupArgs) -> Result<Outcome> {
    let settings = Settings::resolve(args.config.as_deref())?;
    let mut config = settings.detector_config();
    if let Some(threshold) = args.restart_threshold {
        config.restart_threshold = threshold;
    }

    let disabled: Vec<&str> = settings
        .disabled_problems
        .iter()
        .chain(&args.disabled)
        .map(String::as_str)
        .collect();
    let catalog = Catalog::builtin().without(disabled.as_slice())?;

    let source: Box<dyn SnapshotSource> = match (args.pods_file, args.hpas_file) {
        (Some(pods), Some(hpas)) => Box::new(FileSource::new(pods, hpas)),
        _ => Box::new(KubectlSource::new(
            args.kubectl.unwrap_or(settings.kubectl),
            args.context.or(settings.context),
        )),
    };

    tracing::info!(
        restart_threshold = config.restart_threshold,
        problems = catalog.len(),
        "starting checkup"
    );
    let snapshot = source::fetch_snapshot(source.as_ref()).await?;

    let renderer = renderer(args.no_color);
    let mut stdout = io::stdout().lock();
    renderer.begin(&mut stdout)?;
    let report = checkup::check(&snapshot, &catalog, &config);
    renderer.render(&report, &mut stdout)?;
    stdout.flush()?;

    Ok(report.outcome())
}

async fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Some(Commands::Checkup(args)) => run_checkup(args).await,
        None => run_checkup(cli.checkup).await,
        Some(Commands::Problems { no_color }) => {
            let mut stdout = io::stdout().lock();
            renderer(no_color).render_catalog(&Catalog::builtin(), &mut stdout)?;
            Ok(Outcome::Clean)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    // Checkup options given ahead of a subcommand would be silently dropped.
    if cli.command.is_some() && cli.checkup != CheckupArgs::default() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "checkup options must follow the subcommand they apply to",
            )
            .exit();
    }
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
