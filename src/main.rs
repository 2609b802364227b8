//! av-signals - per-frame signal extraction from video files
//!
//! A CLI tool that shells out to ffprobe to extract per-frame luminance,
//! EBU R128 loudness and audio amplitude from a video, writing one CSV
//! per signal.
//!
//! Exit codes:
//!   0 - Success (ffprobe failures only yield empty or partial CSVs)
//!   1 - ffprobe not found, missing video argument, or runtime error

mod cli;
mod config;
mod error;
mod models;
mod paths;
mod probe;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, SummaryFormat};
use config::{Config, CONFIG_FILE_NAME};
use error::SignalsError;
use models::{AnalysisJob, InvocationRequest, RunSummary};
use probe::{ProbeRunner, RunnerOptions};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("av-signals v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    }
}

/// Print an error the way the user needs to see it.
fn report_error(e: &anyhow::Error) {
    match e.downcast_ref::<SignalsError>() {
        Some(SignalsError::Usage) => {
            eprintln!("Error: {}\n", e);
            eprintln!("{}", Args::usage());
            eprintln!("\nFor more information, try '--help'.");
        }
        Some(err @ SignalsError::ToolNotFound { .. }) => {
            eprintln!("❌ Error: {}", err);
            if let Some(hint) = err.install_hint() {
                eprintln!("   {}", hint);
            }
        }
        _ => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {}", e);
        }
    }
}

/// Handle --init-config: generate a default .av-signals.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to pick the ffprobe binary and the analyses to run.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` wins over the CLI flags when set.
fn init_logging(args: &Args) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete extraction workflow.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let tool = config.probe.executable.clone();
    let jobs = config.analysis.jobs.clone();
    let chatty = !args.quiet && config.general.summary == SummaryFormat::Text;

    // The tool is checked before the arguments
    if !args.dry_run {
        probe::ensure_available(&tool).await?;
    }

    let video = args.video.as_deref().ok_or(SignalsError::Usage)?;
    let request = paths::resolve_request(video, args.out_dir.as_deref())?;

    let runner = ProbeRunner::new(RunnerOptions {
        tool,
        show_progress: chatty,
    });

    if args.dry_run {
        return handle_dry_run(&runner, &request, &jobs);
    }

    if args.out_dir.is_some() {
        paths::prepare_output_dir(&request.out_dir)?;
    }

    if chatty {
        println!("🎬 Analyzing: {}", request.video.display());
        println!("   Output directory: {}", request.out_dir.display());
    }

    let mut outcomes = Vec::with_capacity(jobs.len());
    for job in &jobs {
        if chatty {
            println!(
                "\n🔬 Extracting {} → {}",
                job.label(),
                Path::new(&job.file_name(request.base_name())).display()
            );
        }

        let outcome = runner.run_job(*job, &request).await?;
        if outcome.bytes_written == 0 {
            warn!("{} job produced an empty CSV", job);
        }
        outcomes.push(outcome);
    }

    let summary = RunSummary {
        video: request.video.clone(),
        out_dir: request.out_dir.clone(),
        tool: runner.tool().to_string(),
        generated_at: Utc::now(),
        jobs: outcomes,
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    match config.general.summary {
        SummaryFormat::Json => println!("{}", report::generate_json_summary(&summary)?),
        SummaryFormat::Text if !args.quiet => print!("{}", report::generate_text_summary(&summary)),
        SummaryFormat::Text => {}
    }

    Ok(())
}

/// Handle --dry-run: print each job's command and target, exit.
fn handle_dry_run(
    runner: &ProbeRunner,
    request: &InvocationRequest,
    jobs: &[AnalysisJob],
) -> Result<()> {
    println!("🔍 Dry run: nothing will be created or executed.\n");
    println!("   Video:  {}", request.video.display());
    println!("   Output: {}\n", request.out_dir.display());

    for artifact in request.artifacts(jobs) {
        println!("   {} → {}", artifact.job, artifact.path.display());
        println!("     $ {}\n", runner.command_line(artifact.job, request));
    }

    println!("✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
