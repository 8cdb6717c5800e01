use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::error::ErrorKind;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunepress_core::{
    ensure_dependencies, load_config, validate_config, AudioFormat, Bitrate, Config,
    ConversionEngine, FfmpegEncoder, FfprobeClient, JsonLedgerStore, LoggingConfig, RunRequest,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Batch audio conversion over a directory tree.
///
/// Copy mode mirrors the input tree into an output tree, transcoding audio
/// and copying sidecar images/NFO files. Replace mode converts audio in
/// place, deleting the originals.
#[derive(Parser, Debug)]
#[command(name = "tunepress", version)]
#[command(override_usage = "tunepress <INPUT> <OUTPUT> <FORMAT> <BITRATE>\n       tunepress <INPUT> <FORMAT> <BITRATE> --replace")]
struct Cli {
    /// Directory tree containing the audio to convert
    input: PathBuf,

    /// `<OUTPUT> <FORMAT> <BITRATE>`, or `<FORMAT> <BITRATE>` with --replace
    #[arg(num_args = 2..=3, value_name = "ARG")]
    rest: Vec<String>,

    /// Convert files in place instead of copying into an output tree
    #[arg(long)]
    replace: bool,

    /// Optional TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the ledger snapshot path
    #[arg(long, value_name = "PATH")]
    ledger: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration; without --config the built-in defaults apply.
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::default(),
    };
    validate_config(&config).context("Configuration validation failed")?;

    let log_path = init_logging(&config.logging)?;
    info!(version = VERSION, "tunepress starting");
    info!(log_file = %log_path.display(), "logging to file");

    let request = build_request(&cli)?;

    if !request.input_root.is_dir() {
        bail!("input path is not a directory: {}", request.input_root.display());
    }
    if !request.replace_in_place {
        std::fs::create_dir_all(&request.output_root).with_context(|| {
            format!(
                "Failed to create output directory {}",
                request.output_root.display()
            )
        })?;
    }

    ensure_dependencies(&config).await?;

    let ledger_path = cli
        .ledger
        .clone()
        .unwrap_or_else(|| config.ledger.path.clone());
    info!(path = %ledger_path.display(), "using ledger");

    let engine = ConversionEngine::new(
        FfmpegEncoder::new(config.encoder.clone()),
        FfprobeClient::new(config.probe.clone()),
        JsonLedgerStore::new(ledger_path),
    );

    // Trip the cancel flag on Ctrl+C/SIGTERM; the engine stops after the
    // current file and persists what it has.
    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("shutdown signal received, stopping after the current file");
        cancel.store(true, Ordering::Relaxed);
    });

    info!(
        input = %request.input_root.display(),
        output = %request.output_root.display(),
        format = %request.target_format,
        bitrate = request.target_bitrate.as_str(),
        replace = request.replace_in_place,
        "starting conversion run"
    );

    let summary = engine.run(&request).await?;
    info!("{}", summary.render());

    // Per-file failures are reported in the summary, not in the exit code.
    Ok(())
}

/// Resolves the positional arguments into a run request. The trailing
/// positionals are `<output> <format> <bitrate>` in copy mode and
/// `<format> <bitrate>` in replace mode.
fn build_request(cli: &Cli) -> Result<RunRequest> {
    if cli.replace {
        let [format, bitrate] = cli.rest.as_slice() else {
            bail!("usage: tunepress <INPUT> <FORMAT> <BITRATE> --replace");
        };
        Ok(RunRequest::replace(
            cli.input.clone(),
            parse_format(format)?,
            parse_bitrate(bitrate)?,
        ))
    } else {
        let [output, format, bitrate] = cli.rest.as_slice() else {
            bail!("usage: tunepress <INPUT> <OUTPUT> <FORMAT> <BITRATE>");
        };
        Ok(RunRequest::copy(
            cli.input.clone(),
            PathBuf::from(output),
            parse_format(format)?,
            parse_bitrate(bitrate)?,
        ))
    }
}

fn parse_format(s: &str) -> Result<AudioFormat> {
    s.parse::<AudioFormat>().map_err(anyhow::Error::msg)
}

fn parse_bitrate(s: &str) -> Result<Bitrate> {
    s.parse::<Bitrate>().map_err(anyhow::Error::msg)
}

/// Sets up the tracing registry: console output plus a per-run plain-text
/// log file under the configured log directory. `TUNEPRESS_LOG` overrides
/// the configured filter.
fn init_logging(config: &LoggingConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.dir).with_context(|| {
        format!("Failed to create log directory {}", config.dir.display())
    })?;

    let file_name = format!("convert_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let log_path = config.dir.join(file_name);
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env("TUNEPRESS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .init();

    Ok(log_path)
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn copy_mode_takes_four_positionals() {
        let cli = parse_cli(&["tunepress", "/in", "/out", "mp3", "192k"]);
        let request = build_request(&cli).unwrap();
        assert_eq!(request.input_root, PathBuf::from("/in"));
        assert_eq!(request.output_root, PathBuf::from("/out"));
        assert_eq!(request.target_format, AudioFormat::Mp3);
        assert_eq!(request.target_bitrate, Bitrate::Kbps192);
        assert!(!request.replace_in_place);
    }

    #[test]
    fn replace_mode_takes_three_positionals() {
        let cli = parse_cli(&["tunepress", "/music", "ogg", "320k", "--replace"]);
        let request = build_request(&cli).unwrap();
        assert_eq!(request.input_root, PathBuf::from("/music"));
        assert_eq!(request.output_root, PathBuf::from("/music"));
        assert_eq!(request.target_format, AudioFormat::Ogg);
        assert_eq!(request.target_bitrate, Bitrate::Kbps320);
        assert!(request.replace_in_place);
    }

    #[test]
    fn wrong_arity_for_mode_is_rejected() {
        // three positionals without --replace
        let cli = parse_cli(&["tunepress", "/in", "mp3", "192k"]);
        assert!(build_request(&cli).is_err());

        // four positionals with --replace
        let cli = parse_cli(&["tunepress", "/in", "/out", "mp3", "192k", "--replace"]);
        assert!(build_request(&cli).is_err());
    }

    #[test]
    fn invalid_format_and_bitrate_are_rejected() {
        let cli = parse_cli(&["tunepress", "/in", "/out", "mp5", "192k"]);
        let err = build_request(&cli).unwrap_err().to_string();
        assert!(err.contains("mp5"));

        let cli = parse_cli(&["tunepress", "/in", "/out", "mp3", "191k"]);
        let err = build_request(&cli).unwrap_err().to_string();
        assert!(err.contains("191k"));
    }

    #[test]
    fn too_few_positionals_fail_at_parse_time() {
        assert!(Cli::try_parse_from(["tunepress", "/in", "mp3"]).is_err());
        assert!(Cli::try_parse_from(["tunepress"]).is_err());
    }
}
