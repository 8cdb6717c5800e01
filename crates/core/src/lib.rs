//! tunepress-core: idempotent batch audio conversion.
//!
//! Orchestrates an external encoder (ffmpeg) over a directory tree,
//! preserving sidecar files and recording outcomes in a persistent ledger so
//! repeated runs converge without redundant work.

pub mod config;
pub mod deps;
pub mod encoder;
pub mod engine;
pub mod ledger;
pub mod planner;
pub mod probe;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LedgerConfig,
    LoggingConfig,
};
pub use deps::{ensure_dependencies, DepsError};
pub use encoder::{AudioFormat, Bitrate, EncodeJob, Encoder, EncoderConfig, FfmpegEncoder};
pub use engine::{ConversionEngine, EngineError, RunRequest, RunSummary};
pub use ledger::{JsonLedgerStore, Ledger, LedgerEntry, LedgerStatus};
pub use planner::{PathPlanner, PlannedTarget, PlannerError};
pub use probe::{AudioSignature, FfprobeClient, MediaProbe, ProbeConfig};
