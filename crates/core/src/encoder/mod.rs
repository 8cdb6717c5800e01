//! Encoder module for transcoding audio files via FFmpeg.
//!
//! This module provides the `Encoder` trait and the `FfmpegEncoder`
//! implementation. The encoder is an opaque external tool from the engine's
//! point of view: it receives an input path, a bitrate and an output path,
//! preserves all source metadata tags, and signals success via a zero exit
//! status.

mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use config::EncoderConfig;
pub use error::EncoderError;
pub use ffmpeg::FfmpegEncoder;
pub use traits::Encoder;
pub use types::{AudioFormat, Bitrate, EncodeJob};
