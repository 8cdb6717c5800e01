//! Types for the encoder module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Target audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// Free Lossless Audio Codec
    Flac,
    /// WAVE (uncompressed)
    Wav,
    /// MPEG-4 audio container
    M4a,
    /// Ogg Vorbis
    Ogg,
    /// Opus
    Opus,
    /// Windows Media Audio
    Wma,
    /// Advanced Audio Coding
    Aac,
}

impl AudioFormat {
    /// All formats accepted as conversion targets.
    pub const ALL: [AudioFormat; 8] = [
        Self::Mp3,
        Self::Flac,
        Self::Wav,
        Self::M4a,
        Self::Ogg,
        Self::Opus,
        Self::Wma,
        Self::Aac,
    ];

    /// Returns the file extension for this format (no dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Wav => "wav",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Opus => "opus",
            Self::Wma => "wma",
            Self::Aac => "aac",
        }
    }

    /// The container name ffprobe reports for this format, first token of
    /// `format_name`. Matches what the skip logic compares against.
    pub fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp3" => Ok(Self::Mp3),
            "flac" => Ok(Self::Flac),
            "wav" => Ok(Self::Wav),
            "m4a" => Ok(Self::M4a),
            "ogg" => Ok(Self::Ogg),
            "opus" => Ok(Self::Opus),
            "wma" => Ok(Self::Wma),
            "aac" => Ok(Self::Aac),
            other => Err(format!(
                "invalid format '{}', expected one of: mp3, flac, wav, m4a, ogg, opus, wma, aac",
                other
            )),
        }
    }
}

/// Target audio bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bitrate {
    #[serde(rename = "32k")]
    Kbps32,
    #[serde(rename = "64k")]
    Kbps64,
    #[serde(rename = "128k")]
    Kbps128,
    #[serde(rename = "192k")]
    Kbps192,
    #[serde(rename = "256k")]
    Kbps256,
    #[serde(rename = "320k")]
    Kbps320,
}

impl Bitrate {
    /// The `-b:a` argument value, e.g. "192k".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kbps32 => "32k",
            Self::Kbps64 => "64k",
            Self::Kbps128 => "128k",
            Self::Kbps192 => "192k",
            Self::Kbps256 => "256k",
            Self::Kbps320 => "320k",
        }
    }
}

impl fmt::Display for Bitrate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bitrate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "32k" => Ok(Self::Kbps32),
            "64k" => Ok(Self::Kbps64),
            "128k" => Ok(Self::Kbps128),
            "192k" => Ok(Self::Kbps192),
            "256k" => Ok(Self::Kbps256),
            "320k" => Ok(Self::Kbps320),
            other => Err(format!(
                "invalid bitrate '{}', expected one of: 32k, 64k, 128k, 192k, 256k, 320k",
                other
            )),
        }
    }
}

/// A single encode request: one input file, one output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path; the encoder writes exactly here.
    pub output_path: PathBuf,
    /// Target bitrate.
    pub bitrate: Bitrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_round_trips_through_str() {
        for format in AudioFormat::ALL {
            assert_eq!(format.as_str().parse::<AudioFormat>(), Ok(format));
        }
    }

    #[test]
    fn format_rejects_unknown() {
        assert!("mp4".parse::<AudioFormat>().is_err());
        assert!("".parse::<AudioFormat>().is_err());
        assert!("MP3".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn bitrate_parses_valid_values() {
        assert_eq!("192k".parse::<Bitrate>(), Ok(Bitrate::Kbps192));
        assert_eq!("320k".parse::<Bitrate>(), Ok(Bitrate::Kbps320));
        assert!("192".parse::<Bitrate>().is_err());
        assert!("96k".parse::<Bitrate>().is_err());
    }

    #[test]
    fn bitrate_display_matches_ffmpeg_arg() {
        assert_eq!(Bitrate::Kbps32.to_string(), "32k");
        assert_eq!(Bitrate::Kbps256.to_string(), "256k");
    }
}
