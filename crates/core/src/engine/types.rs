//! Types for the conversion engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::encoder::{AudioFormat, Bitrate};

/// Extensions treated as audio and eligible for conversion.
pub const AUDIO_EXTENSIONS: [&str; 8] = ["mp3", "flac", "wav", "m4a", "ogg", "opus", "wma", "aac"];

/// Extensions treated as sidecars: copied verbatim, never transcoded.
pub const SIDECAR_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "webp", "nfo"];

/// Disjoint classification of a discovered file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// Audio file, subject to the conversion decision.
    Audio,
    /// Image or NFO sidecar, copied in copy mode.
    Sidecar,
    /// Anything else; ignored and uncounted.
    Other,
}

impl FileCategory {
    /// Classifies a lowercased extension (no dot).
    pub fn classify(extension: &str) -> Self {
        if AUDIO_EXTENSIONS.contains(&extension) {
            Self::Audio
        } else if SIDECAR_EXTENSIONS.contains(&extension) {
            Self::Sidecar
        } else {
            Self::Other
        }
    }
}

/// Immutable description of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Root of the tree to walk.
    pub input_root: PathBuf,
    /// Root the outputs land under. Equals `input_root` in replace mode.
    pub output_root: PathBuf,
    /// Target format.
    pub target_format: AudioFormat,
    /// Target bitrate.
    pub target_bitrate: Bitrate,
    /// Replace files in place instead of copying into `output_root`.
    pub replace_in_place: bool,
}

impl RunRequest {
    /// A copy-mode request.
    pub fn copy(
        input_root: PathBuf,
        output_root: PathBuf,
        target_format: AudioFormat,
        target_bitrate: Bitrate,
    ) -> Self {
        Self {
            input_root,
            output_root,
            target_format,
            target_bitrate,
            replace_in_place: false,
        }
    }

    /// A replace-mode request; output root is forced to the input root.
    pub fn replace(
        input_root: PathBuf,
        target_format: AudioFormat,
        target_bitrate: Bitrate,
    ) -> Self {
        Self {
            output_root: input_root.clone(),
            input_root,
            target_format,
            target_bitrate,
            replace_in_place: true,
        }
    }
}

/// A failed conversion with its diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    /// Source path.
    pub path: PathBuf,
    /// Diagnostic text (encoder stderr excerpt or error description).
    pub reason: String,
}

/// Outcome of one run. Each processed source path lands in exactly one of
/// the outcome lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Processed file counts keyed by extension.
    pub counts: BTreeMap<String, u64>,
    /// Successfully converted files.
    pub converted: Vec<PathBuf>,
    /// Skipped: the target file already existed on disk (copy mode).
    pub skipped_existing: Vec<PathBuf>,
    /// Skipped: the ledger recorded a matching prior outcome.
    pub skipped_ledger: Vec<PathBuf>,
    /// Skipped: probed live format/bitrate already matched the target.
    pub correct_format: Vec<PathBuf>,
    /// Failed conversions with diagnostics.
    pub failed: Vec<FailedFile>,
    /// Sidecar files copied.
    pub sidecars_copied: u64,
    /// True when the run was cancelled before the walk completed.
    pub cancelled: bool,
}

impl RunSummary {
    pub(crate) fn count(&mut self, extension: &str) {
        *self.counts.entry(extension.to_string()).or_insert(0) += 1;
    }

    /// Total files processed (audio decisions plus copied sidecars).
    pub fn total_processed(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Human-readable multi-line report, logged at the end of a run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Conversion summary");
        let _ = writeln!(out, "  total files processed:            {}", self.total_processed());
        let _ = writeln!(out, "  converted:                        {}", self.converted.len());
        let _ = writeln!(out, "  skipped (target already exists):  {}", self.skipped_existing.len());
        let _ = writeln!(out, "  skipped (per ledger):             {}", self.skipped_ledger.len());
        let _ = writeln!(out, "  skipped (correct format/bitrate): {}", self.correct_format.len());
        let _ = writeln!(out, "  failed:                           {}", self.failed.len());
        let _ = writeln!(out, "  sidecars copied:                  {}", self.sidecars_copied);
        if self.cancelled {
            let _ = writeln!(out, "  run cancelled before completion");
        }
        if !self.counts.is_empty() {
            let _ = writeln!(out, "  counts by extension:");
            for (ext, count) in &self.counts {
                let _ = writeln!(out, "    {}: {}", ext, count);
            }
        }
        if !self.failed.is_empty() {
            let _ = writeln!(out, "  failed files:");
            for failure in &self.failed {
                let _ = writeln!(out, "    {}: {}", failure.path.display(), failure.reason);
            }
        }
        out
    }
}
