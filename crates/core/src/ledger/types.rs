//! Types for the conversion ledger.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::encoder::{AudioFormat, Bitrate};

/// Why a ledger entry was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    /// The file was successfully converted to the recorded format/bitrate.
    Converted,
    /// The file was probed and already matched the recorded format/bitrate.
    CorrectFormat,
}

/// Outcome record for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Target format at the time of recording.
    pub format: String,
    /// Target bitrate at the time of recording.
    pub bitrate: String,
    /// ISO-8601 timestamp of the recording.
    pub timestamp: String,
    /// Why the entry exists.
    pub status: LedgerStatus,
}

impl LedgerEntry {
    fn new(format: AudioFormat, bitrate: Bitrate, status: LedgerStatus) -> Self {
        Self {
            format: format.as_str().to_string(),
            bitrate: bitrate.as_str().to_string(),
            timestamp: Utc::now().to_rfc3339(),
            status,
        }
    }

    /// Entry for a completed conversion.
    pub fn converted(format: AudioFormat, bitrate: Bitrate) -> Self {
        Self::new(format, bitrate, LedgerStatus::Converted)
    }

    /// Entry for a file found already in the requested format/bitrate.
    pub fn correct_format(format: AudioFormat, bitrate: Bitrate) -> Self {
        Self::new(format, bitrate, LedgerStatus::CorrectFormat)
    }
}

/// In-memory ledger: absolute source path -> entry.
///
/// An entry is authoritative only when its format and bitrate equal the
/// currently requested target; stale entries are ignored, never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<String, LedgerEntry>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The single authority for "skip via history" decisions: true only if
    /// an entry exists for the path and exactly matches the requested target.
    pub fn matches(&self, source_path: &str, format: AudioFormat, bitrate: Bitrate) -> bool {
        self.entries
            .get(source_path)
            .map(|e| e.format == format.as_str() && e.bitrate == bitrate.as_str())
            .unwrap_or(false)
    }

    /// Returns the entry for a path, stale or not.
    pub fn get(&self, source_path: &str) -> Option<&LedgerEntry> {
        self.entries.get(source_path)
    }

    /// Merges new entries over existing ones; new entries win on collision.
    pub fn merge(&mut self, new_entries: BTreeMap<String, LedgerEntry>) {
        self.entries.extend(new_entries);
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_exact_target() {
        let mut ledger = Ledger::new();
        let mut entries = BTreeMap::new();
        entries.insert(
            "/music/a.flac".to_string(),
            LedgerEntry::converted(AudioFormat::Mp3, Bitrate::Kbps192),
        );
        ledger.merge(entries);

        assert!(ledger.matches("/music/a.flac", AudioFormat::Mp3, Bitrate::Kbps192));
        // stale against a different target, but still present
        assert!(!ledger.matches("/music/a.flac", AudioFormat::Mp3, Bitrate::Kbps320));
        assert!(!ledger.matches("/music/a.flac", AudioFormat::Ogg, Bitrate::Kbps192));
        assert!(ledger.get("/music/a.flac").is_some());
        assert!(!ledger.matches("/music/b.flac", AudioFormat::Mp3, Bitrate::Kbps192));
    }

    #[test]
    fn merge_overwrites_on_collision() {
        let mut ledger = Ledger::new();
        let mut first = BTreeMap::new();
        first.insert(
            "/music/a.flac".to_string(),
            LedgerEntry::converted(AudioFormat::Mp3, Bitrate::Kbps192),
        );
        ledger.merge(first);

        let mut second = BTreeMap::new();
        second.insert(
            "/music/a.flac".to_string(),
            LedgerEntry::converted(AudioFormat::Ogg, Bitrate::Kbps320),
        );
        ledger.merge(second);

        assert_eq!(ledger.len(), 1);
        assert!(ledger.matches("/music/a.flac", AudioFormat::Ogg, Bitrate::Kbps320));
        assert!(!ledger.matches("/music/a.flac", AudioFormat::Mp3, Bitrate::Kbps192));
    }

    #[test]
    fn entry_serializes_with_snake_case_status() {
        let entry = LedgerEntry::correct_format(AudioFormat::Mp3, Bitrate::Kbps192);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"correct_format\""));
        assert!(json.contains("\"192k\""));

        let entry = LedgerEntry::converted(AudioFormat::Flac, Bitrate::Kbps320);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"converted\""));
    }
}
