//! JSON snapshot store for the conversion ledger.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::error::LedgerError;
use super::types::{Ledger, LedgerEntry};

/// Persists the ledger as a single whole-file JSON snapshot.
///
/// Writes go to a sibling temp file first and are renamed over the target,
/// so a crash mid-write never leaves a half-written snapshot interpreted as
/// valid.
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    /// Creates a store over the given snapshot path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted snapshot. A missing or unreadable file is "no
    /// prior history": corrupt ledgers never abort the run.
    pub async fn load(&self) -> Ledger {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no ledger snapshot, starting empty");
                return Ledger::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read ledger, treating as empty");
                return Ledger::new();
            }
        };

        match serde_json::from_slice::<Ledger>(&bytes) {
            Ok(ledger) => {
                debug!(path = %self.path.display(), entries = ledger.len(), "loaded ledger");
                ledger
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt ledger, treating as empty");
                Ledger::new()
            }
        }
    }

    /// Merges new entries into the ledger (new entries win on collision) and
    /// writes the result back as a complete snapshot replacement.
    pub async fn merge_and_persist(
        &self,
        ledger: &mut Ledger,
        new_entries: BTreeMap<String, LedgerEntry>,
    ) -> Result<(), LedgerError> {
        ledger.merge(new_entries);
        self.persist(ledger).await
    }

    /// Writes the full snapshot: temp sibling file, then atomic rename.
    pub async fn persist(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(ledger)?;

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, &json)
            .await
            .map_err(|source| LedgerError::WriteFailed {
                path: tmp_path.clone(),
                source,
            })?;

        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| LedgerError::ReplaceFailed {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), entries = ledger.len(), "persisted ledger snapshot");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{AudioFormat, Bitrate};
    use tempfile::TempDir;

    fn entry_map(path: &str, entry: LedgerEntry) -> BTreeMap<String, LedgerEntry> {
        let mut map = BTreeMap::new();
        map.insert(path.to_string(), entry);
        map
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = JsonLedgerStore::new(temp.path().join("ledger.json"));
        let ledger = store.load().await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn load_corrupt_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        fs::write(&path, b"{ this is not json").await.unwrap();

        let store = JsonLedgerStore::new(&path);
        let ledger = store.load().await;
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn persist_and_reload_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        let store = JsonLedgerStore::new(&path);

        let mut ledger = store.load().await;
        store
            .merge_and_persist(
                &mut ledger,
                entry_map(
                    "/music/a.flac",
                    LedgerEntry::converted(AudioFormat::Mp3, Bitrate::Kbps192),
                ),
            )
            .await
            .unwrap();

        let reloaded = store.load().await;
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.matches("/music/a.flac", AudioFormat::Mp3, Bitrate::Kbps192));

        // temp file must not linger
        assert!(!path.with_file_name("ledger.json.tmp").exists());
    }

    #[tokio::test]
    async fn persist_replaces_snapshot_whole() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ledger.json");
        let store = JsonLedgerStore::new(&path);

        let mut ledger = store.load().await;
        store
            .merge_and_persist(
                &mut ledger,
                entry_map(
                    "/music/a.flac",
                    LedgerEntry::converted(AudioFormat::Mp3, Bitrate::Kbps192),
                ),
            )
            .await
            .unwrap();

        // second run merges over the first snapshot
        let mut ledger = store.load().await;
        store
            .merge_and_persist(
                &mut ledger,
                entry_map(
                    "/music/a.flac",
                    LedgerEntry::correct_format(AudioFormat::Ogg, Bitrate::Kbps320),
                ),
            )
            .await
            .unwrap();

        let reloaded = store.load().await;
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.matches("/music/a.flac", AudioFormat::Ogg, Bitrate::Kbps320));

        // the snapshot is a plain JSON object keyed by source path
        let raw = fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.as_object().unwrap().contains_key("/music/a.flac"));
    }

    #[tokio::test]
    async fn persist_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let store = JsonLedgerStore::new(temp.path().join("no/such/dir/ledger.json"));
        let result = store.persist(&Ledger::new()).await;
        assert!(matches!(result, Err(LedgerError::WriteFailed { .. })));
    }
}
