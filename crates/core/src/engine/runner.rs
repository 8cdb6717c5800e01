//! The conversion engine: walks the tree, decides, executes, records.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::encoder::{EncodeJob, Encoder};
use crate::ledger::{JsonLedgerStore, LedgerEntry};
use crate::planner::{is_temp_artifact, PathPlanner};
use crate::probe::MediaProbe;

use super::error::EngineError;
use super::types::{FailedFile, FileCategory, RunRequest, RunSummary};

/// Orchestrates one conversion run over a directory tree.
///
/// Files are visited one at a time in walk order; the encoder call blocks
/// the engine until it exits. The cancel flag is polled between files.
pub struct ConversionEngine<E: Encoder, P: MediaProbe> {
    encoder: Arc<E>,
    probe: Arc<P>,
    store: JsonLedgerStore,
    cancel: Arc<AtomicBool>,
}

impl<E: Encoder, P: MediaProbe> ConversionEngine<E, P> {
    /// Creates an engine over the given collaborators.
    pub fn new(encoder: E, probe: P, store: JsonLedgerStore) -> Self {
        Self {
            encoder: Arc::new(encoder),
            probe: Arc::new(probe),
            store,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shares the cancel flag; setting it stops the run after the current
    /// file, persisting whatever ledger entries were accumulated.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs the full pipeline for one request and returns the summary.
    pub async fn run(&self, request: &RunRequest) -> Result<RunSummary, EngineError> {
        self.validate_request(request)?;

        // Relative roots are resolved once up front so the planner's prefix
        // math and the ledger keys agree on the same absolute paths.
        let input_root = std::path::absolute(&request.input_root)
            .unwrap_or_else(|_| request.input_root.clone());
        let output_root = std::path::absolute(&request.output_root)
            .unwrap_or_else(|_| request.output_root.clone());

        let planner = PathPlanner::new(
            input_root.clone(),
            output_root,
            request.replace_in_place,
        );

        let mut ledger = self.store.load().await;
        let mut new_entries: BTreeMap<String, LedgerEntry> = BTreeMap::new();
        let mut summary = RunSummary::default();

        // Replace mode writes temp files into the source tree; clear out
        // leftovers from prior crashed runs before they can be mistaken
        // for user files.
        if request.replace_in_place {
            self.sweep_stale_partials(&input_root).await;
        }

        for entry in WalkDir::new(&input_root)
            .sort_by_file_name()
            .into_iter()
        {
            if self.cancel.load(Ordering::Relaxed) {
                warn!("cancellation requested, stopping walk");
                summary.cancelled = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(extension) = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
            else {
                continue;
            };

            match FileCategory::classify(&extension) {
                FileCategory::Audio => {
                    self.process_audio(
                        request,
                        &planner,
                        path,
                        &extension,
                        &ledger,
                        &mut new_entries,
                        &mut summary,
                    )
                    .await;
                }
                FileCategory::Sidecar => {
                    self.process_sidecar(request, &planner, path, &extension, &mut summary)
                        .await;
                }
                FileCategory::Other => {}
            }
        }

        if let Err(e) = self.store.merge_and_persist(&mut ledger, new_entries).await {
            // best-effort persistence; losing history never fails the run
            error!(error = %e, "failed to persist ledger");
        }

        Ok(summary)
    }

    fn validate_request(&self, request: &RunRequest) -> Result<(), EngineError> {
        if !request.input_root.is_dir() {
            return Err(EngineError::InputRootInvalid {
                path: request.input_root.clone(),
            });
        }
        if request.replace_in_place && request.input_root != request.output_root {
            return Err(EngineError::RootMismatch {
                input: request.input_root.clone(),
                output: request.output_root.clone(),
            });
        }
        Ok(())
    }

    /// Per-file decision for an audio file: ledger, then probe, then encode.
    #[allow(clippy::too_many_arguments)]
    async fn process_audio(
        &self,
        request: &RunRequest,
        planner: &PathPlanner,
        path: &Path,
        extension: &str,
        ledger: &crate::ledger::Ledger,
        new_entries: &mut BTreeMap<String, LedgerEntry>,
        summary: &mut RunSummary,
    ) {
        summary.count(extension);

        let source = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let key = source.to_string_lossy().to_string();

        // 1. Skip via history: the ledger is the single authority here.
        if ledger.matches(&key, request.target_format, request.target_bitrate) {
            info!(path = %source.display(), "skipping previously processed file (per ledger)");
            summary.skipped_ledger.push(source);
            return;
        }

        // 2. Probe the live file. Any probe failure reads as "unknown" and
        //    the file proceeds to conversion.
        match self.probe.probe(&source).await {
            Ok(signature)
                if signature.matches(request.target_format, request.target_bitrate) =>
            {
                info!(path = %source.display(), "already in target format and bitrate");
                new_entries.insert(
                    key,
                    LedgerEntry::correct_format(request.target_format, request.target_bitrate),
                );
                summary.correct_format.push(source);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(path = %source.display(), reason = %e, "probe failed, converting anyway");
            }
        }

        // 3. Plan the target location.
        let target = match planner.plan(&source).await {
            Ok(target) => target,
            Err(e) => {
                warn!(path = %source.display(), error = %e, "failed to plan target");
                summary.failed.push(FailedFile {
                    path: source,
                    reason: e.to_string(),
                });
                return;
            }
        };

        let final_path = target.final_path(request.target_format);

        // 4. Encode.
        if request.replace_in_place {
            let temp_path = target.temp_path(request.target_format);
            let job = EncodeJob {
                input_path: source.clone(),
                output_path: temp_path.clone(),
                bitrate: request.target_bitrate,
            };

            match self.encoder.encode(job).await {
                Ok(()) => {
                    // Delete-then-rename in the same directory. The window
                    // between the two is the documented non-atomic gap.
                    if let Err(e) = fs::remove_file(&source).await {
                        error!(path = %source.display(), error = %e, "failed to remove original");
                        let _ = fs::remove_file(&temp_path).await;
                        summary.failed.push(FailedFile {
                            path: source,
                            reason: format!("failed to remove original: {}", e),
                        });
                        return;
                    }
                    if let Err(e) = fs::rename(&temp_path, &final_path).await {
                        error!(path = %source.display(), error = %e, "failed to finalize replacement");
                        summary.failed.push(FailedFile {
                            path: source,
                            reason: format!("failed to rename temp output: {}", e),
                        });
                        return;
                    }
                    info!(path = %source.display(), target = %final_path.display(), "converted and replaced");
                    new_entries.insert(
                        key,
                        LedgerEntry::converted(request.target_format, request.target_bitrate),
                    );
                    summary.converted.push(source);
                }
                Err(e) => {
                    let reason = e.diagnostic();
                    error!(path = %source.display(), reason = %reason, "conversion failed");
                    let _ = fs::remove_file(&temp_path).await;
                    summary.failed.push(FailedFile {
                        path: source,
                        reason,
                    });
                }
            }
        } else {
            // Copy mode never overwrites an existing target.
            if final_path.exists() {
                info!(path = %source.display(), target = %final_path.display(), "skipping, target already exists");
                summary.skipped_existing.push(source);
                return;
            }

            let job = EncodeJob {
                input_path: source.clone(),
                output_path: final_path.clone(),
                bitrate: request.target_bitrate,
            };

            match self.encoder.encode(job).await {
                Ok(()) => {
                    info!(path = %source.display(), target = %final_path.display(), "converted");
                    new_entries.insert(
                        key,
                        LedgerEntry::converted(request.target_format, request.target_bitrate),
                    );
                    summary.converted.push(source);
                }
                Err(e) => {
                    let reason = e.diagnostic();
                    error!(path = %source.display(), reason = %reason, "conversion failed");
                    summary.failed.push(FailedFile {
                        path: source,
                        reason,
                    });
                }
            }
        }
    }

    /// Copies a sidecar into the planned directory; replace mode leaves
    /// sidecars where they are.
    async fn process_sidecar(
        &self,
        request: &RunRequest,
        planner: &PathPlanner,
        path: &Path,
        extension: &str,
        summary: &mut RunSummary,
    ) {
        if request.replace_in_place {
            return;
        }

        let target_dir = match planner.plan(path).await {
            Ok(target) => target.dir,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to plan sidecar target");
                return;
            }
        };

        let Some(file_name) = path.file_name() else {
            return;
        };
        let destination = target_dir.join(file_name);

        match fs::copy(path, &destination).await {
            Ok(_) => {
                info!(path = %path.display(), target = %destination.display(), "copied sidecar");
                summary.count(extension);
                summary.sidecars_copied += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to copy sidecar");
            }
        }
    }

    /// Removes `*.partial.*` leftovers from prior crashed runs.
    async fn sweep_stale_partials(&self, root: &Path) {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if is_temp_artifact(entry.path()) {
                match fs::remove_file(entry.path()).await {
                    Ok(()) => {
                        info!(path = %entry.path().display(), "removed stale partial output")
                    }
                    Err(e) => {
                        warn!(path = %entry.path().display(), error = %e, "failed to remove stale partial output")
                    }
                }
            }
        }
    }
}
