//! Path planner: computes where each discovered file's output belongs.
//!
//! Copy mode mirrors the source's position relative to the input root under
//! the output root; replace mode targets the source's own directory. The
//! planner's only side effect is idempotent directory creation.

mod error;

pub use error::PlannerError;

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::encoder::AudioFormat;

/// Infix marking in-flight encoder output, e.g. `track.partial.mp3`.
/// Stale files carrying it are swept at run start.
pub const TEMP_INFIX: &str = "partial";

/// Computed target location for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTarget {
    /// Directory the output (or copied sidecar) lands in.
    pub dir: PathBuf,
    /// Source file stem, extension stripped.
    pub stem: String,
}

impl PlannedTarget {
    /// Final output path: `<dir>/<stem>.<format>`.
    pub fn final_path(&self, format: AudioFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.stem, format.extension()))
    }

    /// Temporary sibling path used for in-place replacement:
    /// `<dir>/<stem>.partial.<format>`.
    pub fn temp_path(&self, format: AudioFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}.{}", self.stem, TEMP_INFIX, format.extension()))
    }
}

/// Plans target directories and file stems for one run.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    input_root: PathBuf,
    output_root: PathBuf,
    replace_in_place: bool,
}

impl PathPlanner {
    /// Creates a planner for the given roots and mode.
    pub fn new(input_root: PathBuf, output_root: PathBuf, replace_in_place: bool) -> Self {
        Self {
            input_root,
            output_root,
            replace_in_place,
        }
    }

    /// Computes the target for a source file, creating the target directory
    /// in copy mode. Creating an existing directory is a no-op.
    pub async fn plan(&self, source: &Path) -> Result<PlannedTarget, PlannerError> {
        let dir = self.target_dir(source)?;

        if !self.replace_in_place {
            fs::create_dir_all(&dir)
                .await
                .map_err(|source| PlannerError::DirectoryCreationFailed {
                    path: dir.clone(),
                    source,
                })?;
        }

        let stem = source
            .file_stem()
            .ok_or_else(|| PlannerError::InvalidSource {
                path: source.to_path_buf(),
            })?
            .to_string_lossy()
            .to_string();

        Ok(PlannedTarget { dir, stem })
    }

    fn target_dir(&self, source: &Path) -> Result<PathBuf, PlannerError> {
        let parent = source.parent().ok_or_else(|| PlannerError::InvalidSource {
            path: source.to_path_buf(),
        })?;

        if self.replace_in_place {
            return Ok(parent.to_path_buf());
        }

        let relative = parent
            .strip_prefix(&self.input_root)
            .map_err(|_| PlannerError::OutsideInputRoot {
                path: source.to_path_buf(),
                input_root: self.input_root.clone(),
            })?;

        Ok(self.output_root.join(relative))
    }
}

/// True for file names produced by `PlannedTarget::temp_path`:
/// `<stem>.partial.<ext>`.
pub fn is_temp_artifact(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() >= 3 && parts[parts.len() - 2] == TEMP_INFIX
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn copy_mode_mirrors_relative_dir() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        std::fs::create_dir_all(input.join("album/cd1")).unwrap();

        let planner = PathPlanner::new(input.clone(), output.clone(), false);
        let target = planner
            .plan(&input.join("album/cd1/track.flac"))
            .await
            .unwrap();

        assert_eq!(target.dir, output.join("album/cd1"));
        assert_eq!(target.stem, "track");
        assert!(target.dir.exists());
        assert_eq!(
            target.final_path(AudioFormat::Mp3),
            output.join("album/cd1/track.mp3")
        );
    }

    #[tokio::test]
    async fn copy_mode_root_level_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        std::fs::create_dir_all(&input).unwrap();

        let planner = PathPlanner::new(input.clone(), output.clone(), false);
        let target = planner.plan(&input.join("track.wav")).await.unwrap();
        assert_eq!(target.dir, output);
    }

    #[tokio::test]
    async fn replace_mode_stays_in_source_dir() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in");
        std::fs::create_dir_all(input.join("album")).unwrap();

        let planner = PathPlanner::new(input.clone(), input.clone(), true);
        let target = planner.plan(&input.join("album/track.flac")).await.unwrap();

        assert_eq!(target.dir, input.join("album"));
        assert_eq!(
            target.temp_path(AudioFormat::Mp3),
            input.join("album/track.partial.mp3")
        );
        assert_eq!(
            target.final_path(AudioFormat::Mp3),
            input.join("album/track.mp3")
        );
    }

    #[tokio::test]
    async fn plan_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        std::fs::create_dir_all(&input).unwrap();

        let planner = PathPlanner::new(input.clone(), output, false);
        let source = input.join("a.mp3");
        let first = planner.plan(&source).await.unwrap();
        let second = planner.plan(&source).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn source_outside_input_root_is_error() {
        let temp = TempDir::new().unwrap();
        let planner = PathPlanner::new(
            temp.path().join("in"),
            temp.path().join("out"),
            false,
        );
        let result = planner.plan(&temp.path().join("elsewhere/a.mp3")).await;
        assert!(matches!(result, Err(PlannerError::OutsideInputRoot { .. })));
    }

    #[test]
    fn temp_artifact_detection() {
        assert!(is_temp_artifact(Path::new("/x/track.partial.mp3")));
        assert!(is_temp_artifact(Path::new("a.b.partial.ogg")));
        assert!(!is_temp_artifact(Path::new("/x/track.mp3")));
        assert!(!is_temp_artifact(Path::new("/x/partial.mp3")));
        assert!(!is_temp_artifact(Path::new("/x/track.partially.mp3")));
    }
}
