//! Types for the probe module.

use serde::{Deserialize, Serialize};

use crate::encoder::{AudioFormat, Bitrate};

/// What a probe learned about an audio file. Either field may be absent when
/// the tool reported the file but omitted the detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSignature {
    /// Container format, first comma-separated token of ffprobe's
    /// `format_name` (e.g. "flac", "mp3").
    pub format: Option<String>,
    /// Audio stream bitrate as a whole-kilobit string suffixed "k"
    /// (e.g. "320k"), integer division by 1000.
    pub bitrate: Option<String>,
}

impl AudioSignature {
    /// A signature with nothing known about the file.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// True only when both format and bitrate are known and equal the target.
    pub fn matches(&self, format: AudioFormat, bitrate: Bitrate) -> bool {
        self.format.as_deref() == Some(format.as_str())
            && self.bitrate.as_deref() == Some(bitrate.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_requires_both_fields() {
        let full = AudioSignature {
            format: Some("mp3".to_string()),
            bitrate: Some("192k".to_string()),
        };
        assert!(full.matches(AudioFormat::Mp3, Bitrate::Kbps192));
        assert!(!full.matches(AudioFormat::Mp3, Bitrate::Kbps320));
        assert!(!full.matches(AudioFormat::Flac, Bitrate::Kbps192));

        let format_only = AudioSignature {
            format: Some("mp3".to_string()),
            bitrate: None,
        };
        assert!(!format_only.matches(AudioFormat::Mp3, Bitrate::Kbps192));

        assert!(!AudioSignature::unknown().matches(AudioFormat::Mp3, Bitrate::Kbps192));
    }
}
