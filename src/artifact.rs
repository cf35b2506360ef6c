//! Artifact classes and the naming conventions that tie pipeline stages together.
//!
//! Every file the pipeline touches belongs to one class. A class fixes the
//! staging directory (which doubles as the bucket prefix), the filename
//! extension, and the filter used to enumerate members. The UUID is the
//! filename with the extension stripped and is stable across every
//! downstream class, so `input-42.mp3` in `input_audios` becomes
//! `input-42.txt` in `text_prompts` and so on down the line.

use crate::defaults;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// The six stage-output categories, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactClass {
    RawAudio,
    Transcript,
    Paragraph,
    EnglishAudio,
    TranslatedText,
    FrenchAudio,
}

impl ArtifactClass {
    pub const ALL: [ArtifactClass; 6] = [
        ArtifactClass::RawAudio,
        ArtifactClass::Transcript,
        ArtifactClass::Paragraph,
        ArtifactClass::EnglishAudio,
        ArtifactClass::TranslatedText,
        ArtifactClass::FrenchAudio,
    ];

    /// Staging directory name, also used as the bucket prefix.
    pub fn dir(self) -> &'static str {
        match self {
            ArtifactClass::RawAudio => defaults::RAW_AUDIO_DIR,
            ArtifactClass::Transcript => defaults::TRANSCRIPT_DIR,
            ArtifactClass::Paragraph => defaults::PARAGRAPH_DIR,
            ArtifactClass::EnglishAudio => defaults::ENGLISH_AUDIO_DIR,
            ArtifactClass::TranslatedText => defaults::TRANSLATED_DIR,
            ArtifactClass::FrenchAudio => defaults::FRENCH_AUDIO_DIR,
        }
    }

    /// Filename extension for members of this class.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactClass::RawAudio | ArtifactClass::EnglishAudio | ArtifactClass::FrenchAudio => {
                "mp3"
            }
            _ => "txt",
        }
    }

    /// Filename filter used to enumerate members, locally and remotely.
    ///
    /// Raw audio accepts any mp3; everything downstream carries the
    /// `input-` stem produced by the upstream naming convention.
    pub fn filter(self) -> &'static str {
        match self {
            ArtifactClass::RawAudio => "*.mp3",
            ArtifactClass::EnglishAudio | ArtifactClass::FrenchAudio => "input-*.mp3",
            _ => "input-*.txt",
        }
    }

    /// Filename for the artifact with the given UUID.
    pub fn filename(self, uuid: &str) -> String {
        format!("{uuid}.{}", self.extension())
    }

    /// Bucket-relative object name for the artifact with the given UUID.
    pub fn object_name(self, uuid: &str) -> String {
        format!("{}/{}", self.dir(), self.filename(uuid))
    }

    /// Local staging directory under the workspace root.
    pub fn local_dir(self, root: &Path) -> PathBuf {
        root.join(self.dir())
    }

    /// Local path for the artifact with the given UUID.
    pub fn local_path(self, root: &Path, uuid: &str) -> PathBuf {
        self.local_dir(root).join(self.filename(uuid))
    }
}

/// One staged file instance: a UUID plus its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub uuid: String,
    pub class: ArtifactClass,
}

/// Match a filename against a single-`*` filter such as `input-*.txt`.
pub fn matches_filter(name: &str, pattern: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        None => name == pattern,
    }
}

/// Derive the UUID from a filename of the given class.
///
/// Returns `None` when the filename does not match the class filter.
pub fn uuid_of(filename: &str, class: ArtifactClass) -> Option<String> {
    if !matches_filter(filename, class.filter()) {
        return None;
    }
    filename
        .strip_suffix(&format!(".{}", class.extension()))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Create every class staging directory under the workspace root.
///
/// Directories are a process-wide precondition; every operation calls this
/// before doing any work.
pub fn ensure_dirs(root: &Path) -> std::io::Result<()> {
    for class in ArtifactClass::ALL {
        std::fs::create_dir_all(class.local_dir(root))?;
    }
    Ok(())
}

/// Enumerate local artifacts of a class, sorted by UUID.
///
/// A missing directory is treated as zero artifacts, since directories are
/// recreated before each stage runs anyway.
pub fn list_local(root: &Path, class: ArtifactClass) -> Result<Vec<Artifact>> {
    let dir = class.local_dir(root);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut artifacts = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(uuid) = uuid_of(name, class) {
            artifacts.push(Artifact { uuid, class });
        }
    }
    artifacts.sort_by(|a, b| a.uuid.cmp(&b.uuid));
    Ok(artifacts)
}
