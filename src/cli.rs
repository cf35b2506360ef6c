//! Command-line interface for polyvox
//!
//! One independent boolean flag per pipeline operation. Any combination may
//! be set; the driver evaluates them in the fixed pipeline order, not the
//! order they were typed.

use clap::Parser;
use std::path::PathBuf;

/// Cloud pipeline for podcast transcription, scripting, translation, and speech synthesis
#[derive(Parser, Debug)]
#[command(
    name = "polyvox",
    version,
    about = "Cloud podcast localization pipeline"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verify external dependencies and print the resolved configuration
    #[arg(long)]
    pub check: bool,

    /// Download raw audio files from the bucket
    #[arg(long)]
    pub download_audio: bool,

    /// Transcribe downloaded audio files to text
    #[arg(long)]
    pub transcribe: bool,

    /// Upload transcripts to the bucket
    #[arg(long)]
    pub upload_transcripts: bool,

    /// Download transcripts from the bucket
    #[arg(long)]
    pub download_prompts: bool,

    /// Generate podcast scripts from transcripts
    #[arg(long)]
    pub generate: bool,

    /// Upload generated paragraphs to the bucket
    #[arg(long)]
    pub upload_paragraphs: bool,

    /// Download generated paragraphs from the bucket
    #[arg(long)]
    pub download_paragraphs: bool,

    /// Synthesize English audio from paragraphs (written directly to the bucket)
    #[arg(long)]
    pub synthesize_en: bool,

    /// Translate paragraphs from English to French
    #[arg(long)]
    pub translate: bool,

    /// Upload translated text to the bucket
    #[arg(long)]
    pub upload_translations: bool,

    /// Download translated text from the bucket
    #[arg(long)]
    pub download_translations: bool,

    /// Synthesize French audio from translations (written directly to the bucket)
    #[arg(long)]
    pub synthesize_fr: bool,
}

impl Cli {
    /// Whether any pipeline operation was requested.
    pub fn any_operation(&self) -> bool {
        self.download_audio
            || self.transcribe
            || self.upload_transcripts
            || self.download_prompts
            || self.generate
            || self.upload_paragraphs
            || self.download_paragraphs
            || self.synthesize_en
            || self.translate
            || self.upload_translations
            || self.download_translations
            || self.synthesize_fr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_flags() {
        let cli = Cli::try_parse_from(["polyvox"]).unwrap();
        assert!(!cli.any_operation());
        assert!(!cli.check);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_single_operation() {
        let cli = Cli::try_parse_from(["polyvox", "--transcribe"]).unwrap();
        assert!(cli.transcribe);
        assert!(cli.any_operation());
        assert!(!cli.download_audio);
    }

    #[test]
    fn test_parse_every_operation_flag() {
        let cli = Cli::try_parse_from([
            "polyvox",
            "--download-audio",
            "--transcribe",
            "--upload-transcripts",
            "--download-prompts",
            "--generate",
            "--upload-paragraphs",
            "--download-paragraphs",
            "--synthesize-en",
            "--translate",
            "--upload-translations",
            "--download-translations",
            "--synthesize-fr",
        ])
        .unwrap();
        assert!(cli.download_audio);
        assert!(cli.transcribe);
        assert!(cli.upload_transcripts);
        assert!(cli.download_prompts);
        assert!(cli.generate);
        assert!(cli.upload_paragraphs);
        assert!(cli.download_paragraphs);
        assert!(cli.synthesize_en);
        assert!(cli.translate);
        assert!(cli.upload_translations);
        assert!(cli.download_translations);
        assert!(cli.synthesize_fr);
        assert!(cli.any_operation());
    }

    #[test]
    fn test_flag_order_does_not_matter_for_parsing() {
        let a = Cli::try_parse_from(["polyvox", "--synthesize-fr", "--download-audio"]).unwrap();
        let b = Cli::try_parse_from(["polyvox", "--download-audio", "--synthesize-fr"]).unwrap();
        assert_eq!(a.download_audio, b.download_audio);
        assert_eq!(a.synthesize_fr, b.synthesize_fr);
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::try_parse_from(["polyvox", "--config", "/path/to/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["polyvox", "--check"]).unwrap();
        assert!(cli.check);
        assert!(!cli.any_operation());
    }

    #[test]
    fn test_unknown_flag_is_error() {
        let result = Cli::try_parse_from(["polyvox", "--frobnicate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_flag() {
        let result = Cli::try_parse_from(["polyvox", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["polyvox", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
