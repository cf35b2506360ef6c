//! Audio transcoding via the external ffmpeg binary, with testable command
//! execution.
//!
//! The recognition capability requires mono FLAC; arbitrary input containers
//! are converted by shelling out to ffmpeg. The `CommandExecutor` trait
//! enables full testability without the external dependency.

use crate::error::{PolyvoxError, Result};
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for executing system commands.
///
/// Object-safe, Send + Sync for use in concurrent contexts.
/// Enables testability by allowing mock implementations.
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments.
    ///
    /// Returns the stdout of the command on success.
    /// Returns an error if the command fails or is not found.
    fn execute(&self, command: &str, args: &[&str]) -> Result<String>;
}

/// Production command executor using std::process::Command.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor;

impl SystemCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn execute(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PolyvoxError::ToolNotFound {
                    tool: command.to_string(),
                }
            } else {
                PolyvoxError::Transcode {
                    message: format!("Failed to execute {}: {}", command, e),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PolyvoxError::Transcode {
                message: format!(
                    "{} failed with status {:?}: {}",
                    command, output.status, stderr
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Trait for converting audio into the codec recognition expects.
pub trait Transcoder: Send + Sync {
    /// Convert a local audio file in an arbitrary container into mono FLAC
    /// at `output`.
    fn transcode_to_flac(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Transcoder that invokes ffmpeg through a CommandExecutor.
pub struct FfmpegTranscoder<E: CommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> FfmpegTranscoder<E> {
    /// Create a new FfmpegTranscoder with the given executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl FfmpegTranscoder<SystemCommandExecutor> {
    /// Create an FfmpegTranscoder with the system command executor.
    pub fn system() -> Self {
        Self::new(SystemCommandExecutor::new())
    }
}

impl<E: CommandExecutor> Transcoder for FfmpegTranscoder<E> {
    fn transcode_to_flac(&self, input: &Path, output: &Path) -> Result<()> {
        let input = input.to_string_lossy().into_owned();
        let output = output.to_string_lossy().into_owned();
        // -ac 1 downmixes to mono; the .flac suffix selects the codec.
        self.executor.execute(
            "ffmpeg",
            &["-nostdin", "-y", "-i", &input, "-ac", "1", &output],
        )?;
        Ok(())
    }
}

/// Mock transcoder for testing.
///
/// Writes placeholder bytes to the output path instead of invoking ffmpeg.
#[derive(Debug, Default)]
pub struct MockTranscoder {
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of transcode invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcoder for MockTranscoder {
    fn transcode_to_flac(&self, _input: &Path, output: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(PolyvoxError::Transcode {
                message: "mock transcode failure".to_string(),
            });
        }
        std::fs::write(output, b"flac-bytes")?;
        Ok(())
    }
}
