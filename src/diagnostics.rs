//! System diagnostics and dependency checking.
//!
//! Verifies that the external transcoder is installed and prints the
//! resolved configuration. The cloud capabilities need no local install, so
//! ffmpeg is the one binary worth checking before a run.

use crate::config::Config;
use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_command(command: &str, probe_arg: &str) -> CheckResult {
    match Command::new(command).arg(probe_arg).output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but {} failed", command, probe_arg)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Run all dependency checks and print results.
pub fn check_dependencies(config: &Config) {
    println!("Checking dependencies...\n");

    print!("ffmpeg (audio transcoding): ");
    match check_command("ffmpeg", "-version") {
        CheckResult::Ok => println!("✓ OK"),
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            println!("  Install: sudo apt install ffmpeg  (Debian/Ubuntu)");
            println!("           sudo pacman -S ffmpeg    (Arch)");
        }
        CheckResult::Warning(msg) => println!("⚠ WARNING: {}", msg),
    }

    println!();
    println!("Configuration:");
    println!(
        "  Project:   {}",
        display_or_unset(&config.gcp.project)
    );
    println!("  Bucket:    {}", display_or_unset(&config.gcp.bucket));
    println!("  Location:  {}", config.gcp.location);
    println!("  Model:     {}", config.gcp.model);
    println!(
        "  Workspace: {}",
        config.pipeline.workspace.display()
    );
    // Never print the token itself
    println!(
        "  Token:     {}",
        if config.gcp.access_token.as_deref().unwrap_or("").is_empty() {
            "(unset)"
        } else {
            "present"
        }
    );
    println!(
        "  Deadlines: recognize {}s, synthesize {}s",
        config.pipeline.recognize_timeout_secs, config.pipeline.synthesize_timeout_secs
    );
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "(unset)" } else { value }
}
