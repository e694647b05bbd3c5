use std::path::Path;
use std::process::Command;

use anyhow::bail;
use log::debug;
use log::info;

/// Check that fastp can be launched, and return the version line it reports.
/// fastp prints its version on stderr; stdout is used as a fallback
pub fn check_fastp(program: &Path) -> anyhow::Result<String> {
    debug!("Checking for {}", program.display());
    if let Ok(output) = Command::new(program).arg("--version").output() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
        let version = version.lines().next().unwrap_or_default().to_string();
        info!("Found {} ({})", program.display(), version);
        Ok(version)
    } else {
        bail!("{} is either not installed or not in PATH", program.display())
    }
}
