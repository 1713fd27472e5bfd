//! Single-instance bookkeeping for the `status` and `kill` subcommands.
//!
//! The running server writes its PID, repository and port as JSON into
//! `$TMPDIR/blame-viewer.pid` and removes it on shutdown.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const PID_FILE_NAME: &str = "blame-viewer.pid";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PidInfo {
    pub pid: u32,
    pub repo_path: String,
    pub port: u16,
}

pub fn pid_file_path() -> PathBuf {
    std::env::temp_dir().join(PID_FILE_NAME)
}

pub fn read() -> Option<PidInfo> {
    let contents = fs::read_to_string(pid_file_path()).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn write(info: &PidInfo) -> anyhow::Result<()> {
    fs::write(pid_file_path(), serde_json::to_string(info)?)?;
    Ok(())
}

pub fn remove() {
    let _ = fs::remove_file(pid_file_path());
}

#[cfg(unix)]
pub fn is_running(pid: u32) -> bool {
    // Signal 0 only probes for existence
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(windows)]
pub fn is_running(pid: u32) -> bool {
    std::process::Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
        .map(|output| String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()))
        .unwrap_or(false)
}

#[cfg(unix)]
pub fn terminate(pid: u32) -> bool {
    unsafe { libc::kill(pid as i32, libc::SIGTERM) == 0 }
}

#[cfg(windows)]
pub fn terminate(pid: u32) -> bool {
    std::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/F"])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Running instance recorded in the PID file. A stale file is removed.
pub fn running_instance() -> Option<PidInfo> {
    let info = read()?;
    if is_running(info.pid) {
        Some(info)
    } else {
        remove();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_info_json_shape() {
        let info = PidInfo {
            pid: 42,
            repo_path: "/src/project".to_string(),
            port: 3001,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json, serde_json::json!({"pid": 42, "repo_path": "/src/project", "port": 3001}));
        assert_eq!(serde_json::from_value::<PidInfo>(json).unwrap(), info);
    }

    #[cfg(unix)]
    #[test]
    fn current_process_is_running() {
        assert!(is_running(std::process::id()));
    }
}
