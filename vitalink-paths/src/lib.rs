//! Cross-platform path utilities for Vitalink.
//!
//! Single source of truth for where the daemon keeps its data, sockets and
//! session log.
//!
//! # Platform Behavior
//!
//! | Platform | Data Directory | Socket Directory |
//! |----------|----------------|------------------|
//! | Linux    | `~/.local/share/vitalink` | `$XDG_RUNTIME_DIR` or data dir |
//! | macOS    | `~/Library/Application Support/vitalink` | Same as data dir |
//! | Windows  | `%APPDATA%/vitalink` | Named pipes (future) |

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors specific to path operations.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("Could not determine data directory")]
    NoDataDirectory,

    #[error("Could not create directory: {0}")]
    DirectoryCreation(PathBuf),
}

/// Application identifier used in path construction.
const APP_NAME: &str = "vitalink";

/// Socket file name for IPC query commands.
const IPC_SOCKET_NAME: &str = "vitalink.sock";

/// Socket file name for the live event broadcast.
const EVENTS_SOCKET_NAME: &str = "vitalink_events.sock";

/// Session log file name.
const SESSION_LOG_NAME: &str = "sessions.json";

/// Get the application data directory.
///
/// Creates the directory if it doesn't exist with secure permissions (0o700).
///
/// # Errors
/// Returns an error if the directory cannot be determined or created.
pub fn get_data_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().ok_or(PathError::NoDataDirectory)?;
    let data_dir = base_dir.join(APP_NAME);

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        // Set secure permissions on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&data_dir, perms)
                .with_context(|| format!("Failed to set permissions on {}", data_dir.display()))?;
        }
    }

    Ok(data_dir)
}

/// Get the socket directory for IPC sockets.
///
/// # Platform Behavior
/// - **Linux**: Prefers `$XDG_RUNTIME_DIR` (e.g., `/run/user/1000`), falls
///   back to data dir
/// - **macOS/others**: Uses the data directory
///
/// # Errors
/// Returns an error if the directory cannot be determined or created.
pub fn get_socket_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        // On Linux, prefer XDG_RUNTIME_DIR for sockets (auto-cleaned, 0700)
        if let Some(runtime_dir) = dirs::runtime_dir() {
            if runtime_dir.exists() {
                return Ok(runtime_dir);
            }
        }
        get_data_dir()
    }

    #[cfg(not(target_os = "linux"))]
    {
        get_data_dir()
    }
}

/// Get the path to the IPC query socket.
///
/// # Errors
/// Returns an error if the socket directory cannot be determined.
pub fn get_ipc_socket_path() -> Result<PathBuf> {
    let socket_dir = get_socket_dir()?;
    Ok(socket_dir.join(IPC_SOCKET_NAME))
}

/// Get the path to the live event broadcast socket.
///
/// # Errors
/// Returns an error if the socket directory cannot be determined.
pub fn get_events_socket_path() -> Result<PathBuf> {
    let socket_dir = get_socket_dir()?;
    Ok(socket_dir.join(EVENTS_SOCKET_NAME))
}

/// Get the path to the durable session log.
///
/// All platforms: `<data_dir>/sessions.json`.
///
/// # Errors
/// Returns an error if the data directory cannot be determined or created.
pub fn get_session_log_path() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    Ok(data_dir.join(SESSION_LOG_NAME))
}

/// Get the configuration directory.
///
/// # Platform Behavior
/// - **Linux**: `~/.config/vitalink`
/// - **macOS**: `~/Library/Application Support/vitalink`
/// - **Windows**: `%APPDATA%/vitalink`
pub fn get_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir().ok_or(PathError::NoDataDirectory)?;
    let config_dir = base_dir.join(APP_NAME);

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;
    }

    Ok(config_dir)
}
