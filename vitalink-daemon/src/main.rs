//! Vitalink Daemon - Serial Vitals Monitor Telemetry Service
//!
//! Runs as a background service, reading the monitor's line stream from a
//! serial device node. Classified events are broadcast to viewer clients
//! over a Unix socket; completed sessions are appended to a durable JSON
//! log served over a second Unix socket (`status` / `sessions` queries).

mod config;
mod ipc;
mod pipeline;
mod source;

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use vitalink_broadcaster::EventBroadcaster;
use vitalink_sessions::{SessionStore, SessionTracker};

use crate::config::DaemonConfig;
use crate::ipc::IpcServer;
use crate::pipeline::IngestionPipeline;

/// Serial vitals monitor telemetry daemon
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Device node to read telemetry from ("-" reads stdin)
    #[arg(long)]
    device: Option<String>,
}

/// Shared daemon state queried over IPC.
struct Daemon {
    tracker: Arc<Mutex<SessionTracker>>,
    store: Arc<SessionStore>,
}

impl Daemon {
    fn status(&self) -> String {
        match self.tracker.lock().unwrap().active_subject() {
            Some(name) => format!("active:{}", name),
            None => "idle".to_string(),
        }
    }

    fn sessions_json(&self) -> Result<String> {
        let records = self.store.read_all();
        serde_json::to_string(&records).context("Failed to serialize session log")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    info!("🩺 Starting Vitalink Daemon v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // Load configuration
    let mut config = DaemonConfig::load(args.config)
        .context("Failed to load configuration")?;
    if let Some(device) = args.device {
        config.device_path = device;
    }

    info!("📋 Configuration loaded from {}", config.config_path.display());

    // Open the durable session log (corrupt content recovers as empty)
    let store = Arc::new(
        SessionStore::open(&config.session_log_path)
            .context("Failed to open session log")?,
    );
    info!(
        "🗂️ Session log {} ({} record(s))",
        config.session_log_path,
        store.len()
    );

    let tracker = Arc::new(Mutex::new(SessionTracker::new()));

    // Start the live event broadcaster
    let broadcaster = EventBroadcaster::new(&config.events_socket_path).await?;
    broadcaster
        .start()
        .await
        .context("Failed to start event broadcaster")?;
    info!("📡 Event broadcast on {}", config.events_socket_path);

    // Open the device line stream
    let lines = source::open(&config.device_path).await?;

    // Start IPC server for queries
    let daemon = Arc::new(Daemon {
        tracker: Arc::clone(&tracker),
        store: Arc::clone(&store),
    });
    let mut ipc_server = IpcServer::new(&config.ipc_socket_path, daemon)
        .context("Failed to start IPC server")?;

    info!("🚀 Vitalink daemon ready!");
    info!("   Query it with 'status' or 'sessions' on {}", config.ipc_socket_path);
    info!("📊 Memory usage: {} MB", get_memory_usage_mb());

    let pipeline = IngestionPipeline::new(tracker, store);

    tokio::select! {
        _ = pipeline.run(lines, &broadcaster) => {
            info!("Telemetry stream ended");
        }
        result = ipc_server.run() => {
            if let Err(e) = result {
                error!("IPC server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Received shutdown signal");
        }
    }

    // Cleanup
    info!("🧹 Shutting down...");
    if let Err(e) = broadcaster.stop().await {
        error!("Failed to stop broadcaster: {}", e);
    }
    info!("👋 Vitalink daemon stopped");

    Ok(())
}

/// Get current process memory usage in MB
fn get_memory_usage_mb() -> u64 {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let mut sys = System::new();
    let pid = Pid::from_u32(std::process::id());
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    if let Some(process) = sys.process(pid) {
        process.memory() / 1_048_576 // bytes to MB
    } else {
        0
    }
}
