//! Configuration file watcher for hot-reload support
//!
//! Deadzones and output settings can be tuned while a controller is being
//! polled; the main loop picks up each successfully reloaded config.
//!
//! The parent directory is watched rather than the file itself. Editors that
//! save atomically write a temp file and rename it over the config, which
//! replaces the inode a file watch would be attached to.

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use super::AppConfig;

/// Delay before re-reading, so editors can finish writing
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

/// What a directory event means for the watched config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigChange {
    /// New contents are in place
    Written,
    /// The file went away; a create or rename normally follows
    Removed,
    /// Unrelated file or event kind
    Ignored,
}

/// Classify a directory event against the config's file name
fn classify(event: &Event, file_name: &OsStr) -> ConfigChange {
    if !event.paths.iter().any(|p| p.file_name() == Some(file_name)) {
        return ConfigChange::Ignored;
    }

    match event.kind {
        EventKind::Create(_) => ConfigChange::Written,
        // Rename away from the config name
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => ConfigChange::Removed,
        // Rename onto the config name, or a paired rename event whose
        // destination is the config (paths are [from, to])
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            if event.paths.last().and_then(|p| p.file_name()) == Some(file_name) {
                ConfigChange::Written
            } else {
                ConfigChange::Removed
            }
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => ConfigChange::Ignored,
        EventKind::Modify(_) => ConfigChange::Written,
        EventKind::Remove(_) => ConfigChange::Removed,
        _ => ConfigChange::Ignored,
    }
}

/// Schedules debounced reloads; bursts of events collapse into one load
struct Reloader {
    config_path: PathBuf,
    tx: mpsc::Sender<AppConfig>,
    runtime: Handle,
    pending: Arc<AtomicBool>,
}

impl Reloader {
    fn schedule(&self) {
        if self.pending.swap(true, Ordering::AcqRel) {
            trace!("Reload already pending");
            return;
        }

        let config_path = self.config_path.clone();
        let tx = self.tx.clone();
        let pending = Arc::clone(&self.pending);

        self.runtime.spawn(async move {
            tokio::time::sleep(RELOAD_DEBOUNCE).await;
            // Events arriving from here on schedule a fresh load
            pending.store(false, Ordering::Release);

            match AppConfig::load(&config_path.to_string_lossy()).await {
                Ok(new_config) => {
                    info!("Configuration reloaded successfully");
                    if let Err(e) = tx.send(new_config).await {
                        error!("Failed to send config update: {}", e);
                    }
                }
                Err(e) => {
                    warn!("Failed to reload config (keeping old config): {:#}", e);
                }
            }
        });
    }
}

/// Config watcher that monitors file changes and sends reload notifications
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Load the config at `config_path` and start watching it
    pub async fn new(config_path: impl Into<PathBuf>) -> Result<(Self, Arc<AppConfig>)> {
        let config_path: PathBuf = config_path.into();
        let display_path = config_path.display().to_string();

        let initial_config = AppConfig::load(&config_path.to_string_lossy())
            .await
            .context("Failed to load initial config")?;
        let initial_config = Arc::new(initial_config);

        let file_name: OsString = config_path
            .file_name()
            .with_context(|| format!("Config path has no file name: {}", display_path))?
            .to_os_string();
        let watch_dir = match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = mpsc::channel(10);
        let reloader = Reloader {
            config_path: config_path.clone(),
            tx,
            // notify callbacks run on their own OS thread, not in Tokio context
            runtime: Handle::current(),
            pending: Arc::new(AtomicBool::new(false)),
        };

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => match classify(&event, &file_name) {
                    ConfigChange::Written => {
                        debug!("Config file changed ({:?}): {:?}", event.kind, event.paths);
                        reloader.schedule();
                    }
                    ConfigChange::Removed => {
                        debug!("Config file removed or renamed away: {:?}", event.paths);
                    }
                    ConfigChange::Ignored => {}
                },
                Err(e) => {
                    error!("Watch error: {}", e);
                }
            }
        })?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config directory: {}", watch_dir.display()))?;

        info!("Config file watcher started for: {}", display_path);

        Ok((
            Self {
                _watcher: watcher,
                rx,
            },
            initial_config,
        ))
    }

    /// Wait for the next config update
    /// Returns None if the watcher has been closed
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}
