#![allow(missing_docs)]

//! Background catalog refresh.
//!
//! Watches the local catalog document and emits a fresh snapshot over a
//! channel whenever it changes on disk; the UI swaps the store contents
//! wholesale and replays the active selection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{recommended_watcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::catalog::loader;
use crate::models::Catalog;

/// Events emitted by the catalog synchroniser.
#[derive(Debug)]
pub enum SyncEvent {
    /// The document changed and reloaded cleanly.
    Refreshed {
        /// The replacement snapshot.
        catalog: Catalog,
    },
    /// The document changed but could not be reloaded.
    Error(anyhow::Error),
}

/// Watches a catalog document and feeds reloads to a channel.
pub struct CatalogSync {
    data_path: PathBuf,
}

impl CatalogSync {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Run until the receiving side goes away, sending a [`SyncEvent`] for
    /// every observed change to the document.
    pub async fn run(self, sender: mpsc::Sender<SyncEvent>) -> Result<()> {
        let (change_tx, mut change_rx) = mpsc::channel::<()>(8);

        // Watch the parent directory: editors and deploy scripts replace
        // the file by rename, which would silently detach a file watch.
        let watch_root = self
            .data_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let data_path = self.data_path.clone();

        let mut watcher = recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) => {
                    let touches_document = event.paths.iter().any(|path| path == &data_path);
                    if touches_document && (event.kind.is_modify() || event.kind.is_create()) {
                        let _ = change_tx.blocking_send(());
                    }
                }
                Err(err) => warn!("Catalog watcher error: {err}"),
            }
        })
        .context("failed to create catalog watcher")?;

        watcher
            .watch(&watch_root, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", watch_root.display()))?;
        info!(path = %self.data_path.display(), "Watching catalog document");

        while change_rx.recv().await.is_some() {
            match loader::load_file(&self.data_path) {
                Ok(catalog) => {
                    info!(total = catalog.len(), "Catalog document changed, reloaded");
                    if sender.send(SyncEvent::Refreshed { catalog }).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    if sender.send(SyncEvent::Error(err.into())).await.is_err() {
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
