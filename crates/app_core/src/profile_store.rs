//! Sidecar profile persistence
//!
//! Writes to one sidecar path form a FIFO chain: each write waits until the
//! previous write for the same path has settled, whether it succeeded or not.
//! Writes to different paths run independently.

use crate::error::Result;
use crate::profile::SidecarProfile;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Last queued write for a path
struct Tail {
    generation: u64,
    settled: oneshot::Receiver<()>,
}

/// Loads and saves sidecar profiles
#[derive(Clone, Default)]
pub struct ProfileStore {
    /// Pending write chain per sidecar path
    tails: Arc<DashMap<PathBuf, Tail>>,
    next_generation: Arc<AtomicU64>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write of `profile` to `path`.
    ///
    /// The profile is serialized immediately, so later changes to the value
    /// don't affect what gets written. The returned handle may be dropped;
    /// the write still happens. Must be called from within a Tokio runtime.
    pub fn save<P: SidecarProfile>(&self, path: PathBuf, profile: &P) -> JoinHandle<Result<()>> {
        let payload = serde_json::to_vec(profile);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (settled_tx, settled_rx) = oneshot::channel();

        let previous = self.tails.insert(
            path.clone(),
            Tail {
                generation,
                settled: settled_rx,
            },
        );

        let tails = Arc::clone(&self.tails);
        tokio::spawn(async move {
            if let Some(previous) = previous {
                // Err means the previous writer is gone, which also counts as settled
                let _ = previous.settled.await;
            }

            let result = match payload {
                Ok(bytes) => write_atomic(&path, &bytes).await,
                Err(e) => Err(std::io::Error::from(e).into()),
            };

            match &result {
                Ok(()) => tracing::debug!("Profile saved: {}", path.display()),
                Err(e) => tracing::warn!("Failed to save profile {}: {}", path.display(), e),
            }

            // Nobody queued behind us: drop the chain entry
            tails.remove_if(&path, |_, tail| tail.generation == generation);
            let _ = settled_tx.send(());

            result
        })
    }

    /// Load a profile, falling back to the default on any read or parse failure
    pub async fn load<P: SidecarProfile>(&self, path: &Path) -> P {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No profile at {}, using defaults", path.display());
                return P::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read profile {}: {}", path.display(), e);
                return P::default();
            }
        };

        P::parse(&content).unwrap_or_else(|| {
            tracing::warn!("Corrupt profile {}, using defaults", path.display());
            P::default()
        })
    }

    /// Number of sidecar paths with writes still queued or running
    #[cfg(test)]
    pub(crate) fn pending_paths(&self) -> usize {
        self.tails.len()
    }
}

/// Write through a temporary sibling so readers never see a half-written file
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, bytes).await?;

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    Ok(())
}
