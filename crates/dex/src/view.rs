use crate::reconcile::{merge, MergedEntry};
use companion_catalog::{CatalogError, CatalogStore, SpeciesDefinition};
use companion_progress::{ImportError, ProgressImporter, ProgressRecord, SnapshotSource};
use log::{debug, error, warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// The reconciled list exposed while the view is ready.
///
/// `displayed_entries` is always the subset of `all_entries` matching
/// `selected_generation` (or the whole list when no generation is
/// selected); the two are swapped in together, never observed apart.
#[derive(Debug, Clone)]
pub struct ReadyView {
    pub all_entries: Arc<Vec<MergedEntry>>,
    pub displayed_entries: Arc<Vec<MergedEntry>>,
    pub selected_generation: Option<u32>,
}

impl ReadyView {
    pub fn captured_count(&self) -> usize {
        self.all_entries.iter().filter(|e| e.captured).count()
    }
}

/// Closed set of view states. Published as whole immutable snapshots;
/// consumers never see a half-updated state.
#[derive(Debug, Clone)]
pub enum DexViewState {
    Idle,
    Loading,
    Ready(ReadyView),
    Error { message: String },
}

struct Inner {
    /// Most recent successfully imported record. Stashed here so an import
    /// that lands before the catalog resolves is applied once it does.
    latest_progress: Option<ProgressRecord>,
    activated: bool,
}

/// Owns the current [`DexViewState`] and every transition into it.
///
/// Activation and imports are serialized through one internal lock, so two
/// back-to-back imports cannot clobber each other with a stale merge. The
/// catalog store is injected at construction and shared read-only.
pub struct DexView {
    store: Arc<CatalogStore>,
    importer: ProgressImporter,
    state_tx: watch::Sender<DexViewState>,
    inner: Mutex<Inner>,
}

impl DexView {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        let (state_tx, _) = watch::channel(DexViewState::Idle);
        Self {
            store,
            importer: ProgressImporter::new(),
            state_tx,
            inner: Mutex::new(Inner {
                latest_progress: None,
                activated: false,
            }),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> DexViewState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state replacements. Every transition publishes a fresh
    /// snapshot on this channel.
    pub fn subscribe(&self) -> watch::Receiver<DexViewState> {
        self.state_tx.subscribe()
    }

    /// Detail-view lookup, independent of the current view state.
    pub async fn species_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Arc<SpeciesDefinition>>, CatalogError> {
        self.store.species_by_name(name).await
    }

    /// First activation loads the catalog and moves to Ready or Error.
    /// Once either is reached, further calls are no-ops; repeated UI
    /// lifecycle events must not trigger duplicate loads.
    pub async fn activate(&self) {
        let mut inner = self.inner.lock().await;
        if inner.activated {
            debug!("activate ignored: initial load already completed");
            return;
        }
        self.state_tx.send_replace(DexViewState::Loading);

        match self.store.load().await {
            Ok(catalog) => {
                if catalog.is_empty() {
                    warn!("catalog loaded empty; showing a sparse dex");
                }
                let all = Arc::new(merge(&catalog, inner.latest_progress.as_ref()));
                inner.activated = true;
                self.state_tx.send_replace(DexViewState::Ready(ReadyView {
                    displayed_entries: all.clone(),
                    all_entries: all,
                    selected_generation: None,
                }));
            }
            Err(err) => {
                error!("initial catalog load failed: {err}");
                inner.activated = true;
                self.state_tx.send_replace(DexViewState::Error {
                    message: err.to_string(),
                });
            }
        }
    }

    /// Explicit retry out of the Error state. Anywhere else it is a logged
    /// no-op.
    pub async fn retry(&self) {
        {
            let mut inner = self.inner.lock().await;
            if !matches!(*self.state_tx.borrow(), DexViewState::Error { .. }) {
                warn!("retry ignored: view is not in the error state");
                return;
            }
            inner.activated = false;
        }
        self.activate().await;
    }

    /// Recompute the displayed subset for `generation` (`None` shows all).
    /// Valid only while Ready; otherwise a logged no-op, since generation
    /// taps racing a slow load are expected, not programming errors.
    pub fn select_generation(&self, generation: Option<u32>) {
        self.state_tx.send_if_modified(|state| {
            let DexViewState::Ready(ready) = state else {
                warn!("select_generation ignored: view is not ready");
                return false;
            };
            let next = ReadyView {
                all_entries: ready.all_entries.clone(),
                displayed_entries: filtered(&ready.all_entries, generation),
                selected_generation: generation,
            };
            *state = DexViewState::Ready(next);
            true
        });
    }

    /// Parse a progress snapshot and fold it into the view.
    ///
    /// A successful import always replaces the stashed latest record; if the
    /// view is Ready it is re-reconciled immediately, otherwise the record
    /// waits for activation to finish. A failed import changes nothing and
    /// the error is returned to the caller.
    pub async fn import_progress(&self, source: &dyn SnapshotSource) -> Result<(), ImportError> {
        let mut inner = self.inner.lock().await;
        let record = self.importer.parse(source).await?;
        inner.latest_progress = Some(record);

        if !matches!(*self.state_tx.borrow(), DexViewState::Ready(_)) {
            debug!("import stashed: catalog not ready yet");
            return Ok(());
        }
        let catalog = match self.store.load().await {
            Ok(catalog) => catalog,
            // Ready implies a cached catalog; if it is somehow gone the
            // stashed record still applies on the next transition.
            Err(err) => {
                error!("catalog unavailable while applying import: {err}");
                return Ok(());
            }
        };
        let all = Arc::new(merge(&catalog, inner.latest_progress.as_ref()));
        self.state_tx.send_if_modified(|state| {
            let DexViewState::Ready(ready) = state else {
                return false;
            };
            let next = ReadyView {
                displayed_entries: filtered(&all, ready.selected_generation),
                selected_generation: ready.selected_generation,
                all_entries: all.clone(),
            };
            *state = DexViewState::Ready(next);
            true
        });
        Ok(())
    }
}

fn filtered(all: &Arc<Vec<MergedEntry>>, generation: Option<u32>) -> Arc<Vec<MergedEntry>> {
    match generation {
        None => all.clone(),
        Some(g) => Arc::new(
            all.iter()
                .filter(|entry| entry.species.generation == g)
                .cloned()
                .collect(),
        ),
    }
}
