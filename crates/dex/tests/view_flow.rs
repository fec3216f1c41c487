use async_trait::async_trait;
use companion_catalog::{AssetSource, CatalogStore, DirAssetSource};
use companion_dex::{DexView, DexViewState, MergedEntry};
use companion_progress::SnapshotSource;
use pretty_assertions::assert_eq;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

fn species_json(name: &str, number: u32) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "nationalPokedexNumber": {number},
            "primaryType": "grass",
            "abilities": ["overgrow"],
            "baseStats": {{"hp": 45, "atk": 49, "def": 49, "spa": 65, "spd": 65, "spe": 45}},
            "catchRate": 45,
            "maleRatio": 0.875,
            "femaleRatio": 0.125
        }}"#
    )
}

fn snapshot_json(aspects: &str) -> String {
    format!(
        r#"{{
            "uuid": "u-1",
            "starterPrompted": true,
            "starterLocked": false,
            "starterSelected": true,
            "advancementData": {{
                "totalCaptureCount": 1,
                "aspectsCollected": {{{aspects}}}
            }}
        }}"#
    )
}

async fn write_starters(root: &Path) {
    let gen1 = root.join("gen1");
    tokio::fs::create_dir_all(&gen1).await.unwrap();
    for (name, number) in [("Bulbasaur", 1), ("Ivysaur", 2), ("Charmander", 4)] {
        tokio::fs::write(
            gen1.join(format!("{}.json", name.to_lowercase())),
            species_json(name, number),
        )
        .await
        .unwrap();
    }
}

async fn starter_view(temp: &TempDir) -> DexView {
    write_starters(temp.path()).await;
    DexView::new(Arc::new(CatalogStore::new(Arc::new(DirAssetSource::new(
        temp.path(),
    )))))
}

fn ready(state: &DexViewState) -> &companion_dex::ReadyView {
    match state {
        DexViewState::Ready(ready) => ready,
        other => panic!("expected Ready, got {other:?}"),
    }
}

fn numbers(entries: &[MergedEntry]) -> Vec<u32> {
    entries
        .iter()
        .map(|e| e.species.national_pokedex_number)
        .collect()
}

struct BytesSource(Vec<u8>);

#[async_trait]
impl SnapshotSource for BytesSource {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

struct BrokenSource;

#[async_trait]
impl SnapshotSource for BrokenSource {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
    }
}

#[tokio::test]
async fn activate_reaches_ready_in_dex_order() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    let mut updates = view.subscribe();

    assert!(matches!(view.state(), DexViewState::Idle));
    view.activate().await;

    let state = view.state();
    let ready = ready(&state);
    assert_eq!(numbers(&ready.all_entries), vec![1, 2, 4]);
    assert_eq!(numbers(&ready.displayed_entries), vec![1, 2, 4]);
    assert_eq!(ready.selected_generation, None);
    assert!(ready.all_entries.iter().all(|e| !e.captured));

    // Subscribers saw the transition without polling.
    assert!(updates.has_changed().unwrap());
    updates.mark_unchanged();
    assert!(matches!(*updates.borrow(), DexViewState::Ready(_)));
}

#[tokio::test]
async fn generation_filter_is_a_subset_of_all_entries() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    view.activate().await;

    view.select_generation(Some(1));
    let state = view.state();
    let r = ready(&state);
    assert_eq!(r.selected_generation, Some(1));
    assert_eq!(numbers(&r.displayed_entries), vec![1, 2, 4]);

    view.select_generation(Some(2));
    let state = view.state();
    let r = ready(&state);
    assert_eq!(numbers(&r.displayed_entries), Vec::<u32>::new());
    assert_eq!(numbers(&r.all_entries), vec![1, 2, 4]);

    view.select_generation(None);
    let state = view.state();
    let r = ready(&state);
    assert_eq!(numbers(&r.displayed_entries), vec![1, 2, 4]);
    assert_eq!(r.selected_generation, None);
}

#[tokio::test]
async fn select_generation_outside_ready_is_ignored() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    view.select_generation(Some(1));
    assert!(matches!(view.state(), DexViewState::Idle));
}

#[tokio::test]
async fn import_before_activation_is_applied_once_ready() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;

    let source = BytesSource(
        snapshot_json(r#""src:bulbasaur": ["shiny"]"#).into_bytes(),
    );
    view.import_progress(&source).await.unwrap();
    assert!(matches!(view.state(), DexViewState::Idle));

    view.activate().await;
    let state = view.state();
    let r = ready(&state);
    assert!(r.all_entries[0].captured);
    assert_eq!(r.all_entries[0].aspects, vec!["shiny".to_string()]);
    assert!(!r.all_entries[1].captured);
    assert!(!r.all_entries[2].captured);
}

#[tokio::test]
async fn import_while_ready_replaces_entries_and_keeps_filter() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    view.activate().await;
    view.select_generation(Some(1));

    let source = BytesSource(
        snapshot_json(r#""src:Bulbasaur ": ["shiny", "male"]"#).into_bytes(),
    );
    view.import_progress(&source).await.unwrap();

    let state = view.state();
    let r = ready(&state);
    assert_eq!(r.selected_generation, Some(1));
    assert_eq!(r.captured_count(), 1);
    assert!(r.displayed_entries[0].captured);
    assert_eq!(
        r.displayed_entries[0].aspects,
        vec!["shiny".to_string(), "male".to_string()]
    );
}

#[tokio::test]
async fn later_import_supersedes_earlier_one() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    view.activate().await;

    let first = BytesSource(snapshot_json(r#""src:bulbasaur": []"#).into_bytes());
    let second = BytesSource(snapshot_json(r#""src:ivysaur": []"#).into_bytes());
    view.import_progress(&first).await.unwrap();
    view.import_progress(&second).await.unwrap();

    let state = view.state();
    let r = ready(&state);
    assert!(!r.all_entries[0].captured);
    assert!(r.all_entries[1].captured);
}

#[tokio::test]
async fn failed_import_leaves_ready_state_untouched() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    view.activate().await;
    view.select_generation(Some(1));
    let before = view.state();

    assert!(view.import_progress(&BrokenSource).await.is_err());
    let malformed = BytesSource(b"{\"uuid\": 7}".to_vec());
    assert!(view.import_progress(&malformed).await.is_err());

    let after = view.state();
    assert_eq!(ready(&before).all_entries, ready(&after).all_entries);
    assert_eq!(
        ready(&before).displayed_entries,
        ready(&after).displayed_entries
    );
    assert_eq!(ready(&after).selected_generation, Some(1));
}

/// Counts root enumerations so duplicate load passes are visible.
struct CountingSource {
    inner: DirAssetSource,
    root_lists: AtomicUsize,
}

#[async_trait]
impl AssetSource for CountingSource {
    async fn list(&self, path: &str) -> io::Result<Vec<String>> {
        if path.is_empty() {
            self.root_lists.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.list(path).await
    }

    async fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.inner.read(path).await
    }
}

#[tokio::test]
async fn repeated_activation_does_not_reload() {
    let temp = TempDir::new().unwrap();
    write_starters(temp.path()).await;
    let source = Arc::new(CountingSource {
        inner: DirAssetSource::new(temp.path()),
        root_lists: AtomicUsize::new(0),
    });
    let view = Arc::new(DexView::new(Arc::new(CatalogStore::new(source.clone()))));

    tokio::join!(view.activate(), view.activate());
    view.activate().await;

    assert!(matches!(view.state(), DexViewState::Ready(_)));
    assert_eq!(source.root_lists.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_catalog_is_ready_not_error() {
    let temp = TempDir::new().unwrap();
    let view = DexView::new(Arc::new(CatalogStore::new(Arc::new(DirAssetSource::new(
        temp.path(),
    )))));
    view.activate().await;
    let state = view.state();
    assert!(ready(&state).all_entries.is_empty());
}

#[tokio::test]
async fn load_failure_reaches_error_and_retry_recovers() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("species");
    let view = DexView::new(Arc::new(CatalogStore::new(Arc::new(DirAssetSource::new(
        &root,
    )))));

    view.activate().await;
    assert!(matches!(view.state(), DexViewState::Error { .. }));

    // Re-activation stays a no-op even in the error state.
    view.activate().await;
    assert!(matches!(view.state(), DexViewState::Error { .. }));

    // Retry from anywhere but Error is ignored; from Error it reloads.
    write_starters(&root).await;
    view.retry().await;
    let state = view.state();
    assert_eq!(numbers(&ready(&state).all_entries), vec![1, 2, 4]);

    view.retry().await;
    assert!(matches!(view.state(), DexViewState::Ready(_)));
}

#[tokio::test]
async fn species_lookup_is_independent_of_view_state() {
    let temp = TempDir::new().unwrap();
    let view = starter_view(&temp).await;
    // No activate() call; the lookup loads the catalog on its own.
    let found = view.species_by_name("Ivysaur").await.unwrap().unwrap();
    assert_eq!(found.national_pokedex_number, 2);
    assert!(matches!(view.state(), DexViewState::Idle));
}
