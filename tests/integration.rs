//! Integration tests for the record store.

use lockerdb::{ActorStore, MovieStore};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn movie_store(dir: &TempDir) -> MovieStore {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    MovieStore::open(dir.path().join("moviedb.json")).unwrap()
}

fn actor_store(dir: &TempDir) -> ActorStore {
    ActorStore::open(dir.path().join("actordb.json")).unwrap()
}

// --- Bootstrap ---

#[test]
fn test_open_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("moviedb.json");

    let store = MovieStore::open(&path).unwrap();
    assert!(store.is_empty());
    assert!(path.exists());
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn test_open_empty_file_yields_empty_collection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("moviedb.json");
    std::fs::write(&path, b"").unwrap();

    let store = MovieStore::open(&path).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_open_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/deeper/moviedb.json");

    let store = MovieStore::open(&path).unwrap();
    assert!(store.is_empty());
    assert!(path.exists());
}

// --- Add ---

#[test]
fn test_add_then_exists() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);

    for key in ["A/m1.mkv", "B/m2.mkv", "A/m3.mkv"] {
        store.add(key).unwrap();
        assert!(store.exists(key));
    }
    assert_eq!(store.len(), 3);
}

#[test]
fn test_add_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);

    store.add("A/m.mkv").unwrap();
    store.add("A/m.mkv").unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(
        store.records().iter().filter(|m| m.rel_path == "A/m.mkv").count(),
        1
    );
}

#[test]
fn test_add_defaults() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);

    store.add("A/movie1.mkv").unwrap();

    let movie = store.get("A/movie1.mkv").unwrap();
    assert_eq!(movie.actor, "A");
    assert_eq!(movie.rating, None);
    assert_eq!(movie.playcount, 0);
    assert_eq!(movie.category, "Straight");
    assert!(movie.is_valid);
}

#[test]
fn test_add_derives_actor_from_nested_path() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);

    store.add("Straight/Jane Doe/clip.mkv").unwrap();
    assert_eq!(store.get("Straight/Jane Doe/clip.mkv").unwrap().actor, "Jane Doe");
}

// --- Update ---

#[test]
fn test_update_coerces_and_persists() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();
    let before = store.get("A/m.mkv").unwrap().timestamp;

    thread::sleep(Duration::from_millis(2));
    store.update("A/m.mkv", "playcount", "3").unwrap();

    // A fresh load from disk sees the coerced integer and a later timestamp.
    let reloaded = movie_store(&dir);
    let movie = reloaded.get("A/m.mkv").unwrap();
    assert_eq!(movie.playcount, 3);
    assert!(movie.timestamp > before);
}

#[test]
fn test_update_absent_key_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();
    let before = store.records().to_vec();

    store.update("B/missing.mkv", "playcount", "3").unwrap();

    assert_eq!(store.records(), &before[..]);
    assert_eq!(movie_store(&dir).records(), &before[..]);
}

#[test]
fn test_update_refreshes_timestamp_on_every_field() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();

    let mut last = store.get("A/m.mkv").unwrap().timestamp;
    for (field, value) in [("category", "Split"), ("note", "keep"), ("actor", "B")] {
        thread::sleep(Duration::from_millis(2));
        store.update("A/m.mkv", field, value).unwrap();
        let now = store.get("A/m.mkv").unwrap().timestamp;
        assert!(now > last, "timestamp did not advance for {field}");
        last = now;
    }
}

#[test]
fn test_update_flags() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();

    store.update("A/m.mkv", "delete", "True").unwrap();
    store.update("A/m.mkv", "split", true).unwrap();
    let movie = store.get("A/m.mkv").unwrap();
    assert!(movie.delete);
    assert!(movie.split);

    // Anything that is not true/"True" reads as false.
    store.update("A/m.mkv", "delete", "no").unwrap();
    assert!(!store.get("A/m.mkv").unwrap().delete);
}

// --- Rate ---

#[test]
fn test_rate_actor_from_digit_string() {
    let dir = TempDir::new().unwrap();
    let mut store = actor_store(&dir);
    store.add("Jane Doe").unwrap();

    store.rate("Jane Doe", "5").unwrap();

    assert_eq!(store.get("Jane Doe").unwrap().rating, Some(5));
    assert_eq!(actor_store(&dir).get("Jane Doe").unwrap().rating, Some(5));
}

#[test]
fn test_rate_null_clears_rating() {
    let dir = TempDir::new().unwrap();
    let mut store = actor_store(&dir);
    store.add("Jane Doe").unwrap();
    store.rate("Jane Doe", "4").unwrap();

    store.rate("Jane Doe", None::<i64>).unwrap();
    assert_eq!(store.get("Jane Doe").unwrap().rating, None);
}

// --- Remove and cleanup ---

#[test]
fn test_remove_then_cleanup() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m1.mkv").unwrap();
    store.add("A/m2.mkv").unwrap();

    store.remove("A/m1.mkv").unwrap();

    // Soft-deleted: still present, flagged invalid.
    assert!(store.exists("A/m1.mkv"));
    assert_eq!(store.len(), 2);
    assert!(!store.get("A/m1.mkv").unwrap().is_valid);

    let dropped = store.cleanup().unwrap();
    assert_eq!(dropped, 1);
    assert!(!store.exists("A/m1.mkv"));
    assert_eq!(store.len(), 1);
    assert_eq!(movie_store(&dir).len(), 1);
}

#[test]
fn test_readd_of_soft_deleted_key_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();
    store.remove("A/m.mkv").unwrap();

    store.add("A/m.mkv").unwrap();

    assert_eq!(store.len(), 1);
    assert!(!store.get("A/m.mkv").unwrap().is_valid);
}

#[test]
fn test_cleanup_with_nothing_to_drop() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();

    assert_eq!(store.cleanup().unwrap(), 0);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_remove_absent_key_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m.mkv").unwrap();

    store.remove("B/missing.mkv").unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.get("A/m.mkv").unwrap().is_valid);
}

// --- Persistence ---

#[test]
fn test_roundtrip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);

    store.add("Straight/Jane Doe/clip.mkv").unwrap();
    store.add("A/m2.mkv").unwrap();
    store.update("Straight/Jane Doe/clip.mkv", "rating", "4").unwrap();
    store.update("Straight/Jane Doe/clip.mkv", "playcount", 7).unwrap();
    store.update("Straight/Jane Doe/clip.mkv", "note", "two scenes").unwrap();
    store.update("A/m2.mkv", "split", "True").unwrap();
    store.remove("A/m2.mkv").unwrap();

    let reloaded = movie_store(&dir);
    assert_eq!(reloaded.records(), store.records());
}

#[test]
fn test_every_mutation_persists_immediately() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);

    store.add("A/m.mkv").unwrap();
    assert_eq!(movie_store(&dir).len(), 1);

    store.update("A/m.mkv", "rating", "2").unwrap();
    assert_eq!(movie_store(&dir).get("A/m.mkv").unwrap().rating, Some(2));

    store.remove("A/m.mkv").unwrap();
    assert!(!movie_store(&dir).get("A/m.mkv").unwrap().is_valid);

    store.cleanup().unwrap();
    assert!(movie_store(&dir).is_empty());
}

#[test]
fn test_insertion_order_is_preserved() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    let keys = ["C/m1.mkv", "A/m2.mkv", "B/m3.mkv"];
    for key in keys {
        store.add(key).unwrap();
    }

    let reloaded = movie_store(&dir);
    let loaded: Vec<&str> = reloaded.records().iter().map(|m| m.rel_path.as_str()).collect();
    assert_eq!(loaded, keys);
}

#[test]
fn test_get_index_returns_first_match() {
    let dir = TempDir::new().unwrap();
    let mut store = movie_store(&dir);
    store.add("A/m1.mkv").unwrap();
    store.add("A/m2.mkv").unwrap();

    assert_eq!(store.get_index("A/m1.mkv"), Some(0));
    assert_eq!(store.get_index("A/m2.mkv"), Some(1));
    assert_eq!(store.get_index("A/missing.mkv"), None);
}

#[test]
fn test_two_stores_over_separate_collections() {
    let dir = TempDir::new().unwrap();
    let mut movies = movie_store(&dir);
    let mut actors = actor_store(&dir);

    movies.add("Straight/Jane Doe/clip.mkv").unwrap();
    actors.add("Jane Doe").unwrap();
    actors.rate("Jane Doe", "5").unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(actors.len(), 1);
    assert!(!movies.exists("Jane Doe"));
}
