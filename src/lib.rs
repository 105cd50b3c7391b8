//! # lockerdb
//!
//! A flat-file JSON record store for a local media collection: one store per
//! collection kind (movies, actors), an in-memory collection of keyed
//! records, and a single human-readable JSON document on disk that is
//! rewritten atomically after every mutation.
//!
//! ## Core Concepts
//!
//! - **Records**: Typed entries (movie, actor) keyed by a unique field
//! - **Store**: The only mutation surface — lookup, add, update, soft delete
//! - **Coercion**: Menu-supplied string values are coerced to each field's
//!   stored type on write
//! - **Persistence**: Load-or-create at open, full-document rewrite after
//!   every mutation
//!
//! ## Example
//!
//! ```no_run
//! use lockerdb::{MovieStore, Result};
//!
//! fn main() -> Result<()> {
//!     let mut movies = MovieStore::open("moviedb.json")?;
//!
//!     movies.add("Straight/Jane Doe/clip.mkv")?;
//!     movies.update("Straight/Jane Doe/clip.mkv", "playcount", "3")?;
//!     movies.rate("Straight/Jane Doe/clip.mkv", "5")?;
//!
//!     for movie in movies.records() {
//!         if movie.rating.map_or(false, |r| r >= 4) {
//!             println!("{}", movie.rel_path);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod records;
pub mod store;
pub mod types;

// Re-exports
pub use error::{Result, StoreError};
pub use records::{ActorField, ActorRecord, MovieField, MovieRecord, StoreRecord};
pub use store::RecordStore;
pub use types::{FieldValue, Timestamp};

/// Store over movie records, keyed by relative file path.
pub type MovieStore = RecordStore<MovieRecord>;

/// Store over actor records, keyed by display name.
pub type ActorStore = RecordStore<ActorRecord>;
