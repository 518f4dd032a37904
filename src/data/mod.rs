//! Data layer for places: models, local SQLite storage and the remote client.
//!
//! `PlaceService` ties storage and remote together behind `PlaceRepository`.

mod error;
mod models;
mod remote;
mod repository;
mod storage;

pub use error::PlaceError;
pub use models::{sorted_sequence, Place, SortMode};
pub use remote::RemoteClient;
pub use repository::{PlaceRepository, PlaceService, PreferenceStore, SORT_MODE_KEY};
pub use storage::Storage;
