//! Data facade combining the remote client and local storage.

use async_trait::async_trait;

use super::error::{PlaceError, Result};
use super::models::Place;
use super::remote::RemoteClient;
use super::storage::Storage;

/// Key under which the sort mode code is stored
pub const SORT_MODE_KEY: &str = "places.sort_mode";

/// Source and sink for the place list
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    /// Locally persisted places, `None` if nothing was ever saved
    fn persisted_places(&self) -> Result<Option<Vec<Place>>>;

    /// Fetch the full list from the remote source
    async fn all_places(&self) -> Result<Vec<Place>>;

    /// Replace the locally persisted list
    fn save_places(&self, places: &[Place]) -> Result<()>;
}

/// Integer key-value store for user preferences
pub trait PreferenceStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<()>;
}

impl PreferenceStore for Storage {
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Storage::get_int(self, key)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        Storage::set_int(self, key, value)
    }
}

/// Repository backed by SQLite and an optional HTTP endpoint
pub struct PlaceService {
    storage: Storage,
    remote: Option<RemoteClient>,
}

impl PlaceService {
    pub fn new(storage: Storage, remote: Option<RemoteClient>) -> Self {
        PlaceService { storage, remote }
    }
}

#[async_trait]
impl PlaceRepository for PlaceService {
    fn persisted_places(&self) -> Result<Option<Vec<Place>>> {
        self.storage.load_places()
    }

    async fn all_places(&self) -> Result<Vec<Place>> {
        match &self.remote {
            Some(remote) => remote.fetch_places().await,
            None => Err(PlaceError::NotConfigured),
        }
    }

    fn save_places(&self, places: &[Place]) -> Result<()> {
        self.storage.save_places(places)
    }
}
