//! List presenter: owns the place sequence, the sort mode and the load lifecycle.
//!
//! The presenter knows nothing about terminals. It pushes state to a
//! [`DisplaySurface`] and reads/writes the sort preference through a
//! [`PreferenceStore`]. A load runs as a spawned task whose single result is
//! delivered over a oneshot channel and applied on the caller's thread.

use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::data::{
    sorted_sequence, Place, PlaceError, PlaceRepository, PreferenceStore, SortMode, SORT_MODE_KEY,
};

/// Alert text for a failed load that carries no description
pub const GENERIC_LOAD_FAILURE: &str = "Unable to load places";

/// Where the presenter sends its output
pub trait DisplaySurface {
    /// Redraw the list with the given (already sorted) places
    fn render(&mut self, places: &[Place]);

    /// Enter or leave the busy state (progress shown, sort action disabled)
    fn set_busy(&mut self, busy: bool);

    /// Present a one-shot titled message
    fn show_alert(&mut self, title: &str, message: &str);
}

type LoadResult = Result<Vec<Place>, PlaceError>;
type SelectionHandler = Box<dyn FnMut(&Place)>;

pub struct ListPresenter<D: DisplaySurface> {
    repository: Arc<dyn PlaceRepository>,
    preferences: Box<dyn PreferenceStore>,
    surface: D,
    /// `None` until something has been loaded
    places: Option<Vec<Place>>,
    sort_mode: SortMode,
    in_flight: Option<oneshot::Receiver<LoadResult>>,
    on_select: Option<SelectionHandler>,
}

impl<D: DisplaySurface> ListPresenter<D> {
    pub fn new(
        repository: Arc<dyn PlaceRepository>,
        preferences: Box<dyn PreferenceStore>,
        surface: D,
    ) -> Self {
        let sort_mode = match preferences.get_int(SORT_MODE_KEY) {
            Ok(Some(code)) => SortMode::from_code(code).unwrap_or_else(|| {
                warn!(code, "unknown sort mode preference, using default");
                SortMode::default()
            }),
            Ok(None) => SortMode::default(),
            Err(e) => {
                warn!(error = %e, "failed to read sort mode preference");
                SortMode::default()
            }
        };

        ListPresenter {
            repository,
            preferences,
            surface,
            places: None,
            sort_mode,
            in_flight: None,
            on_select: None,
        }
    }

    /// Show whatever was persisted locally, if anything
    pub fn initialize(&mut self) {
        match self.repository.persisted_places() {
            Ok(Some(places)) => {
                debug!(count = places.len(), "restored persisted places");
                self.replace_places(places);
            }
            Ok(None) => debug!("no persisted places"),
            Err(e) => warn!(error = %e, "failed to read persisted places"),
        }
    }

    /// Start a remote fetch. Returns `false` if one is already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn begin_load(&mut self) -> bool {
        if self.in_flight.is_some() {
            debug!("load already in flight, ignoring");
            return false;
        }

        let (tx, rx) = oneshot::channel();
        let repository = Arc::clone(&self.repository);
        tokio::spawn(async move {
            let result = repository.all_places().await;
            // Receiver gone means the presenter was dropped
            let _ = tx.send(result);
        });

        self.in_flight = Some(rx);
        self.surface.set_busy(true);
        info!("loading places");
        true
    }

    /// Apply the in-flight result if it has arrived. Never blocks.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = self.in_flight.as_mut() else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => self.complete_load(result),
            Err(TryRecvError::Empty) => return false,
            // Sender dropped without a result: the fetch task died
            Err(TryRecvError::Closed) => self.complete_load(Err(PlaceError::Unspecified)),
        }
        true
    }

    /// Wait for the in-flight fetch, if any, and apply its result
    pub async fn finish_load(&mut self) {
        let Some(rx) = self.in_flight.take() else {
            return;
        };
        let result = rx.await.unwrap_or(Err(PlaceError::Unspecified));
        self.complete_load(result);
    }

    /// Apply a fetch result: persist and show on success, alert on failure
    pub fn complete_load(&mut self, result: LoadResult) {
        self.in_flight = None;
        self.surface.set_busy(false);

        match result {
            Ok(places) => {
                info!(count = places.len(), "loaded places");
                if let Err(e) = self.repository.save_places(&places) {
                    warn!(error = %e, "failed to persist places");
                }
                self.replace_places(places);
            }
            Err(e) => {
                warn!(error = %e, "failed to load places");
                let message = e
                    .description()
                    .unwrap_or_else(|| GENERIC_LOAD_FAILURE.to_string());
                self.surface.show_alert("Error", &message);
            }
        }
    }

    /// Switch sort mode, persisting the choice. Same mode is a no-op.
    pub fn set_sort_mode(&mut self, mode: SortMode) {
        if mode == self.sort_mode {
            return;
        }

        self.sort_mode = mode;
        if let Err(e) = self.preferences.set_int(SORT_MODE_KEY, mode.code()) {
            warn!(error = %e, "failed to persist sort mode");
        }
        info!(%mode, "sort mode changed");

        self.apply_sort();
        self.render();
    }

    /// Result of the sort menu. `None` means the menu was cancelled.
    pub fn choose_sort(&mut self, choice: Option<SortMode>) {
        if self.is_busy() {
            return;
        }
        if let Some(mode) = choice {
            self.set_sort_mode(mode);
        }
    }

    /// Register the hook invoked when a place is selected
    pub fn set_selection_handler(&mut self, handler: impl FnMut(&Place) + 'static) {
        self.on_select = Some(Box::new(handler));
    }

    /// Select the place at a displayed index, invoking the selection hook
    pub fn select(&mut self, index: usize) -> Option<&Place> {
        let place = self.places.as_ref()?.get(index)?;
        if let Some(handler) = self.on_select.as_mut() {
            handler(place);
        }
        Some(place)
    }

    pub fn places(&self) -> Option<&[Place]> {
        self.places.as_deref()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    fn replace_places(&mut self, places: Vec<Place>) {
        self.places = Some(places);
        self.apply_sort();
        self.render();
    }

    fn apply_sort(&mut self) {
        if let Some(places) = self.places.as_mut() {
            *places = sorted_sequence(places, self.sort_mode);
        }
    }

    /// Push the current sequence. Nothing is pushed while unloaded.
    fn render(&mut self) {
        if let Some(places) = self.places.as_deref() {
            self.surface.render(places);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::sync::Mutex;

    use async_trait::async_trait;

    type DataResult<T> = Result<T, PlaceError>;

    #[derive(Default)]
    struct FakeRepository {
        persisted: Mutex<Option<Vec<Place>>>,
        fetch: Mutex<Option<DataResult<Vec<Place>>>>,
        saved: Mutex<Vec<Vec<Place>>>,
        fail_read: bool,
        fail_save: bool,
    }

    impl FakeRepository {
        fn fetching(result: DataResult<Vec<Place>>) -> Self {
            FakeRepository {
                fetch: Mutex::new(Some(result)),
                ..Default::default()
            }
        }

        fn saved(&self) -> Vec<Vec<Place>> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlaceRepository for FakeRepository {
        fn persisted_places(&self) -> DataResult<Option<Vec<Place>>> {
            if self.fail_read {
                return Err(PlaceError::Unspecified);
            }
            Ok(self.persisted.lock().unwrap().clone())
        }

        async fn all_places(&self) -> DataResult<Vec<Place>> {
            self.fetch
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(PlaceError::Unspecified))
        }

        fn save_places(&self, places: &[Place]) -> DataResult<()> {
            self.saved.lock().unwrap().push(places.to_vec());
            if self.fail_save {
                return Err(PlaceError::Unspecified);
            }
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MemoryPreferences {
        values: Rc<RefCell<HashMap<String, i64>>>,
        fail: bool,
    }

    impl MemoryPreferences {
        fn failing() -> Self {
            MemoryPreferences {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl PreferenceStore for MemoryPreferences {
        fn get_int(&self, key: &str) -> DataResult<Option<i64>> {
            if self.fail {
                return Err(PlaceError::Unspecified);
            }
            Ok(self.values.borrow().get(key).copied())
        }

        fn set_int(&mut self, key: &str, value: i64) -> DataResult<()> {
            if self.fail {
                return Err(PlaceError::Unspecified);
            }
            self.values.borrow_mut().insert(key.to_string(), value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        renders: Vec<Vec<String>>,
        busy: Vec<bool>,
        alerts: Vec<(String, String)>,
    }

    impl DisplaySurface for RecordingSurface {
        fn render(&mut self, places: &[Place]) {
            self.renders
                .push(places.iter().map(|p| p.name.clone()).collect());
        }

        fn set_busy(&mut self, busy: bool) {
            self.busy.push(busy);
        }

        fn show_alert(&mut self, title: &str, message: &str) {
            self.alerts.push((title.to_string(), message.to_string()));
        }
    }

    fn sample() -> Vec<Place> {
        vec![
            Place::new("Bistro", 4.0),
            Place::new("Cafe", 4.0),
            Place::new("Deli", 5.0),
        ]
    }

    fn presenter_with(
        repository: Arc<FakeRepository>,
        prefs: MemoryPreferences,
    ) -> ListPresenter<RecordingSurface> {
        ListPresenter::new(repository, Box::new(prefs), RecordingSurface::default())
    }

    fn names(places: Option<&[Place]>) -> Vec<&str> {
        places
            .unwrap_or(&[])
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    #[test]
    fn test_default_mode_without_preference() {
        let presenter = presenter_with(Arc::default(), MemoryPreferences::default());
        assert_eq!(presenter.sort_mode(), SortMode::ByRating);
    }

    #[test]
    fn test_unknown_preference_falls_back_to_rating() {
        let prefs = MemoryPreferences::default();
        prefs.values.borrow_mut().insert(SORT_MODE_KEY.into(), 42);
        let presenter = presenter_with(Arc::default(), prefs);
        assert_eq!(presenter.sort_mode(), SortMode::ByRating);
    }

    #[test]
    fn test_stored_preference_is_used() {
        let prefs = MemoryPreferences::default();
        prefs
            .values
            .borrow_mut()
            .insert(SORT_MODE_KEY.into(), SortMode::ByName.code());
        let presenter = presenter_with(Arc::default(), prefs);
        assert_eq!(presenter.sort_mode(), SortMode::ByName);
    }

    #[test]
    fn test_initialize_sorts_persisted_places() {
        let repository = Arc::new(FakeRepository::default());
        *repository.persisted.lock().unwrap() = Some(sample());
        let mut presenter = presenter_with(repository, MemoryPreferences::default());

        presenter.initialize();

        assert_eq!(names(presenter.places()), vec!["Deli", "Bistro", "Cafe"]);
        assert_eq!(presenter.surface().renders.len(), 1);
    }

    #[test]
    fn test_initialize_without_persisted_places_stays_unloaded() {
        let mut presenter = presenter_with(Arc::default(), MemoryPreferences::default());
        presenter.initialize();
        assert!(presenter.places().is_none());
        assert!(presenter.surface().renders.is_empty());
    }

    #[test]
    fn test_set_sort_mode_twice_renders_once_and_persists() {
        let prefs = MemoryPreferences::default();
        let mut presenter = presenter_with(Arc::default(), prefs.clone());
        presenter.complete_load(Ok(sample()));
        let renders_before = presenter.surface().renders.len();

        presenter.set_sort_mode(SortMode::ByName);
        presenter.set_sort_mode(SortMode::ByName);

        assert_eq!(presenter.surface().renders.len(), renders_before + 1);
        assert_eq!(names(presenter.places()), vec!["Bistro", "Cafe", "Deli"]);
        assert_eq!(
            prefs.values.borrow().get(SORT_MODE_KEY).copied(),
            Some(SortMode::ByName.code())
        );
    }

    #[test]
    fn test_set_same_mode_is_noop() {
        let prefs = MemoryPreferences::default();
        let mut presenter = presenter_with(Arc::default(), prefs.clone());
        presenter.set_sort_mode(SortMode::ByRating);
        assert!(presenter.surface().renders.is_empty());
        assert!(prefs.values.borrow().is_empty());
    }

    #[test]
    fn test_sort_change_before_load_keeps_unloaded() {
        let mut presenter = presenter_with(Arc::default(), MemoryPreferences::default());
        presenter.set_sort_mode(SortMode::ByName);
        assert!(presenter.places().is_none());
        assert_eq!(presenter.sort_mode(), SortMode::ByName);
        assert!(
            presenter.surface().renders.is_empty(),
            "unloaded list must not be shown as empty"
        );
    }

    #[test]
    fn test_sort_change_after_empty_load_renders_empty_list() {
        let mut presenter = presenter_with(Arc::default(), MemoryPreferences::default());
        presenter.complete_load(Ok(Vec::new()));
        presenter.set_sort_mode(SortMode::ByName);

        assert_eq!(presenter.places(), Some(&[][..]));
        assert_eq!(presenter.surface().renders, vec![Vec::<String>::new(); 2]);
    }

    #[test]
    fn test_preference_read_error_falls_back_to_rating() {
        let presenter = presenter_with(Arc::default(), MemoryPreferences::failing());
        assert_eq!(presenter.sort_mode(), SortMode::ByRating);
    }

    #[test]
    fn test_preference_write_error_still_switches_mode() {
        let mut presenter = presenter_with(Arc::default(), MemoryPreferences::failing());
        presenter.complete_load(Ok(sample()));

        presenter.set_sort_mode(SortMode::ByName);

        assert_eq!(presenter.sort_mode(), SortMode::ByName);
        assert_eq!(names(presenter.places()), vec!["Bistro", "Cafe", "Deli"]);
        assert_eq!(presenter.surface().renders.len(), 2);
    }

    #[test]
    fn test_storage_read_error_counts_as_unloaded() {
        let repository = Arc::new(FakeRepository {
            fail_read: true,
            ..Default::default()
        });
        *repository.persisted.lock().unwrap() = Some(sample());
        let mut presenter = presenter_with(repository, MemoryPreferences::default());

        presenter.initialize();

        assert!(presenter.places().is_none());
        assert!(presenter.surface().renders.is_empty());
        assert!(presenter.surface().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_save_error_still_shows_fetched_places() {
        let repository = Arc::new(FakeRepository {
            fail_save: true,
            ..FakeRepository::fetching(Ok(sample()))
        });
        let mut presenter = presenter_with(repository.clone(), MemoryPreferences::default());

        presenter.begin_load();
        presenter.finish_load().await;

        assert!(!presenter.is_busy());
        assert_eq!(repository.saved(), vec![sample()]);
        assert_eq!(names(presenter.places()), vec!["Deli", "Bistro", "Cafe"]);
        assert!(presenter.surface().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_load_success_saves_fetched_sequence_and_renders_sorted() {
        let repository = Arc::new(FakeRepository::fetching(Ok(sample())));
        let mut presenter = presenter_with(repository.clone(), MemoryPreferences::default());

        assert!(presenter.begin_load());
        assert!(presenter.is_busy());
        presenter.finish_load().await;

        assert!(!presenter.is_busy());
        assert_eq!(presenter.surface().busy, vec![true, false]);
        assert_eq!(repository.saved(), vec![sample()]);
        assert_eq!(names(presenter.places()), vec!["Deli", "Bistro", "Cafe"]);
        assert_eq!(
            presenter.surface().renders.last().unwrap(),
            &vec!["Deli", "Bistro", "Cafe"]
        );
        assert!(presenter.surface().alerts.is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_sequence_and_alerts() {
        let repository = Arc::new(FakeRepository::fetching(Err(PlaceError::Status {
            status: 500,
        })));
        *repository.persisted.lock().unwrap() = Some(sample());
        let mut presenter = presenter_with(repository.clone(), MemoryPreferences::default());
        presenter.initialize();
        let before: Vec<Place> = presenter.places().unwrap().to_vec();

        presenter.begin_load();
        presenter.finish_load().await;

        assert!(!presenter.is_busy());
        assert_eq!(presenter.places().unwrap(), before.as_slice());
        assert!(repository.saved().is_empty());
        assert_eq!(
            presenter.surface().alerts,
            vec![(
                "Error".to_string(),
                "Server responded with status 500".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_failure_without_description_shows_generic_alert() {
        let repository = Arc::new(FakeRepository::fetching(Err(PlaceError::Unspecified)));
        let mut presenter = presenter_with(repository, MemoryPreferences::default());

        presenter.begin_load();
        presenter.finish_load().await;

        assert!(presenter.places().is_none());
        assert_eq!(presenter.surface().alerts[0].1, GENERIC_LOAD_FAILURE);
    }

    #[tokio::test]
    async fn test_second_begin_load_while_in_flight_is_rejected() {
        let repository = Arc::new(FakeRepository::fetching(Ok(sample())));
        let mut presenter = presenter_with(repository.clone(), MemoryPreferences::default());

        assert!(presenter.begin_load());
        assert!(!presenter.begin_load());
        assert_eq!(presenter.surface().busy, vec![true]);

        presenter.finish_load().await;
        assert_eq!(repository.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_poll_load_applies_result_when_ready() {
        let repository = Arc::new(FakeRepository::fetching(Ok(sample())));
        let mut presenter = presenter_with(repository, MemoryPreferences::default());
        assert!(!presenter.poll_load());

        presenter.begin_load();
        let mut applied = false;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            if presenter.poll_load() {
                applied = true;
                break;
            }
        }

        assert!(applied);
        assert!(!presenter.is_busy());
        assert_eq!(presenter.places().map(|p| p.len()), Some(3));
    }

    #[tokio::test]
    async fn test_sort_menu_ignored_while_busy() {
        let repository = Arc::new(FakeRepository::fetching(Ok(sample())));
        let mut presenter = presenter_with(repository, MemoryPreferences::default());

        presenter.begin_load();
        presenter.choose_sort(Some(SortMode::ByName));
        assert_eq!(presenter.sort_mode(), SortMode::ByRating);

        presenter.finish_load().await;
        presenter.choose_sort(None);
        assert_eq!(presenter.sort_mode(), SortMode::ByRating);
        presenter.choose_sort(Some(SortMode::ByName));
        assert_eq!(presenter.sort_mode(), SortMode::ByName);
    }

    #[test]
    fn test_select_invokes_handler_with_displayed_place() {
        let mut presenter = presenter_with(Arc::default(), MemoryPreferences::default());
        let picked = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picked);
        presenter.set_selection_handler(move |place| sink.borrow_mut().push(place.name.clone()));

        assert!(presenter.select(0).is_none());

        presenter.complete_load(Ok(sample()));
        assert_eq!(presenter.select(0).map(|p| p.name.as_str()), Some("Deli"));
        assert!(presenter.select(10).is_none());
        assert_eq!(*picked.borrow(), vec!["Deli".to_string()]);
    }
}
