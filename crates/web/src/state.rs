use std::sync::Arc;

use storage::ScoreStore;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ScoreStore>,
}

impl AppState {
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &dyn ScoreStore {
        self.store.as_ref()
    }
}
