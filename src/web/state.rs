use crate::analysis::Analyzer;
use crate::storage::ComplaintStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ComplaintStore,
    pub analyzer: Analyzer,
}

impl AppState {
    pub fn new(store: ComplaintStore, analyzer: Analyzer) -> Self {
        Self { store, analyzer }
    }
}
