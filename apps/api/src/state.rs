use std::sync::Arc;

use tokio::sync::Mutex;

use crate::filter::FilterSession;
use crate::source::ResumeSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single filter session. Held only for short synchronous sections;
    /// debounced evaluations run outside the lock.
    pub session: Arc<Mutex<FilterSession>>,
    /// Pluggable dataset source. HTTP upstream or a JSON file, chosen from config.
    pub source: Arc<dyn ResumeSource>,
}

impl AppState {
    pub fn new(session: FilterSession, source: Arc<dyn ResumeSource>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            source,
        }
    }
}
