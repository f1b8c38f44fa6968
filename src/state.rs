//! Shared application state.
//!
//! Each request constructs and discards its own criteria, filterset, and
//! record collections; the state only carries the long-lived collaborators.

use std::sync::Arc;

use crate::render::Renderer;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub renderer: Arc<dyn Renderer>,
    /// Forwarded to page contexts for client-side behavior toggling.
    pub debug: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, renderer: Arc<dyn Renderer>, debug: bool) -> Self {
        Self {
            store,
            renderer,
            debug,
        }
    }
}
