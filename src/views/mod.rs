//! Generic page engines: listing, detail, and filter entry.
//!
//! Each entity gets the same three views; per-entity behavior is injected
//! through an [`EntityContext`] built by the route composer rather than
//! inherited. The engines assemble a context payload and delegate the final
//! page to the rendering collaborator.

pub mod context;
pub mod detail;
pub mod filter_entry;
pub mod listing;

use std::sync::Arc;

use crate::entity::EntityDescriptor;
use crate::filtering::FilterSetFactory;
use crate::routes::urls::UrlMap;

pub use detail::DetailViewConfig;
pub use listing::{IndexViewConfig, PAGE_SIZE};

/// Everything the engines need to serve one entity's pages. URL reversal
/// goes through the owning namespace's map, so several namespaces can
/// coexist in one router without route-name collisions.
pub struct EntityContext {
    /// Owning catalog namespace; store collections are keyed by it.
    pub catalog: &'static str,
    pub descriptor: EntityDescriptor,
    pub detail: DetailViewConfig,
    pub index: IndexViewConfig,
    pub filterset: Arc<dyn FilterSetFactory>,
    pub urls: Arc<UrlMap>,
}
