//! Shared application state.

use std::sync::Arc;

use research::{CompletionProvider, ImageProvider, Researcher, StrainStore};

/// State handed to every handler: the researcher over the configured
/// store and provider, plus the image provider. The current record's
/// view-state travels with each image request; nothing here is mutable
/// across requests.
#[derive(Clone)]
pub struct AppState {
    pub researcher: Arc<Researcher<Arc<dyn StrainStore>, Arc<dyn CompletionProvider>>>,
    pub images: Arc<dyn ImageProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StrainStore>,
        provider: Arc<dyn CompletionProvider>,
        images: Arc<dyn ImageProvider>,
    ) -> Self {
        Self {
            researcher: Arc::new(Researcher::new(store, provider)),
            images,
        }
    }
}
