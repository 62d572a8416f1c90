//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so tests can swap in mocks or the in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, LabelCatalogue, RecipeCatalogue};

/// Driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, tokens and profiles.
    pub accounts: Arc<dyn AccountCommand>,
    /// Tags and ingredients.
    pub labels: Arc<dyn LabelCatalogue>,
    /// Recipes and their images.
    pub recipes: Arc<dyn RecipeCatalogue>,
}

impl HttpState {
    /// Bundle the driving ports.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountCommand>,
        labels: Arc<dyn LabelCatalogue>,
        recipes: Arc<dyn RecipeCatalogue>,
    ) -> Self {
        Self {
            accounts,
            labels,
            recipes,
        }
    }
}
