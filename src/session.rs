use tracing::info;

use crate::catalog::ModelCatalog;
use crate::credential::Credential;

/// Per-process chat state. The current model is always a catalog member.
#[derive(Debug)]
pub struct Session {
    credential: Credential,
    catalog: ModelCatalog,
    current_model: String,
}

impl Session {
    /// Returns `None` if `model_id` is not in `catalog`.
    pub fn start(credential: Credential, catalog: ModelCatalog, model_id: String) -> Option<Self> {
        if !catalog.contains(&model_id) {
            return None;
        }
        info!(model = %model_id, "chat session started");
        Some(Self {
            credential,
            catalog,
            current_model: model_id,
        })
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn current_model(&self) -> &str {
        &self.current_model
    }

    /// Switches to `model_id` if the catalog has it; otherwise the current
    /// model is kept and `false` is returned.
    pub fn switch_model(&mut self, model_id: String) -> bool {
        if !self.catalog.contains(&model_id) {
            return false;
        }
        info!(from = %self.current_model, to = %model_id, "switched model");
        self.current_model = model_id;
        true
    }
}
