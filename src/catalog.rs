use serde::Deserialize;
use std::collections::BTreeSet;

/// One entry of the provider's model listing. Extra metadata is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self { models }
    }

    /// Builds a catalog from a raw listing, skipping the zero-based
    /// `excluded` positions.
    pub fn curated(models: Vec<ModelDescriptor>, excluded: &BTreeSet<usize>) -> Self {
        let models = models
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !excluded.contains(idx))
            .map(|(_, model)| model)
            .collect();
        Self { models }
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    /// Looks up a model by its 1-based ordinal as shown to the operator.
    pub fn by_ordinal(&self, ordinal: usize) -> Option<&ModelDescriptor> {
        ordinal.checked_sub(1).and_then(|idx| self.models.get(idx))
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.models.iter().any(|model| model.id == model_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{ModelCatalog, ModelDescriptor};

    fn listing(count: usize) -> Vec<ModelDescriptor> {
        (0..count)
            .map(|idx| ModelDescriptor::new(format!("model-{idx}")))
            .collect()
    }

    #[test]
    fn curated_drops_only_excluded_positions() {
        let excluded = BTreeSet::from([2, 4, 5, 9, 14, 16, 17, 18, 19]);
        let catalog = ModelCatalog::curated(listing(21), &excluded);

        let ids: Vec<&str> = catalog.iter().map(|model| model.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "model-0", "model-1", "model-3", "model-6", "model-7", "model-8", "model-10",
                "model-11", "model-12", "model-13", "model-15", "model-20",
            ]
        );
    }

    #[test]
    fn curated_ignores_positions_beyond_the_listing() {
        let catalog = ModelCatalog::curated(listing(2), &BTreeSet::from([2, 4]));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn by_ordinal_is_one_based() {
        let catalog = ModelCatalog::new(listing(2));
        assert!(catalog.by_ordinal(0).is_none());
        assert_eq!(catalog.by_ordinal(1).map(|m| m.id.as_str()), Some("model-0"));
        assert_eq!(catalog.by_ordinal(2).map(|m| m.id.as_str()), Some("model-1"));
        assert!(catalog.by_ordinal(3).is_none());
    }

    #[test]
    fn descriptor_ignores_extra_metadata() {
        let model: ModelDescriptor = serde_json::from_str(
            r#"{"id":"llama-3-70b","object":"model","owned_by":"Meta","context_window":8192}"#,
        )
        .expect("descriptor should parse");
        assert_eq!(model, ModelDescriptor::new("llama-3-70b"));
    }
}
