//! Reference-counted model store backed by a [`FileService`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use url::Url;

use super::{ModelReference, ModelService, TextModel, TextModelResolver};
use crate::error::PrefsResult;
use crate::files::{FileService, ReadOptions};

#[derive(Debug)]
struct Entry {
    model: Arc<TextModel>,
    references: usize,
    /// Created through [`ModelService::create_model`]; survives its last reference.
    pinned: bool,
}

type Entries = Arc<Mutex<HashMap<Url, Entry>>>;

/// Models loaded from files stay alive while referenced; service-created
/// models stay alive for the store's lifetime.
pub struct ModelStore {
    files: Arc<dyn FileService>,
    entries: Entries,
}

impl ModelStore {
    pub fn new(files: Arc<dyn FileService>) -> Self {
        Self {
            files,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Outstanding references for `resource` (0 when unknown).
    pub fn reference_count(&self, resource: &Url) -> usize {
        lock(&self.entries)
            .get(resource)
            .map(|entry| entry.references)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn acquire(&self, resource: &Url) -> Option<ModelReference> {
        let mut entries = lock(&self.entries);
        let entry = entries.get_mut(resource)?;
        entry.references += 1;
        Some(self.reference(entry.model.clone()))
    }

    fn reference(&self, model: Arc<TextModel>) -> ModelReference {
        let entries = self.entries.clone();
        let uri = model.uri().clone();
        ModelReference::new(model, move || release(&entries, &uri))
    }
}

impl std::fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelStore")
            .field("models", &self.len())
            .finish_non_exhaustive()
    }
}

fn lock(entries: &Entries) -> MutexGuard<'_, HashMap<Url, Entry>> {
    match entries.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn release(entries: &Entries, uri: &Url) {
    let mut entries = lock(entries);
    let Some(entry) = entries.get_mut(uri) else {
        return;
    };
    entry.references = entry.references.saturating_sub(1);
    if entry.references == 0 && !entry.pinned {
        tracing::debug!(uri = %uri, "disposing text model");
        entries.remove(uri);
    }
}

#[async_trait]
impl TextModelResolver for ModelStore {
    async fn create_model_reference(&self, resource: &Url) -> PrefsResult<ModelReference> {
        if let Some(reference) = self.acquire(resource) {
            return Ok(reference);
        }

        let content = self.files.read(resource, ReadOptions::text_only()).await?;

        let mut entries = lock(&self.entries);
        // Another caller may have loaded the same resource while we were reading.
        let entry = entries.entry(resource.clone()).or_insert_with(|| {
            tracing::debug!(uri = %resource, "loaded text model");
            Entry {
                model: Arc::new(TextModel::new(resource.clone(), content)),
                references: 0,
                pinned: false,
            }
        });
        entry.references += 1;
        let model = entry.model.clone();
        drop(entries);

        Ok(self.reference(model))
    }
}

impl ModelService for ModelStore {
    fn get_model(&self, resource: &Url) -> Option<Arc<TextModel>> {
        lock(&self.entries)
            .get(resource)
            .map(|entry| entry.model.clone())
    }

    fn create_model(&self, content: String, resource: &Url) -> Arc<TextModel> {
        let mut entries = lock(&self.entries);
        match entries.get_mut(resource) {
            Some(entry) => {
                entry.pinned = true;
                entry.model.set_content(content);
                entry.model.clone()
            }
            None => {
                let model = Arc::new(TextModel::new(resource.clone(), content));
                entries.insert(
                    resource.clone(),
                    Entry {
                        model: model.clone(),
                        references: 0,
                        pinned: true,
                    },
                );
                model
            }
        }
    }
}
