//! In-memory text models and scoped references to them.

mod store;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use url::Url;

use crate::error::PrefsResult;

pub use store::ModelStore;

/// Text document held in memory, shared between the model store and references.
#[derive(Debug)]
pub struct TextModel {
    uri: Url,
    content: RwLock<String>,
    version: AtomicU64,
}

impl TextModel {
    pub fn new(uri: Url, content: impl Into<String>) -> Self {
        Self {
            uri,
            content: RwLock::new(content.into()),
            version: AtomicU64::new(1),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn content(&self) -> String {
        match self.content.read() {
            Ok(content) => content.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Increases on every content replacement.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Replace the content; no-op when unchanged.
    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        let mut guard = match self.content.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard != content {
            *guard = content;
            self.version.fetch_add(1, Ordering::SeqCst);
        }
    }
}

type ReleaseFn = Box<dyn FnOnce() + Send + Sync>;

/// Scoped acquisition of a [`TextModel`]; dropping it releases the reference.
pub struct ModelReference {
    model: Arc<TextModel>,
    release: Option<ReleaseFn>,
}

impl ModelReference {
    pub fn new(model: Arc<TextModel>, release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            model,
            release: Some(Box::new(release)),
        }
    }

    /// Reference that does not report its release to anyone.
    pub fn detached(model: Arc<TextModel>) -> Self {
        Self {
            model,
            release: None,
        }
    }

    pub fn model(&self) -> &Arc<TextModel> {
        &self.model
    }
}

impl fmt::Debug for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelReference")
            .field("uri", &self.model.uri().as_str())
            .field("released", &self.release.is_none())
            .finish()
    }
}

impl Drop for ModelReference {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Document-resolution collaborator.
#[async_trait]
pub trait TextModelResolver: Send + Sync {
    /// Acquire a reference to the model for `resource`, loading it if needed.
    async fn create_model_reference(&self, resource: &Url) -> PrefsResult<ModelReference>;
}

/// Registry of live models, keyed by URI.
pub trait ModelService: Send + Sync {
    fn get_model(&self, resource: &Url) -> Option<Arc<TextModel>>;

    /// Create (or replace the content of) a model owned by the service itself.
    fn create_model(&self, content: String, resource: &Url) -> Arc<TextModel>;
}
