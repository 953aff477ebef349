//! # External Collaborators
//!
//! Interfaces the editor consumes but does not implement: persistence, media,
//! catalog, and the store context that scopes them.
//!
//! All provider calls are asynchronous I/O. The editing engine never waits on
//! them to keep an edit; a failed save leaves in-memory state untouched.
//!
//! Two persistence implementations ship with the crate: an in-memory store
//! for tests and embedding, and a JSON-file store used by the CLI.

use crate::dispatch::MediaKind;
use crate::document::{Block, Template};
use crate::errors::{EditorError, EditorResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Current store (tenant) the session works for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreContext {
    pub store_id: String,
}

impl StoreContext {
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
        }
    }
}

/// Loads and saves templates
#[async_trait]
pub trait PersistenceProvider: Send + Sync {
    async fn load(&self, store: &StoreContext, template_id: &str) -> EditorResult<Template>;

    async fn save(&self, store: &StoreContext, template: &Template) -> EditorResult<()>;
}

/// Uploads files or picks from the existing media library
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Returns the public URL of the uploaded file
    async fn upload(&self, store: &StoreContext, file_name: &str, bytes: Vec<u8>, kind: MediaKind) -> EditorResult<String>;

    /// `None` when the user dismissed the picker
    async fn select_existing(&self, store: &StoreContext, kind: MediaKind) -> EditorResult<Option<String>>;
}

/// Read-only product catalog used for block previews
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn products(&self, store: &StoreContext) -> EditorResult<Vec<Product>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Products a `products` or `product-detail` block previews
///
/// Explicit `productIds` (or a single `productId`) win; otherwise the first
/// `columns` products of the catalog fill the grid.
pub fn preview_products<'a>(block: &Block, catalog: &'a [Product]) -> Vec<&'a Product> {
    let ids: Vec<&str> = match block.content.get("productIds").and_then(|v| v.as_array()) {
        Some(ids) => ids.iter().filter_map(|id| id.as_str()).collect(),
        None => block.content.get("productId").and_then(|v| v.as_str()).into_iter().collect(),
    };

    if !ids.is_empty() {
        return ids
            .iter()
            .filter_map(|id| catalog.iter().find(|p| p.id == *id))
            .collect();
    }

    let limit = block
        .content
        .get("columns")
        .and_then(|v| v.as_u64())
        .map_or(1, |columns| columns as usize);
    catalog.iter().take(limit).collect()
}

/// Volatile persistence keyed by store and template id
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    templates: RwLock<HashMap<(String, String), Template>>,
    failing: AtomicBool,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, store: &StoreContext, template: Template) {
        let key = (store.store_id.clone(), template.id.clone());
        self.templates.write().await.insert(key, template);
    }

    pub async fn get(&self, store: &StoreContext, template_id: &str) -> Option<Template> {
        let key = (store.store_id.clone(), template_id.to_string());
        self.templates.read().await.get(&key).cloned()
    }

    /// Make subsequent saves fail, to exercise error paths
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PersistenceProvider for InMemoryPersistence {
    async fn load(&self, store: &StoreContext, template_id: &str) -> EditorResult<Template> {
        self.get(store, template_id)
            .await
            .ok_or_else(|| EditorError::TemplateNotFound(template_id.to_string()))
    }

    async fn save(&self, store: &StoreContext, template: &Template) -> EditorResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EditorError::Persistence("storage unavailable".to_string()));
        }
        self.insert(store, template.clone()).await;
        Ok(())
    }
}

/// Templates stored as `<root>/<store id>/<template id>.json`
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    root: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, store: &StoreContext, template_id: &str) -> PathBuf {
        self.root.join(&store.store_id).join(format!("{}.json", template_id))
    }
}

#[async_trait]
impl PersistenceProvider for JsonFilePersistence {
    async fn load(&self, store: &StoreContext, template_id: &str) -> EditorResult<Template> {
        let path = self.path_for(store, template_id);
        if !tokio::fs::try_exists(&path).await? {
            return Err(EditorError::TemplateNotFound(template_id.to_string()));
        }
        read_template_file(&path).await
    }

    async fn save(&self, store: &StoreContext, template: &Template) -> EditorResult<()> {
        let path = self.path_for(store, &template.id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        write_template_file(&path, template).await
    }
}

/// Read a template JSON file, repairing block order if needed
pub async fn read_template_file(path: &Path) -> EditorResult<Template> {
    let source = tokio::fs::read_to_string(path).await?;
    let template: Template = serde_json::from_str(&source)?;

    if let Err(violations) = template.validate() {
        warn!(
            path = %path.display(),
            violations = violations.len(),
            "Template failed validation on load; normalizing block order"
        );
        let normalized = template.normalized();
        // Renumbering cannot fix duplicate ids
        normalized.validate().map_err(EditorError::InvalidTemplate)?;
        return Ok(normalized);
    }

    debug!(path = %path.display(), template_id = %template.id, "Loaded template");
    Ok(template)
}

/// Write a template as pretty-printed JSON
pub async fn write_template_file(path: &Path, template: &Template) -> EditorResult<()> {
    let json = serde_json::to_string_pretty(template)?;
    tokio::fs::write(path, json).await?;
    debug!(path = %path.display(), template_id = %template.id, "Saved template");
    Ok(())
}
