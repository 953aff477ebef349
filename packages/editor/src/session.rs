//! # Editor Session
//!
//! The service object that owns one template's editing state from editor
//! start to editor teardown: committed history, the in-progress draft, block
//! id generation, and the drag resolver.
//!
//! ## Draft coalescing
//!
//! Rapid edits to the same field (typing) go through [`EditorSession::stage`],
//! which applies them to a draft without touching history. The draft becomes a
//! single history entry at an explicit boundary: [`EditorSession::commit_draft`]
//! (field blur), any direct [`EditorSession::apply`], undo/redo, or a successful
//! save.
//!
//! ## Persistence
//!
//! Saving hands the current snapshot to the persistence provider. A failed
//! save returns the error and changes nothing in memory, draft included, so it
//! can simply be retried.

use crate::config::EditorConfig;
use crate::document::{Block, Template};
use crate::drag::{DragResolver, DropIntent};
use crate::errors::EditorResult;
use crate::history::{History, Snapshot};
use crate::id_generator::IdGenerator;
use crate::mutations::{Edit, EditContext};
use crate::operations::Applied;
use crate::providers::{PersistenceProvider, StoreContext};
use crate::registry::BlockRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Uncommitted edits layered over the history's current snapshot
#[derive(Debug, Clone)]
struct Draft {
    template: Template,
    label: String,
}

/// One user's editing session for one template
#[derive(Debug)]
pub struct EditorSession {
    store: StoreContext,

    registry: Arc<BlockRegistry>,

    history: History,

    draft: Option<Draft>,

    ids: IdGenerator,

    drag: DragResolver,
}

impl EditorSession {
    /// Start a session on an already loaded template
    ///
    /// Block order is normalized first so every page starts out contiguous.
    pub fn new(store: StoreContext, template: Template, registry: Arc<BlockRegistry>, config: &EditorConfig) -> Self {
        let template = if template.validate().is_ok() {
            template
        } else {
            warn!(template_id = %template.id, "Normalizing block order at session start");
            template.normalized()
        };

        info!(
            store_id = %store.store_id,
            template_id = %template.id,
            pages = template.pages.len(),
            blocks = template.block_count(),
            "Editor session started"
        );

        Self {
            store,
            registry,
            ids: IdGenerator::new(&template.id),
            history: History::with_max_levels(template, config.history_limit),
            draft: None,
            drag: DragResolver::new(config),
        }
    }

    /// Load a template through `persistence` and start a session on it
    pub async fn open(
        persistence: &dyn PersistenceProvider,
        store: StoreContext,
        template_id: &str,
        registry: Arc<BlockRegistry>,
        config: &EditorConfig,
    ) -> EditorResult<Self> {
        let template = persistence.load(&store, template_id).await?;
        Ok(Self::new(store, template, registry, config))
    }

    pub fn store(&self) -> &StoreContext {
        &self.store
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Template as the user currently sees it, draft included
    pub fn template(&self) -> &Template {
        match &self.draft {
            Some(draft) => &draft.template,
            None => self.history.current().template(),
        }
    }

    /// Last committed snapshot
    pub fn committed(&self) -> &Snapshot {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Advances whenever committed state changes (commit, undo, redo)
    pub fn version(&self) -> u64 {
        self.history.version()
    }

    pub fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.has_draft() || self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.has_draft() && self.history.can_redo()
    }

    /// Apply and commit `edit` as one history entry
    ///
    /// Any pending draft is committed first. Returns whether the template
    /// changed; no-op edits leave history untouched.
    pub fn apply(&mut self, edit: Edit) -> bool {
        self.commit_draft();

        let mut ctx = EditContext::new(&self.registry, &mut self.ids);
        match edit.apply(self.history.current().template(), &mut ctx) {
            Applied::Changed(template) => {
                let revision = self.history.commit(template, Some(&edit.describe())).revision();
                debug!(edit = edit.name(), revision, "Committed edit");
                true
            }
            Applied::Unchanged => false,
        }
    }

    /// Apply `edit` to the draft without committing
    pub fn stage(&mut self, edit: Edit) -> bool {
        let base = match &self.draft {
            Some(draft) => &draft.template,
            None => self.history.current().template(),
        };
        let mut ctx = EditContext::new(&self.registry, &mut self.ids);
        match edit.apply(base, &mut ctx) {
            Applied::Changed(template) => {
                let label = match self.draft.take() {
                    Some(draft) => draft.label,
                    None => edit.describe(),
                };
                self.draft = Some(Draft { template, label });
                true
            }
            Applied::Unchanged => false,
        }
    }

    /// Stage a replacement block, e.g. from an editor's `EditHandle`
    pub fn stage_block(&mut self, page: &str, block: Block) -> bool {
        self.stage(Edit::UpdateBlock {
            page: page.to_string(),
            block,
        })
    }

    /// Turn the draft into one history entry
    ///
    /// A draft that ended up equal to the committed template is dropped
    /// without a history entry.
    pub fn commit_draft(&mut self) -> bool {
        let Some(draft) = self.draft.take() else {
            return false;
        };
        if &draft.template == self.history.current().template() {
            return false;
        }

        let revision = self.history.commit(draft.template, Some(&draft.label)).revision();
        debug!(revision, label = %draft.label, "Committed draft");
        true
    }

    pub fn discard_draft(&mut self) -> bool {
        self.draft.take().is_some()
    }

    pub fn undo(&mut self) -> bool {
        self.commit_draft();
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.commit_draft();
        self.history.redo()
    }

    pub fn drag(&self) -> &DragResolver {
        &self.drag
    }

    /// Resolver for feeding pointer events
    pub fn drag_mut(&mut self) -> &mut DragResolver {
        &mut self.drag
    }

    /// Finish the active drag on `page`, committing the reorder it resolves to
    pub fn complete_drag(&mut self, page: &str) -> bool {
        match self.drag.complete() {
            Some(intent) => self.apply_drop(page, intent),
            None => false,
        }
    }

    pub fn apply_drop(&mut self, page: &str, intent: DropIntent) -> bool {
        self.apply(intent.into_edit(page))
    }

    /// Persist the current template, draft included
    ///
    /// A successful save is a commit boundary for the draft. On failure the
    /// error is returned and history and draft are left exactly as they were.
    pub async fn save(&mut self, persistence: &dyn PersistenceProvider) -> EditorResult<()> {
        let template = match &self.draft {
            Some(draft) => Arc::new(draft.template.clone()),
            None => self.history.current().shared(),
        };
        match persistence.save(&self.store, &template).await {
            Ok(()) => {
                self.commit_draft();
                info!(template_id = %template.id, revision = self.history.current().revision(), "Template saved");
                Ok(())
            }
            Err(err) => {
                warn!(template_id = %template.id, error = %err, "Template save failed; keeping local edits");
                Err(err)
            }
        }
    }

    /// End the session, handing back the template for persistence
    ///
    /// Pending drags and their timers are cancelled; the draft is committed.
    pub fn close(mut self) -> Template {
        self.drag.cancel();
        self.commit_draft();
        info!(template_id = %self.history.current().template().id, "Editor session closed");
        self.history.current().template().clone()
    }
}
