//! # Dispatch Surface
//!
//! Chooses, per block type, which view or editor implementation to invoke.
//!
//! Renderers and editors are supplied by the surrounding UI; the registry
//! decides whether a type is allowed to use them. A block whose type has no
//! capability (or no implementation) is handed to the fallback instead, so an
//! unknown block never takes the page down.
//!
//! Editors talk back through an [`EditHandle`]: `on_update(key, value)` patches
//! one content key and `on_media_select(url, kind, field)` is the URL-valued
//! special case. The handle turns the accumulated patches into a full
//! replacement [`Block`] for [`crate::Edit::UpdateBlock`].

use crate::block_type::BlockType;
use crate::document::{Block, Content, Template};
use crate::registry::BlockRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Kind of media chosen from the media provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    File,
}

/// Callback surface handed to a block editor
#[derive(Debug)]
pub struct EditHandle<'a> {
    block: &'a Block,
    content: Content,
    dirty: bool,
}

impl<'a> EditHandle<'a> {
    pub fn new(block: &'a Block) -> Self {
        Self {
            block,
            content: block.content.clone(),
            dirty: false,
        }
    }

    /// Block as it was when editing started
    pub fn block(&self) -> &'a Block {
        self.block
    }

    /// Content including updates made through this handle
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Set `content[key]`
    pub fn on_update(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if self.content.get(key) == Some(&value) {
            return;
        }
        trace!(block_id = %self.block.id, key, "Content field updated");
        self.content.insert(key.to_string(), value);
        self.dirty = true;
    }

    /// Store a selected or uploaded media URL in `field_key`
    pub fn on_media_select(&mut self, url: &str, kind: MediaKind, field_key: &str) {
        trace!(block_id = %self.block.id, ?kind, field_key, "Media selected");
        self.on_update(field_key, url);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replacement block, or `None` when nothing changed
    pub fn into_block(self) -> Option<Block> {
        if self.dirty {
            Some(self.block.with_content(self.content))
        } else {
            None
        }
    }
}

/// Read-only view of a block
pub trait BlockRenderer<V> {
    fn render(&self, block: &Block) -> V;
}

impl<V, F> BlockRenderer<V> for F
where
    F: Fn(&Block) -> V,
{
    fn render(&self, block: &Block) -> V {
        self(block)
    }
}

/// Editable form for a block
pub trait BlockEditor<V> {
    fn edit(&self, handle: &mut EditHandle<'_>) -> V;
}

impl<V, F> BlockEditor<V> for F
where
    F: Fn(&mut EditHandle<'_>) -> V,
{
    fn edit(&self, handle: &mut EditHandle<'_>) -> V {
        self(handle)
    }
}

type Fallback<V> = Box<dyn Fn(&Block) -> V>;

/// Per-type renderer/editor lookup producing views of type `V`
pub struct Dispatcher<V> {
    registry: Arc<BlockRegistry>,
    renderers: HashMap<BlockType, Box<dyn BlockRenderer<V>>>,
    editors: HashMap<BlockType, Box<dyn BlockEditor<V>>>,
    fallback: Fallback<V>,
}

impl<V> Dispatcher<V> {
    /// `fallback` renders any block without a usable capability
    pub fn new(registry: Arc<BlockRegistry>, fallback: impl Fn(&Block) -> V + 'static) -> Self {
        Self {
            registry,
            renderers: HashMap::new(),
            editors: HashMap::new(),
            fallback: Box::new(fallback),
        }
    }

    pub fn with_renderer(mut self, block_type: BlockType, renderer: impl BlockRenderer<V> + 'static) -> Self {
        self.renderers.insert(block_type, Box::new(renderer));
        self
    }

    pub fn with_editor(mut self, block_type: BlockType, editor: impl BlockEditor<V> + 'static) -> Self {
        self.editors.insert(block_type, Box::new(editor));
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Read-only view of `block`
    pub fn render(&self, block: &Block) -> V {
        let capability = self.registry.resolve(&block.block_type);
        match self.renderers.get(&block.block_type) {
            Some(renderer) if capability.has_renderer => renderer.render(block),
            _ => {
                trace!(block_id = %block.id, block_type = %block.block_type, "Rendering fallback");
                (self.fallback)(block)
            }
        }
    }

    /// Editable form for the handle's block
    pub fn edit(&self, handle: &mut EditHandle<'_>) -> V {
        let block = handle.block();
        let capability = self.registry.resolve(&block.block_type);
        match self.editors.get(&block.block_type) {
            Some(editor) if capability.has_editor => editor.edit(handle),
            _ => (self.fallback)(block),
        }
    }

    /// Whether `block` gets a real editor rather than the fallback
    pub fn is_editable(&self, block: &Block) -> bool {
        self.registry.resolve(&block.block_type).has_editor && self.editors.contains_key(&block.block_type)
    }

    /// Views for every block on `page`, in `order`
    pub fn render_page(&self, template: &Template, page: &str) -> Vec<V> {
        template
            .sorted_blocks(page)
            .unwrap_or_default()
            .iter()
            .map(|block| self.render(block))
            .collect()
    }
}

/// Local copy of upstream state that resyncs only when upstream moves
///
/// Editors keep a local mirror so keystrokes render immediately. The mirror
/// records the upstream version it last copied; [`LocalMirror::sync`] only
/// overwrites local state when that version has advanced.
#[derive(Debug, Clone)]
pub struct LocalMirror<T> {
    value: T,
    seen_version: u64,
}

impl<T> LocalMirror<T> {
    pub fn new(value: T, version: u64) -> Self {
        Self {
            value,
            seen_version: version,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Local edits; they stand until upstream advances
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn seen_version(&self) -> u64 {
        self.seen_version
    }

    /// Copy from upstream if `version` is newer; returns whether it did
    pub fn sync(&mut self, version: u64, upstream: impl FnOnce() -> T) -> bool {
        if version <= self.seen_version {
            return false;
        }
        self.value = upstream();
        self.seen_version = version;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct HeroForm;

    impl BlockEditor<String> for HeroForm {
        fn edit(&self, handle: &mut EditHandle<'_>) -> String {
            handle.on_update("title", "Edited");
            "hero-form".to_string()
        }
    }

    struct CartForm;

    impl BlockEditor<String> for CartForm {
        fn edit(&self, _handle: &mut EditHandle<'_>) -> String {
            "cart-form".to_string()
        }
    }

    fn dispatcher() -> Dispatcher<String> {
        Dispatcher::new(Arc::new(BlockRegistry::builtin()), |block: &Block| {
            format!("placeholder:{}", block.block_type)
        })
        .with_renderer(BlockType::Hero, |block: &Block| {
            format!("hero:{}", block.content.get("title").and_then(Value::as_str).unwrap_or(""))
        })
        .with_editor(BlockType::Hero, HeroForm)
        .with_renderer(BlockType::Cart, |_: &Block| "cart".to_string())
        .with_editor(BlockType::Cart, CartForm)
    }

    fn hero() -> Block {
        let registry = BlockRegistry::builtin();
        Block::new("h1", BlockType::Hero, registry.default_content(&BlockType::Hero), 0)
    }

    #[test]
    fn test_render_registered_type() {
        assert_eq!(dispatcher().render(&hero()), "hero:Welcome to our store");
    }

    #[test]
    fn test_unknown_type_renders_fallback() {
        let block = Block::new("x", BlockType::Custom("marquee".to_string()), Content::new(), 0);
        let dispatcher = dispatcher();

        assert_eq!(dispatcher.render(&block), "placeholder:marquee");
        let mut handle = EditHandle::new(&block);
        assert_eq!(dispatcher.edit(&mut handle), "placeholder:marquee");
        assert!(!dispatcher.is_editable(&block));
    }

    #[test]
    fn test_capability_gates_editor() {
        // Cart has an editor implementation, but its capability has no editor
        let cart = Block::new("c", BlockType::Cart, Content::new(), 0);
        let dispatcher = dispatcher();

        assert_eq!(dispatcher.render(&cart), "cart");
        let mut handle = EditHandle::new(&cart);
        assert_eq!(dispatcher.edit(&mut handle), "placeholder:cart");
    }

    #[test]
    fn test_editor_updates_flow_into_block() {
        let block = hero();
        let dispatcher = dispatcher();

        let mut handle = EditHandle::new(&block);
        assert_eq!(dispatcher.edit(&mut handle), "hero-form");
        let updated = handle.into_block().unwrap();

        assert_eq!(updated.id, block.id);
        assert_eq!(updated.content.get("title"), Some(&json!("Edited")));
        assert_eq!(block.content.get("title"), Some(&json!("Welcome to our store")));
    }

    #[test]
    fn test_media_select_sets_url_field() {
        let block = hero();
        let mut handle = EditHandle::new(&block);

        handle.on_media_select("https://cdn.example.com/banner.jpg", MediaKind::Image, "backgroundImage");
        assert_eq!(
            handle.content().get("backgroundImage"),
            Some(&json!("https://cdn.example.com/banner.jpg"))
        );
        assert!(handle.is_dirty());
    }

    #[test]
    fn test_unchanged_handle_yields_nothing() {
        let block = hero();
        let mut handle = EditHandle::new(&block);
        handle.on_update("title", "Welcome to our store");
        assert!(handle.into_block().is_none());
    }

    #[test]
    fn test_render_page_in_order() {
        let template = Template::new("t", "T").with_page(
            "home",
            vec![
                Block::new("b", BlockType::Cart, Content::new(), 1),
                Block { id: "a".to_string(), ..hero() },
            ],
        );

        assert_eq!(
            dispatcher().render_page(&template, "home"),
            vec!["hero:Welcome to our store".to_string(), "cart".to_string()]
        );
        assert!(dispatcher().render_page(&template, "missing").is_empty());
    }

    #[test]
    fn test_mirror_resyncs_only_on_newer_version() {
        let mut mirror = LocalMirror::new("draft".to_string(), 3);
        mirror.get_mut().push_str(" typing");

        assert!(!mirror.sync(3, || "upstream".to_string()));
        assert_eq!(mirror.get(), "draft typing");

        assert!(mirror.sync(4, || "upstream".to_string()));
        assert_eq!(mirror.get(), "upstream");
        assert_eq!(mirror.seen_version(), 4);
    }
}
