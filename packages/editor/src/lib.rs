//! # Storefront Editor
//!
//! Block/document editing engine for storefront pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ pointer events / form callbacks             │
//! │  - DragResolver: hover edge, debounce,      │
//! │    auto-scroll → DropIntent                 │
//! │  - EditHandle: on_update / on_media_select  │
//! └─────────────────────────────────────────────┘
//!                     ↓ Edit
//! ┌─────────────────────────────────────────────┐
//! │ operations: Template → Template (pure)      │
//! │  - add / update / delete / reorder          │
//! │  - no-ops for stale ids, never errors       │
//! └─────────────────────────────────────────────┘
//!                     ↓ Applied::Changed
//! ┌─────────────────────────────────────────────┐
//! │ EditorSession                               │
//! │  - History of snapshots (undo/redo)         │
//! │  - draft coalescing for typing              │
//! │  - save via PersistenceProvider             │
//! └─────────────────────────────────────────────┘
//!                     ↓ Snapshot
//! ┌─────────────────────────────────────────────┐
//! │ Dispatcher: per-type renderer / editor      │
//! │  via BlockRegistry capabilities             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are values**: operations never mutate a template in place
//! 2. **Stale references are no-ops**: UI callbacks may race with deletes
//! 3. **Order is contiguous**: every page is `0..n-1` after each commit
//! 4. **One change, one history entry**: no-ops never commit
//! 5. **Registration over switching**: block types are looked up, not matched
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use storefront_editor::{
//!     BlockRegistry, BlockType, Edit, EditorConfig, EditorSession, StoreContext, Template,
//! };
//!
//! let template = Template::new("tpl-1", "My Shop").with_page("home", vec![]);
//! let mut session = EditorSession::new(
//!     StoreContext::new("store-1"),
//!     template,
//!     Arc::new(BlockRegistry::builtin()),
//!     &EditorConfig::default(),
//! );
//!
//! session.apply(Edit::AddBlock {
//!     page: "home".to_string(),
//!     block_type: BlockType::Hero,
//! });
//! assert_eq!(session.template().block_count(), 1);
//!
//! session.undo();
//! assert_eq!(session.template().block_count(), 0);
//! ```

mod block_type;
mod config;
mod dispatch;
mod document;
mod drag;
mod errors;
mod history;
mod id_generator;
mod mutations;
pub mod operations;
mod providers;
mod registry;
mod session;
mod timer;

pub use block_type::BlockType;
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use dispatch::{BlockEditor, BlockRenderer, Dispatcher, EditHandle, LocalMirror, MediaKind};
pub use document::{Block, BlockStyles, Content, Template, TemplateStyles, Violation};
pub use drag::{
    compute_edge, AutoScroller, DragResolver, DragState, DragTick, DropIntent, HoverTarget, Point, Rect,
    ScrollDirection,
};
pub use errors::{EditorError, EditorResult};
pub use history::{History, Snapshot};
pub use id_generator::{get_template_seed, IdGenerator};
pub use mutations::{Edit, EditContext};
pub use operations::{Applied, Edge, MoveDirection};
pub use providers::{
    preview_products, read_template_file, write_template_file, CatalogProvider, InMemoryPersistence,
    JsonFilePersistence, MediaProvider, PersistenceProvider, Product, StoreContext,
};
pub use registry::{BlockRegistry, Capability, ContentFactory};
pub use session::EditorSession;
pub use timer::{Debouncer, RepeatingTimer};
