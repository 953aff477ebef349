//! # Template Edits
//!
//! Serializable, intent-preserving edits on a [`Template`].
//!
//! Each variant maps onto one pure function in [`crate::operations`]. The enum
//! exists so edits can be queued, logged, scripted from the CLI, and labelled
//! in the undo history.
//!
//! ## Semantics
//!
//! ### UpdateBlock
//! - Full replacement of content and styles (never a partial field patch)
//! - Missing block id is a no-op, not an error
//!
//! ### DeleteBlock
//! - Removes the block, then renumbers the page `0..n-1`
//!
//! ### ReorderBlocks
//! - Remove dragged, reinsert before (top) or after (bottom) the target
//! - Self-drop and missing ids are no-ops

use crate::block_type::BlockType;
use crate::document::{Block, Template, TemplateStyles};
use crate::id_generator::IdGenerator;
use crate::operations::{self, Applied, Edge, MoveDirection};
use crate::registry::BlockRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single edit to a template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Edit {
    /// Append a block with default content
    #[serde(rename_all = "camelCase")]
    AddBlock { page: String, block_type: BlockType },

    /// Replace a block by id
    UpdateBlock { page: String, block: Block },

    /// Remove a block by id
    #[serde(rename_all = "camelCase")]
    DeleteBlock { page: String, block_id: String },

    /// Drag-and-drop reorder
    #[serde(rename_all = "camelCase")]
    ReorderBlocks {
        page: String,
        dragged_id: String,
        target_id: String,
        edge: Edge,
    },

    /// Single-step move
    #[serde(rename_all = "camelCase")]
    MoveBlock {
        page: String,
        block_id: String,
        direction: MoveDirection,
    },

    /// Copy a block right after itself
    #[serde(rename_all = "camelCase")]
    DuplicateBlock { page: String, block_id: String },

    /// Replace template-wide styles
    UpdateStyles { styles: TemplateStyles },

    AddPage { page: String },

    RemovePage { page: String },
}

/// What an edit needs besides the template itself
pub struct EditContext<'a> {
    pub registry: &'a BlockRegistry,
    pub ids: &'a mut IdGenerator,
}

impl<'a> EditContext<'a> {
    pub fn new(registry: &'a BlockRegistry, ids: &'a mut IdGenerator) -> Self {
        Self { registry, ids }
    }
}

impl Edit {
    /// Apply to `template`, producing a new snapshot or [`Applied::Unchanged`]
    pub fn apply(&self, template: &Template, ctx: &mut EditContext<'_>) -> Applied {
        let applied = match self {
            Edit::AddBlock { page, block_type } => {
                operations::add_block(template, page, block_type, ctx.registry, ctx.ids)
            }

            Edit::UpdateBlock { page, block } => operations::update_block(template, page, block),

            Edit::DeleteBlock { page, block_id } => operations::delete_block(template, page, block_id),

            Edit::ReorderBlocks { page, dragged_id, target_id, edge } => {
                operations::reorder_blocks(template, page, dragged_id, target_id, *edge)
            }

            Edit::MoveBlock { page, block_id, direction } => {
                operations::move_block(template, page, block_id, *direction)
            }

            Edit::DuplicateBlock { page, block_id } => {
                operations::duplicate_block(template, page, block_id, ctx.ids)
            }

            Edit::UpdateStyles { styles } => operations::update_styles(template, styles),

            Edit::AddPage { page } => operations::add_page(template, page),

            Edit::RemovePage { page } => operations::remove_page(template, page),
        };

        debug!(
            edit = self.name(),
            page = self.page().unwrap_or("-"),
            changed = applied.is_changed(),
            "Applied edit"
        );

        applied
    }

    /// Page this edit targets, if any
    pub fn page(&self) -> Option<&str> {
        match self {
            Edit::AddBlock { page, .. }
            | Edit::UpdateBlock { page, .. }
            | Edit::DeleteBlock { page, .. }
            | Edit::ReorderBlocks { page, .. }
            | Edit::MoveBlock { page, .. }
            | Edit::DuplicateBlock { page, .. }
            | Edit::AddPage { page }
            | Edit::RemovePage { page } => Some(page),
            Edit::UpdateStyles { .. } => None,
        }
    }

    /// Debug name for this edit
    pub fn name(&self) -> &'static str {
        match self {
            Edit::AddBlock { .. } => "add-block",
            Edit::UpdateBlock { .. } => "update-block",
            Edit::DeleteBlock { .. } => "delete-block",
            Edit::ReorderBlocks { .. } => "reorder-blocks",
            Edit::MoveBlock { .. } => "move-block",
            Edit::DuplicateBlock { .. } => "duplicate-block",
            Edit::UpdateStyles { .. } => "update-styles",
            Edit::AddPage { .. } => "add-page",
            Edit::RemovePage { .. } => "remove-page",
        }
    }

    /// Label shown next to undo/redo
    pub fn describe(&self) -> String {
        match self {
            Edit::AddBlock { page, block_type } => format!("Add {} to {}", block_type, page),
            Edit::UpdateBlock { block, .. } => format!("Edit {}", block.block_type),
            Edit::DeleteBlock { page, .. } => format!("Delete block from {}", page),
            Edit::ReorderBlocks { page, .. } | Edit::MoveBlock { page, .. } => {
                format!("Reorder {}", page)
            }
            Edit::DuplicateBlock { page, .. } => format!("Duplicate block in {}", page),
            Edit::UpdateStyles { .. } => "Change theme".to_string(),
            Edit::AddPage { page } => format!("Add page {}", page),
            Edit::RemovePage { page } => format!("Remove page {}", page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_serialization() {
        let edit = Edit::ReorderBlocks {
            page: "home".to_string(),
            dragged_id: "a".to_string(),
            target_id: "c".to_string(),
            edge: Edge::Bottom,
        };

        let json = serde_json::to_string(&edit).unwrap();
        assert!(json.contains("\"op\":\"reorderBlocks\""));
        assert!(json.contains("\"draggedId\":\"a\""));
        assert!(json.contains("\"edge\":\"bottom\""));

        let deserialized: Edit = serde_json::from_str(&json).unwrap();
        assert_eq!(edit, deserialized);
    }

    #[test]
    fn test_parse_add_block() {
        let edit: Edit =
            serde_json::from_str(r#"{ "op": "addBlock", "page": "home", "blockType": "hero" }"#).unwrap();
        assert_eq!(
            edit,
            Edit::AddBlock {
                page: "home".to_string(),
                block_type: BlockType::Hero,
            }
        );
    }

    #[test]
    fn test_apply_dispatches() {
        let registry = BlockRegistry::builtin();
        let mut ids = IdGenerator::new("tpl");
        let template = Template::new("tpl", "Shop").with_page("home", vec![]);

        let mut ctx = EditContext::new(&registry, &mut ids);
        let added = Edit::AddBlock {
            page: "home".to_string(),
            block_type: BlockType::Hero,
        }
        .apply(&template, &mut ctx);

        let template = added.changed().unwrap();
        assert_eq!(template.block_count(), 1);

        let noop = Edit::DeleteBlock {
            page: "home".to_string(),
            block_id: "missing".to_string(),
        }
        .apply(&template, &mut ctx);
        assert_eq!(noop, Applied::Unchanged);
    }
}
