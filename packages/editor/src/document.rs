//! # Document Model
//!
//! A [`Template`] is the unit of editing: template-wide styles plus a map of
//! named pages, each an ordered sequence of [`Block`]s.
//!
//! The model is plain data. All mutation goes through [`crate::operations`],
//! which always produces a new `Template` value.
//!
//! ## Invariants
//!
//! After any committed operation:
//! - block ids are unique across the whole template
//! - within a page, `order` values are exactly `0..n-1`

use crate::block_type::BlockType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Block content, opaque to the engine
pub type Content = serde_json::Map<String, serde_json::Value>;

/// Block style overrides (backgroundColor, textColor, padding, margin)
pub type BlockStyles = BTreeMap<String, String>;

/// Template-wide style settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStyles {
    #[serde(default)]
    pub primary_color: String,

    #[serde(default)]
    pub secondary_color: String,

    #[serde(default)]
    pub font_family: String,
}

/// A typed content unit placed on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,

    #[serde(rename = "type")]
    pub block_type: BlockType,

    #[serde(default)]
    pub content: Content,

    #[serde(default)]
    pub styles: BlockStyles,

    #[serde(default)]
    pub order: usize,
}

impl Block {
    pub fn new(id: impl Into<String>, block_type: BlockType, content: Content, order: usize) -> Self {
        Self {
            id: id.into(),
            block_type,
            content,
            styles: BlockStyles::new(),
            order,
        }
    }

    /// Copy with `content` replaced wholesale
    pub fn with_content(&self, content: Content) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    /// Copy with `styles` replaced wholesale
    pub fn with_styles(&self, styles: BlockStyles) -> Self {
        Self {
            styles,
            ..self.clone()
        }
    }
}

/// Named collection of pages plus template-wide styles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub styles: TemplateStyles,

    /// Page name → blocks, in navigation order
    #[serde(default)]
    pub pages: IndexMap<String, Vec<Block>>,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style page insertion
    pub fn with_page(mut self, name: impl Into<String>, blocks: Vec<Block>) -> Self {
        self.pages.insert(name.into(), blocks);
        self
    }

    pub fn page(&self, name: &str) -> Option<&[Block]> {
        self.pages.get(name).map(Vec::as_slice)
    }

    pub fn has_page(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Blocks of a page sorted by `order` (stable for ties)
    pub fn sorted_blocks(&self, page: &str) -> Option<Vec<Block>> {
        self.pages.get(page).map(|blocks| sorted_by_order(blocks))
    }

    pub fn find_block(&self, page: &str, block_id: &str) -> Option<&Block> {
        self.pages.get(page)?.iter().find(|b| b.id == block_id)
    }

    /// Every block id in the template
    pub fn block_ids(&self) -> impl Iterator<Item = &str> {
        self.pages.values().flatten().map(|b| b.id.as_str())
    }

    pub fn contains_block_id(&self, block_id: &str) -> bool {
        self.block_ids().any(|id| id == block_id)
    }

    pub fn block_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// Check the model invariants
    pub fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for (page, blocks) in &self.pages {
            for block in blocks {
                if !seen.insert(block.id.as_str()) {
                    violations.push(Violation::DuplicateBlockId {
                        block_id: block.id.clone(),
                    });
                }
            }

            let mut orders: Vec<usize> = blocks.iter().map(|b| b.order).collect();
            orders.sort_unstable();
            let contiguous = orders.iter().enumerate().all(|(i, order)| i == *order);
            if !contiguous {
                violations.push(Violation::NonContiguousOrder {
                    page: page.clone(),
                    orders,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Copy with every page sorted by `order` and renumbered `0..n-1`
    ///
    /// Used at load time to repair templates persisted with gaps or
    /// duplicate orders.
    pub fn normalized(&self) -> Self {
        let pages = self
            .pages
            .iter()
            .map(|(name, blocks)| (name.clone(), renumber(sorted_by_order(blocks))))
            .collect();

        Self {
            pages,
            ..self.clone()
        }
    }
}

/// A broken model invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DuplicateBlockId { block_id: String },
    NonContiguousOrder { page: String, orders: Vec<usize> },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateBlockId { block_id } => {
                write!(f, "duplicate block id '{}'", block_id)
            }
            Violation::NonContiguousOrder { page, orders } => {
                write!(f, "page '{}' has non-contiguous orders {:?}", page, orders)
            }
        }
    }
}

pub(crate) fn sorted_by_order(blocks: &[Block]) -> Vec<Block> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by_key(|b| b.order);
    sorted
}

/// Assign `order = position` to every block
pub(crate) fn renumber(blocks: Vec<Block>) -> Vec<Block> {
    blocks
        .into_iter()
        .enumerate()
        .map(|(order, block)| Block { order, ..block })
        .collect()
}
