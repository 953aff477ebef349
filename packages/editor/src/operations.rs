//! # Edit Operations
//!
//! Pure functions from a [`Template`] snapshot to a new snapshot. None of them
//! mutate their input.
//!
//! Every operation reports whether it changed anything via [`Applied`]. An
//! operation that refers to a page or block that no longer exists is a no-op
//! rather than an error: UI callbacks can legitimately race with a delete.
//!
//! Positions are always computed on the page's blocks sorted by `order`, and
//! every changed page leaves the operation renumbered `0..n-1`.

use crate::block_type::BlockType;
use crate::document::{renumber, sorted_by_order, Block, Template, TemplateStyles};
use crate::id_generator::IdGenerator;
use crate::registry::BlockRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Insertion side relative to a drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => f.write_str("top"),
            Edge::Bottom => f.write_str("bottom"),
        }
    }
}

/// Direction for single-step moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Outcome of an edit operation
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The operation produced a different template
    Changed(Template),

    /// Nothing to do; the input template stands
    Unchanged,
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Applied::Changed(_))
    }

    /// Resulting template, falling back to `original` on a no-op
    pub fn or_original(self, original: &Template) -> Template {
        match self {
            Applied::Changed(template) => template,
            Applied::Unchanged => original.clone(),
        }
    }

    pub fn changed(self) -> Option<Template> {
        match self {
            Applied::Changed(template) => Some(template),
            Applied::Unchanged => None,
        }
    }
}

/// Copy of `template` with one page's blocks replaced
fn with_page_blocks(template: &Template, page: &str, blocks: Vec<Block>) -> Template {
    let mut next = template.clone();
    if let Some(slot) = next.pages.get_mut(page) {
        *slot = blocks;
    }
    next
}

/// Append a new block of `block_type` to `page`
///
/// Content comes from the registry's default factory; the id is fresh across
/// the whole template and `order` is one past the current maximum.
pub fn add_block(
    template: &Template,
    page: &str,
    block_type: &BlockType,
    registry: &BlockRegistry,
    ids: &mut IdGenerator,
) -> Applied {
    let Some(blocks) = template.pages.get(page) else {
        return Applied::Unchanged;
    };

    let mut sorted = renumber(sorted_by_order(blocks));
    let order = sorted.last().map_or(0, |last| last.order + 1);
    let id = ids.next_id(template);

    sorted.push(Block::new(id, block_type.clone(), registry.default_content(block_type), order));
    Applied::Changed(with_page_blocks(template, page, sorted))
}

/// Replace the block whose id matches `updated.id`
///
/// The stored `order` is kept; position changes go through
/// [`reorder_blocks`] or [`move_block`].
pub fn update_block(template: &Template, page: &str, updated: &Block) -> Applied {
    let Some(blocks) = template.pages.get(page) else {
        return Applied::Unchanged;
    };
    let Some(existing) = blocks.iter().find(|b| b.id == updated.id) else {
        return Applied::Unchanged;
    };

    let replacement = Block {
        order: existing.order,
        ..updated.clone()
    };
    if &replacement == existing {
        return Applied::Unchanged;
    }

    let next: Vec<Block> = sorted_by_order(blocks)
        .into_iter()
        .map(|b| if b.id == replacement.id { replacement.clone() } else { b })
        .collect();

    Applied::Changed(with_page_blocks(template, page, renumber(next)))
}

/// Remove a block and close the gap it leaves in `order`
pub fn delete_block(template: &Template, page: &str, block_id: &str) -> Applied {
    let Some(blocks) = template.pages.get(page) else {
        return Applied::Unchanged;
    };
    if !blocks.iter().any(|b| b.id == block_id) {
        return Applied::Unchanged;
    }

    let remaining: Vec<Block> = sorted_by_order(blocks)
        .into_iter()
        .filter(|b| b.id != block_id)
        .collect();

    Applied::Changed(with_page_blocks(template, page, renumber(remaining)))
}

/// Move `dragged_id` next to `target_id`
///
/// The dragged block is removed first, then reinserted immediately before the
/// target for [`Edge::Top`] or immediately after it for [`Edge::Bottom`].
pub fn reorder_blocks(
    template: &Template,
    page: &str,
    dragged_id: &str,
    target_id: &str,
    edge: Edge,
) -> Applied {
    if dragged_id == target_id {
        return Applied::Unchanged;
    }
    let Some(blocks) = template.pages.get(page) else {
        return Applied::Unchanged;
    };

    let mut sorted = sorted_by_order(blocks);
    let Some(from) = sorted.iter().position(|b| b.id == dragged_id) else {
        return Applied::Unchanged;
    };
    if !sorted.iter().any(|b| b.id == target_id) {
        return Applied::Unchanged;
    }

    let before: Vec<String> = sorted.iter().map(|b| b.id.clone()).collect();

    let dragged = sorted.remove(from);
    // Target is present and distinct from the dragged block
    let target_index = sorted.iter().position(|b| b.id == target_id).unwrap_or(sorted.len());
    let insert_at = match edge {
        Edge::Top => target_index,
        Edge::Bottom => target_index + 1,
    };
    sorted.insert(insert_at.min(sorted.len()), dragged);

    let unchanged_order = sorted.iter().map(|b| b.id.as_str()).eq(before.iter().map(String::as_str));
    let contiguous = sorted_by_order(blocks).iter().map(|b| b.order).eq(0..blocks.len());
    if unchanged_order && contiguous {
        return Applied::Unchanged;
    }

    Applied::Changed(with_page_blocks(template, page, renumber(sorted)))
}

/// Move a block one position up or down; no-op at either end
pub fn move_block(template: &Template, page: &str, block_id: &str, direction: MoveDirection) -> Applied {
    let Some(blocks) = template.pages.get(page) else {
        return Applied::Unchanged;
    };

    let mut sorted = sorted_by_order(blocks);
    let Some(index) = sorted.iter().position(|b| b.id == block_id) else {
        return Applied::Unchanged;
    };

    let swap_with = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < sorted.len() => index + 1,
        _ => return Applied::Unchanged,
    };
    sorted.swap(index, swap_with);

    Applied::Changed(with_page_blocks(template, page, renumber(sorted)))
}

/// Insert a copy of a block, with a fresh id, right after the original
pub fn duplicate_block(template: &Template, page: &str, block_id: &str, ids: &mut IdGenerator) -> Applied {
    let Some(blocks) = template.pages.get(page) else {
        return Applied::Unchanged;
    };

    let mut sorted = sorted_by_order(blocks);
    let Some(index) = sorted.iter().position(|b| b.id == block_id) else {
        return Applied::Unchanged;
    };

    let copy = Block {
        id: ids.next_id(template),
        ..sorted[index].clone()
    };
    sorted.insert(index + 1, copy);

    Applied::Changed(with_page_blocks(template, page, renumber(sorted)))
}

/// Replace the template-wide styles
pub fn update_styles(template: &Template, styles: &TemplateStyles) -> Applied {
    if &template.styles == styles {
        return Applied::Unchanged;
    }

    Applied::Changed(Template {
        styles: styles.clone(),
        ..template.clone()
    })
}

/// Add an empty page; no-op if the name is taken
pub fn add_page(template: &Template, page: &str) -> Applied {
    if template.has_page(page) {
        return Applied::Unchanged;
    }

    let mut next = template.clone();
    next.pages.insert(page.to_string(), Vec::new());
    Applied::Changed(next)
}

/// Remove a page and all its blocks
pub fn remove_page(template: &Template, page: &str) -> Applied {
    if !template.has_page(page) {
        return Applied::Unchanged;
    }

    let mut next = template.clone();
    next.pages.shift_remove(page);
    Applied::Changed(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockStyles, Content};
    use serde_json::json;

    fn block(id: &str, order: usize) -> Block {
        Block::new(id, BlockType::Text, Content::new(), order)
    }

    fn abc() -> Template {
        Template::new("tpl", "Shop")
            .with_page("home", vec![block("A", 0), block("B", 1), block("C", 2)])
            .with_page("cart", vec![])
    }

    fn ids(template: &Template, page: &str) -> Vec<String> {
        template
            .sorted_blocks(page)
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect()
    }

    #[test]
    fn test_reorder_bottom_places_after_target() {
        let result = reorder_blocks(&abc(), "home", "A", "C", Edge::Bottom).changed().unwrap();
        assert_eq!(ids(&result, "home"), vec!["B", "C", "A"]);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_reorder_top_places_before_target() {
        let result = reorder_blocks(&abc(), "home", "A", "C", Edge::Top).changed().unwrap();
        assert_eq!(ids(&result, "home"), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_reorder_upwards() {
        let result = reorder_blocks(&abc(), "home", "C", "A", Edge::Top).changed().unwrap();
        assert_eq!(ids(&result, "home"), vec!["C", "A", "B"]);

        let result = reorder_blocks(&abc(), "home", "C", "A", Edge::Bottom).changed().unwrap();
        assert_eq!(ids(&result, "home"), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_reorder_self_is_noop() {
        let template = abc();
        let result = reorder_blocks(&template, "home", "A", "A", Edge::Top);
        assert_eq!(result, Applied::Unchanged);
        assert_eq!(result.or_original(&template), template);
    }

    #[test]
    fn test_reorder_into_same_position_is_noop() {
        // A already sits right above B
        assert_eq!(reorder_blocks(&abc(), "home", "A", "B", Edge::Top), Applied::Unchanged);
        assert_eq!(reorder_blocks(&abc(), "home", "B", "A", Edge::Bottom), Applied::Unchanged);
    }

    #[test]
    fn test_reorder_missing_ids_is_noop() {
        assert_eq!(reorder_blocks(&abc(), "home", "Z", "A", Edge::Top), Applied::Unchanged);
        assert_eq!(reorder_blocks(&abc(), "home", "A", "Z", Edge::Top), Applied::Unchanged);
        assert_eq!(reorder_blocks(&abc(), "nope", "A", "B", Edge::Top), Applied::Unchanged);
    }

    #[test]
    fn test_reorder_uses_order_not_storage_position() {
        let template = Template::new("tpl", "Shop")
            .with_page("home", vec![block("C", 2), block("A", 0), block("B", 1)]);

        let result = reorder_blocks(&template, "home", "A", "B", Edge::Bottom).changed().unwrap();
        assert_eq!(ids(&result, "home"), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_add_to_empty_page_gets_order_zero() {
        let registry = BlockRegistry::builtin();
        let mut gen = IdGenerator::new("tpl");

        let result = add_block(&abc(), "cart", &BlockType::Cart, &registry, &mut gen).changed().unwrap();
        let cart = result.page("cart").unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].order, 0);
        assert_eq!(cart[0].block_type, BlockType::Cart);
        assert_eq!(cart[0].content.get("title"), Some(&json!("Your cart")));
    }

    #[test]
    fn test_add_appends_with_next_order() {
        let registry = BlockRegistry::builtin();
        let mut gen = IdGenerator::new("tpl");
        let original = abc();

        let result = add_block(&original, "home", &BlockType::Footer, &registry, &mut gen).changed().unwrap();
        let home = result.sorted_blocks("home").unwrap();

        assert_eq!(home.len(), 4);
        assert_eq!(home[3].order, 3);
        assert_eq!(home[3].block_type, BlockType::Footer);
        assert!(!original.contains_block_id(&home[3].id));
        assert_eq!(original.page("home").unwrap().len(), 3);
    }

    #[test]
    fn test_add_unknown_type_uses_fallback_content() {
        let registry = BlockRegistry::builtin();
        let mut gen = IdGenerator::new("tpl");
        let custom = BlockType::Custom("marquee".to_string());

        let result = add_block(&abc(), "home", &custom, &registry, &mut gen).changed().unwrap();
        let added = result.sorted_blocks("home").unwrap().pop().unwrap();
        assert_eq!(added.block_type, custom);
        assert!(added.content.is_empty());
    }

    #[test]
    fn test_add_to_missing_page_is_noop() {
        let registry = BlockRegistry::builtin();
        let mut gen = IdGenerator::new("tpl");
        assert_eq!(add_block(&abc(), "blog", &BlockType::Text, &registry, &mut gen), Applied::Unchanged);
    }

    #[test]
    fn test_update_replaces_content_and_keeps_order() {
        let original = abc();
        let mut content = Content::new();
        content.insert("text".to_string(), json!("Hello"));
        let updated = Block {
            order: 99,
            ..block("B", 0).with_content(content.clone())
        };

        let result = update_block(&original, "home", &updated).changed().unwrap();
        let b = result.find_block("home", "B").unwrap();
        assert_eq!(b.content, content);
        assert_eq!(b.order, 1);
        assert!(original.find_block("home", "B").unwrap().content.is_empty());
    }

    #[test]
    fn test_reorder_unsorted_storage_same_position_is_noop() {
        let template = Template::new("tpl", "Shop")
            .with_page("home", vec![block("C", 2), block("A", 0), block("B", 1)]);
        assert!(template.validate().is_ok());

        assert_eq!(reorder_blocks(&template, "home", "A", "B", Edge::Top), Applied::Unchanged);
        assert_eq!(reorder_blocks(&template, "home", "C", "B", Edge::Bottom), Applied::Unchanged);
    }

    #[test]
    fn test_update_replaces_styles_wholesale() {
        let mut first = BlockStyles::new();
        first.insert("padding".to_string(), "16px".to_string());
        first.insert("background".to_string(), "#fff".to_string());
        let styled = update_block(&abc(), "home", &block("B", 1).with_styles(first))
            .changed()
            .unwrap();

        let mut second = BlockStyles::new();
        second.insert("background".to_string(), "#000".to_string());
        let restyled = update_block(&styled, "home", &block("B", 1).with_styles(second.clone()))
            .changed()
            .unwrap();

        let b = restyled.find_block("home", "B").unwrap();
        assert_eq!(b.styles, second);
        assert!(!b.styles.contains_key("padding"));

        let same = block("B", 1).with_styles(second);
        assert_eq!(update_block(&restyled, "home", &same), Applied::Unchanged);
    }

    #[test]
    fn test_update_missing_or_identical_is_noop() {
        assert_eq!(update_block(&abc(), "home", &block("Z", 0)), Applied::Unchanged);
        assert_eq!(update_block(&abc(), "home", &block("B", 1)), Applied::Unchanged);
    }

    #[test]
    fn test_delete_renumbers() {
        let result = delete_block(&abc(), "home", "A").changed().unwrap();
        let home = result.sorted_blocks("home").unwrap();

        assert_eq!(home.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["B", "C"]);
        assert_eq!(home.iter().map(|b| b.order).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(delete_block(&abc(), "home", "Z"), Applied::Unchanged);
    }

    #[test]
    fn test_move_block_steps() {
        let result = move_block(&abc(), "home", "B", MoveDirection::Up).changed().unwrap();
        assert_eq!(ids(&result, "home"), vec!["B", "A", "C"]);

        assert_eq!(move_block(&abc(), "home", "A", MoveDirection::Up), Applied::Unchanged);
        assert_eq!(move_block(&abc(), "home", "C", MoveDirection::Down), Applied::Unchanged);
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let mut gen = IdGenerator::new("tpl");
        let result = duplicate_block(&abc(), "home", "A", &mut gen).changed().unwrap();
        let home = ids(&result, "home");

        assert_eq!(home.len(), 4);
        assert_eq!(home[0], "A");
        assert_ne!(home[1], "A");
        assert_eq!(&home[2..], ["B", "C"]);
        assert!(result.validate().is_ok());
    }

    #[test]
    fn test_update_styles() {
        let styles = TemplateStyles {
            primary_color: "#ff0000".to_string(),
            ..Default::default()
        };
        let result = update_styles(&abc(), &styles).changed().unwrap();
        assert_eq!(result.styles, styles);
        assert_eq!(update_styles(&result, &styles), Applied::Unchanged);
    }

    #[test]
    fn test_pages() {
        let result = add_page(&abc(), "about").changed().unwrap();
        assert_eq!(result.page("about"), Some(&[][..]));
        assert_eq!(add_page(&result, "about"), Applied::Unchanged);

        let result = remove_page(&result, "home").changed().unwrap();
        assert!(!result.has_page("home"));
        assert_eq!(remove_page(&result, "home"), Applied::Unchanged);
    }
}
