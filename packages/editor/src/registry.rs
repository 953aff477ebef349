//! # Block Registry
//!
//! Maps a block type tag to its [`Capability`]: whether a renderer and an
//! editor exist for it, and the factory producing default content for new
//! blocks.
//!
//! Dispatch never switches on block type. Supporting a new type means
//! registering it here, nothing else.

use crate::block_type::BlockType;
use crate::document::Content;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces default content for a freshly added block
pub type ContentFactory = Arc<dyn Fn() -> Content + Send + Sync>;

/// Behaviors associated with a block type
#[derive(Clone)]
pub struct Capability {
    /// Human-readable name for block pickers
    pub label: String,
    pub has_editor: bool,
    pub has_renderer: bool,
    pub default_content: ContentFactory,
}

impl Capability {
    pub fn new(label: impl Into<String>, default_content: impl Fn() -> Content + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            has_editor: true,
            has_renderer: true,
            default_content: Arc::new(default_content),
        }
    }

    /// Neutral placeholder used for tags nobody registered
    pub fn fallback() -> Self {
        Self {
            label: "Unknown block".to_string(),
            has_editor: false,
            has_renderer: false,
            default_content: Arc::new(Content::new),
        }
    }

    pub fn without_editor(mut self) -> Self {
        self.has_editor = false;
        self
    }

    pub fn default_content(&self) -> Content {
        (self.default_content)()
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("label", &self.label)
            .field("has_editor", &self.has_editor)
            .field("has_renderer", &self.has_renderer)
            .finish_non_exhaustive()
    }
}

/// Lookup table from block type to capability
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    entries: HashMap<BlockType, Capability>,
    fallback: Capability,
}

impl BlockRegistry {
    /// Empty registry; every lookup resolves to the fallback
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: Capability::fallback(),
        }
    }

    /// Registry with every built-in storefront block
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for block_type in BlockType::known() {
            let capability = builtin_capability(&block_type);
            registry.register(block_type, capability);
        }
        registry
    }

    /// Register (or replace) the capability for a type
    pub fn register(&mut self, block_type: BlockType, capability: Capability) -> &mut Self {
        self.entries.insert(block_type, capability);
        self
    }

    /// Capability for a type; unknown types get the fallback, never an error
    pub fn resolve(&self, block_type: &BlockType) -> &Capability {
        self.entries.get(block_type).unwrap_or(&self.fallback)
    }

    pub fn is_registered(&self, block_type: &BlockType) -> bool {
        self.entries.contains_key(block_type)
    }

    pub fn default_content(&self, block_type: &BlockType) -> Content {
        self.resolve(block_type).default_content()
    }

    /// Registered types, sorted by tag
    pub fn block_types(&self) -> Vec<&BlockType> {
        let mut types: Vec<_> = self.entries.keys().collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn object(value: Value) -> Content {
    match value {
        Value::Object(map) => map,
        _ => Content::new(),
    }
}

fn builtin_capability(block_type: &BlockType) -> Capability {
    match block_type {
        BlockType::Header => Capability::new("Header", || {
            object(json!({
                "logo": "",
                "storeName": "My Store",
                "links": [
                    { "label": "Home", "page": "home" },
                    { "label": "Products", "page": "product" },
                    { "label": "Cart", "page": "cart" }
                ]
            }))
        }),
        BlockType::Hero => Capability::new("Hero", || {
            object(json!({
                "title": "Welcome to our store",
                "subtitle": "Discover our latest collection",
                "buttonText": "Shop now",
                "buttonLink": "product",
                "backgroundImage": ""
            }))
        }),
        BlockType::Text => Capability::new("Text", || {
            object(json!({ "heading": "About us", "text": "Tell your story here." }))
        }),
        BlockType::Image => Capability::new("Image", || {
            object(json!({ "url": "", "alt": "", "caption": "" }))
        }),
        BlockType::Gallery => Capability::new("Gallery", || {
            object(json!({ "title": "Gallery", "images": [], "columns": 3 }))
        }),
        BlockType::Video => Capability::new("Video", || {
            object(json!({ "url": "", "autoplay": false, "title": "" }))
        }),
        BlockType::Products => Capability::new("Product grid", || {
            object(json!({ "title": "Featured products", "productIds": [], "columns": 4, "showPrices": true }))
        }),
        BlockType::ProductDetail => Capability::new("Product detail", || {
            object(json!({ "productId": null, "showReviews": true, "showRelated": true }))
        }),
        BlockType::Categories => Capability::new("Categories", || {
            object(json!({ "title": "Shop by category", "categories": [] }))
        }),
        BlockType::Features => Capability::new("Features", || {
            object(json!({
                "title": "Why shop with us",
                "items": [
                    { "icon": "truck", "title": "Free shipping", "text": "On orders over $50" },
                    { "icon": "refresh", "title": "Easy returns", "text": "30-day return policy" }
                ]
            }))
        }),
        BlockType::Testimonials => Capability::new("Testimonials", || {
            object(json!({ "title": "What customers say", "items": [] }))
        }),
        BlockType::Cta => Capability::new("Call to action", || {
            object(json!({ "title": "Ready to start?", "buttonText": "Get started", "buttonLink": "" }))
        }),
        BlockType::Newsletter => Capability::new("Newsletter", || {
            object(json!({ "title": "Stay in the loop", "placeholder": "Your email", "buttonText": "Subscribe" }))
        }),
        BlockType::Contact => Capability::new("Contact", || {
            object(json!({ "title": "Contact us", "email": "", "phone": "", "address": "", "showForm": true }))
        }),
        BlockType::Faq => Capability::new("FAQ", || {
            object(json!({ "title": "Frequently asked questions", "items": [] }))
        }),
        BlockType::Pricing => Capability::new("Pricing", || {
            object(json!({ "title": "Plans", "plans": [] }))
        }),
        BlockType::Team => Capability::new("Team", || {
            object(json!({ "title": "Meet the team", "members": [] }))
        }),
        BlockType::Cart => Capability::new("Cart", || {
            object(json!({ "title": "Your cart", "emptyMessage": "Your cart is empty" }))
        })
        .without_editor(),
        BlockType::Checkout => Capability::new("Checkout", || {
            object(json!({ "title": "Checkout", "buttonText": "Place order" }))
        })
        .without_editor(),
        BlockType::Footer => Capability::new("Footer", || {
            object(json!({ "copyright": "© My Store", "links": [], "social": {} }))
        }),
        BlockType::Custom(_) => Capability::fallback(),
    }
}
