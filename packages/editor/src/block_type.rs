//! # Block Types
//!
//! The closed set of block tags a storefront page can hold.
//!
//! Tags are kebab-case strings on the wire (`"product-detail"`). A tag outside
//! the known set is preserved as [`BlockType::Custom`] so that templates written
//! by a newer editor survive a load/save round trip through an older one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Block type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, AsRefStr, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Header,
    Hero,
    Text,
    Image,
    Gallery,
    Video,
    Products,
    ProductDetail,
    Categories,
    Features,
    Testimonials,
    Cta,
    Newsletter,
    Contact,
    Faq,
    Pricing,
    Team,
    Cart,
    Checkout,
    Footer,

    /// Tag not in the known set
    #[strum(default)]
    Custom(String),
}

impl BlockType {
    /// Wire tag for this type
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Custom(tag) => tag,
            known => known.as_ref(),
        }
    }

    /// Whether this tag belongs to the known set
    pub fn is_known(&self) -> bool {
        !matches!(self, BlockType::Custom(_))
    }

    /// Every known tag, in declaration order
    pub fn known() -> impl Iterator<Item = BlockType> {
        BlockType::iter().filter(BlockType::is_known)
    }

    /// Parse a wire tag; unknown tags become [`BlockType::Custom`]
    pub fn parse(tag: &str) -> Self {
        BlockType::from_str(tag).unwrap_or_else(|_| BlockType::Custom(tag.to_string()))
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::parse(&tag)
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
