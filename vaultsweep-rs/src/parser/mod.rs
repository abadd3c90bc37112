//! Parsers for Obsidian markdown syntax.

pub mod block_id;
pub mod code_block;
pub mod frontmatter;
pub mod wikilink;

pub use block_id::{extract_block_anchors, parse_block_anchors, remove_block_anchor};
pub use code_block::find_code_spans;
pub use frontmatter::{parse_frontmatter, split_frontmatter};
pub use wikilink::{parse_all_links, parse_embeds, parse_links};
